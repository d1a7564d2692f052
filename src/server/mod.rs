//! Connection acceptance and dispatch.

pub mod listener;
