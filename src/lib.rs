//! Lantern - Minimal HTTP/1.1 origin server
//!
//! Core library for request parsing, path resolution and response generation.

pub mod config;
pub mod handlers;
pub mod http;
pub mod resolver;
pub mod server;
