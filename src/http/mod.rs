//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 subset the server speaks: one request
//! per connection, no keep-alive, no chunked bodies.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Drives a single connection from request to close
//! - **`parser`**: Reads the request line, header block and POST body
//! - **`request`**: HTTP request representation and method parsing
//! - **`response`**: Status codes, error pages and the response builder
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: Content type probing based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read request line, headers, POST body
//!        └──────┬──────┘
//!               │ Request parsed        Parse/read failure
//!               ▼                      ─────────────────┐
//!        ┌──────────────────┐                           │
//!        │   Processing     │ ← Run the method handler  │
//!        └──────┬───────────┘                           │
//!               │ Response ready                        │ Error page
//!               ▼                                       │
//!        ┌──────────────────┐                           │
//!        │    Writing       │ ◄─────────────────────────┘
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← Stream shut down and dropped
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lantern::handlers::Context;
//! use lantern::http::connection::Connection;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! async fn accept_loop(ctx: Arc<Context>) -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let ctx = ctx.clone();
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, ctx).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
