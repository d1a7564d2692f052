//! Per-method response generation.
//!
//! [`handle`] dispatches a parsed request to the GET/HEAD file handlers, the
//! POST form echo or the TRACE echo, and turns every failure into a status
//! response. Nothing escapes to the connection except the final `Response`.

pub mod form;
pub mod static_files;
pub mod trace;

use std::fmt;
use std::io;

use tracing::{error, warn};

use crate::config::ServerConfig;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::resolver::{PathResolver, ResolveError};

/// Read-only state shared by every connection.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ServerConfig,
    pub resolver: PathResolver,
}

impl Context {
    /// Fails if the configured root directory cannot be canonicalized.
    pub fn new(config: ServerConfig) -> io::Result<Self> {
        let resolver = PathResolver::new(&config.root_directory)?;
        Ok(Self { config, resolver })
    }
}

/// Why a handler did not produce its success response.
#[derive(Debug)]
pub enum HandlerError {
    /// A protocol outcome answered with its error page.
    Status(StatusCode),
    /// An unexpected filesystem failure.
    Io(io::Error),
}

impl From<ResolveError> for HandlerError {
    fn from(e: ResolveError) -> Self {
        HandlerError::Status(e.status())
    }
}

impl From<io::Error> for HandlerError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            // Removed between resolution and use.
            io::ErrorKind::NotFound => HandlerError::Status(StatusCode::NotFound),
            _ => HandlerError::Io(e),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Status(status) => {
                write!(f, "{} {}", status.as_u16(), status.reason_phrase())
            }
            HandlerError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for HandlerError {}

/// Builds the response for `request`.
pub async fn handle(request: &Request, ctx: &Context) -> Response {
    let result = match &request.method {
        Method::GET => static_files::get(request, ctx).await,
        Method::HEAD => static_files::head(request, ctx).await,
        Method::POST => form::post(request),
        Method::TRACE => Ok(trace::trace(request)),
        Method::Unsupported(token) => {
            warn!(method = %token, "Unsupported method");
            Err(HandlerError::Status(StatusCode::NotImplemented))
        }
    };

    match result {
        Ok(response) => response,
        Err(HandlerError::Status(status)) => Response::error(status),
        Err(HandlerError::Io(e)) => {
            error!(
                error = %e,
                method = %request.method,
                path = %request.path,
                "Failed to handle request"
            );
            Response::internal_error()
        }
    }
}
