//! GET and HEAD: files under the document root.

use tokio::fs;
use tracing::debug;

use crate::handlers::{Context, HandlerError};
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::resolver::ResolvedPath;

/// Answers with the whole file and its probed content type.
pub async fn get(request: &Request, ctx: &Context) -> Result<Response, HandlerError> {
    let target = resolve_file(request, ctx).await?.0;
    let content_type = mime::content_type_for(target.as_path());
    let content = fs::read(&target).await?;

    debug!(
        file = %target.as_path().display(),
        bytes = content.len(),
        "Serving file"
    );
    Ok(Response::ok(content_type, content))
}

/// Answers with GET's headers, taking the length from file metadata.
pub async fn head(request: &Request, ctx: &Context) -> Result<Response, HandlerError> {
    let (target, len) = resolve_file(request, ctx).await?;

    Ok(ResponseBuilder::new(StatusCode::Ok)
        .header("Date", http_date())
        .header("Content-Type", mime::content_type_for(target.as_path()))
        .header("Content-Length", len.to_string())
        .build())
}

/// Resolves the request path to a regular file and its size.
async fn resolve_file(request: &Request, ctx: &Context) -> Result<(ResolvedPath, u64), HandlerError> {
    let target = ctx.resolver.resolve(&request.path)?;
    let metadata = fs::metadata(&target).await?;
    if !metadata.is_file() {
        return Err(HandlerError::Status(StatusCode::NotFound));
    }
    Ok((target, metadata.len()))
}

/// Current time as an RFC 7231 IMF-fixdate.
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
