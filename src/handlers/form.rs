//! POST: echo of submitted form fields.

use std::collections::BTreeMap;

use crate::handlers::HandlerError;
use crate::http::mime;
use crate::http::parser::parse_params;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// The only path that accepts POST.
pub const FORM_ENDPOINT: &str = "params_info.html";

pub fn post(request: &Request) -> Result<Response, HandlerError> {
    if request.path != FORM_ENDPOINT {
        return Err(HandlerError::Status(StatusCode::NotFound));
    }
    let body = request
        .body
        .as_deref()
        .ok_or(HandlerError::Status(StatusCode::LengthRequired))?;

    // Query parameters override body fields of the same name.
    let mut params: BTreeMap<String, String> = parse_params(&String::from_utf8_lossy(body))
        .into_iter()
        .collect();
    params.extend(request.query_params.clone());

    Ok(Response::ok(mime::HTML, render_params_page(&params)))
}

/// Renders one `<p>name: value</p>` per field. Values are written unescaped.
pub fn render_params_page(params: &BTreeMap<String, String>) -> String {
    let mut html = String::from("<!DOCTYPE html><html><body>");
    html.push_str("<h2>Form Submission Details</h2>");
    for (name, value) in params {
        html.push_str("<p>");
        html.push_str(name);
        html.push_str(": ");
        html.push_str(value);
        html.push_str("</p>");
    }
    html.push_str("</body></html>");
    html
}
