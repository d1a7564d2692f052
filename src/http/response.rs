use bytes::Bytes;

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Malformed request line, head or body
/// - `Forbidden` (403): Path resolves outside the document root
/// - `NotFound` (404): Resource not found
/// - `LengthRequired` (411): POST without Content-Length
/// - `InternalServerError` (500): Server error
/// - `NotImplemented` (501): Unsupported method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 411 Length Required
    LengthRequired,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::LengthRequired.as_u16(), 411);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::LengthRequired => 411,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            403 => Some(StatusCode::Forbidden),
            404 => Some(StatusCode::NotFound),
            411 => Some(StatusCode::LengthRequired),
            500 => Some(StatusCode::InternalServerError),
            501 => Some(StatusCode::NotImplemented),
            _ => None,
        }
    }

    /// Returns the reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Reason phrase for an arbitrary numeric code.
pub fn reason_phrase_for(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .map(|s| s.reason_phrase())
        .unwrap_or("Unknown Status Code")
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep insertion order so that identical requests serialize to
/// identical bytes.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in the order they will be written
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use lantern::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body("<p>hi</p>")
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("9"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds or replaces a header.
    ///
    /// Replacement matches names case-insensitively and keeps the original
    /// position of the header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Adds the Content-Length header from the body size unless one is
    /// already present. HEAD responses rely on this to advertise the file
    /// size while carrying an empty body.
    pub fn build(self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));

        let mut headers = self.headers;
        if !has_length {
            headers.push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a 200 OK response with the given content type and body.
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .body(body)
            .build()
    }

    /// Creates the HTML error page for a status.
    ///
    /// ```
    /// # use lantern::http::response::{Response, StatusCode};
    /// let response = Response::error(StatusCode::NotFound);
    /// assert_eq!(&response.body[..], b"<html><body><h1>404 Not Found</h1></body></html>");
    /// ```
    pub fn error(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/html")
            .body(error_page(status.as_u16()))
            .build()
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The `HTTP/1.1 <code> <reason>` line, without terminator.
    pub fn status_line(&self) -> String {
        format!(
            "HTTP/1.1 {} {}",
            self.status.as_u16(),
            self.status.reason_phrase()
        )
    }
}

/// Renders the fixed-format error body for any numeric code.
pub fn error_page(code: u16) -> String {
    format!(
        "<html><body><h1>{} {}</h1></body></html>",
        code,
        reason_phrase_for(code)
    )
}
