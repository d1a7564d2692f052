use std::collections::HashMap;
use std::fmt;

/// HTTP request methods.
///
/// The server implements GET, HEAD, POST and TRACE. Anything else is kept as
/// `Unsupported` so the dispatcher can answer 501 Not Implemented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Submit form data to `params_info.html`
    POST,
    /// TRACE - Echo the request head back to the client
    TRACE,
    /// Any other token found in the request line
    Unsupported(String),
}

impl From<&str> for Method {
    /// Parses an HTTP method from its request-line token.
    ///
    /// Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::from("GET"), Method::GET);
    /// assert_eq!(Method::from("get"), Method::Unsupported("get".to_string()));
    /// ```
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "TRACE" => Method::TRACE,
            other => Method::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::HEAD => f.write_str("HEAD"),
            Method::POST => f.write_str("POST"),
            Method::TRACE => f.write_str("TRACE"),
            Method::Unsupported(token) => f.write_str(token),
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// One `Request` is built per connection and dropped when the connection
/// closes. The raw request line and header lines are kept verbatim so TRACE
/// can echo them.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The URI token exactly as it appeared in the request line
    pub raw_uri: String,
    /// URI without leading slash and query, or the default page
    pub path: String,
    /// Decoded query string parameters
    pub query_params: HashMap<String, String>,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, names in the case they were received
    pub headers: HashMap<String, String>,
    /// The request line without its line terminator
    pub request_line: String,
    /// Header lines without terminators, in arrival order
    pub header_lines: Vec<String>,
    /// Request body, read only for POST requests carrying Content-Length
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    raw_uri: Option<String>,
    version: Option<String>,
    query_params: HashMap<String, String>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            raw_uri: None,
            version: None,
            query_params: HashMap::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn raw_uri(mut self, raw_uri: impl Into<String>) -> Self {
        self.raw_uri = Some(raw_uri.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds the request, synthesizing the raw head from the parts.
    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let path = self.path.ok_or("path missing")?;
        let version = self.version.unwrap_or_else(|| "HTTP/1.1".to_string());
        let raw_uri = self.raw_uri.unwrap_or_else(|| format!("/{path}"));

        let request_line = format!("{method} {raw_uri} {version}");
        let header_lines = self
            .headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();

        Ok(Request {
            method,
            raw_uri,
            path,
            query_params: self.query_params,
            version,
            headers: self.headers.into_iter().collect(),
            request_line,
            header_lines,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the header value if present, `None` otherwise.
    pub fn header(&self, key: &str) -> Option<&str> {
        header_value(&self.headers, key)
    }
}

pub(crate) fn header_value<'a>(headers: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}
