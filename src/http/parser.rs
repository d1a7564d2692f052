use crate::http::request::{Method, Request, header_value};
use crate::http::response::StatusCode;
use std::collections::HashMap;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::debug;

/// Longest accepted request or header line, terminator excluded.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Most header lines accepted in a single request head.
pub const MAX_HEADER_LINES: usize = 100;

const CONTENT_LENGTH: &str = "Content-Length";

#[derive(Debug)]
pub enum ParseError {
    /// The client closed the connection before sending a request line.
    EmptyRequest,
    /// The request line did not hold a method, URI and version.
    MalformedRequestLine(String),
    /// A head line or the header count exceeded its limit.
    HeadTooLarge,
    InvalidContentLength(String),
    /// The stream ended before Content-Length body bytes arrived.
    TruncatedBody { expected: usize, received: usize },
}

impl ParseError {
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::EmptyRequest
            | ParseError::MalformedRequestLine(_)
            | ParseError::HeadTooLarge
            | ParseError::InvalidContentLength(_)
            | ParseError::TruncatedBody { .. } => StatusCode::BadRequest,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "empty request"),
            ParseError::MalformedRequestLine(line) => write!(f, "malformed request line {line:?}"),
            ParseError::HeadTooLarge => write!(f, "request head too large"),
            ParseError::InvalidContentLength(v) => write!(f, "invalid Content-Length {v:?}"),
            ParseError::TruncatedBody { expected, received } => {
                write!(f, "body truncated: expected {expected} bytes, got {received}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Failure while reading a request off the wire.
#[derive(Debug)]
pub enum ReadError {
    Parse(ParseError),
    Io(std::io::Error),
}

impl From<ParseError> for ReadError {
    fn from(e: ParseError) -> Self {
        ReadError::Parse(e)
    }
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Parse(e) => write!(f, "{e}"),
            ReadError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ReadError {}

/// The pieces of a request line.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLine {
    pub method: Method,
    pub raw_uri: String,
    pub path: String,
    pub query_params: HashMap<String, String>,
    pub version: String,
}

/// Parses `METHOD URI VERSION`.
///
/// The URI loses one leading `/` and is split at the first `?`. An empty path
/// becomes `default_page`.
pub fn parse_request_line(line: &str, default_page: &str) -> Result<RequestLine, ParseError> {
    let malformed = || ParseError::MalformedRequestLine(line.to_string());

    let mut tokens: Vec<&str> = line.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    if tokens.len() < 3 || tokens[..3].iter().any(|t| t.is_empty()) {
        return Err(malformed());
    }

    let raw_uri = tokens[1];
    let uri = raw_uri.strip_prefix('/').unwrap_or(raw_uri);

    let (path, query_params) = match uri.split_once('?') {
        Some((path, query)) => (path, parse_params(query)),
        None => (uri, HashMap::new()),
    };
    let path = if path.is_empty() { default_page } else { path };

    Ok(RequestLine {
        method: Method::from(tokens[0]),
        raw_uri: raw_uri.to_string(),
        path: path.to_string(),
        query_params,
        version: tokens[2].to_string(),
    })
}

/// Decodes `name=value&name=value` pairs.
///
/// Pairs that are not exactly one non-empty name and one non-empty value are
/// dropped. Later duplicates replace earlier ones.
pub fn parse_params(input: &str) -> HashMap<String, String> {
    input
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) if !name.is_empty() && !value.is_empty() => {
                    Some((decode_component(name)?, decode_component(value)?))
                }
                _ => None,
            }
        })
        .collect()
}

/// Form-decodes one component: `+` is a space, `%XX` a UTF-8 byte.
pub fn decode_component(s: &str) -> Option<String> {
    urlencoding::decode(&s.replace('+', " "))
        .ok()
        .map(|c| c.into_owned())
}

/// Reads one request off `reader`: the request line, the header block and,
/// for POST, a body of exactly Content-Length bytes.
pub async fn read_request<R>(reader: &mut R, default_page: &str) -> Result<Request, ReadError>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = read_head_line(reader)
        .await?
        .ok_or(ParseError::EmptyRequest)?;
    let line = parse_request_line(&request_line, default_page)?;

    let mut headers = HashMap::new();
    let mut header_lines = Vec::new();

    while let Some(header_line) = read_head_line(reader).await? {
        if header_line.is_empty() {
            break;
        }
        if header_lines.len() == MAX_HEADER_LINES {
            return Err(ParseError::HeadTooLarge.into());
        }

        debug!(header = %header_line, "Request header");
        if let Some((key, value)) = header_line.split_once(':') {
            let (key, value) = (key.trim(), value.trim());
            if key.eq_ignore_ascii_case(CONTENT_LENGTH) {
                check_repeated_length(&headers, value)?;
            }
            headers.insert(key.to_string(), value.to_string());
        }
        header_lines.push(header_line);
    }

    let body = match line.method {
        Method::POST => read_body(reader, &headers).await?,
        _ => None,
    };

    Ok(Request {
        method: line.method,
        raw_uri: line.raw_uri,
        path: line.path,
        query_params: line.query_params,
        version: line.version,
        headers,
        request_line,
        header_lines,
        body,
    })
}

/// Reads one CRLF or LF terminated line without its terminator.
///
/// Returns `None` at end of stream. A final unterminated line is returned
/// as-is.
async fn read_head_line<R>(reader: &mut R) -> Result<Option<String>, ReadError>
where
    R: AsyncBufRead + Unpin,
{
    let limit = (MAX_LINE_BYTES + 2) as u64;
    let mut buf = Vec::new();
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if n as u64 == limit {
        return Err(ParseError::HeadTooLarge.into());
    }

    if buf.len() > MAX_LINE_BYTES {
        return Err(ParseError::HeadTooLarge.into());
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// The declared body length, `None` when no Content-Length was sent.
///
/// Repeated Content-Length headers are refused while reading the head
/// unless they agree, so any spelling of the name gives the same value.
pub fn content_length(headers: &HashMap<String, String>) -> Result<Option<usize>, ParseError> {
    header_value(headers, CONTENT_LENGTH)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))
        })
        .transpose()
}

fn check_repeated_length(headers: &HashMap<String, String>, value: &str) -> Result<(), ParseError> {
    match header_value(headers, CONTENT_LENGTH) {
        Some(previous) if previous != value => {
            Err(ParseError::InvalidContentLength(format!("{previous}, {value}")))
        }
        _ => Ok(()),
    }
}

async fn read_body<R>(
    reader: &mut R,
    headers: &HashMap<String, String>,
) -> Result<Option<Vec<u8>>, ReadError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(expected) = content_length(headers)? else {
        return Ok(None);
    };

    let mut body = Vec::with_capacity(expected.min(64 * 1024));
    (&mut *reader).take(expected as u64).read_to_end(&mut body).await?;

    if body.len() < expected {
        return Err(ParseError::TruncatedBody {
            expected,
            received: body.len(),
        }
        .into());
    }

    Ok(Some(body))
}
