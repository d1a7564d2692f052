use crate::http::request::Request;
use crate::http::response::Response;

/// Echoes the request line and header lines back as `message/http`.
pub fn trace(request: &Request) -> Response {
    let mut echo = String::with_capacity(
        request.request_line.len()
            + request.header_lines.iter().map(|l| l.len() + 2).sum::<usize>()
            + 2,
    );
    echo.push_str(&request.request_line);
    echo.push_str("\r\n");
    for line in &request.header_lines {
        echo.push_str(line);
        echo.push_str("\r\n");
    }

    Response::ok("message/http", echo)
}
