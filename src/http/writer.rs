use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Serializes a response into its exact wire bytes: the status line, one
/// `Name: value` line per header in stored order, a blank line, then the body.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let head = resp
        .headers
        .iter()
        .fold(resp.status_line() + "\r\n", |mut head, (name, value)| {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
            head
        });

    [head.as_bytes(), b"\r\n".as_slice(), &resp.body[..]].concat()
}

/// Holds serialized bytes until every one has reached the stream.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
