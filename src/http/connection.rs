use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::handlers::{self, Context};
use crate::http::parser::{ReadError, read_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// One client connection, serving exactly one request.
pub struct Connection<S> {
    stream: BufReader<S>,
    ctx: Arc<Context>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<Context>) -> Self {
        Self {
            stream: BufReader::new(stream),
            ctx,
            state: ConnectionState::Reading,
        }
    }

    /// Serves the request and closes the stream, whatever the outcome.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.get_mut().shutdown().await {
            debug!(error = %e, "Shutdown after response failed");
        }
        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match read_request(&mut self.stream, &self.ctx.config.default_page).await {
                        Ok(req) => {
                            info!(request_line = %req.request_line, "Client request");
                            info!(method = %req.method, uri = %req.path, version = %req.version, "Parsed request");
                            if !req.query_params.is_empty() {
                                debug!(params = ?req.query_params, "Query parameters");
                            }
                            ConnectionState::Processing(req)
                        }
                        Err(ReadError::Parse(e)) => {
                            warn!(error = %e, "Rejecting request");
                            Self::respond(Response::error(e.status()))
                        }
                        Err(ReadError::Io(e)) => {
                            error!(error = %e, "Failed to read request");
                            Self::respond(Response::internal_error())
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = handlers::handle(&req, &self.ctx).await;
                    self.state = Self::respond(response);
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(self.stream.get_mut()).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    fn respond(response: Response) -> ConnectionState {
        info!(status = response.status.as_u16(), "{}", response.status_line());
        ConnectionState::Writing(ResponseWriter::new(&response))
    }
}
