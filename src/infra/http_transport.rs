use crate::config::ServiceConfig;
use crate::domain::{SignedRequest, UploadOutcome};
use crate::errors::UploadError;
use crate::ports::UploadTransport;
use async_trait::async_trait;
use reqwest::{Body, Client};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Upload transport backed by a single pooled `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client using the connect and request timeouts from `config`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Transport` if the TLS backend cannot be initialised.
    pub fn new(config: &ServiceConfig) -> Result<Self, UploadError> {
        let mut builder = Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(&self, request: SignedRequest) -> Result<UploadOutcome, UploadError> {
        let SignedRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let file = File::open(&body.path)
            .await
            .map_err(|e| UploadError::file_access(&body.path, e))?;
        // Never send more than was hashed, even if the file grew since.
        let stream = ReaderStream::new(file.take(body.content_length));

        debug!(url = %url, file = %body.path.display(), bytes = body.content_length, "sending upload");

        let response = self
            .client
            .request(method, &url)
            .headers(headers)
            .body(Body::wrap_stream(stream))
            .send()
            .await?;

        let status = response.status();
        let status_line = match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        };
        let body = response.text().await?;

        Ok(UploadOutcome { status_line, body })
    }
}
