//! HTTP client wrapper for controller requests.
//!
//! Every failed call is logged once here, with the response payload when one
//! exists, then returned to the caller unchanged: no retry, no
//! transformation. The base address is fixed at construction.

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::error;

use crate::error::{ClientError, Result};

/// Chunk size used when streaming an upload body, so byte progress can be
/// observed between chunks.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// HTTP client for making requests to the storage controller.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client for the given base address.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The configured controller base address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request.
    ///
    /// # Returns
    /// Response body as string
    pub async fn get(&self, path: &str) -> Result<String> {
        let result = self.execute(self.client.get(self.url(path))).await;
        log_failure("GET", path, result)
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<String> {
        let result = self.execute(self.client.delete(self.url(path))).await;
        log_failure("DELETE", path, result)
    }

    /// POST a multipart form with a single file field.
    ///
    /// The payload is streamed in chunks; after each chunk is handed to the
    /// transport, `on_progress` is invoked with `(bytes_sent, total_bytes)`.
    ///
    /// # Arguments
    /// * `path` - Endpoint path, e.g. "/upload"
    /// * `field` - Multipart field name
    /// * `file_name` - File name announced in the form part
    /// * `payload` - File contents
    /// * `on_progress` - Byte progress observer
    pub async fn post_multipart<F>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        payload: Bytes,
        mut on_progress: F,
    ) -> Result<String>
    where
        F: FnMut(u64, u64) + Send + 'static,
    {
        let total = payload.len() as u64;

        let mut chunks = Vec::new();
        let mut offset = 0;
        while offset < payload.len() {
            let end = usize::min(offset + UPLOAD_CHUNK_SIZE, payload.len());
            chunks.push(payload.slice(offset..end));
            offset = end;
        }

        let mut sent = 0u64;
        let body = reqwest::Body::wrap_stream(stream::iter(chunks).map(move |chunk: Bytes| {
            sent += chunk.len() as u64;
            on_progress(sent, total);
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(body, total).file_name(file_name.to_string());
        let form = Form::new().part(field.to_string(), part);

        let result = self
            .execute(self.client.post(self.url(path)).multipart(form))
            .await;
        log_failure("POST", path, result)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Log a failed call with the response payload when present, otherwise the
/// raw error message, and hand the result back untouched.
fn log_failure(method: &str, path: &str, result: Result<String>) -> Result<String> {
    if let Err(err) = &result {
        match err {
            ClientError::Http { status, body } => {
                error!(method, path, status, payload = %body, "controller request failed");
            }
            other => {
                error!(method, path, error = %other, "controller request failed");
            }
        }
    }
    result
}
