//! Typed controller API on top of the HTTP transport.
//!
//! [`ControllerClient`] speaks the documented controller endpoints and
//! decodes their wire shapes. The operations are behind the [`Controller`]
//! trait so stores and monitors can run against a fake controller in tests.

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;

/// Byte progress observer handed down to the transport: `(done, total)`.
pub type ByteProgress = Box<dyn FnMut(u64, u64) + Send>;

/// Status message returned when the controller sends no `message` field.
const UPLOAD_FALLBACK_MESSAGE: &str = "Upload complete";

/// Characters escaped when a file name is embedded as a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Operations the storage controller exposes to this client.
#[async_trait]
pub trait Controller: Send + Sync {
    /// File names known to the controller, in server order.
    async fn list_files(&self) -> Result<Vec<String>>;

    /// Registered storage nodes; only the count is consumed client-side.
    async fn list_nodes(&self) -> Result<Vec<String>>;

    /// Upload one file as multipart field `file`.
    ///
    /// # Returns
    /// The controller's status message.
    async fn upload_file(
        &self,
        name: &str,
        payload: Bytes,
        on_progress: ByteProgress,
    ) -> Result<String>;

    /// Delete one file by name.
    async fn delete_file(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct FilesResponse {
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NodesResponse {
    #[serde(default)]
    nodes: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    message: Option<String>,
}

/// Controller client speaking the documented HTTP endpoints.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    http: HttpClient,
}

impl ControllerClient {
    /// Create a client for the configured controller address.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(&config.base_url),
        }
    }

    /// Direct download link for a file.
    ///
    /// Downloads are fetched by the embedder (e.g. a browser anchor), not
    /// through the transport client.
    pub fn download_url(&self, name: &str) -> String {
        format!("{}/download/{}", self.http.base_url(), encode_segment(name))
    }
}

#[async_trait]
impl Controller for ControllerClient {
    async fn list_files(&self) -> Result<Vec<String>> {
        let body = self.http.get("/files").await?;
        let parsed: FilesResponse = serde_json::from_str(&body)?;
        Ok(parsed.files)
    }

    async fn list_nodes(&self) -> Result<Vec<String>> {
        let body = self.http.get("/nodes").await?;
        let parsed: NodesResponse = serde_json::from_str(&body)?;
        // Node entries are opaque; keep a printable form for callers that
        // want more than the count.
        Ok(parsed
            .nodes
            .into_iter()
            .map(|node| match node {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    }

    async fn upload_file(
        &self,
        name: &str,
        payload: Bytes,
        on_progress: ByteProgress,
    ) -> Result<String> {
        let body = self
            .http
            .post_multipart("/upload", "file", name, payload, on_progress)
            .await?;
        let parsed: UploadResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .message
            .unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string()))
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        let path = format!("/delete/{}", encode_segment(name));
        self.http.delete(&path).await?;
        Ok(())
    }
}

fn encode_segment(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT).to_string()
}
