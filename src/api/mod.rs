// src/api/mod.rs
//! Notion API interaction: the transport seam, typed endpoints, cursor
//! pagination and block-tree fetching.
//!
//! Commands depend on [`NotionTransport`], never on HTTP details, so the whole
//! command layer runs against an in-memory fake in tests.

pub mod client;
pub mod endpoints;
pub mod pagination;
pub mod responses;
pub mod tree;

use crate::error::Result;
use serde_json::Value;

pub use client::NotionHttpClient;
pub use endpoints::NotionApi;
pub use pagination::{collect_all, PageCollector};
pub use reqwest::Method;
pub use responses::PaginatedResponse;
pub use tree::{expand_children, fetch_block_tree};

/// One file sent through the multipart upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The ability to exchange JSON with the Notion API.
///
/// `path` always starts with `/v1/`. Implementations turn remote error bodies
/// into [`AppError::NotionService`](crate::error::AppError::NotionService) and
/// decode an empty success body as `null`.
#[async_trait::async_trait]
pub trait NotionTransport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;

    /// Sends file content as `multipart/form-data` under the `file` field.
    async fn upload(&self, path: &str, part: UploadPart) -> Result<Value>;
}

#[async_trait::async_trait]
impl<T: NotionTransport + ?Sized> NotionTransport for Box<T> {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        (**self).send(method, path, body).await
    }

    async fn upload(&self, path: &str, part: UploadPart) -> Result<Value> {
        (**self).upload(path, part).await
    }
}
