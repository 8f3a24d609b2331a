// src/api/endpoints.rs
//! Typed wrappers over the Notion REST endpoints.
//!
//! Most helpers hand back the raw JSON response: commands print it verbatim
//! under `--format json` and decode only what they display.

use super::{Method, NotionTransport, PaginatedResponse, UploadPart};
use crate::constants::{MAX_BLOCKS_PER_APPEND, NOTION_API_PAGE_SIZE};
use crate::error::{AppError, Result, ResultExt};
use crate::model::{Block, PropertySchema};
use crate::query::DatabaseQuery;
use crate::types::single_run;
use serde_json::{json, Value};

/// Endpoint helpers on top of any [`NotionTransport`].
pub struct NotionApi<T> {
    transport: T,
}

impl<T: NotionTransport> NotionApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends an arbitrary request, used by `notion api`.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        self.transport.send(method, path, body).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.transport.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.transport.send(Method::POST, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.transport.send(Method::PATCH, path, Some(body)).await
    }

    // --- Users ---

    pub async fn me(&self) -> Result<Value> {
        self.get("/v1/users/me").await
    }

    pub async fn user(&self, id: &str) -> Result<Value> {
        self.get(&format!("/v1/users/{}", id)).await
    }

    pub async fn users(&self, cursor: Option<&str>) -> Result<Value> {
        self.get(&list_path("/v1/users", &[], cursor)).await
    }

    // --- Search ---

    /// `POST /v1/search`; `object` narrows to `page` or `database`.
    pub async fn search(
        &self,
        query: Option<&str>,
        object: Option<&str>,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Value> {
        let mut body = serde_json::Map::new();
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            body.insert("query".into(), query.into());
        }
        if let Some(object) = object {
            body.insert("filter".into(), json!({ "value": object, "property": "object" }));
        }
        body.insert("page_size".into(), page_size.into());
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            body.insert("start_cursor".into(), cursor.into());
        }
        self.post("/v1/search", &Value::Object(body)).await
    }

    // --- Pages ---

    pub async fn page(&self, id: &str) -> Result<Value> {
        self.get(&format!("/v1/pages/{}", id)).await
    }

    pub async fn create_page(&self, body: &Value) -> Result<Value> {
        self.post("/v1/pages", body).await
    }

    pub async fn update_page(&self, id: &str, body: &Value) -> Result<Value> {
        self.patch(&format!("/v1/pages/{}", id), body).await
    }

    /// Archives (`true`) or restores (`false`) a page.
    pub async fn set_archived(&self, id: &str, archived: bool) -> Result<Value> {
        self.update_page(id, &json!({ "archived": archived })).await
    }

    pub async fn move_page(&self, id: &str, new_parent: &str) -> Result<Value> {
        let body = json!({ "parent": { "page_id": new_parent } });
        self.post(&format!("/v1/pages/{}/move", id), &body).await
    }

    pub async fn page_property(&self, id: &str, property_id: &str) -> Result<Value> {
        self.get(&format!("/v1/pages/{}/properties/{}", id, property_id))
            .await
    }

    /// The page together with a schema built from its property values.
    pub async fn page_schema(&self, id: &str) -> Result<(Value, PropertySchema)> {
        let page = self.page(id).await.context("get page")?;
        let schema = PropertySchema::from_page(&page)?;
        Ok((page, schema))
    }

    // --- Databases ---

    pub async fn database(&self, id: &str) -> Result<Value> {
        self.get(&format!("/v1/databases/{}", id)).await
    }

    /// The database's declared property types.
    pub async fn database_schema(&self, id: &str) -> Result<PropertySchema> {
        let database = self.database(id).await.context("get database schema")?;
        PropertySchema::from_database(&database)
    }

    pub async fn create_database(&self, body: &Value) -> Result<Value> {
        self.post("/v1/databases", body).await
    }

    pub async fn update_database(&self, id: &str, body: &Value) -> Result<Value> {
        self.patch(&format!("/v1/databases/{}", id), body).await
    }

    pub async fn query_database(&self, id: &str, query: &DatabaseQuery) -> Result<Value> {
        let body = serde_json::to_value(query)?;
        self.post(&format!("/v1/databases/{}/query", id), &body)
            .await
    }

    // --- Blocks ---

    pub async fn block(&self, id: &str) -> Result<Value> {
        self.get(&format!("/v1/blocks/{}", id)).await
    }

    pub async fn block_children(&self, id: &str, cursor: Option<&str>) -> Result<Value> {
        self.get(&list_path(&format!("/v1/blocks/{}/children", id), &[], cursor))
            .await
    }

    /// One page of children, decoded.
    pub async fn block_children_page(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>> {
        let raw = self.block_children(id, cursor).await?;
        PaginatedResponse::<Value>::from_value(&raw)?.try_map(|block| Block::from_wire(&block))
    }

    /// Appends `blocks` under `parent`, in batches the API accepts. With
    /// `after`, all blocks go in one request placed after that sibling.
    /// Returns the last response.
    pub async fn append_children(
        &self,
        parent: &str,
        blocks: &[Block],
        after: Option<&str>,
    ) -> Result<Value> {
        let path = format!("/v1/blocks/{}/children", parent);
        if let Some(after) = after {
            let body = json!({ "children": wire_blocks(blocks), "after": after });
            return self.patch(&path, &body).await;
        }

        let mut last = Value::Null;
        for chunk in blocks.chunks(MAX_BLOCKS_PER_APPEND) {
            let body = json!({ "children": wire_blocks(chunk) });
            last = self.patch(&path, &body).await?;
        }
        Ok(last)
    }

    pub async fn update_block(&self, id: &str, body: &Value) -> Result<Value> {
        self.patch(&format!("/v1/blocks/{}", id), body).await
    }

    pub async fn delete_block(&self, id: &str) -> Result<Value> {
        self.transport
            .send(Method::DELETE, &format!("/v1/blocks/{}", id), None)
            .await
    }

    // --- Comments ---

    pub async fn comments(&self, block_id: &str, cursor: Option<&str>) -> Result<Value> {
        self.get(&list_path("/v1/comments", &[("block_id", block_id)], cursor))
            .await
    }

    pub async fn add_comment(&self, page_id: &str, text: &str) -> Result<Value> {
        let body = json!({
            "parent": { "page_id": page_id },
            "rich_text": single_run(text),
        });
        self.post("/v1/comments", &body).await
    }

    // --- File uploads ---

    pub async fn file_uploads(&self) -> Result<Value> {
        self.get("/v1/file_uploads").await
    }

    /// Creates a single-part upload slot and returns its id.
    pub async fn create_file_upload(
        &self,
        file_name: &str,
        content_type: &str,
        content_length: usize,
    ) -> Result<String> {
        let body = json!({
            "file_name": file_name,
            "content_type": content_type,
            "content_length": content_length,
            "mode": "single_part",
        });
        let upload = self.post("/v1/file_uploads", &body).await?;
        upload
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::MalformedResponse("file upload has no id".into()))
    }

    pub async fn send_file_upload(&self, id: &str, part: UploadPart) -> Result<Value> {
        self.transport
            .upload(&format!("/v1/file_uploads/{}/send", id), part)
            .await
    }
}

fn wire_blocks(blocks: &[Block]) -> Vec<Value> {
    blocks.iter().map(Block::to_wire).collect()
}

/// `path?<params>&page_size=100[&start_cursor=..]`, URL-encoded.
fn list_path(path: &str, params: &[(&str, &str)], cursor: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    query.append_pair("page_size", &NOTION_API_PAGE_SIZE.to_string());
    if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
        query.append_pair("start_cursor", cursor);
    }
    format!("{}?{}", path, query.finish())
}
