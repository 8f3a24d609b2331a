// src/api/client.rs
//! HTTP client wrapper for the Notion API.
//!
//! A thin layer over reqwest: authentication headers, the per-request
//! timeout, and turning error bodies into [`AppError::NotionService`].
//! No retries; every call is a single attempt.

use super::{NotionTransport, UploadPart};
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_VERSION, REQUEST_TIMEOUT_SECS};
use crate::error::{AppError, NotionErrorCode, Result};
use crate::types::{ApiKey, ValidationError};
use reqwest::{header, multipart, Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// A reqwest client preconfigured with the Notion headers.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a client for the public Notion API.
    pub fn new(api_key: &ApiKey) -> Result<Self> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Creates a client against another base URL, such as a local mock server.
    pub fn with_base_url(api_key: &ApiKey, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        let mut auth_value = header::HeaderValue::from_str(&auth_header).map_err(|e| {
            ValidationError::InvalidApiKey {
                reason: e.to_string(),
            }
        })?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl NotionTransport for NotionHttpClient {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url(path);
        log::debug!("→ {} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            log::debug!("  body: {}", body);
            request = request.json(body);
        }

        decode_response(request.send().await?).await
    }

    async fn upload(&self, path: &str, part: UploadPart) -> Result<Value> {
        let url = self.url(path);
        log::debug!("→ POST {} (multipart, {} bytes)", url, part.bytes.len());

        let file = multipart::Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.content_type)?;
        let form = multipart::Form::new().part("file", file);

        decode_response(self.client.post(url).multipart(form).send().await?).await
    }
}

/// Reads the body and maps error statuses to [`AppError::NotionService`].
async fn decode_response(response: Response) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;
    log::debug!("← {} ({} bytes)", status.as_u16(), bytes.len());

    if status.is_client_error() || status.is_server_error() {
        return Err(service_error(status, &bytes));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// The remote `{code, message}` pair, or the bare status when the body is
/// something else (a proxy page, an empty body).
pub(crate) fn service_error(status: StatusCode, body: &[u8]) -> AppError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error) if !error.code.is_empty() => AppError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status,
        },
        _ => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            };
            AppError::NotionService {
                code: NotionErrorCode::from_http_status(status.as_u16()),
                message,
                status,
            }
        }
    }
}
