// src/commands/file.rs
//! `notion file list | upload`.

use super::Session;
use crate::api::{Method, NotionApi, NotionTransport, UploadPart};
use crate::config::FileCommand;
use crate::error::{Result, ResultExt};
use crate::model::{date_part, decode, FileUpload};
use crate::types::resolve_id;
use serde_json::{json, Value};
use std::path::Path;

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    command: FileCommand,
) -> Result<()> {
    match command {
        FileCommand::List => list(api, session).await,
        FileCommand::Upload { path, to } => upload(api, session, &path, to.as_deref()).await,
    }
}

async fn list<T: NotionTransport>(api: &NotionApi<T>, session: &mut Session<'_>) -> Result<()> {
    let raw = api.file_uploads().await.context("list files")?;
    if session.is_json() {
        return session.out.json(&raw);
    }

    let results = raw
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if results.is_empty() {
        return session.out.line("No file uploads found.");
    }

    let rows = results
        .iter()
        .map(|item| {
            let upload: FileUpload = decode(item)?;
            Ok(vec![
                upload.name.unwrap_or_default(),
                upload.id,
                upload.status.unwrap_or_default(),
                date_part(upload.created_time.as_deref()),
            ])
        })
        .collect::<Result<Vec<_>>>()?;
    session.out.table(&["NAME", "ID", "STATUS", "CREATED"], &rows)
}

/// Creates an upload slot, sends the bytes, and with `--to` attaches the
/// upload to the end of a page as a `file` block.
async fn upload<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    path: &Path,
    attach_to: Option<&str>,
) -> Result<()> {
    tokio::fs::metadata(path).await.context("file not found")?;
    let bytes = tokio::fs::read(path).await.context("read file")?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content_type = content_type_for(path, &bytes);
    let size = bytes.len();

    log::debug!("Uploading {} ({}, {} bytes)", file_name, content_type, size);
    let id = api
        .create_file_upload(&file_name, content_type, size)
        .await
        .context("create file upload")?;
    let response = api
        .send_file_upload(
            &id,
            UploadPart {
                file_name: file_name.clone(),
                content_type: content_type.to_string(),
                bytes,
            },
        )
        .await
        .context("send file content")?;

    let attached = match attach_to.map(resolve_id).filter(|p| !p.is_empty()) {
        Some(page) => {
            let body = json!({
                "children": [{
                    "object": "block",
                    "type": "file",
                    "file": { "type": "file_upload", "file_upload": { "id": id } },
                }]
            });
            api.request(Method::PATCH, &format!("/v1/blocks/{}/children", page), Some(&body))
                .await
                .context("attach file")?;
            Some(page)
        }
        None => None,
    };

    if session.is_json() {
        return session.out.json(&response);
    }
    session.out.title("✓", &format!("Uploaded: {}", file_name))?;
    session.out.field("ID", &id)?;
    session.out.field("Size", &format!("{} bytes", size))?;
    if let Some(page) = attached {
        session.out.field("Attached to", &page)?;
    }
    Ok(())
}

/// MIME type by extension; unknown extensions fall back to `text/plain`
/// for UTF-8 content and `application/octet-stream` otherwise.
fn content_type_for(path: &Path, bytes: &[u8]) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let known = match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => "",
    };
    if !known.is_empty() {
        known
    } else if looks_like_text(&bytes[..bytes.len().min(512)]) {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

/// Valid UTF-8, allowing a character cut off at the end of the sample.
fn looks_like_text(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for(Path::new("a/Report.PDF"), b""), "application/pdf");
        assert_eq!(content_type_for(Path::new("photo.jpeg"), b""), "image/jpeg");
        assert_eq!(content_type_for(Path::new("notes.md"), b"# hi"), "text/markdown");
    }

    #[test]
    fn test_content_type_sniffs_unknown_extensions() {
        assert_eq!(content_type_for(Path::new("LICENSE"), b"MIT"), "text/plain");
        assert_eq!(
            content_type_for(Path::new("blob.bin"), &[0xff, 0xfe, 0x00]),
            "application/octet-stream"
        );
    }
}
