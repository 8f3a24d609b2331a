// src/commands/block.rs
//! `notion block ...`: listing, reading and editing content blocks.

use super::shared::{hint_next_page, report_done, str_field};
use super::Session;
use crate::api::{collect_all, expand_children, NotionApi, NotionTransport};
use crate::config::{BlockCommand, BlockContentArgs, PageFlags};
use crate::error::{AppError, Result, ResultExt};
use crate::formatting::{
    parse_markdown, render_blocks_markdown, render_blocks_terminal, render_terminal,
};
use crate::model::{expand_block_type, Block};
use crate::types::{resolve_id, single_run};
use serde_json::{json, Value};

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    command: BlockCommand,
) -> Result<()> {
    match command {
        BlockCommand::List {
            parent,
            depth,
            md,
            paging,
        } => list(api, session, &resolve_id(&parent), depth, md, &paging).await,
        BlockCommand::Get { block } => get(api, session, &resolve_id(&block)).await,
        BlockCommand::Append { parent, content } => {
            let blocks = blocks_from_args(&content)?;
            let response = api
                .append_children(&resolve_id(&parent), &blocks, None)
                .await
                .context("append block")?;
            let message = format!("✓ {} block(s) appended", blocks.len());
            report_done(session, &message, &response)
        }
        BlockCommand::Insert {
            parent,
            after,
            content,
        } => {
            let after = resolve_id(&after);
            if after.is_empty() {
                return Err(AppError::MissingArgument(
                    "--after <block-id> is required (use 'block append' to add to end)".into(),
                ));
            }
            let blocks = blocks_from_args(&content)?;
            let response = api
                .append_children(&resolve_id(&parent), &blocks, Some(&after))
                .await
                .context("insert block")?;
            let message = format!("✓ {} block(s) inserted", blocks.len());
            report_done(session, &message, &response)
        }
        BlockCommand::Update {
            block,
            text,
            block_type,
        } => update(api, session, &resolve_id(&block), &text, block_type.as_deref()).await,
        BlockCommand::Delete { blocks } => delete(api, session, &blocks).await,
    }
}

/// Top-level children follow `--cursor`/`--all`; nested levels are always
/// fetched in full.
async fn list<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
    depth: usize,
    md: bool,
    paging: &PageFlags,
) -> Result<()> {
    let start = paging.cursor.as_deref().filter(|c| !c.is_empty());
    let (mut blocks, next_cursor) = if paging.all {
        let blocks = collect_all(
            |cursor: Option<String>| async move {
                api.block_children_page(id, cursor.as_deref()).await
            },
            start,
            false,
        )
        .await?;
        (blocks, None)
    } else {
        let page = api.block_children_page(id, start).await?;
        let next = page.next_cursor.filter(|_| page.has_more);
        (page.results, next)
    };

    expand_children(api, &mut blocks, depth.max(1) - 1).await?;

    if session.is_json() {
        let results: Vec<Value> = blocks.iter().map(Block::to_json).collect();
        return session.out.json(&json!({ "results": results }));
    }

    if md || session.format.is_markdown() {
        session.out.raw(&render_blocks_markdown(&blocks))?;
    } else {
        session.out.raw(&render_blocks_terminal(&blocks))?;
    }
    hint_next_page(session, next_cursor.as_deref())
}

async fn get<T: NotionTransport>(api: &NotionApi<T>, session: &mut Session<'_>, id: &str) -> Result<()> {
    let raw = api.block(id).await.context("get block")?;
    if session.is_json() {
        return session.out.json(&raw);
    }

    let block = Block::from_wire(&raw)?;
    let kind = block.content.kind();
    session.out.title("🧱", &format!("Block: {}", kind))?;
    session.out.field("ID", str_field(&raw, "id"))?;
    session.out.field("Type", kind)?;
    session
        .out
        .field("Has Children", &block.has_children.to_string())?;
    session.out.blank()?;
    session.out.raw(&render_terminal(&block, 0))
}

/// The blocks to write: the Markdown file when `--file` is given, else one
/// block of `--type` holding the text argument.
fn blocks_from_args(content: &BlockContentArgs) -> Result<Vec<Block>> {
    let blocks = match (&content.file, &content.text) {
        (Some(path), _) => {
            let markdown = std::fs::read_to_string(path).context("read file")?;
            parse_markdown(&markdown)
        }
        (None, Some(text)) => vec![Block::with_text(
            expand_block_type(&content.block_type),
            text,
            Some(content.lang.as_str()),
        )],
        (None, None) => {
            return Err(AppError::MissingArgument(
                "text content or --file is required".into(),
            ))
        }
    };
    if blocks.is_empty() {
        return Err(AppError::MissingArgument("no content to append".into()));
    }
    Ok(blocks)
}

/// Replaces a block's rich text. Without `--type` the block is fetched to
/// learn its type.
async fn update<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
    text: &str,
    block_type: Option<&str>,
) -> Result<()> {
    if text.is_empty() {
        return Err(AppError::MissingArgument("--text is required".into()));
    }
    let kind = match block_type.filter(|t| !t.is_empty()) {
        Some(name) => expand_block_type(name).to_string(),
        None => {
            let raw = api.block(id).await.context("get block")?;
            str_field(&raw, "type").to_string()
        }
    };

    let body = json!({ kind: { "rich_text": single_run(text) } });
    let response = api.update_block(id, &body).await.context("update block")?;
    report_done(session, "✓ Block updated", &response)
}

/// Deletes each block in turn. Failures are collected and reported after
/// the count.
async fn delete<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    blocks: &[String],
) -> Result<()> {
    let mut deleted = 0;
    let mut errors = Vec::new();
    for input in blocks {
        let id = resolve_id(input);
        match api.delete_block(&id).await {
            Ok(_) => deleted += 1,
            Err(e) => {
                log::debug!("Delete of {} failed: {}", id, e);
                errors.push(format!("{}: {}", id, e));
            }
        }
    }

    if session.is_json() {
        return session.out.json(&json!({
            "deleted": deleted,
            "total": blocks.len(),
            "errors": errors,
        }));
    }

    session
        .out
        .line(&format!("✓ {}/{} block(s) deleted", deleted, blocks.len()))?;
    for error in &errors {
        session.out.line(&format!("  ✗ {}", error))?;
    }
    Ok(())
}
