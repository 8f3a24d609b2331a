// src/commands/comment.rs
//! `notion comment list | add`.

use super::shared::{fetch_listing, hint_next_page, report_created};
use super::Session;
use crate::api::{NotionApi, NotionTransport};
use crate::config::CommentCommand;
use crate::error::{Result, ResultExt};
use crate::model::{date_part, decode, Comment};
use crate::types::{concat_plain_text, resolve_id};

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    command: CommentCommand,
) -> Result<()> {
    match command {
        CommentCommand::List { page, paging } => {
            let id = resolve_id(&page);
            let id = id.as_str();
            let listing = fetch_listing(&paging, |cursor| async move {
                api.comments(id, cursor.as_deref())
                    .await
                    .context("list comments")
            })
            .await?;

            if session.is_json() {
                return session.out.json(&listing.to_json());
            }
            if listing.results.is_empty() {
                return session.out.line("No comments found.");
            }

            for raw in &listing.results {
                let comment: Comment = decode(raw)?;
                session
                    .out
                    .field("Comment", &concat_plain_text(&comment.rich_text))?;
                session.out.subtitle(&format!(
                    "  ID: {}  Created: {}",
                    comment.id,
                    date_part(comment.created_time.as_deref())
                ))?;
                session.out.blank()?;
            }
            hint_next_page(session, listing.next_cursor.as_deref())
        }
        CommentCommand::Add { page, text } => {
            let response = api
                .add_comment(&resolve_id(&page), &text)
                .await
                .context("add comment")?;
            report_created(session, "Comment added", &response)
        }
    }
}
