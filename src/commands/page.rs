// src/commands/page.rs
//! `notion page ...`: viewing, creating and editing pages.

use super::shared::{
    encode_assignments, fetch_listing, hint_next_page, report_created, report_done,
};
use super::Session;
use crate::api::{fetch_block_tree, NotionApi, NotionTransport};
use crate::config::{PageCommand, PageFlags};
use crate::error::{AppError, Result, ResultExt};
use crate::formatting::properties::{decode as decode_value, encode, encode_relation};
use crate::formatting::{render_blocks_markdown, render_blocks_terminal};
use crate::model::{date_part, decode, Block, Page, PropertyKind};
use crate::types::{resolve_id, ValidationError};
use serde_json::{json, Value};

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    command: PageCommand,
) -> Result<()> {
    match command {
        PageCommand::View { page, depth } => view(api, session, &resolve_id(&page), depth).await,
        PageCommand::List { limit, paging } => list(api, session, limit, &paging).await,
        PageCommand::Create {
            parent,
            properties,
            title,
            body,
            db,
        } => {
            let parent = resolve_id(&parent);
            let request = if db {
                database_row_request(api, &parent, &properties, title.as_deref()).await?
            } else {
                child_page_request(&parent, &properties, title.as_deref())?
            };
            create(api, session, request, title.as_deref(), body.as_deref()).await
        }
        PageCommand::Delete { page } => {
            let response = api
                .set_archived(&resolve_id(&page), true)
                .await
                .context("delete page")?;
            report_done(session, "✓ Page archived", &response)
        }
        PageCommand::Restore { page } => {
            let response = api
                .set_archived(&resolve_id(&page), false)
                .await
                .context("restore page")?;
            report_done(session, "✓ Page restored", &response)
        }
        PageCommand::Move { page, to } => {
            let target = resolve_id(&to);
            let response = api
                .move_page(&resolve_id(&page), &target)
                .await
                .context("move page")?;
            report_done(session, &format!("✓ Page moved to {}", target), &response)
        }
        PageCommand::Open { page } => super::open_link(&page),
        PageCommand::Set { page, properties } => {
            let id = resolve_id(&page);
            let (_, schema) = api.page_schema(&id).await?;
            let encoded = encode_assignments(&properties, &schema)?;
            let response = api
                .update_page(&id, &json!({ "properties": encoded }))
                .await
                .context("set properties")?;
            report_done(session, "✓ Properties updated", &response)
        }
        PageCommand::Props { page, property_id } => {
            props(api, session, &resolve_id(&page), property_id.as_deref()).await
        }
        PageCommand::Link { page, prop, to } => {
            let target = resolve_id(&to);
            let response = relink(api, &resolve_id(&page), &prop, |ids| {
                if !ids.contains(&target) {
                    ids.push(target.clone());
                }
            })
            .await
            .context("link page")?;
            report_done(session, "✓ Relation added", &response)
        }
        PageCommand::Unlink { page, prop, from } => {
            let target = resolve_id(&from);
            let response = relink(api, &resolve_id(&page), &prop, |ids| {
                ids.retain(|id| *id != target)
            })
            .await
            .context("unlink page")?;
            report_done(session, "✓ Relation removed", &response)
        }
    }
}

async fn view<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
    depth: usize,
) -> Result<()> {
    let raw = api.page(id).await.context("get page")?;
    let blocks = fetch_block_tree(api, id, depth)
        .await
        .context("get blocks")?;

    if session.is_json() {
        let results: Vec<Value> = blocks.iter().map(Block::to_json).collect();
        return session
            .out
            .json(&json!({ "page": raw, "blocks": { "results": results } }));
    }

    let page: Page = decode(&raw)?;
    if session.format.is_markdown() {
        session.out.raw(&format!("# {}\n\n", page.title()))?;
        return session.out.raw(&render_blocks_markdown(&blocks));
    }

    session.out.title("📄", &page.title())?;
    session.out.separator()?;
    session.out.subtitle(&format!(
        "Last edited: {}",
        page.last_edited_time.as_deref().unwrap_or_default()
    ))?;
    session.out.blank()?;
    session.out.raw(&render_blocks_terminal(&blocks))
}

async fn list<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    limit: usize,
    paging: &PageFlags,
) -> Result<()> {
    let listing = fetch_listing(paging, |cursor| async move {
        api.search(None, Some("page"), limit, cursor.as_deref()).await
    })
    .await?;

    if session.is_json() {
        return session.out.json(&listing.to_json());
    }

    let rows = listing
        .results
        .iter()
        .map(|raw| {
            let page: Page = decode(raw)?;
            Ok(vec![
                page.title(),
                page.id.clone(),
                date_part(page.last_edited_time.as_deref()),
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    session.out.table(&["TITLE", "ID", "LAST EDITED"], &rows)?;
    hint_next_page(session, listing.next_cursor.as_deref())
}

/// A row in a database: `key=value` arguments encoded against the schema,
/// plus `--title` written to the title column when given.
async fn database_row_request<T: NotionTransport>(
    api: &NotionApi<T>,
    database: &str,
    properties: &[String],
    title: Option<&str>,
) -> Result<Value> {
    let schema = api.database_schema(database).await?;
    let mut encoded = encode_assignments(properties, &schema)?;
    if let (Some(title), Some(column)) = (title.filter(|t| !t.is_empty()), schema.title_property()) {
        encoded.insert(column.to_string(), encode(&PropertyKind::Title, title));
    }
    Ok(json!({
        "parent": { "database_id": database },
        "properties": encoded,
    }))
}

/// A page under another page, which only has a title.
fn child_page_request(parent: &str, properties: &[String], title: Option<&str>) -> Result<Value> {
    let title = title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::MissingArgument("--title is required".into()))?;
    if !properties.is_empty() {
        log::warn!(
            "Ignoring {} property argument(s); use --db to create a database row",
            properties.len()
        );
    }
    Ok(json!({
        "parent": { "page_id": parent },
        "properties": { "title": encode(&PropertyKind::Title, title) },
    }))
}

async fn create<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    mut request: Value,
    title: Option<&str>,
    body: Option<&str>,
) -> Result<()> {
    if let (Some(body), Value::Object(map)) = (body.filter(|b| !b.is_empty()), &mut request) {
        let paragraph = Block::with_text("paragraph", body, None);
        map.insert("children".into(), json!([paragraph.to_wire()]));
    }

    let response = api.create_page(&request).await.context("create page")?;
    let shown = title.filter(|t| !t.is_empty()).unwrap_or("New row");
    report_created(session, &format!("Created: {}", shown), &response)
}

async fn props<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
    property_id: Option<&str>,
) -> Result<()> {
    if let Some(property_id) = property_id {
        let item = api
            .page_property(id, property_id)
            .await
            .context("get property")?;
        return session.out.json(&item);
    }

    let raw = api.page(id).await.context("get page")?;
    if session.is_json() {
        return session.out.json(&raw["properties"]);
    }

    let page: Page = decode(&raw)?;
    session.out.title("📄", &page.title())?;
    session.out.separator()?;
    for (name, value) in &page.properties {
        let shown = format!("{} ({})", decode_value(value), value.kind());
        session.out.field(name, &shown)?;
    }
    Ok(())
}

/// Rewrites the relation list of `property` on a page with `edit`.
async fn relink<T, F>(api: &NotionApi<T>, id: &str, property: &str, edit: F) -> Result<Value>
where
    T: NotionTransport,
    F: FnOnce(&mut Vec<String>),
{
    let raw = api.page(id).await.context("get page")?;
    let page: Page = decode(&raw)?;
    if !page.properties.contains_key(property) {
        return Err(AppError::UnknownProperty(property.to_string()));
    }
    let mut ids = page.relation_ids(property).ok_or_else(|| {
        AppError::from(ValidationError::InvalidValue {
            field: "--prop",
            reason: format!("{:?} is not a relation property", property),
        })
    })?;

    edit(&mut ids);

    let body = json!({ "properties": { property: encode_relation(&ids) } });
    api.update_page(id, &body).await
}
