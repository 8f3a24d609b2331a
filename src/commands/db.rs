// src/commands/db.rs
//! `notion db ...`: schemas, rows and queries.

use super::shared::{
    encode_assignments, fetch_listing, hint_next_page, property_definitions, report_created,
    report_done,
};
use super::Session;
use crate::api::{NotionApi, NotionTransport};
use crate::config::{DbCommand, PageFlags};
use crate::error::{AppError, Result, ResultExt};
use crate::formatting::properties::{decode as decode_value, encode};
use crate::model::{date_part, decode, decode_database, Database, Page};
use crate::query::{compile_filters, compile_sort, DatabaseQuery};
use crate::types::{resolve_id, single_run, ValidationError};
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::path::Path;

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    command: DbCommand,
) -> Result<()> {
    match command {
        DbCommand::List { limit, paging } => list(api, session, limit, &paging).await,
        DbCommand::View { database } => view(api, session, &resolve_id(&database)).await,
        DbCommand::Create {
            parent,
            title,
            props,
        } => create(api, session, &resolve_id(&parent), &title, props.as_deref()).await,
        DbCommand::Update {
            database,
            title,
            add_prop,
        } => {
            let mut body = serde_json::Map::new();
            if let Some(title) = title.filter(|t| !t.is_empty()) {
                body.insert("title".into(), json!(single_run(&title)));
            }
            if let Some(columns) = add_prop.filter(|p| !p.is_empty()) {
                body.insert("properties".into(), Value::Object(property_definitions(&columns)));
            }
            if body.is_empty() {
                return Err(AppError::MissingArgument(
                    "nothing to update. Specify --title or --add-prop".into(),
                ));
            }
            let response = api
                .update_database(&resolve_id(&database), &Value::Object(body))
                .await
                .context("update database")?;
            report_done(session, "✓ Database updated", &response)
        }
        DbCommand::Add {
            database,
            properties,
        } => {
            let id = resolve_id(&database);
            let schema = api.database_schema(&id).await?;
            let encoded = encode_assignments(&properties, &schema)?;
            let request = json!({
                "parent": { "database_id": id },
                "properties": encoded,
            });
            let response = api.create_page(&request).await.context("add row")?;
            report_created(session, "Row added", &response)
        }
        DbCommand::AddBulk { database, file } => {
            add_bulk(api, session, &resolve_id(&database), &file).await
        }
        DbCommand::Query {
            database,
            filters,
            sorts,
            limit,
            paging,
        } => {
            let query = DatabaseQuery {
                filter: None,
                sorts: sorts.iter().map(|expr| compile_sort(expr)).collect(),
                page_size: limit,
                start_cursor: None,
            };
            query_rows(api, session, &resolve_id(&database), &filters, query, &paging).await
        }
        DbCommand::Open { database } => super::open_link(&database),
    }
}

async fn list<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    limit: usize,
    paging: &PageFlags,
) -> Result<()> {
    let listing = fetch_listing(paging, |cursor| async move {
        api.search(None, Some("database"), limit, cursor.as_deref())
            .await
    })
    .await?;

    if session.is_json() {
        return session.out.json(&listing.to_json());
    }

    let rows = listing
        .results
        .iter()
        .map(|raw| {
            let database: Database = decode(raw)?;
            Ok(vec![
                database.title(),
                database.id.clone(),
                date_part(database.last_edited_time.as_deref()),
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    session.out.table(&["TITLE", "ID", "LAST EDITED"], &rows)?;
    hint_next_page(session, listing.next_cursor.as_deref())
}

async fn view<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
) -> Result<()> {
    let raw = api.database(id).await.context("get database")?;
    if session.is_json() {
        return session.out.json(&raw);
    }

    let (database, schema) = decode_database(&raw)?;
    session.out.title("🗃️", &database.title())?;
    session.out.separator()?;
    session.out.field("ID", &database.id)?;
    if let Some(url) = database.url.as_deref().filter(|u| !u.is_empty()) {
        session.out.field("URL", url)?;
    }
    session.out.blank()?;

    if schema.is_empty() {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = schema
        .iter()
        .map(|(name, entry)| {
            vec![
                name.to_string(),
                entry.kind.to_string(),
                entry.options.join(", "),
            ]
        })
        .collect();
    session.out.table(&["PROPERTY", "TYPE", "OPTIONS"], &rows)
}

/// A database under a page with a `Name` title column plus `name:type`
/// columns from `props`.
async fn create<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    parent: &str,
    title: &str,
    props: Option<&str>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::MissingArgument("--title is required".into()));
    }

    let mut properties = serde_json::Map::new();
    properties.insert("Name".into(), json!({ "title": {} }));
    if let Some(columns) = props {
        properties.extend(property_definitions(columns));
    }

    let request = json!({
        "parent": { "page_id": parent },
        "title": single_run(title),
        "properties": properties,
    });
    let response = api
        .create_database(&request)
        .await
        .context("create database")?;
    report_created(session, &format!("Created database: {}", title), &response)
}

/// Creates one row per object in a JSON array file. Unknown columns and
/// failed rows are collected and reported; the import carries on.
async fn add_bulk<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
    file: &Path,
) -> Result<()> {
    let data = std::fs::read_to_string(file).context("read file")?;
    let items: Vec<IndexMap<String, String>> = serde_json::from_str(&data).map_err(|e| {
        ValidationError::InvalidValue {
            field: "--file",
            reason: format!(
                "{} (expected an array of {{\"Key\": \"Value\"}} objects)",
                e
            ),
        }
    })?;
    if items.is_empty() {
        return Err(AppError::MissingArgument("no items in file".into()));
    }

    let schema = api.database_schema(id).await?;
    let total = items.len();
    let mut created = 0;
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let row = index + 1;
        let mut properties = IndexMap::new();
        for (key, raw) in item {
            match schema.kind_of(key) {
                Some(kind) => {
                    properties.insert(key.as_str(), encode(kind, raw));
                }
                None => errors.push(format!("row {}: property {:?} not found", row, key)),
            }
        }

        let request = json!({
            "parent": { "database_id": id },
            "properties": properties,
        });
        match api.create_page(&request).await {
            Ok(_) => created += 1,
            Err(e) => {
                log::debug!("Row {} failed: {}", row, e);
                errors.push(format!("row {}: {}", row, e));
                continue;
            }
        }

        if !session.is_json() {
            session
                .out
                .raw(&format!("\r  {}/{} rows created", created, total))?;
        }
    }

    if session.is_json() {
        return session.out.json(&json!({
            "created": created,
            "total": total,
            "errors": errors,
        }));
    }

    session.out.blank()?;
    session
        .out
        .line(&format!("✓ {}/{} rows created", created, total))?;
    for error in &errors {
        session.out.line(&format!("  ✗ {}", error))?;
    }
    Ok(())
}

/// Runs a query and prints one row per page, title column first.
async fn query_rows<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    id: &str,
    filters: &[String],
    mut query: DatabaseQuery,
    paging: &PageFlags,
) -> Result<()> {
    let schema = api.database_schema(id).await?;
    query.filter = compile_filters(filters, &schema).context("invalid filter")?;
    let query = &query;

    let listing = fetch_listing(paging, |cursor| {
        let page_query = DatabaseQuery {
            start_cursor: cursor,
            ..query.clone()
        };
        async move {
            api.query_database(id, &page_query)
                .await
                .context("query database")
        }
    })
    .await?;

    if session.is_json() {
        return session.out.json(&listing.to_json());
    }
    if listing.results.is_empty() {
        return session.out.line("No results found.");
    }

    let columns = schema.display_order();
    let rows = listing
        .results
        .iter()
        .map(|raw| {
            let page: Page = decode(raw)?;
            Ok(columns
                .iter()
                .map(|name| {
                    page.properties
                        .get(*name)
                        .map(decode_value)
                        .unwrap_or_default()
                })
                .collect())
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    session.out.table(&columns, &rows)?;
    hint_next_page(session, listing.next_cursor.as_deref())
}
