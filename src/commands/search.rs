// src/commands/search.rs
//! `notion search`.

use super::shared::{fetch_listing, hint_next_page};
use super::Session;
use crate::api::{NotionApi, NotionTransport};
use crate::config::{ObjectType, SearchArgs};
use crate::error::Result;
use crate::model::{date_part, decode, SearchHit};

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    args: SearchArgs,
) -> Result<()> {
    let query = args.query.join(" ");
    let query = query.as_str();
    let object = args.object_type.map(ObjectType::as_str);
    let limit = args.limit;

    let listing = fetch_listing(&args.paging, |cursor| async move {
        api.search(Some(query), object, limit, cursor.as_deref()).await
    })
    .await?;

    if session.is_json() {
        return session.out.json(&listing.to_json());
    }
    if listing.results.is_empty() {
        return session.out.line("No results found.");
    }

    let rows = listing
        .results
        .iter()
        .map(|raw| {
            let hit: SearchHit = decode(raw)?;
            let icon = match hit {
                SearchHit::Page(_) => "📄",
                SearchHit::Database(_) => "🗃️",
            };
            Ok(vec![
                format!("{} {}", icon, hit.object_type()),
                hit.title(),
                hit.id().to_string(),
                date_part(hit.last_edited_time()),
            ])
        })
        .collect::<Result<Vec<_>>>()?;

    session
        .out
        .table(&["TYPE", "TITLE", "ID", "LAST EDITED"], &rows)?;
    hint_next_page(session, listing.next_cursor.as_deref())
}
