// src/commands/user.rs
//! `notion user me | list | get`.

use super::shared::{fetch_listing, hint_next_page};
use super::Session;
use crate::api::{NotionApi, NotionTransport};
use crate::config::UserCommand;
use crate::error::{Result, ResultExt};
use crate::model::{decode, User};

pub(super) async fn run<T: NotionTransport>(
    api: &NotionApi<T>,
    session: &mut Session<'_>,
    command: UserCommand,
) -> Result<()> {
    match command {
        UserCommand::Me => {
            let raw = api.me().await?;
            if session.is_json() {
                return session.out.json(&raw);
            }
            let me: User = decode(&raw)?;
            session.out.title("🤖", me.display_name())?;
            session.out.field("ID", &me.id)?;
            session
                .out
                .field("Workspace", me.workspace_name().unwrap_or_default())
        }
        UserCommand::List { paging } => {
            let listing = fetch_listing(&paging, |cursor| async move {
                api.users(cursor.as_deref()).await
            })
            .await?;

            if session.is_json() {
                return session.out.json(&listing.to_json());
            }
            if listing.results.is_empty() {
                return session.out.line("No users found.");
            }

            let rows = listing
                .results
                .iter()
                .map(|raw| {
                    let user: User = decode(raw)?;
                    Ok(vec![
                        user.display_name().to_string(),
                        user.user_type.clone().unwrap_or_default(),
                        user.id,
                    ])
                })
                .collect::<Result<Vec<_>>>()?;
            session.out.table(&["NAME", "TYPE", "ID"], &rows)?;
            hint_next_page(session, listing.next_cursor.as_deref())
        }
        UserCommand::Get { user } => {
            let raw = api.user(user.trim()).await.context("get user")?;
            if session.is_json() {
                return session.out.json(&raw);
            }
            let user: User = decode(&raw)?;
            let user_type = user.user_type.as_deref().unwrap_or_default();
            session.out.title("👤", user.display_name())?;
            session.out.field("ID", &user.id)?;
            session.out.field("Type", user_type)?;
            if let Some(email) = user
                .person
                .as_ref()
                .and_then(|person| person.email.as_deref())
                .filter(|email| user_type == "person" && !email.is_empty())
            {
                session.out.field("Email", email)?;
            }
            Ok(())
        }
    }
}
