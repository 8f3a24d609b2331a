// src/commands/mod.rs
//! One handler per command-table entry, reached through [`dispatch`].
//!
//! Handlers talk to Notion through [`NotionApi`] over whatever transport the
//! caller connects, and write through the session's [`Printer`]. Nothing here
//! touches the real terminal or network directly.

mod api;
mod auth;
mod block;
mod comment;
mod db;
mod file;
mod page;
mod search;
mod shared;
mod user;

use crate::api::{NotionApi, NotionTransport};
use crate::config::{Command, DbCommand, OutputFormat, PageCommand};
use crate::credentials::{resolve_token, CredentialStore};
use crate::error::Result;
use crate::output::{browser_url, open_in_browser, Printer};
use crate::types::ApiKey;
use std::io::BufRead;

pub use shared::parse_assignment;

/// Everything a command needs besides the API: where output goes, where
/// input comes from, and where credentials live.
pub struct Session<'a> {
    pub format: OutputFormat,
    pub out: Printer<'a>,
    pub input: &'a mut dyn BufRead,
    /// Whether `input` is a pipe or file rather than an interactive terminal.
    pub input_is_piped: bool,
    pub store: CredentialStore,
    /// Value of `NOTION_TOKEN`, read once at startup.
    pub env_token: Option<String>,
}

impl<'a> Session<'a> {
    /// Human output is everything but `--format json`.
    pub fn is_json(&self) -> bool {
        self.format.is_json()
    }
}

/// Runs one command. `connect` builds a transport for a token; it is called
/// once per invocation, and not at all for commands that need no token.
pub async fn dispatch<T, F>(command: Command, session: &mut Session<'_>, connect: F) -> Result<()>
where
    T: NotionTransport,
    F: Fn(&ApiKey) -> Result<T>,
{
    match command {
        Command::Auth(cmd) => auth::run(cmd, session, &connect).await,
        Command::Page(PageCommand::Open { page }) => open_link(&page),
        Command::Db(DbCommand::Open { database }) => open_link(&database),
        Command::Search(args) => search::run(&connected(session, &connect)?, session, args).await,
        Command::Page(cmd) => page::run(&connected(session, &connect)?, session, cmd).await,
        Command::Db(cmd) => db::run(&connected(session, &connect)?, session, cmd).await,
        Command::Block(cmd) => block::run(&connected(session, &connect)?, session, cmd).await,
        Command::User(cmd) => user::run(&connected(session, &connect)?, session, cmd).await,
        Command::Comment(cmd) => comment::run(&connected(session, &connect)?, session, cmd).await,
        Command::File(cmd) => file::run(&connected(session, &connect)?, session, cmd).await,
        Command::Api(args) => api::run(&connected(session, &connect)?, session, args).await,
    }
}

fn connected<T, F>(session: &Session<'_>, connect: &F) -> Result<NotionApi<T>>
where
    T: NotionTransport,
    F: Fn(&ApiKey) -> Result<T>,
{
    let key = resolve_token(session.env_token.clone(), &session.store)?;
    Ok(NotionApi::new(connect(&key)?))
}

fn open_link(input: &str) -> Result<()> {
    open_in_browser(&browser_url(input))
}
