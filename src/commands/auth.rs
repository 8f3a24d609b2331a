// src/commands/auth.rs
//! `notion auth login | status | logout`.

use super::shared::str_field;
use super::Session;
use crate::api::{NotionApi, NotionTransport};
use crate::config::AuthCommand;
use crate::credentials::{resolve_token, Credentials};
use crate::error::{AppError, Result, ResultExt};
use crate::model::{decode, User};
use crate::types::ApiKey;

pub(super) async fn run<T, F>(command: AuthCommand, session: &mut Session<'_>, connect: &F) -> Result<()>
where
    T: NotionTransport,
    F: Fn(&ApiKey) -> Result<T>,
{
    match command {
        AuthCommand::Login { with_token } => login(session, connect, with_token).await,
        AuthCommand::Status => status(session, connect).await,
        AuthCommand::Logout => {
            session.store.clear().context("save config")?;
            session.out.line("✓ Logged out")
        }
    }
}

/// Reads a token from the input, checks it against `/v1/users/me` and
/// stores it with the workspace it belongs to.
async fn login<T, F>(session: &mut Session<'_>, connect: &F, with_token: bool) -> Result<()>
where
    T: NotionTransport,
    F: Fn(&ApiKey) -> Result<T>,
{
    if !with_token {
        session.out.prompt("Paste your integration token: ")?;
    }
    let mut line = String::new();
    session.input.read_line(&mut line)?;
    let token = line.trim();
    if token.is_empty() {
        return Err(AppError::MissingArgument("no token provided".into()));
    }

    let key = ApiKey::new(token)?;
    let api = NotionApi::new(connect(&key)?);
    let me = api.me().await.context("authentication failed")?;
    let bot: User = decode(&me)?;

    let workspace = bot.workspace_name().unwrap_or_default().to_string();
    let credentials = Credentials {
        token: key.as_str().to_string(),
        workspace_name: Some(workspace.clone()).filter(|name| !name.is_empty()),
        workspace_id: bot
            .bot
            .as_ref()
            .and_then(|info| info.workspace_id.clone()),
        bot_id: Some(str_field(&me, "id").to_string()).filter(|id| !id.is_empty()),
    };
    session.store.save(&credentials).context("save config")?;
    log::debug!("Stored token for workspace {:?}", workspace);

    session.out.title("✓", &format!("Logged in to {}", workspace))
}

async fn status<T, F>(session: &mut Session<'_>, connect: &F) -> Result<()>
where
    T: NotionTransport,
    F: Fn(&ApiKey) -> Result<T>,
{
    let key = match resolve_token(session.env_token.clone(), &session.store) {
        Ok(key) => key,
        Err(_) => return session.out.line("✗ Not authenticated"),
    };

    let api = NotionApi::new(connect(&key)?);
    let me = api.me().await.context("token is invalid")?;
    let bot: User = decode(&me)?;

    session.out.title("✓", "Authenticated")?;
    session
        .out
        .field("Workspace", bot.workspace_name().unwrap_or_default())?;
    session.out.field("Bot", bot.display_name())
}
