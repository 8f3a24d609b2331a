// src/credentials.rs
//! The credential file: the one piece of state kept between invocations.

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, TOKEN_ENV_VAR};
use crate::error::{AppError, Result, ResultExt};
use crate::types::ApiKey;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The stored integration token plus what `auth login` learned about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

impl Credentials {
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// File-backed credential storage.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// A store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/notion-cli/config.json`, falling back to
    /// `~/.config/notion-cli/config.json`.
    pub fn default_location() -> Result<Self> {
        let config_home = match std::env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => BaseDirs::new()
                .map(|dirs| dirs.home_dir().join(".config"))
                .ok_or_else(|| {
                    AppError::MissingArgument("could not determine the home directory".into())
                })?,
        };
        Ok(Self::new(
            config_home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored credentials. A missing file is an empty record.
    pub fn load(&self) -> Result<Credentials> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No credential file at {}", self.path.display());
                return Ok(Credentials::default());
            }
            Err(e) => return Err(AppError::from(e).context("read credentials")),
        };
        serde_json::from_str(&data).context("parse credentials")
    }

    /// Writes pretty JSON, creating the directory (0700) and the file (0600)
    /// owner-only.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("create config directory")?;
            restrict_permissions(dir, 0o700)?;
        }
        let data = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, data).context("write credentials")?;
        restrict_permissions(&self.path, 0o600)?;
        log::debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    /// Forgets the token by writing an empty record.
    pub fn clear(&self) -> Result<()> {
        self.save(&Credentials::default())
    }

    /// The token to use: `NOTION_TOKEN` when set and non-empty, else the
    /// stored one.
    pub fn resolve_token(&self) -> Result<ApiKey> {
        resolve_token(std::env::var(TOKEN_ENV_VAR).ok(), self)
    }
}

/// Token resolution with the environment value passed in.
pub fn resolve_token(env_token: Option<String>, store: &CredentialStore) -> Result<ApiKey> {
    if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
        return Ok(ApiKey::new(token)?);
    }

    match store.load() {
        Ok(credentials) if credentials.has_token() => Ok(ApiKey::new(credentials.token)?),
        Ok(_) => Err(AppError::NotAuthenticated),
        Err(e) => {
            log::debug!("Ignoring unreadable credentials: {}", e);
            Err(AppError::NotAuthenticated)
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).context("set permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("notion-cli").join("config.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load().unwrap(), Credentials::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let credentials = Credentials {
            token: "secret_abc".into(),
            workspace_name: Some("Acme".into()),
            workspace_id: None,
            bot_id: Some("bot-1".into()),
        };
        store.save(&credentials).unwrap();
        assert_eq!(store.load().unwrap(), credentials);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  \"token\": \"secret_abc\""));
        assert!(!raw.contains("workspace_id"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Credentials::default()).unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        let dir_mode = fs::metadata(store.path().parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn test_token_resolution_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(matches!(
            resolve_token(None, &store),
            Err(AppError::NotAuthenticated)
        ));

        store
            .save(&Credentials {
                token: "secret_stored".into(),
                ..Credentials::default()
            })
            .unwrap();
        assert_eq!(resolve_token(None, &store).unwrap().as_str(), "secret_stored");
        assert_eq!(
            resolve_token(Some("secret_env".into()), &store).unwrap().as_str(),
            "secret_env"
        );
        assert_eq!(
            resolve_token(Some("  ".into()), &store).unwrap().as_str(),
            "secret_stored"
        );
    }

    #[test]
    fn test_clear_forgets_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .save(&Credentials {
                token: "secret_x".into(),
                ..Credentials::default()
            })
            .unwrap();
        store.clear().unwrap();
        assert!(!store.load().unwrap().has_token());
    }
}
