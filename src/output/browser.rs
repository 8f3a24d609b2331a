// src/output/browser.rs
//! Opening pages and databases in the default browser.

use crate::error::{Result, ResultExt};
use crate::types::NotionId;
use std::process::{Command, Stdio};

/// The link to open for `input`: web links pass through untouched, anything
/// else is resolved to an id and turned into a notion.so link.
pub fn browser_url(input: &str) -> String {
    if input.contains("notion.so") || input.contains("notion.site") {
        input.to_string()
    } else {
        NotionId::resolve(input).web_url()
    }
}

/// Starts the platform opener for `url` and returns without waiting for it.
pub fn open_in_browser(url: &str) -> Result<()> {
    log::debug!("Opening {} in the browser", url);
    opener_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("open browser")?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("rundll32");
    command.args(["url.dll,FileProtocolHandler", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_pass_through() {
        let link = "https://www.notion.so/acme/Plan-0123456789abcdef0123456789abcdef";
        assert_eq!(browser_url(link), link);
        assert_eq!(browser_url("https://acme.notion.site/x"), "https://acme.notion.site/x");
    }

    #[test]
    fn test_ids_become_links() {
        assert_eq!(
            browser_url("01234567-89ab-cdef-0123-456789abcdef"),
            "https://www.notion.so/0123456789abcdef0123456789abcdef"
        );
    }
}
