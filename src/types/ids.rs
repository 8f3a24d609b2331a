use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// The trailing id run of a Notion link: 32 hex or the dashed UUID shape,
    /// bounded by `/` or `-` before and `/`, `?`, `#` or end after.
    static ref URL_ID_REGEX: Regex = Regex::new(
        r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
    ).expect("Failed to compile Notion ID regex - this is a bug in the code");

    static ref DASHED_ID_REGEX: Regex = Regex::new(
        r"^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$"
    ).expect("Failed to compile dashed ID regex - this is a bug in the code");
}

/// Host markers that identify a Notion web link.
const LINK_HOST_MARKERS: [&str; 2] = ["notion.so", "notion.site"];

/// Normalizes a page/database/block reference to the canonical dashed id.
///
/// Accepts a bare dashed id, 32 lowercase hex characters, or a full
/// `notion.so` / `notion.site` link. Anything else comes back unchanged so
/// the remote can answer with `object_not_found`.
pub fn resolve_id(input: &str) -> String {
    let input = input.trim();

    if LINK_HOST_MARKERS.iter().any(|host| input.contains(host)) {
        if let Some(hex) = extract_from_url(input) {
            return dash(&hex);
        }
    }

    if DASHED_ID_REGEX.is_match(input) {
        return input.to_string();
    }

    if is_compact_hex(input) {
        return dash(input);
    }

    input.to_string()
}

/// Pulls the last id-shaped run out of a link, lowercased and without dashes.
fn extract_from_url(url: &str) -> Option<String> {
    // Matches can't overlap on the leading separator, so walk forward manually
    // to find the trailing one.
    let mut found = None;
    let mut start = 0;
    while let Some(captures) = URL_ID_REGEX.captures_at(url, start) {
        let id_match = captures.get(1)?;
        found = Some(id_match.as_str().replace('-', "").to_lowercase());
        start = id_match.start() + 1;
    }
    found
}

fn is_compact_hex(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

/// Inserts dashes at 8, 12, 16 and 20 into a 32-character hex run.
fn dash(hex: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// NotionId - a resolved reference to any Notion object.
///
/// Holds whatever [`resolve_id`] produced. That is the dashed form for every
/// recognizable input, and the raw input otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotionId(String);

impl NotionId {
    /// Resolves user input (id or link) into an id.
    pub fn resolve(input: &str) -> Self {
        NotionId(resolve_id(input))
    }

    /// Returns the ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ID without dashes, the form used in web links.
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }

    /// The browser URL for this object.
    pub fn web_url(&self) -> String {
        format!("{}/{}", crate::constants::NOTION_WEB_BASE_URL, self.compact())
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NotionId {
    fn from(input: &str) -> Self {
        NotionId::resolve(input)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(NotionId::resolve(&s))
    }
}
