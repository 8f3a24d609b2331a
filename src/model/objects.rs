//! Typed views of the top-level API objects the commands display.
//!
//! Only the fields the client reads are modelled; JSON output always prints
//! the raw response instead of these.

use super::{PropertySchema, PropertyValue};
use crate::constants::UNTITLED;
use crate::error::Result;
use crate::types::{concat_plain_text, RichTextItem};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
}

impl Page {
    /// Plain text of the title property, or `(untitled)`.
    pub fn title(&self) -> String {
        self.properties
            .values()
            .find_map(|value| match value {
                PropertyValue::Title { title } => Some(concat_plain_text(title)),
                _ => None,
            })
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Current relation targets of `property`, if it is a relation.
    pub fn relation_ids(&self, property: &str) -> Option<Vec<String>> {
        match self.properties.get(property)? {
            PropertyValue::Relation { relation } => {
                Some(relation.iter().map(|r| r.id.clone()).collect())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Vec<RichTextItem>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
}

impl Database {
    pub fn title(&self) -> String {
        let title = concat_plain_text(&self.title);
        if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        }
    }
}

/// A search hit is either a page or a database.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum SearchHit {
    Page(Page),
    Database(Database),
}

impl SearchHit {
    pub fn object_type(&self) -> &'static str {
        match self {
            SearchHit::Page(_) => "page",
            SearchHit::Database(_) => "database",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SearchHit::Page(page) => &page.id,
            SearchHit::Database(db) => &db.id,
        }
    }

    pub fn title(&self) -> String {
        match self {
            SearchHit::Page(page) => page.title(),
            SearchHit::Database(db) => db.title(),
        }
    }

    pub fn last_edited_time(&self) -> Option<&str> {
        match self {
            SearchHit::Page(page) => page.last_edited_time.as_deref(),
            SearchHit::Database(db) => db.last_edited_time.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub person: Option<Person>,
    #[serde(default)]
    pub bot: Option<Bot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bot {
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn workspace_name(&self) -> Option<&str> {
        self.bot.as_ref()?.workspace_name.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub created_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUpload {
    pub id: String,
    #[serde(default, alias = "filename")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
}

/// Decodes a raw response into one of the typed views.
pub fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(T::deserialize(value)?)
}

/// Decodes a database object and its schema in one go.
pub fn decode_database(value: &Value) -> Result<(Database, PropertySchema)> {
    Ok((decode(value)?, PropertySchema::from_database(value)?))
}

/// The `YYYY-MM-DD` date of an RFC 3339 timestamp, in the timestamp's own
/// offset. Anything unparseable is cut to its first ten characters.
pub fn date_part(timestamp: Option<&str>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };
    match chrono::DateTime::parse_from_rfc3339(ts) {
        Ok(parsed) => parsed.format("%Y-%m-%d").to_string(),
        Err(_) => ts.chars().take(10).collect(),
    }
}
