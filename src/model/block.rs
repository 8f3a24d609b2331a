use crate::error::{AppError, Result};
use crate::types::{concat_plain_text, single_run, RichTextItem};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// A content block with its children attached.
///
/// `children` is empty until a tree fetch fills it in; `has_children` is what
/// the API reported and tells the fetcher whether there is anything to get.
/// `raw` is the object exactly as the API returned it, `None` for blocks
/// built locally.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: Option<String>,
    pub has_children: bool,
    pub children: Vec<Block>,
    pub content: BlockContent,
    pub raw: Option<Value>,
}

/// The type-specific part of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph { text: Vec<RichTextItem> },
    Heading { level: u8, text: Vec<RichTextItem> },
    BulletedListItem { text: Vec<RichTextItem> },
    NumberedListItem { text: Vec<RichTextItem> },
    ToDo { text: Vec<RichTextItem>, checked: bool },
    Toggle { text: Vec<RichTextItem> },
    Quote { text: Vec<RichTextItem> },
    Callout { text: Vec<RichTextItem>, icon: Option<String> },
    Code { text: Vec<RichTextItem>, language: String },
    Divider,
    Bookmark { url: String, caption: Vec<RichTextItem> },
    Image { url: String },
    Embed { url: String },
    Video { url: String },
    TableOfContents,
    Equation { expression: String },
    ColumnList,
    Column,
    SyncedBlock,
    /// Any other block type. `text` is its rich text (or title) if it has one.
    Unsupported { kind: String, text: String },
}

/// Language tag used for code blocks that don't name one.
pub const PLAIN_TEXT_LANGUAGE: &str = "plain text";

/// Expands the short block type names accepted on the command line.
/// Unknown names pass through untouched.
pub fn expand_block_type(name: &str) -> &str {
    match name {
        "h1" | "heading1" => "heading_1",
        "h2" | "heading2" => "heading_2",
        "h3" | "heading3" => "heading_3",
        "bullet" => "bulleted_list_item",
        "numbered" => "numbered_list_item",
        "todo" => "to_do",
        "p" | "paragraph" => "paragraph",
        other => other,
    }
}

impl Block {
    /// A new, not yet persisted block.
    pub fn new(content: BlockContent) -> Self {
        Self {
            id: None,
            has_children: false,
            children: Vec::new(),
            content,
            raw: None,
        }
    }

    /// Builds a single block of API type `kind` holding `text`.
    ///
    /// `language` is only used by code blocks and defaults to plain text.
    pub fn with_text(kind: &str, text: &str, language: Option<&str>) -> Self {
        let run = single_run(text);
        let content = match kind {
            "paragraph" => BlockContent::Paragraph { text: run },
            "heading_1" => BlockContent::Heading { level: 1, text: run },
            "heading_2" => BlockContent::Heading { level: 2, text: run },
            "heading_3" => BlockContent::Heading { level: 3, text: run },
            "bulleted_list_item" => BlockContent::BulletedListItem { text: run },
            "numbered_list_item" => BlockContent::NumberedListItem { text: run },
            "to_do" => BlockContent::ToDo {
                text: run,
                checked: false,
            },
            "toggle" => BlockContent::Toggle { text: run },
            "quote" => BlockContent::Quote { text: run },
            "callout" => BlockContent::Callout {
                text: run,
                icon: None,
            },
            "code" => BlockContent::Code {
                text: run,
                language: language
                    .filter(|lang| !lang.is_empty())
                    .unwrap_or(PLAIN_TEXT_LANGUAGE)
                    .to_string(),
            },
            "divider" => BlockContent::Divider,
            other => BlockContent::Unsupported {
                kind: other.to_string(),
                text: text.to_string(),
            },
        };
        Self::new(content)
    }

    /// Decodes a block object from an API response.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::MalformedResponse("block has no type".into()))?;
        let empty = Map::new();
        let payload = match value.get(kind) {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => &empty,
            Some(_) => {
                return Err(AppError::MalformedResponse(format!(
                    "{} block payload is not an object",
                    kind
                )))
            }
        };

        let content = match kind {
            "paragraph" => BlockContent::Paragraph {
                text: rich_text(payload, kind)?,
            },
            "heading_1" | "heading_2" | "heading_3" => BlockContent::Heading {
                level: kind.as_bytes()[kind.len() - 1] - b'0',
                text: rich_text(payload, kind)?,
            },
            "bulleted_list_item" => BlockContent::BulletedListItem {
                text: rich_text(payload, kind)?,
            },
            "numbered_list_item" => BlockContent::NumberedListItem {
                text: rich_text(payload, kind)?,
            },
            "to_do" => BlockContent::ToDo {
                text: rich_text(payload, kind)?,
                checked: payload.get("checked").and_then(Value::as_bool).unwrap_or(false),
            },
            "toggle" => BlockContent::Toggle {
                text: rich_text(payload, kind)?,
            },
            "quote" => BlockContent::Quote {
                text: rich_text(payload, kind)?,
            },
            "callout" => BlockContent::Callout {
                text: rich_text(payload, kind)?,
                icon: payload
                    .get("icon")
                    .and_then(|icon| icon.get("emoji"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            "code" => BlockContent::Code {
                text: rich_text(payload, kind)?,
                language: string_field(payload, "language"),
            },
            "divider" => BlockContent::Divider,
            "bookmark" => BlockContent::Bookmark {
                url: string_field(payload, "url"),
                caption: match payload.get("caption") {
                    Some(caption) if !caption.is_null() => {
                        Vec::<RichTextItem>::deserialize(caption).map_err(|e| {
                            AppError::MalformedResponse(format!("bookmark caption: {}", e))
                        })?
                    }
                    _ => Vec::new(),
                },
            },
            "image" => BlockContent::Image {
                url: file_url(payload),
            },
            "embed" => BlockContent::Embed {
                url: string_field(payload, "url"),
            },
            "video" => BlockContent::Video {
                url: file_url(payload),
            },
            "table_of_contents" => BlockContent::TableOfContents,
            "equation" => BlockContent::Equation {
                expression: string_field(payload, "expression"),
            },
            "column_list" => BlockContent::ColumnList,
            "column" => BlockContent::Column,
            "synced_block" => BlockContent::SyncedBlock,
            other => BlockContent::Unsupported {
                kind: other.to_string(),
                text: match payload.get("rich_text") {
                    Some(_) => concat_plain_text(&rich_text(payload, kind)?),
                    None => string_field(payload, "title"),
                },
            },
        };

        Ok(Block {
            id: value.get("id").and_then(Value::as_str).map(str::to_string),
            has_children: value
                .get("has_children")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            children: Vec::new(),
            content,
            raw: Some(value.clone()),
        })
    }

    /// The request shape used by append, insert and page creation:
    /// `{"object": "block", "type": t, t: {...}}`.
    pub fn to_wire(&self) -> Value {
        self.encode(Block::to_wire)
    }

    /// The shape printed under `--format json`. Fetched blocks print the
    /// API object untouched, with fetched children under `children`; local
    /// blocks print their request shape plus `id` and `has_children`.
    pub fn to_json(&self) -> Value {
        let Some(raw) = &self.raw else {
            let mut value = self.encode(Block::to_json);
            if let Value::Object(map) = &mut value {
                if let Some(id) = &self.id {
                    map.insert("id".into(), id.as_str().into());
                }
                map.insert("has_children".into(), self.has_children.into());
            }
            return value;
        };

        let mut value = raw.clone();
        if !self.children.is_empty() {
            if let Value::Object(map) = &mut value {
                let children: Vec<Value> = self.children.iter().map(Block::to_json).collect();
                map.insert("children".into(), Value::Array(children));
            }
        }
        value
    }

    fn encode(&self, child: fn(&Block) -> Value) -> Value {
        let kind = self.content.kind();
        let mut payload = match &self.content {
            BlockContent::Paragraph { text }
            | BlockContent::Heading { text, .. }
            | BlockContent::BulletedListItem { text }
            | BlockContent::NumberedListItem { text }
            | BlockContent::Toggle { text }
            | BlockContent::Quote { text } => json!({ "rich_text": text }),
            BlockContent::ToDo { text, checked } => {
                json!({ "rich_text": text, "checked": checked })
            }
            BlockContent::Callout { text, icon } => match icon {
                Some(emoji) => json!({
                    "rich_text": text,
                    "icon": { "type": "emoji", "emoji": emoji },
                }),
                None => json!({ "rich_text": text }),
            },
            BlockContent::Code { text, language } => {
                json!({ "rich_text": text, "language": language })
            }
            BlockContent::Bookmark { url, caption } => json!({ "url": url, "caption": caption }),
            BlockContent::Image { url } | BlockContent::Video { url } => {
                json!({ "type": "external", "external": { "url": url } })
            }
            BlockContent::Embed { url } => json!({ "url": url }),
            BlockContent::Equation { expression } => json!({ "expression": expression }),
            BlockContent::Divider
            | BlockContent::TableOfContents
            | BlockContent::ColumnList
            | BlockContent::Column
            | BlockContent::SyncedBlock => json!({}),
            BlockContent::Unsupported { text, .. } => json!({ "rich_text": single_run(text) }),
        };

        if !self.children.is_empty() {
            if let Value::Object(map) = &mut payload {
                let children: Vec<Value> = self.children.iter().map(child).collect();
                map.insert("children".into(), Value::Array(children));
            }
        }

        let mut block = Map::new();
        block.insert("object".into(), "block".into());
        block.insert("type".into(), kind.into());
        block.insert(kind.to_string(), payload);
        Value::Object(block)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Block::from_wire(&value).map_err(serde::de::Error::custom)
    }
}

impl BlockContent {
    /// The API type tag of this block.
    pub fn kind(&self) -> &str {
        match self {
            BlockContent::Paragraph { .. } => "paragraph",
            BlockContent::Heading { level: 1, .. } => "heading_1",
            BlockContent::Heading { level: 2, .. } => "heading_2",
            BlockContent::Heading { .. } => "heading_3",
            BlockContent::BulletedListItem { .. } => "bulleted_list_item",
            BlockContent::NumberedListItem { .. } => "numbered_list_item",
            BlockContent::ToDo { .. } => "to_do",
            BlockContent::Toggle { .. } => "toggle",
            BlockContent::Quote { .. } => "quote",
            BlockContent::Callout { .. } => "callout",
            BlockContent::Code { .. } => "code",
            BlockContent::Divider => "divider",
            BlockContent::Bookmark { .. } => "bookmark",
            BlockContent::Image { .. } => "image",
            BlockContent::Embed { .. } => "embed",
            BlockContent::Video { .. } => "video",
            BlockContent::TableOfContents => "table_of_contents",
            BlockContent::Equation { .. } => "equation",
            BlockContent::ColumnList => "column_list",
            BlockContent::Column => "column",
            BlockContent::SyncedBlock => "synced_block",
            BlockContent::Unsupported { kind, .. } => kind,
        }
    }

    /// Plain text carried by the block, empty for blocks without text.
    pub fn plain_text(&self) -> String {
        match self {
            BlockContent::Paragraph { text }
            | BlockContent::Heading { text, .. }
            | BlockContent::BulletedListItem { text }
            | BlockContent::NumberedListItem { text }
            | BlockContent::ToDo { text, .. }
            | BlockContent::Toggle { text }
            | BlockContent::Quote { text }
            | BlockContent::Callout { text, .. }
            | BlockContent::Code { text, .. } => concat_plain_text(text),
            BlockContent::Unsupported { text, .. } => text.clone(),
            _ => String::new(),
        }
    }
}

fn rich_text(payload: &Map<String, Value>, kind: &str) -> Result<Vec<RichTextItem>> {
    match payload.get("rich_text") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(runs) => Vec::<RichTextItem>::deserialize(runs)
            .map_err(|e| AppError::MalformedResponse(format!("{} rich_text: {}", kind, e))),
    }
}

fn string_field(payload: &Map<String, Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// URL of an uploaded (`file`) or linked (`external`) media payload.
fn file_url(payload: &Map<String, Value>) -> String {
    ["file", "external"]
        .iter()
        .find_map(|source| {
            payload
                .get(*source)
                .and_then(|file| file.get("url"))
                .and_then(Value::as_str)
        })
        .unwrap_or_default()
        .to_string()
}
