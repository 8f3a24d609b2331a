use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A run of rich text as the client sees it.
///
/// Responses carry `plain_text` for every run kind (text, mention, equation),
/// which is all the display side needs. Requests only ever send plain text
/// runs, so serialization always produces `{"text": {"content": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRichText")]
pub struct RichTextItem {
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// A plain text run with no link.
    pub fn plain_text(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            href: None,
        }
    }
}

/// Concatenates the plain text of each run with no separator.
pub fn concat_plain_text(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}

/// Wraps `text` as a single-run rich text list.
pub fn single_run(text: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(text)]
}

impl Serialize for RichTextItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut text = serde_json::Map::new();
        text.insert("content".into(), self.plain_text.clone().into());
        if let Some(href) = &self.href {
            text.insert("link".into(), serde_json::json!({ "url": href }));
        }
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("text", &text)?;
        map.end()
    }
}

#[derive(Deserialize)]
struct RawRichText {
    plain_text: Option<String>,
    text: Option<RawTextContent>,
    href: Option<String>,
}

#[derive(Deserialize)]
struct RawTextContent {
    #[serde(default)]
    content: String,
}

impl From<RawRichText> for RichTextItem {
    fn from(raw: RawRichText) -> Self {
        let plain_text = match (raw.plain_text, raw.text) {
            (Some(plain), _) => plain,
            (None, Some(text)) => text.content,
            (None, None) => String::new(),
        };
        RichTextItem {
            plain_text,
            href: raw.href,
        }
    }
}
