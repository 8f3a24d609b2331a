use crate::error::{AppError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Declared type of a property, as named by the API's type tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Status,
    Date,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    People,
    Relation,
    Formula,
    Rollup,
    CreatedTime,
    LastEditedTime,
    CreatedBy,
    LastEditedBy,
    /// A tag this client does not model, kept verbatim.
    Other(String),
}

impl PropertyKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "title" => Self::Title,
            "rich_text" => Self::RichText,
            "number" => Self::Number,
            "select" => Self::Select,
            "multi_select" => Self::MultiSelect,
            "status" => Self::Status,
            "date" => Self::Date,
            "checkbox" => Self::Checkbox,
            "url" => Self::Url,
            "email" => Self::Email,
            "phone_number" => Self::PhoneNumber,
            "people" => Self::People,
            "relation" => Self::Relation,
            "formula" => Self::Formula,
            "rollup" => Self::Rollup,
            "created_time" => Self::CreatedTime,
            "last_edited_time" => Self::LastEditedTime,
            "created_by" => Self::CreatedBy,
            "last_edited_by" => Self::LastEditedBy,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Status => "status",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::People => "people",
            Self::Relation => "relation",
            Self::Formula => "formula",
            Self::Rollup => "rollup",
            Self::CreatedTime => "created_time",
            Self::LastEditedTime => "last_edited_time",
            Self::CreatedBy => "created_by",
            Self::LastEditedBy => "last_edited_by",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a database (or one property of a page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub kind: PropertyKind,
    /// Option names for select, multi_select and status columns.
    pub options: Vec<String>,
}

/// Property name to declared kind, in the order the API listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySchema {
    entries: IndexMap<String, SchemaEntry>,
}

impl PropertySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: PropertyKind) {
        self.entries.insert(
            name.into(),
            SchemaEntry {
                kind,
                options: Vec::new(),
            },
        );
    }

    pub fn kind_of(&self, name: &str) -> Option<&PropertyKind> {
        self.entries.get(name).map(|entry| &entry.kind)
    }

    /// Like [`kind_of`](Self::kind_of), but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<&PropertyKind> {
        self.kind_of(name)
            .ok_or_else(|| AppError::UnknownProperty(name.to_string()))
    }

    pub fn entry(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    /// Name of the title column, if the schema has one.
    pub fn title_property(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.kind == PropertyKind::Title)
            .map(|(name, _)| name.as_str())
    }

    /// Property names with the title column moved to the front.
    pub fn display_order(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        if let Some(pos) = names
            .iter()
            .position(|name| self.kind_of(name) == Some(&PropertyKind::Title))
        {
            let title = names.remove(pos);
            names.insert(0, title);
        }
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the schema from a database object's `properties` map, where
    /// each entry looks like `{"type": "select", "select": {"options": [...]}}`.
    pub fn from_database(database: &Value) -> Result<Self> {
        let properties = properties_object(database)?;
        let mut schema = Self::new();
        for (name, definition) in properties {
            let tag = definition
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AppError::MalformedResponse(format!("property {:?} has no type", name))
                })?;
            let kind = PropertyKind::from_tag(tag);
            let options = match kind {
                PropertyKind::Select | PropertyKind::MultiSelect | PropertyKind::Status => {
                    option_names(definition, tag)
                }
                _ => Vec::new(),
            };
            schema
                .entries
                .insert(name.clone(), SchemaEntry { kind, options });
        }
        Ok(schema)
    }

    /// Builds the schema from a page object's property values. Pages carry
    /// the same `type` tag on each value, which is enough to encode writes.
    pub fn from_page(page: &Value) -> Result<Self> {
        let properties = properties_object(page)?;
        let mut schema = Self::new();
        for (name, value) in properties {
            let tag = value.get("type").and_then(Value::as_str).ok_or_else(|| {
                AppError::MalformedResponse(format!("property {:?} has no type", name))
            })?;
            schema.insert(name.clone(), PropertyKind::from_tag(tag));
        }
        Ok(schema)
    }
}

impl<N: Into<String>> FromIterator<(N, PropertyKind)> for PropertySchema {
    fn from_iter<I: IntoIterator<Item = (N, PropertyKind)>>(iter: I) -> Self {
        let mut schema = PropertySchema::new();
        for (name, kind) in iter {
            schema.insert(name, kind);
        }
        schema
    }
}

fn properties_object(object: &Value) -> Result<&serde_json::Map<String, Value>> {
    match object.get("properties") {
        Some(Value::Object(map)) => Ok(map),
        _ => Err(AppError::MalformedResponse(
            "object has no properties map".into(),
        )),
    }
}

fn option_names(definition: &Value, tag: &str) -> Vec<String> {
    definition
        .get(tag)
        .and_then(|config| config.get("options"))
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| option.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
