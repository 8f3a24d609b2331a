// src/api/responses.rs
//! Response envelopes shared by the list endpoints.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a cursor-paginated list.
///
/// `next_cursor` is set whenever `has_more` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// A final page holding `results`.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            has_more: false,
            next_cursor: None,
        }
    }

    /// A page followed by another one at `cursor`.
    pub fn with_more(results: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            results,
            has_more: true,
            next_cursor: Some(cursor.into()),
        }
    }

    /// Converts every result, failing on the first one that doesn't convert.
    pub fn try_map<U, F>(self, f: F) -> Result<PaginatedResponse<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        Ok(PaginatedResponse {
            results: self.results.into_iter().map(f).collect::<Result<_>>()?,
            has_more: self.has_more,
            next_cursor: self.next_cursor,
        })
    }
}

impl PaginatedResponse<Value> {
    /// Splits a raw list response into its envelope, keeping results as JSON.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    /// Decodes every result into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<PaginatedResponse<T>> {
        self.try_map(|item| Ok(serde_json::from_value(item)?))
    }
}
