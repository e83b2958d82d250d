//! Match payloads returned by the vector index

use crate::error::{Error, Provider, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the fragment text
pub const TEXT_FIELD: &str = "text";

/// One nearest-neighbour match as sent by the index
#[derive(Debug, Clone, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// A retrieved text fragment
///
/// Only `text` is used downstream; the remaining metadata is carried along
/// untouched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedFragment {
    pub id: String,
    pub score: f32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
impl RetrievedFragment {
    /// Fragment with only text, no id or metadata
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            score: 0.0,
            text: text.into(),
            metadata: Map::new(),
        }
    }
}

impl TryFrom<QueryMatch> for RetrievedFragment {
    type Error = Error;

    fn try_from(m: QueryMatch) -> Result<Self> {
        let mut metadata = m.metadata.unwrap_or_default();
        let text = match metadata.remove(TEXT_FIELD) {
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(Error::provider(
                    Provider::Index,
                    format!(
                        "match '{}' has a non-string '{}' field: {}",
                        m.id, TEXT_FIELD, other
                    ),
                ))
            }
            None => {
                return Err(Error::provider(
                    Provider::Index,
                    format!("match '{}' has no '{}' metadata", m.id, TEXT_FIELD),
                ))
            }
        };

        Ok(Self {
            id: m.id,
            score: m.score,
            text,
            metadata,
        })
    }
}
