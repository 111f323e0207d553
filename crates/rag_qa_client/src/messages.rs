//! HTTP message types for `POST /api/query`. Client ↔ server JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// Client → server: query body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

impl<'a> QueryRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }
}

/// One retrieved passage backing the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextChunk {
    pub content: String,
    pub source: String,
    /// Distance between the query and the chunk (lower is closer).
    pub score: f64,
}

/// Server → client: successful answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context_chunks: Vec<ContextChunk>,
}

/// `null` lists read as empty, like a missing key.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Server → client: failure body on a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: serde_json::Value,
}

impl ErrorBody {
    /// The server-supplied message, if it carries any text. Falsy scalars
    /// (`""`, `0`, `false`, `null`) and structured values yield `None`.
    pub fn into_message(self) -> Option<String> {
        use serde_json::Value;
        match self.error {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}
