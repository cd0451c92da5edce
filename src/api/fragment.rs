use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A small piece of the response that can be processed independently.
///
/// The `id` and `type` never change during processing. The `body` is the
/// rendered outcome and may be rewritten by every node; the `payload` carries
/// intermediate data between nodes and is merged key-by-key (last write wins)
/// when parallel branches join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    id: String,
    #[serde(rename = "type")]
    fragment_type: String,
    configuration: Value,
    body: String,
    payload: Map<String, Value>,
}

impl Fragment {
    pub fn new(fragment_type: impl Into<String>, configuration: Value, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fragment_type: fragment_type.into(),
            configuration,
            body: body.into(),
            payload: Map::new(),
        }
    }

    /// Stable identity within one request; results are correlated back to
    /// inputs by this id after concurrent processing.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fragment_type(&self) -> &str {
        &self.fragment_type
    }

    pub fn configuration(&self) -> &Value {
        &self.configuration
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Puts one payload entry, overwriting any existing value under the key.
    pub fn append_payload(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Merges entries into the payload, overwriting on key collision.
    pub fn merge_in_payload(&mut self, other: &Map<String, Value>) -> &mut Self {
        for (key, value) in other {
            self.payload.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn clear_payload(&mut self) -> &mut Self {
        self.payload.clear();
        self
    }
}
