use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One model-proposed song: title, artist, a rationale, and an optional
/// historical note. The model owns every field, so each one may be absent or
/// the wrong type; construction goes through [`Recommendation::from_value`]
/// rather than a bare typed parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Recommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub history: Option<String>,
}

impl Recommendation {
    /// Build a record from one element of the model's JSON array. Scalars
    /// are coerced to strings, blanks and wrong-typed values become absent.
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: pick_string(value, "title").unwrap_or_default(),
            artist: pick_string(value, "artist").unwrap_or_default(),
            reason: pick_string(value, "reason").unwrap_or_default(),
            history: pick_string(value, "history"),
        }
    }
}

fn pick_string(value: &Value, key: &str) -> Option<String> {
    let picked = value.as_object()?.get(key)?;
    match picked {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(boolean) => Some(boolean.to_string()),
        _ => None,
    }
}
