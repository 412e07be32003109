use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Untyped field-name to value map captured directly from form
/// controls. Records are immutable; editing a field produces a new
/// record rather than mutating shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the record with `name` set to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for RawRecord {
    fn from(entries: [(&'a str, &'a str); N]) -> Self {
        Self {
            fields: entries
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_returns_an_updated_copy() {
        let original = RawRecord::new().with("age", "45");
        let edited = original.clone().with("age", "46");

        assert_eq!(original.get("age"), Some("45"));
        assert_eq!(edited.get("age"), Some("46"));
    }

    #[test]
    fn deserializes_from_a_flat_json_object() {
        let record: RawRecord =
            serde_json::from_str(r#"{"age":"45","sex":"M"}"#).expect("flat object parses");
        assert_eq!(record.get("age"), Some("45"));
        assert_eq!(record.get("sex"), Some("M"));
        assert_eq!(record.get("missing"), None);
    }
}
