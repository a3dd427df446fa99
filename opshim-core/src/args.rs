use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// Validated argument values keyed by logical name, as supplied by the
/// argument collaborator (a CLI parser, a generated wrapper, a test).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Arguments {
    values: BTreeMap<String, JsonValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves a logical name or dotted path (`tags.env`). Explicit `null`
    /// counts as absent.
    pub fn resolve(&self, path: &str) -> Option<&JsonValue> {
        if let Some(v) = self.values.get(path) {
            return (!v.is_null()).then_some(v);
        }
        let mut parts = path.split('.');
        let mut cur = self.values.get(parts.next()?)?;
        for part in parts {
            cur = cur.as_object()?.get(part)?;
        }
        (!cur.is_null()).then_some(cur)
    }
}

impl FromIterator<(String, JsonValue)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
