use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// A decoded value. Objects decode into [`Record`]s so that field presence is
/// tracked per declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    Object(Record),
    /// `any`-typed payloads, or optional fields whose type did not match.
    Raw(JsonValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }
}

/// Presence state of a declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// The payload did not contain the field at all.
    Unset,
    /// The payload contained the field; `Value::Null` means explicit `null`.
    Set(Value),
}

impl Slot {
    pub fn is_unset(&self) -> bool {
        matches!(self, Slot::Unset)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Unset => None,
            Slot::Set(v) => Some(v),
        }
    }
}

/// One declared field of a decoded object, with the schema flags it was
/// decoded under so it can be re-encoded without the schema at hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub wire_name: String,
    pub read_only: bool,
    pub flatten: bool,
    pub slot: Slot,
}

/// Decoded object: every declared field, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<Entry>,
}

impl Record {
    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Slot by logical name. Names not declared in the schema are `Unset`.
    pub fn get(&self, name: &str) -> &Slot {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.slot)
            .unwrap_or(&Slot::Unset)
    }

    /// Follows a dotted logical path through nested records.
    pub fn lookup(&self, path: &str) -> &Slot {
        let mut parts = path.split('.');
        let Some(first) = parts.next() else {
            return &Slot::Unset;
        };
        let mut slot = self.get(first);
        for part in parts {
            match slot {
                Slot::Set(Value::Object(r)) => slot = r.get(part),
                _ => return &Slot::Unset,
            }
        }
        slot
    }

    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => {
                e.slot = Slot::Set(value);
                true
            }
            None => false,
        }
    }

    pub fn unset(&mut self, name: &str) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.name == name) {
            e.slot = Slot::Unset;
        }
    }
}
