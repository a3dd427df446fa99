use serde_json::{Map, Value as JsonValue};

use crate::schema::value::{Record, Slot, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Input for a follow-up request: read-only fields are stripped.
    Request,
    /// Rendering for callers: everything the server sent is kept.
    Output { client_flatten: bool },
}

impl Value {
    /// Wire JSON suitable as input to a subsequent request.
    pub fn to_request_json(&self) -> JsonValue {
        encode_value(self, Mode::Request)
    }

    pub fn to_output_json(&self, client_flatten: bool) -> JsonValue {
        encode_value(self, Mode::Output { client_flatten })
    }
}

impl Record {
    pub fn to_request_json(&self) -> JsonValue {
        JsonValue::Object(encode_record(self, Mode::Request))
    }

    pub fn to_output_json(&self, client_flatten: bool) -> JsonValue {
        JsonValue::Object(encode_record(self, Mode::Output { client_flatten }))
    }
}

fn encode_value(value: &Value, mode: Mode) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => JsonValue::Array(items.iter().map(|v| encode_value(v, mode)).collect()),
        Value::Dict(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), encode_value(v, mode)))
                .collect(),
        ),
        Value::Object(record) => JsonValue::Object(encode_record(record, mode)),
        Value::Raw(json) => json.clone(),
    }
}

fn encode_record(record: &Record, mode: Mode) -> Map<String, JsonValue> {
    let mut out = Map::new();
    for entry in record.entries() {
        let Slot::Set(value) = &entry.slot else {
            continue;
        };
        if entry.read_only && mode == Mode::Request {
            continue;
        }
        let encoded = encode_value(value, mode);
        let flatten = matches!(mode, Mode::Output { client_flatten: true }) && entry.flatten;
        match encoded {
            JsonValue::Object(inner) if flatten => {
                for (k, v) in inner {
                    out.entry(k).or_insert(v);
                }
            }
            other => {
                out.insert(entry.wire_name.clone(), other);
            }
        }
    }
    out
}
