use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::error::DecodeError;
use crate::schema::value::{Entry, Record, Slot, Value};
use crate::schema::{ResponseSchema, SchemaField, SchemaType};

/// Result of decoding a payload. `diagnostics` lists optional fields whose
/// wire type did not match the schema; their raw JSON is kept in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Value,
    pub diagnostics: Vec<String>,
}

impl Decoded {
    pub fn empty() -> Self {
        Self {
            value: Value::Null,
            diagnostics: Vec::new(),
        }
    }

    pub fn record(&self) -> Option<&Record> {
        self.value.as_record()
    }
}

pub fn decode(schema: &ResponseSchema, payload: &JsonValue) -> Result<Decoded, DecodeError> {
    let mut diagnostics = Vec::new();
    let value = decode_value(&schema.root, payload, "$", true, &mut diagnostics)?;
    Ok(Decoded { value, diagnostics })
}

/// Decodes a raw body. An empty body decodes to `Null`; without a schema the
/// payload is passed through as raw JSON.
pub fn decode_bytes(schema: Option<&ResponseSchema>, body: &[u8]) -> Result<Decoded, DecodeError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Decoded::empty());
    }
    let payload: JsonValue =
        serde_json::from_slice(body).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    match schema {
        Some(s) => decode(s, &payload),
        None => Ok(Decoded {
            value: Value::Raw(payload),
            diagnostics: Vec::new(),
        }),
    }
}

fn decode_value(
    ty: &SchemaType,
    json: &JsonValue,
    path: &str,
    strict: bool,
    diagnostics: &mut Vec<String>,
) -> Result<Value, DecodeError> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    let mismatch = |diagnostics: &mut Vec<String>| {
        if strict {
            Err(DecodeError::TypeMismatch {
                path: path.to_string(),
                expected: ty.type_name(),
                found: json_type_name(json),
            })
        } else {
            diagnostics.push(format!(
                "{path}: expected {}, found {}; kept raw value",
                ty.type_name(),
                json_type_name(json)
            ));
            Ok(Value::Raw(json.clone()))
        }
    };

    match ty {
        SchemaType::Any => Ok(Value::Raw(json.clone())),
        SchemaType::String => match json.as_str() {
            Some(s) => Ok(Value::String(s.to_string())),
            None => mismatch(diagnostics),
        },
        SchemaType::Integer => match json.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => mismatch(diagnostics),
        },
        SchemaType::Float => match json.as_f64() {
            Some(f) => Ok(Value::Float(f)),
            None => mismatch(diagnostics),
        },
        SchemaType::Boolean => match json.as_bool() {
            Some(b) => Ok(Value::Bool(b)),
            None => mismatch(diagnostics),
        },
        SchemaType::Array { items } => {
            let Some(arr) = json.as_array() else {
                return mismatch(diagnostics);
            };
            let mut out = Vec::with_capacity(arr.len());
            for (idx, item) in arr.iter().enumerate() {
                out.push(decode_value(
                    items,
                    item,
                    &format!("{path}[{idx}]"),
                    strict,
                    diagnostics,
                )?);
            }
            Ok(Value::Array(out))
        }
        SchemaType::Dict { values } => {
            let Some(map) = json.as_object() else {
                return mismatch(diagnostics);
            };
            let mut out = BTreeMap::new();
            for (k, v) in map {
                let decoded = decode_value(values, v, &format!("{path}.{k}"), strict, diagnostics)?;
                out.insert(k.clone(), decoded);
            }
            Ok(Value::Dict(out))
        }
        SchemaType::Object { fields } => {
            let Some(map) = json.as_object() else {
                return mismatch(diagnostics);
            };
            let mut record = Record::default();
            for field in fields {
                record.push(decode_field(field, map, path, diagnostics)?);
            }
            Ok(Value::Object(record))
        }
    }
}

fn decode_field(
    field: &SchemaField,
    map: &serde_json::Map<String, JsonValue>,
    parent: &str,
    diagnostics: &mut Vec<String>,
) -> Result<Entry, DecodeError> {
    let wire = field.wire_name();
    let path = format!("{parent}.{wire}");
    let slot = match map.get(wire) {
        None if field.required => return Err(DecodeError::MissingField { path }),
        None => Slot::Unset,
        Some(v) => Slot::Set(decode_value(&field.ty, v, &path, field.required, diagnostics)?),
    };
    Ok(Entry {
        name: field.name.clone(),
        wire_name: wire.to_string(),
        read_only: field.read_only,
        flatten: field.flatten,
        slot,
    })
}

fn json_type_name(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
