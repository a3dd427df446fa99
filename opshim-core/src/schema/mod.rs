//! Typed description of response payloads and the values decoded from them.
//!
//! A schema is a tree: objects own their fields, arrays and dicts own their
//! element type. There are no references between nodes, so every walk over a
//! schema terminates.

mod decode;
mod encode;
mod value;

pub use decode::{decode, decode_bytes, Decoded};
pub use value::{Entry, Record, Slot, Value};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaType {
    String,
    Integer,
    Float,
    Boolean,
    /// Kept as raw JSON.
    Any,
    Object {
        #[serde(default)]
        fields: Vec<SchemaField>,
    },
    Array {
        items: Box<SchemaType>,
    },
    Dict {
        values: Box<SchemaType>,
    },
}

impl SchemaType {
    pub fn object(fields: Vec<SchemaField>) -> Self {
        SchemaType::Object { fields }
    }

    pub fn array(items: SchemaType) -> Self {
        SchemaType::Array {
            items: Box::new(items),
        }
    }

    pub fn dict(values: SchemaType) -> Self {
        SchemaType::Dict {
            values: Box::new(values),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Float => "float",
            SchemaType::Boolean => "boolean",
            SchemaType::Any => "any",
            SchemaType::Object { .. } => "object",
            SchemaType::Array { .. } => "array",
            SchemaType::Dict { .. } => "dict",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SchemaField {
    /// Logical name used by callers.
    pub name: String,
    #[serde(flatten)]
    pub ty: SchemaType,
    /// Wire name when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_name: Option<String>,
    /// Server-assigned; accepted on decode, never sent back.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Merge this object's fields into the parent on client-flattened output.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flatten: bool,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, ty: SchemaType) -> Self {
        Self {
            name: name.into(),
            ty,
            serialized_name: None,
            read_only: false,
            required: false,
            flatten: false,
        }
    }

    pub fn serialized_as(mut self, wire: impl Into<String>) -> Self {
        self.serialized_name = Some(wire.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    pub fn wire_name(&self) -> &str {
        self.serialized_name.as_deref().unwrap_or(&self.name)
    }
}

/// Expected shape of a command's response body.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ResponseSchema {
    pub root: SchemaType,
}

impl ResponseSchema {
    pub fn new(root: SchemaType) -> Self {
        Self { root }
    }

    pub fn object(fields: Vec<SchemaField>) -> Self {
        Self::new(SchemaType::object(fields))
    }
}
