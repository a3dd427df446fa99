#![forbid(unsafe_code)]

//! Declarative command model for opshim: request templates, body and response
//! schemas, typed decoded values and the lazily compiled command registry.
//!
//! Nothing in this crate performs I/O; `opshim-exec` drives the wire.

pub mod args;
pub mod error;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod types;
pub mod validate;

pub use crate::args::Arguments;
pub use crate::error::{BuildError, DecodeError, OpshimError, ParseError, RegistryError, ValidationError};
pub use crate::parser::{parse_definitions_str, DocumentFormat, ParsedDefinitions};
pub use crate::registry::{Command, Registry};
pub use crate::resolve::{build_body, ResolvedRequest};
pub use crate::schema::{decode, decode_bytes, Decoded, Record, ResponseSchema, SchemaField, SchemaType, Slot, Value};
pub use crate::types::DefinitionsDocument;
pub use crate::validate::{validate_definitions, Validate};
