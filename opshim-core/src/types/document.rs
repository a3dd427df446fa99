use crate::schema::ResponseSchema;
use crate::types::{ErrorFormatSpec, LroOptions, RequestTemplate};

/// Top-level definitions document: a set of generated commands.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DefinitionsDocument {
    pub version: String,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommandDefinition {
    /// Space-separated command identity, e.g. `nginx deployment certificate create`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub request: RequestTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSchema>,
    #[serde(default)]
    pub lro: LroOptions,
    #[serde(default)]
    pub error_format: ErrorFormatSpec,
    #[serde(default)]
    pub no_wait_supported: bool,
}
