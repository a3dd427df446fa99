mod document;
mod error_format;
mod lro;
mod template;

pub use document::{CommandDefinition, DefinitionsDocument};
pub use error_format::{CustomErrorFormat, ErrorFormat, ErrorFormatPreset, ErrorFormatSpec};
pub use lro::{FinalStateVia, LroOptions, PollState};
pub use template::{
    BodyField, BodySchema, BodySource, HttpMethod, ParamLocation, ParamSpec, RequestTemplate,
    ValueSource,
};
