mod rules;
mod validator;

pub use validator::{placeholders, Validator};

use crate::error::ValidationError;
use crate::types::{CommandDefinition, DefinitionsDocument};

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for DefinitionsDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_definitions(self)
    }
}

impl Validate for CommandDefinition {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.validate_command("$", self);
        v.finish()
    }
}

pub fn validate_definitions(doc: &DefinitionsDocument) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_document(doc);
    v.finish()
}
