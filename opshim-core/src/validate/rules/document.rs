use std::collections::HashSet;

use crate::types::DefinitionsDocument;
use crate::validate::validator::Validator;

pub(crate) fn validate_document(v: &mut Validator, doc: &DefinitionsDocument) {
    if doc.version.trim().is_empty() {
        v.push("$.version", "must not be empty");
    }
    if doc.commands.is_empty() {
        v.push("$.commands", "must contain at least one command");
    }

    let mut seen = HashSet::<&str>::new();
    for (idx, cmd) in doc.commands.iter().enumerate() {
        let path = format!("$.commands[{idx}]");
        if !seen.insert(cmd.name.as_str()) {
            v.push(format!("{path}.name"), format!("duplicate command `{}`", cmd.name));
        }
        v.validate_command(&path, cmd);
    }
}
