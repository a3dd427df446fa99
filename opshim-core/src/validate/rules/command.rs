use crate::types::CommandDefinition;
use crate::validate::rules::{lro, request, response};
use crate::validate::validator::Validator;

pub(crate) fn validate_command(v: &mut Validator, path: &str, cmd: &CommandDefinition) {
    if cmd.name.trim().is_empty() {
        v.push(format!("{path}.name"), "must not be empty");
    } else if cmd.name.split(' ').any(|w| w.is_empty()) {
        v.push(
            format!("{path}.name"),
            "command words must be separated by single spaces",
        );
    }

    request::validate_request(v, &format!("{path}.request"), &cmd.request);
    if let Some(schema) = &cmd.response {
        response::validate_type(v, &format!("{path}.response"), &schema.root);
    }
    lro::validate_lro(v, &format!("{path}.lro"), &cmd.lro);

    if let Err(e) = crate::types::ErrorFormat::compile(&cmd.error_format) {
        v.push(format!("{path}.error_format"), e);
    }
    if cmd.no_wait_supported && !cmd.lro.enabled {
        v.push(
            format!("{path}.no_wait_supported"),
            "requires an `lro` block; commands that never poll cannot skip waiting",
        );
    }
}
