use std::collections::HashSet;

use crate::types::{BodySchema, BodySource, ParamSpec, RequestTemplate, ValueSource};
use crate::validate::validator::{placeholders, Validator, PARAM_NAME_RE};

pub(crate) fn validate_request(v: &mut Validator, path: &str, req: &RequestTemplate) {
    if !req.path.starts_with('/') {
        v.push(format!("{path}.path"), "must start with `/`");
    }

    let holes = placeholders(&req.path);
    let mut seen_holes = HashSet::new();
    for hole in &holes {
        if hole.is_empty() {
            v.push(format!("{path}.path"), "contains an empty `{}` placeholder");
        } else if !seen_holes.insert(hole.as_str()) {
            v.push(format!("{path}.path"), format!("placeholder `{hole}` appears twice"));
        }
    }

    validate_params(v, &format!("{path}.url_params"), &req.url_params);
    validate_params(v, &format!("{path}.query_params"), &req.query_params);
    validate_params(v, &format!("{path}.header_params"), &req.header_params);

    for (idx, p) in req.url_params.iter().enumerate() {
        if !holes.iter().any(|h| h == &p.name) {
            v.push(
                format!("{path}.url_params[{idx}]"),
                format!("no `{{{}}}` placeholder in path", p.name),
            );
        }
        if !p.required {
            v.push(
                format!("{path}.url_params[{idx}].required"),
                "url parameters must be required",
            );
        }
    }
    for hole in holes.iter().filter(|h| !h.is_empty()) {
        if !req.url_params.iter().any(|p| &p.name == hole) {
            v.push(
                format!("{path}.path"),
                format!("placeholder `{hole}` has no url parameter"),
            );
        }
    }

    match req.query_params.iter().find(|p| p.name == "api-version") {
        None => v.push(
            format!("{path}.query_params"),
            "missing `api-version` query parameter",
        ),
        Some(p) => {
            let fixed = matches!(&p.source, ValueSource::Literal(l) if l.is_string());
            if !fixed || !p.required {
                v.push(
                    format!("{path}.query_params.api-version"),
                    "must be a required string literal",
                );
            }
        }
    }

    if let Some(body) = &req.body {
        validate_body(v, &format!("{path}.body"), body);
    }
}

fn validate_params(v: &mut Validator, path: &str, params: &[ParamSpec]) {
    let mut seen = HashSet::new();
    for (idx, p) in params.iter().enumerate() {
        let ipath = format!("{path}[{idx}]");
        if !PARAM_NAME_RE.is_match(&p.name) {
            v.push(format!("{ipath}.name"), "must be a non-empty token");
        }
        // Header names compare case-insensitively, so do it for all locations.
        if !seen.insert(p.name.to_ascii_lowercase()) {
            v.push(ipath.as_str(), format!("duplicate parameter `{}`", p.name));
        }
        if let ValueSource::Arg(a) = &p.source {
            if a.trim().is_empty() {
                v.push(format!("{ipath}.arg"), "must not be empty");
            }
        }
    }
}

fn validate_body(v: &mut Validator, path: &str, body: &BodySchema) {
    let mut seen = HashSet::new();
    for (idx, field) in body.fields.iter().enumerate() {
        let ipath = format!("{path}[{idx}]");
        if field.key.is_empty() {
            v.push(format!("{ipath}.key"), "must not be empty");
        }
        if !seen.insert(field.key.as_str()) {
            v.push(ipath.as_str(), format!("duplicate body key `{}`", field.key));
        }
        match &field.source {
            BodySource::Object(nested) => validate_body(v, &format!("{ipath}.object"), nested),
            BodySource::Arg(a) if a.trim().is_empty() => {
                v.push(format!("{ipath}.arg"), "must not be empty")
            }
            BodySource::Literal(l) if l.is_null() && field.required => v.push(
                format!("{ipath}.literal"),
                "a required key cannot be a null literal",
            ),
            _ => {}
        }
    }
}
