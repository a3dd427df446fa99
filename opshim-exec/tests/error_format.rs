use std::collections::BTreeMap;

use opshim_core::types::{CustomErrorFormat, ErrorFormat, ErrorFormatPreset, ErrorFormatSpec, PollState};
use opshim_exec::error_format::{classify_error, operation_failure};
use opshim_exec::HttpResponseParts;
use serde_json::json;

fn resp(status: u16, body: &str) -> HttpResponseParts {
    HttpResponseParts {
        status,
        headers: BTreeMap::new(),
        body: body.as_bytes().to_vec(),
    }
}

fn preset(p: ErrorFormatPreset) -> ErrorFormat {
    ErrorFormat::compile(&ErrorFormatSpec::Preset(p)).unwrap()
}

#[test]
fn mgmt_format_reads_error_envelope() {
    let body = json!({
        "error": {
            "code": "Conflict",
            "message": "Certificate already exists.",
            "target": "certificateName",
            "details": [ { "code": "Inner", "message": "detail" } ]
        }
    });
    let err = classify_error(&preset(ErrorFormatPreset::MgmtErrorFormat), &resp(409, &body.to_string()));

    assert_eq!(err.status, 409);
    assert_eq!(err.code.as_deref(), Some("Conflict"));
    assert_eq!(err.message.as_deref(), Some("Certificate already exists."));
    assert_eq!(err.target.as_deref(), Some("certificateName"));
    assert_eq!(err.details.len(), 1);
}

#[test]
fn mgmt_format_falls_back_to_top_level() {
    let err = classify_error(
        &preset(ErrorFormatPreset::MgmtErrorFormat),
        &resp(400, r#"{"code":"BadRequest","message":"nope"}"#),
    );
    assert_eq!(err.code.as_deref(), Some("BadRequest"));
    assert_eq!(err.to_string(), "(BadRequest) nope");
}

#[test]
fn odata_format_reads_message_value() {
    let body = json!({ "odata.error": { "code": "ResourceNotFound", "message": { "lang": "en-US", "value": "gone" } } });
    let err = classify_error(&preset(ErrorFormatPreset::ODataV4Format), &resp(404, &body.to_string()));
    assert_eq!(err.code.as_deref(), Some("ResourceNotFound"));
    assert_eq!(err.message.as_deref(), Some("gone"));
}

#[test]
fn custom_format_uses_given_paths() {
    let spec = ErrorFormatSpec::Custom(CustomErrorFormat {
        code_path: "$.fault.kind".to_string(),
        message_path: "$.fault.text".to_string(),
        target_path: None,
        details_path: None,
    });
    let format = ErrorFormat::compile(&spec).unwrap();
    let err = classify_error(&format, &resp(500, r#"{"fault":{"kind":"Boom","text":"it broke"}}"#));
    assert_eq!(err.code.as_deref(), Some("Boom"));
    assert_eq!(err.message.as_deref(), Some("it broke"));
}

#[test]
fn non_json_body_becomes_message() {
    let err = classify_error(&ErrorFormat::default(), &resp(502, "  Bad Gateway from proxy \n"));
    assert_eq!(err.code, None);
    assert_eq!(err.message.as_deref(), Some("Bad Gateway from proxy"));
}

#[test]
fn empty_body_renders_status() {
    let err = classify_error(&ErrorFormat::default(), &resp(404, ""));
    assert_eq!(err.message, None);
    assert_eq!(err.to_string(), "operation returned status 404 (Not Found)");
}

#[test]
fn operation_failure_reads_status_error() {
    let body = json!({ "status": "Failed", "error": { "code": "Quota", "message": "out of quota" } });
    let raw = body.to_string();
    let failure = operation_failure(&ErrorFormat::default(), PollState::Failed, Some(&body), raw.as_bytes());
    assert_eq!(failure.code.as_deref(), Some("Quota"));
    assert_eq!(failure.to_string(), "(Quota) out of quota");

    let bare = operation_failure(&ErrorFormat::default(), PollState::Canceled, None, b"");
    assert_eq!(bare.to_string(), "operation canceled");
}
