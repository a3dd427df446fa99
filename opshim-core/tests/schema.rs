use opshim_core::{decode, decode_bytes, DecodeError, ResponseSchema, SchemaField, SchemaType, Slot, Value};
use serde_json::json;

fn resource_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        SchemaField::new("id", SchemaType::String).read_only(),
        SchemaField::new("location", SchemaType::String),
        SchemaField::new("name", SchemaType::String).read_only(),
        SchemaField::new(
            "properties",
            SchemaType::object(vec![
                SchemaField::new("certificate_virtual_path", SchemaType::String)
                    .serialized_as("certificateVirtualPath"),
                SchemaField::new("provisioning_state", SchemaType::String)
                    .serialized_as("provisioningState")
                    .read_only(),
                SchemaField::new(
                    "certificate_error",
                    SchemaType::object(vec![
                        SchemaField::new("code", SchemaType::String),
                        SchemaField::new("message", SchemaType::String),
                    ]),
                )
                .serialized_as("certificateError"),
            ]),
        )
        .flattened(),
        SchemaField::new("tags", SchemaType::dict(SchemaType::String)),
        SchemaField::new("zones", SchemaType::array(SchemaType::String)),
    ])
}

#[test]
fn unknown_fields_are_ignored() {
    let payload = json!({
        "id": "/x",
        "location": "westus",
        "brandNewServerField": {"nested": true}
    });
    let decoded = decode(&resource_schema(), &payload).unwrap();
    let record = decoded.record().unwrap();
    assert_eq!(record.get("id"), &Slot::Set(Value::String("/x".into())));
    assert_eq!(record.get("brandNewServerField"), &Slot::Unset);
    assert!(decoded.diagnostics.is_empty());
}

#[test]
fn missing_field_is_unset_and_null_is_set() {
    let decoded = decode(&resource_schema(), &json!({ "location": null })).unwrap();
    let record = decoded.record().unwrap();
    assert_eq!(record.get("location"), &Slot::Set(Value::Null));
    assert!(record.get("name").is_unset());
    assert_ne!(record.get("location"), record.get("name"));
}

#[test]
fn serialized_names_map_to_logical_names() {
    let payload = json!({
        "properties": {
            "certificateVirtualPath": "/etc/nginx/test.cert",
            "provisioningState": "Succeeded",
            "certificateError": { "code": "E1" }
        }
    });
    let decoded = decode(&resource_schema(), &payload).unwrap();
    let record = decoded.record().unwrap();
    assert_eq!(
        record.lookup("properties.provisioning_state").value().and_then(Value::as_str),
        Some("Succeeded")
    );
    assert_eq!(
        record.lookup("properties.certificate_error.code").value().and_then(Value::as_str),
        Some("E1")
    );
    assert!(record.lookup("properties.certificate_error.message").is_unset());
}

#[test]
fn read_only_fields_are_stripped_on_request_encode() {
    let payload = json!({
        "id": "/x",
        "name": "cert",
        "location": "westus",
        "properties": {
            "certificateVirtualPath": "/etc/nginx/test.cert",
            "provisioningState": "Succeeded"
        }
    });
    let decoded = decode(&resource_schema(), &payload).unwrap();
    let encoded = decoded.value.to_request_json();
    assert_eq!(
        encoded,
        json!({
            "location": "westus",
            "properties": { "certificateVirtualPath": "/etc/nginx/test.cert" }
        })
    );
}

#[test]
fn re_decoding_an_encoded_record_keeps_unset_fields_unset() {
    let payload = json!({ "location": "westus", "tags": { "env": "prod" } });
    let first = decode(&resource_schema(), &payload).unwrap();
    let second = decode(&resource_schema(), &first.value.to_request_json()).unwrap();
    let (a, b) = (first.record().unwrap(), second.record().unwrap());
    for entry in a.entries() {
        if entry.read_only {
            continue;
        }
        assert_eq!(entry.slot.is_unset(), b.get(&entry.name).is_unset(), "{}", entry.name);
    }
    assert!(b.get("zones").is_unset());
}

#[test]
fn client_flatten_output_merges_properties() {
    let payload = json!({
        "id": "/x",
        "properties": { "provisioningState": "Succeeded" }
    });
    let decoded = decode(&resource_schema(), &payload).unwrap();
    assert_eq!(
        decoded.value.to_output_json(true),
        json!({ "id": "/x", "provisioningState": "Succeeded" })
    );
    assert_eq!(
        decoded.value.to_output_json(false),
        json!({ "id": "/x", "properties": { "provisioningState": "Succeeded" } })
    );
}

#[test]
fn optional_type_mismatch_keeps_raw_value() {
    let decoded = decode(&resource_schema(), &json!({ "location": 42 })).unwrap();
    let record = decoded.record().unwrap();
    assert_eq!(record.get("location"), &Slot::Set(Value::Raw(json!(42))));
    assert_eq!(decoded.diagnostics.len(), 1);
    assert!(decoded.diagnostics[0].starts_with("$.location"));
}

#[test]
fn required_type_mismatch_is_an_error() {
    let schema = ResponseSchema::object(vec![SchemaField::new("count", SchemaType::Integer).required()]);
    let err = decode(&schema, &json!({ "count": "three" })).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TypeMismatch {
            path: "$.count".into(),
            expected: "integer",
            found: "string",
        }
    );

    let err = decode(&schema, &json!({})).unwrap_err();
    assert_eq!(err, DecodeError::MissingField { path: "$.count".into() });
}

#[test]
fn deep_nesting_decodes_recursively() {
    let mut ty = SchemaType::String;
    let mut payload = json!("leaf");
    for depth in 0..64 {
        ty = SchemaType::object(vec![SchemaField::new(format!("n{depth}"), ty)]);
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(format!("n{depth}"), payload);
        payload = serde_json::Value::Object(wrapper);
    }
    let decoded = decode(&ResponseSchema::new(ty), &payload).unwrap();
    let path: Vec<String> = (0..64).rev().map(|d| format!("n{d}")).collect();
    assert_eq!(
        decoded.record().unwrap().lookup(&path.join(".")).value().and_then(Value::as_str),
        Some("leaf")
    );
}

#[test]
fn decode_bytes_handles_empty_and_schemaless_bodies() {
    assert_eq!(decode_bytes(Some(&resource_schema()), b"").unwrap().value, Value::Null);
    let raw = decode_bytes(None, br#"{"a":1}"#).unwrap();
    assert_eq!(raw.value, Value::Raw(json!({"a": 1})));
    assert!(matches!(
        decode_bytes(None, b"not json"),
        Err(DecodeError::InvalidJson(_))
    ));
}
