use opshim_core::types::{BodySchema, BodySource, HttpMethod, ParamLocation, ParamSpec, RequestTemplate};
use opshim_core::{build_body, Arguments, BuildError};
use serde_json::json;

fn certificate_body() -> BodySchema {
    BodySchema::new()
        .field("location", BodySource::Arg("location".into()))
        .field(
            "properties",
            BodySource::Object(
                BodySchema::new()
                    .field("certificateVirtualPath", BodySource::Arg("certificate_path".into()))
                    .field("keyVaultSecretId", BodySource::Arg("key_vault_secret_id".into()))
                    .field("keyVirtualPath", BodySource::Arg("key_path".into())),
            ),
        )
}

fn template() -> RequestTemplate {
    RequestTemplate {
        method: HttpMethod::Put,
        path: "/deployments/{deploymentName}/certificates/{certificateName}".into(),
        url_params: vec![
            ParamSpec::arg("deploymentName", "deployment_name", true),
            ParamSpec::arg("certificateName", "certificate_name", true),
        ],
        query_params: vec![
            ParamSpec::literal("api-version", "2024-06-01-preview"),
            ParamSpec::arg("$filter", "filter", false),
        ],
        header_params: vec![ParamSpec::arg("x-ms-client-request-id", "request_id", false)],
        body: Some(certificate_body()),
    }
}

#[test]
fn unset_keys_are_omitted_from_body() {
    let args = Arguments::new()
        .with("certificate_path", "/etc/nginx/test.cert")
        .with("key_path", serde_json::Value::Null);
    let body = build_body(&certificate_body(), &args).unwrap();
    assert_eq!(
        body,
        json!({ "properties": { "certificateVirtualPath": "/etc/nginx/test.cert" } })
    );
}

#[test]
fn nested_object_with_no_values_is_omitted() {
    let args = Arguments::new().with("location", "westus");
    let body = build_body(&certificate_body(), &args).unwrap();
    assert_eq!(body, json!({ "location": "westus" }));
}

#[test]
fn empty_arguments_give_empty_root_object() {
    let body = build_body(&certificate_body(), &Arguments::new()).unwrap();
    assert_eq!(body, json!({}));
}

#[test]
fn required_body_key_without_value_fails() {
    let schema = BodySchema::new().required_field(
        "properties",
        BodySource::Object(BodySchema::new().required_field("name", BodySource::Arg("name".into()))),
    );
    let err = build_body(&schema, &Arguments::new()).unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingRequiredParameter {
            location: ParamLocation::Body,
            name: "properties.name".into(),
        }
    );
}

#[test]
fn literals_and_dotted_argument_paths_resolve() {
    let schema = BodySchema::new()
        .field("kind", BodySource::Literal(json!("Certificate")))
        .field("env", BodySource::Arg("tags.env".into()));
    let args = Arguments::new().with("tags", json!({ "env": "prod" }));
    assert_eq!(
        build_body(&schema, &args).unwrap(),
        json!({ "kind": "Certificate", "env": "prod" })
    );
}

#[test]
fn template_resolves_path_query_and_headers() {
    let args = Arguments::new()
        .with("deployment_name", "myDeployment")
        .with("certificate_name", "myCertificate")
        .with("location", "westus");
    let resolved = template().resolve(&args).unwrap();
    assert_eq!(resolved.path_params["deploymentName"], "myDeployment");
    assert_eq!(resolved.path_params["certificateName"], "myCertificate");
    assert_eq!(
        resolved.query,
        vec![("api-version".to_string(), "2024-06-01-preview".to_string())]
    );
    assert!(resolved.headers.is_empty());
    assert_eq!(resolved.body, Some(json!({ "location": "westus" })));
}

#[test]
fn template_missing_required_placeholder_fails() {
    let args = Arguments::new().with("deployment_name", "myDeployment");
    let err = template().resolve(&args).unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingRequiredParameter {
            location: ParamLocation::Path,
            name: "certificateName".into(),
        }
    );
}

#[test]
fn object_argument_cannot_fill_a_query_parameter() {
    let args = Arguments::new()
        .with("deployment_name", "d")
        .with("certificate_name", "c")
        .with("filter", json!({ "a": 1 }));
    let err = template().resolve(&args).unwrap_err();
    assert!(matches!(
        err,
        BuildError::InvalidParameterValue { location: ParamLocation::Query, .. }
    ));
}

#[test]
fn array_arguments_join_with_commas() {
    let args = Arguments::new()
        .with("deployment_name", "d")
        .with("certificate_name", "c")
        .with("filter", json!(["a", 1, true]));
    let resolved = template().resolve(&args).unwrap();
    assert_eq!(resolved.query[1], ("$filter".to_string(), "a,1,true".to_string()));
}
