use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::args::Arguments;
use crate::error::BuildError;
use crate::types::{BodySchema, BodySource, HttpMethod, ParamLocation, ParamSpec, RequestTemplate, ValueSource};

/// A request template with every parameter resolved, still independent of
/// the base URL and transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub path_template: String,
    pub path_params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<JsonValue>,
}

impl RequestTemplate {
    pub fn resolve(&self, args: &Arguments) -> Result<ResolvedRequest, BuildError> {
        let mut path_params = BTreeMap::new();
        for p in &self.url_params {
            if let Some(v) = resolve_param(p, ParamLocation::Path, args)? {
                path_params.insert(p.name.clone(), v);
            }
        }
        // A placeholder with no parameter declared for it can never be filled.
        for name in crate::validate::placeholders(&self.path) {
            if !path_params.contains_key(&name) {
                return Err(BuildError::MissingRequiredParameter {
                    location: ParamLocation::Path,
                    name,
                });
            }
        }

        let mut query = Vec::new();
        for p in &self.query_params {
            if let Some(v) = resolve_param(p, ParamLocation::Query, args)? {
                query.push((p.name.clone(), v));
            }
        }

        let mut headers = BTreeMap::new();
        for p in &self.header_params {
            if let Some(v) = resolve_param(p, ParamLocation::Header, args)? {
                headers.insert(p.name.clone(), v);
            }
        }

        let body = match &self.body {
            Some(schema) => Some(build_body(schema, args)?),
            None => None,
        };

        Ok(ResolvedRequest {
            method: self.method,
            path_template: self.path.clone(),
            path_params,
            query,
            headers,
            body,
        })
    }
}

fn resolve_param(
    p: &ParamSpec,
    location: ParamLocation,
    args: &Arguments,
) -> Result<Option<String>, BuildError> {
    let value = match &p.source {
        ValueSource::Literal(v) => (!v.is_null()).then_some(v),
        ValueSource::Arg(name) => args.resolve(name),
    };
    match value {
        Some(v) => param_to_string(v).map(Some).map_err(|reason| BuildError::InvalidParameterValue {
            location,
            name: p.name.clone(),
            reason,
        }),
        None if p.required => Err(BuildError::MissingRequiredParameter {
            location,
            name: p.name.clone(),
        }),
        None => Ok(None),
    }
}

fn param_to_string(v: &JsonValue) -> Result<String, String> {
    match v {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Array(items) => items
            .iter()
            .map(|i| match i {
                JsonValue::Array(_) | JsonValue::Object(_) | JsonValue::Null => {
                    Err("nested values cannot be serialized into a parameter".to_string())
                }
                other => param_to_string(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.join(",")),
        JsonValue::Object(_) => Err("objects cannot be serialized into a parameter".to_string()),
        JsonValue::Null => Err("null".to_string()),
    }
}

/// Builds the request body, omitting every key whose value resolves to
/// nothing. The root object is always produced, even when empty.
pub fn build_body(schema: &BodySchema, args: &Arguments) -> Result<JsonValue, BuildError> {
    Ok(JsonValue::Object(build_object(schema, args, "")?))
}

fn build_object(
    schema: &BodySchema,
    args: &Arguments,
    prefix: &str,
) -> Result<Map<String, JsonValue>, BuildError> {
    let mut out = Map::new();
    for field in &schema.fields {
        let path = if prefix.is_empty() {
            field.key.clone()
        } else {
            format!("{prefix}.{}", field.key)
        };
        let value = match &field.source {
            BodySource::Literal(v) => (!v.is_null()).then(|| v.clone()),
            BodySource::Arg(name) => args.resolve(name).cloned(),
            BodySource::Object(nested) => {
                let obj = build_object(nested, args, &path)?;
                // Required objects are sent even when every key was omitted.
                (!obj.is_empty() || field.required).then_some(JsonValue::Object(obj))
            }
        };
        match value {
            Some(v) => {
                out.insert(field.key.clone(), v);
            }
            None if field.required => {
                return Err(BuildError::MissingRequiredParameter {
                    location: ParamLocation::Body,
                    name: path,
                })
            }
            None => {}
        }
    }
    Ok(out)
}
