use std::collections::BTreeMap;

use opshim_core::types::RequestTemplate;
use opshim_core::{Arguments, ResolvedRequest};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::http::{get_header_ci, HttpRequestParts};

const JSON: &str = "application/json";

/// Resolves the template and lays it onto the configured base URL.
pub fn build_request(
    config: &EngineConfig,
    template: &RequestTemplate,
    args: &Arguments,
) -> Result<HttpRequestParts, EngineError> {
    let resolved = template.resolve(args)?;
    to_parts(config, resolved)
}

pub fn to_parts(config: &EngineConfig, resolved: ResolvedRequest) -> Result<HttpRequestParts, EngineError> {
    let url = build_url(
        &config.base_url,
        &resolved.path_template,
        &resolved.path_params,
        &resolved.query,
    )?;

    let mut headers = BTreeMap::<String, String>::new();
    for (k, v) in &config.default_headers {
        set_header(&mut headers, k, v);
    }
    if get_header_ci(&headers, "content-type").is_none() && resolved.body.is_some() {
        set_header(&mut headers, "Content-Type", JSON);
    }
    if get_header_ci(&headers, "accept").is_none() {
        set_header(&mut headers, "Accept", JSON);
    }
    // Template headers come last so they override defaults.
    for (k, v) in &resolved.headers {
        set_header(&mut headers, k, v);
    }

    let body = resolved
        .body
        .as_ref()
        .map(|v| v.to_string().into_bytes())
        .unwrap_or_default();

    Ok(HttpRequestParts {
        method: resolved.method.as_str().to_string(),
        url,
        headers,
        body,
    })
}

/// GET against an absolute URL handed out by the server (status monitor,
/// `Location`, final resource).
pub fn get_request(config: &EngineConfig, url: url::Url) -> HttpRequestParts {
    let mut headers = BTreeMap::new();
    for (k, v) in &config.default_headers {
        set_header(&mut headers, k, v);
    }
    if get_header_ci(&headers, "accept").is_none() {
        set_header(&mut headers, "Accept", JSON);
    }
    HttpRequestParts {
        method: "GET".to_string(),
        url,
        headers,
        body: Vec::new(),
    }
}

fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

fn build_url(
    base_url: &str,
    path_template: &str,
    path_params: &BTreeMap<String, String>,
    query: &[(String, String)],
) -> Result<url::Url, EngineError> {
    if base_url.is_empty() {
        return Err(EngineError::InvalidUrl("missing base url".to_string()));
    }
    let mut path = path_template.to_string();
    for (k, v) in path_params {
        path = path.replace(&format!("{{{k}}}"), &urlencoding::encode(v));
    }
    let mut url = url::Url::parse(base_url).map_err(|e| EngineError::InvalidUrl(e.to_string()))?;
    let prefix = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{prefix}{path}"));
    if !query.is_empty() {
        let mut qp = url.query_pairs_mut();
        for (k, v) in query {
            qp.append_pair(k, v);
        }
    }
    Ok(url)
}
