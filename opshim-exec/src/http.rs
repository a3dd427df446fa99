use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpRequestParts {
    pub method: String,
    pub url: url::Url,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpResponseParts {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponseParts {
    pub fn header(&self, name: &str) -> Option<&str> {
        get_header_ci(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("response too large (>{max_bytes} bytes)")]
    ResponseTooLarge { max_bytes: usize },
    #[error("http error: {0}")]
    Other(String),
}

/// Sends a prepared request. Connection-level retries, if any, belong to the
/// implementation; the engine never retries a request itself.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(
        &self,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError>;
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else if e.is_connect() || e.is_request() {
            HttpError::Network(e.to_string())
        } else {
            HttpError::Other(e.to_string())
        }
    }
}

/// [`HttpClient`] over reqwest. Redirects are never followed: a 3xx on a poll
/// is the server's answer.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn try_default() -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("opshim-exec/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        let method = reqwest::Method::from_bytes(req.method.as_bytes())
            .map_err(|_| HttpError::Other(format!("invalid method `{}`", req.method)))?;
        let mut builder = req
            .headers
            .iter()
            .fold(self.client.request(method, req.url).timeout(timeout), |b, (k, v)| {
                b.header(k.as_str(), v.as_str())
            });
        if !req.body.is_empty() {
            builder = builder.body(req.body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let headers = response_headers(resp.headers());
        let body = read_capped(resp, max_response_bytes).await?;
        Ok(HttpResponseParts {
            status,
            headers,
            body,
        })
    }
}

// Non-UTF-8 header values are dropped.
fn response_headers(map: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
        .collect()
}

// Declared length is checked before reading so an oversized body is never buffered.
async fn read_capped(resp: reqwest::Response, max_bytes: usize) -> Result<Vec<u8>, HttpError> {
    let too_large = HttpError::ResponseTooLarge { max_bytes };
    if resp.content_length().is_some_and(|len| len > max_bytes as u64) {
        return Err(too_large);
    }
    let body = resp.bytes().await?;
    if body.len() > max_bytes {
        return Err(too_large);
    }
    Ok(body.to_vec())
}

pub fn get_header_ci<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
