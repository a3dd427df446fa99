use std::sync::LazyLock;

use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

/// How a backend family nests error code/message in non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ErrorFormatSpec {
    Preset(ErrorFormatPreset),
    Custom(CustomErrorFormat),
}

impl Default for ErrorFormatSpec {
    fn default() -> Self {
        ErrorFormatSpec::Preset(ErrorFormatPreset::MgmtErrorFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorFormatPreset {
    MgmtErrorFormat,
    ODataV4Format,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomErrorFormat {
    pub code_path: String,
    pub message_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_path: Option<String>,
}

/// Compiled form of [`ErrorFormatSpec`]. Each slot holds candidate paths tried
/// in order; the first one that matches wins.
#[derive(Debug, Clone)]
pub struct ErrorFormat {
    code: Vec<JsonPath>,
    message: Vec<JsonPath>,
    target: Vec<JsonPath>,
    details: Vec<JsonPath>,
}

fn paths(exprs: &[&str]) -> Vec<JsonPath> {
    exprs
        .iter()
        .map(|e| JsonPath::parse(e).expect("valid json path"))
        .collect()
}

static MGMT: LazyLock<ErrorFormat> = LazyLock::new(|| ErrorFormat {
    code: paths(&["$.error.code", "$.code"]),
    message: paths(&["$.error.message", "$.message"]),
    target: paths(&["$.error.target", "$.target"]),
    details: paths(&["$.error.details", "$.details"]),
});

static ODATA_V4: LazyLock<ErrorFormat> = LazyLock::new(|| ErrorFormat {
    code: paths(&["$.error.code", "$['odata.error'].code", "$.code"]),
    message: paths(&[
        "$.error.message",
        "$['odata.error'].message.value",
        "$['odata.error'].message",
        "$.message",
    ]),
    target: paths(&["$.error.target", "$.target"]),
    details: paths(&["$.error.details", "$.details"]),
});

impl ErrorFormat {
    pub fn compile(spec: &ErrorFormatSpec) -> Result<Self, String> {
        match spec {
            ErrorFormatSpec::Preset(ErrorFormatPreset::MgmtErrorFormat) => Ok(MGMT.clone()),
            ErrorFormatSpec::Preset(ErrorFormatPreset::ODataV4Format) => Ok(ODATA_V4.clone()),
            ErrorFormatSpec::Custom(c) => {
                let one = |expr: &str| {
                    JsonPath::parse(expr).map_err(|e| format!("invalid JSONPath `{expr}`: {e}"))
                };
                Ok(Self {
                    code: vec![one(&c.code_path)?],
                    message: vec![one(&c.message_path)?],
                    target: c.target_path.as_deref().map(one).transpose()?.into_iter().collect(),
                    details: c.details_path.as_deref().map(one).transpose()?.into_iter().collect(),
                })
            }
        }
    }

    pub fn code<'a>(&self, body: &'a JsonValue) -> Option<&'a JsonValue> {
        first_match(&self.code, body)
    }

    pub fn message<'a>(&self, body: &'a JsonValue) -> Option<&'a JsonValue> {
        first_match(&self.message, body)
    }

    pub fn target<'a>(&self, body: &'a JsonValue) -> Option<&'a JsonValue> {
        first_match(&self.target, body)
    }

    pub fn details<'a>(&self, body: &'a JsonValue) -> Option<&'a JsonValue> {
        first_match(&self.details, body)
    }
}

impl Default for ErrorFormat {
    fn default() -> Self {
        MGMT.clone()
    }
}

fn first_match<'a>(candidates: &[JsonPath], body: &'a JsonValue) -> Option<&'a JsonValue> {
    candidates
        .iter()
        .find_map(|p| p.query(body).first().filter(|v| !v.is_null()))
}
