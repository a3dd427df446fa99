use serde_json::Value as JsonValue;

/// Where a request parameter ends up on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Body => "body",
        }
    }
}

impl std::fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }

    /// PUT and PATCH address the resource itself, so the original URL is
    /// where the resource lives after an async completion.
    pub fn targets_resource(&self) -> bool {
        matches!(self, HttpMethod::Put | HttpMethod::Patch)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of a single parameter value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Fixed at generation time (e.g. `api-version`).
    Literal(JsonValue),
    /// Caller-supplied argument, by logical name or dotted path.
    Arg(String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(flatten)]
    pub source: ValueSource,
    #[serde(default)]
    pub required: bool,
}

impl ParamSpec {
    pub fn literal(name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            name: name.into(),
            source: ValueSource::Literal(value.into()),
            required: true,
        }
    }

    pub fn arg(name: impl Into<String>, arg: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            source: ValueSource::Arg(arg.into()),
            required,
        }
    }
}

/// Source of a body value. Objects nest to any depth.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySource {
    Literal(JsonValue),
    Arg(String),
    Object(BodySchema),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyField {
    pub key: String,
    #[serde(flatten)]
    pub source: BodySource,
    #[serde(default)]
    pub required: bool,
}

/// Ordered mapping from output JSON key to value source.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BodySchema {
    pub fields: Vec<BodyField>,
}

impl BodySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, source: BodySource) -> Self {
        self.fields.push(BodyField {
            key: key.into(),
            source,
            required: false,
        });
        self
    }

    pub fn required_field(mut self, key: impl Into<String>, source: BodySource) -> Self {
        self.fields.push(BodyField {
            key: key.into(),
            source,
            required: true,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestTemplate {
    pub method: HttpMethod,
    /// Path pattern with `{name}` placeholders, e.g. `/subscriptions/{subscriptionId}/...`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url_params: Vec<ParamSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<ParamSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_params: Vec<ParamSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodySchema>,
}
