use crate::error::ParseError;
use crate::types::DefinitionsDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedDefinitions {
    pub document: DefinitionsDocument,
    pub format: DocumentFormat,
}

pub fn parse_definitions_str(
    input: &str,
    format: DocumentFormat,
) -> Result<ParsedDefinitions, ParseError> {
    match format {
        DocumentFormat::Json => Ok(ParsedDefinitions {
            document: serde_json::from_str::<DefinitionsDocument>(input)?,
            format,
        }),
        DocumentFormat::Yaml => Ok(ParsedDefinitions {
            document: serde_yaml::from_str::<DefinitionsDocument>(input)?,
            format,
        }),
        DocumentFormat::Auto => parse_definitions_auto(input),
    }
}

fn parse_definitions_auto(input: &str) -> Result<ParsedDefinitions, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::UnknownFormat);
    }

    // JSON always starts with `{` or `[` after trimming.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<DefinitionsDocument>(input) {
            Ok(document) => Ok(ParsedDefinitions {
                document,
                format: DocumentFormat::Json,
            }),
            // Flow-style YAML also starts with `{`.
            Err(e) => serde_yaml::from_str::<DefinitionsDocument>(input)
                .map(|document| ParsedDefinitions {
                    document,
                    format: DocumentFormat::Yaml,
                })
                .map_err(|_| ParseError::Json(e)),
        };
    }

    match serde_yaml::from_str::<DefinitionsDocument>(input) {
        Ok(document) => Ok(ParsedDefinitions {
            document,
            format: DocumentFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(document) = serde_json::from_str::<DefinitionsDocument>(input) {
                return Ok(ParsedDefinitions {
                    document,
                    format: DocumentFormat::Json,
                });
            }
            Err(ParseError::Yaml(e))
        }
    }
}
