//! Common part model used in both requests and responses.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// A single part of a content object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A text part containing a string value
    Text {
        /// The text content of the part
        text: String,
    },
    /// A part containing inline data
    InlineData {
        /// The inline data content of the part
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// A part referencing data the service fetches itself
    FileData {
        /// The file reference of the part
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
    /// Any other part kind returned by the service (function calls, code execution, ...)
    Other(serde_json::Value),
}

/// A part containing inline data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// The MIME type of the inline data
    pub mime_type: String,
    /// The base64 encoded data
    pub data: String,
}

/// A reference to data stored outside of the request, e.g. in Cloud Storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// The MIME type of the referenced data, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// The URI of the referenced data
    pub file_uri: String,
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an inline data part, base64 encoding the given bytes.
    pub fn inline_data(mime_type: impl Into<String>, data: impl AsRef<[u8]>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: STANDARD.encode(data),
            },
        }
    }

    /// Creates a file data part pointing at `file_uri`.
    pub fn file_data(mime_type: Option<String>, file_uri: impl Into<String>) -> Self {
        Self::FileData {
            file_data: FileData {
                mime_type,
                file_uri: file_uri.into(),
            },
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text } => f.write_str(text),
            Self::InlineData { inline_data } => {
                let len = STANDARD
                    .decode(&inline_data.data)
                    .map(|bytes| bytes.len())
                    .unwrap_or(inline_data.data.len());
                write!(f, "{} ({} bytes)", inline_data.mime_type, len)
            }
            Self::FileData { file_data } => f.write_str(&file_data.file_uri),
            Self::Other(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_keys() {
        let part = Part::inline_data("image/png", [1u8, 2, 3]);
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({ "inlineData": { "mimeType": "image/png", "data": "AQID" } })
        );

        let part = Part::file_data(None, "gs://bucket/object");
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({ "fileData": { "fileUri": "gs://bucket/object" } })
        );
    }

    #[test]
    fn unknown_parts_fall_through_to_other() {
        let part: Part =
            serde_json::from_value(json!({ "functionCall": { "name": "lookup" } })).unwrap();
        assert!(matches!(part, Part::Other(_)));
        assert_eq!(part.to_string(), r#"{"functionCall":{"name":"lookup"}}"#);
    }

    #[test]
    fn display_renders_each_kind() {
        assert_eq!(Part::text("hello").to_string(), "hello");
        assert_eq!(
            Part::inline_data("image/jpeg", vec![0u8; 10]).to_string(),
            "image/jpeg (10 bytes)"
        );
        assert_eq!(
            Part::file_data(Some("image/jpeg".into()), "gs://a/b.jpg").to_string(),
            "gs://a/b.jpg"
        );
    }
}
