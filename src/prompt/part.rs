use std::path::Path;

use crate::models::Part;

/// One unit of prompt content, in the order it was added to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    /// Image content read from a local file.
    ImageBytes {
        /// Image format derived from the file extension ("png", "jpeg", ...)
        format: String,
        /// The image bytes
        bytes: Vec<u8>,
    },
    /// Content the model service fetches itself, such as a `gs://` object.
    RemoteReference {
        /// MIME type, if one was given or could be inferred from the URI
        mime_type: Option<String>,
        /// The URI, passed through unchanged
        uri: String,
    },
    /// Content held by the caller, e.g. downloaded from a URL.
    Blob {
        /// The declared MIME type
        mime_type: String,
        /// The content bytes
        bytes: Vec<u8>,
    },
    /// A literal text fragment.
    Text {
        /// The text
        content: String,
    },
}

impl PromptPart {
    /// Short name of the variant, for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ImageBytes { .. } => "image",
            Self::RemoteReference { .. } => "remote reference",
            Self::Blob { .. } => "blob",
            Self::Text { .. } => "text",
        }
    }
}

impl From<&PromptPart> for Part {
    fn from(part: &PromptPart) -> Self {
        match part {
            PromptPart::ImageBytes { format, bytes } => {
                Part::inline_data(format!("image/{}", format), bytes)
            }
            PromptPart::RemoteReference { mime_type, uri } => {
                Part::file_data(mime_type.clone(), uri.clone())
            }
            PromptPart::Blob { mime_type, bytes } => Part::inline_data(mime_type.clone(), bytes),
            PromptPart::Text { content } => Part::text(content.clone()),
        }
    }
}

/// The image format hint for `path`: its extension as written, with "jpg" spelled "jpeg".
pub(crate) fn image_format(path: &Path) -> String {
    match path.extension().map(|ext| ext.to_string_lossy()) {
        Some(ext) if ext == "jpg" => "jpeg".to_string(),
        Some(ext) => ext.into_owned(),
        None => String::new(),
    }
}

/// The MIME type registered for the extension of `uri`, if any.
pub(crate) fn mime_from_uri(uri: &str) -> Option<String> {
    mime_guess::from_path(uri).first_raw().map(str::to_owned)
}
