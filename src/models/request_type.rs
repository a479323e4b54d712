use std::fmt;

/// The method to invoke on a publisher model.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestType {
    /// A request to generate content.
    GenerateContent,
    /// A request to count the tokens of some content.
    CountTokens,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenerateContent => write!(f, "generateContent"),
            Self::CountTokens => write!(f, "countTokens"),
        }
    }
}
