use serde::{Deserialize, Serialize};

/// The error returned by every fallible step of a print request: what was being done when it
/// failed, along with the message of the underlying failure when there is one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContextError {
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                lowercase_first_character(source_error.to_string()),
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for ContextError {}

impl ContextError {
    /// A failure detected by this crate itself, with nothing underneath it.
    pub fn with_context<S: Into<String>>(context: S) -> ContextError {
        ContextError {
            context: context.into(),
            source_error: None,
        }
    }

    /// A failure of a lower level operation, whose message is kept as the source.
    pub fn with_error<S: Into<String>>(context: S, error: &dyn std::error::Error) -> ContextError {
        ContextError {
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }

    /// A failure of an external program, whose standard error becomes the source when it is not blank.
    pub fn with_diagnostic<S: Into<String>>(context: S, diagnostic: &[u8]) -> ContextError {
        let diagnostic = String::from_utf8_lossy(diagnostic).trim().to_string();
        ContextError {
            context: context.into(),
            source_error: (!diagnostic.is_empty()).then_some(diagnostic),
        }
    }
}

/// Lowercases the first character, so that the source reads as the continuation of the context.
fn lowercase_first_character(string: String) -> String {
    let mut characters = string.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
