//! Error types for extraction operations

use thiserror::Error;

/// Distinguishable miss conditions reported by the extractor.
///
/// None of these are fatal; callers decide whether to retry the model, skip the
/// artifact or escalate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No heading matches the requested name
    #[error("no section matches heading '{heading}'")]
    SectionNotFound { heading: String },

    /// The section exists but holds no recognizable list literal
    #[error("section '{heading}' contains no list literal")]
    NoListLiteralFound { heading: String },

    /// No heading carries the requested number
    #[error("no section numbered {index}")]
    NotFound { index: usize },

    /// The section has neither a fenced block nor usable body text
    #[error("section '{heading}' contains no code")]
    NoCodeFound { heading: String },
}

impl ExtractError {
    pub(crate) fn section_not_found(heading: &str) -> Self {
        ExtractError::SectionNotFound {
            heading: heading.to_string(),
        }
    }

    pub(crate) fn no_list_literal(heading: &str) -> Self {
        ExtractError::NoListLiteralFound {
            heading: heading.to_string(),
        }
    }

    pub(crate) fn no_code(heading: &str) -> Self {
        ExtractError::NoCodeFound {
            heading: heading.to_string(),
        }
    }
}
