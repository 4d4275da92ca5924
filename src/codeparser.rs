//! Main module for codeparser functionality
//!
//! The free functions below are the everyday entry points. They share one lazily built
//! [`CodeParser`](parser::CodeParser) with the default configuration, so they are cheap
//! to call from many threads at once.
//!
//! Extraction Flow
//!
//!     document ──▶ blocks (headings outside code fences) ──▶ matched section
//!                                                              │
//!                       ┌──────────────────────────────────────┤
//!                       ▼                                      ▼
//!                 fenced code block                     list literal
//!                 (parse_code, parse_str)               (parse_file_list)
//!
//! Every result that is a piece of the input is handed back as a slice of it.

pub mod blocks;
pub mod config;
pub mod error;
pub mod fence;
pub mod heading;
pub mod lines;
pub mod literal;
pub mod parser;

use once_cell::sync::Lazy;

use blocks::Blocks;
use error::ExtractError;
use literal::ListLiteral;
use parser::CodeParser;

static DEFAULT_PARSER: Lazy<CodeParser> = Lazy::new(CodeParser::default);

/// Partition `document` into sections keyed by heading.
pub fn parse_blocks(document: &str) -> Blocks<'_> {
    DEFAULT_PARSER.parse_blocks(document)
}

/// Trimmed body of the section matching `heading`.
pub fn parse_block<'a>(heading: &str, document: &'a str) -> Result<&'a str, ExtractError> {
    DEFAULT_PARSER.parse_block(heading, document)
}

/// Verbatim fenced code of the section matching `heading`.
pub fn parse_code<'a>(
    heading: &str,
    document: &'a str,
    lang: Option<&str>,
) -> Result<&'a str, ExtractError> {
    DEFAULT_PARSER.parse_code(heading, document, lang)
}

/// Single value held by the section numbered `index` (1-based).
pub fn parse_str(index: usize, document: &str) -> Result<&str, ExtractError> {
    DEFAULT_PARSER.parse_str(index, document)
}

/// Entries of the list literal in the section matching `heading`.
pub fn parse_file_list(
    heading: &str,
    document: &str,
    lang: Option<&str>,
) -> Result<Vec<String>, ExtractError> {
    DEFAULT_PARSER.parse_file_list(heading, document, lang)
}

/// Structured list literal in the section matching `heading`.
pub fn parse_list_literal<'a>(
    heading: &str,
    document: &'a str,
    lang: Option<&str>,
) -> Result<ListLiteral<'a>, ExtractError> {
    DEFAULT_PARSER.parse_list_literal(heading, document, lang)
}
