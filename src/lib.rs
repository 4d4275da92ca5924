//! # codeparser
//!
//! Structured-text extraction for LLM responses.
//!
//! Agents that talk to a language model ask for Markdown-ish answers: a handful of `##`
//! sections, fenced code blocks, and list literals such as a task list of file paths.
//! This crate turns such a response into structured artifacts without ever touching the
//! model, the filesystem or a process.
//!
//! File Layout
//!
//! src/codeparser
//!   ├── lines       Line iteration with byte offsets
//!   ├── fence       Fenced code block scanning
//!   ├── heading     Heading recognition and the heading-equals predicate
//!   ├── blocks      Section partitioning (the block map)
//!   ├── literal     List literal tokens and grammar
//!   ├── parser      The `CodeParser` facade tying the above together
//!   ├── config      Layered configuration
//!   └── error       Error taxonomy
//!
//! The free functions re-exported here run with the default configuration; build a
//! [`CodeParser`] from a loaded [`ExtractorConfig`] to change heading or fallback rules.

pub mod codeparser;

pub use codeparser::blocks::{Blocks, Section};
pub use codeparser::config::{load_defaults, ExtractorConfig, Loader};
pub use codeparser::error::ExtractError;
pub use codeparser::fence::{code_blocks, extract_code_block, CodeBlock};
pub use codeparser::heading::HeadingKind;
pub use codeparser::literal::{ListLiteral, ListSyntax, Literal};
pub use codeparser::parser::CodeParser;
pub use codeparser::{
    parse_block, parse_blocks, parse_code, parse_file_list, parse_list_literal, parse_str,
};
