//! Configured extractor
//!
//! [`CodeParser`] owns an [`ExtractorConfig`] and the heading rule and matcher derived
//! from it. It holds no per-document state: every call scans the document it is given
//! and returns slices of it, so one instance can serve any number of threads.

use tracing::{debug, warn};

use crate::codeparser::blocks::{Blocks, Section};
use crate::codeparser::config::ExtractorConfig;
use crate::codeparser::error::ExtractError;
use crate::codeparser::fence::find_code_block;
use crate::codeparser::heading::{HeadingMatcher, HeadingRule};
use crate::codeparser::literal::{find_list_literal, ListLiteral, ListSyntax};

#[derive(Debug, Clone)]
pub struct CodeParser {
    config: ExtractorConfig,
    rule: HeadingRule,
    matcher: HeadingMatcher,
}

impl CodeParser {
    pub fn new(config: ExtractorConfig) -> Self {
        let rule = HeadingRule::from_config(&config.headings);
        let matcher = HeadingMatcher::from_config(&config.matching);
        Self {
            config,
            rule,
            matcher,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Partition `document` into sections keyed by heading.
    pub fn parse_blocks<'a>(&self, document: &'a str) -> Blocks<'a> {
        Blocks::parse(document, &self.rule)
    }

    fn section<'a>(&self, heading: &str, document: &'a str) -> Result<Section<'a>, ExtractError> {
        let blocks = self.parse_blocks(document);
        match blocks.find(&self.matcher, heading) {
            Some(section) => {
                debug!(requested = heading, found = section.heading, "section matched");
                Ok(section.clone())
            }
            None => {
                debug!(requested = heading, headings = ?blocks.keys(), "no matching section");
                Err(ExtractError::section_not_found(heading))
            }
        }
    }

    /// Trimmed body of the section matching `heading`.
    pub fn parse_block<'a>(&self, heading: &str, document: &'a str) -> Result<&'a str, ExtractError> {
        self.section(heading, document).map(|section| section.content())
    }

    /// Verbatim fenced code of the section matching `heading`.
    ///
    /// The block tagged `lang` is preferred, then the first block. A section without
    /// any fence yields its trimmed body unless `code.fallback_to_body` is off.
    pub fn parse_code<'a>(
        &self,
        heading: &str,
        document: &'a str,
        lang: Option<&str>,
    ) -> Result<&'a str, ExtractError> {
        let section = self.section(heading, document)?;
        self.section_code(&section, lang)
            .ok_or_else(|| ExtractError::no_code(heading))
    }

    fn section_code<'a>(&self, section: &Section<'a>, lang: Option<&str>) -> Option<&'a str> {
        if let Some(block) = find_code_block(section.body, lang) {
            return Some(block.content);
        }
        let body = section.content();
        if body.is_empty() || !self.config.code.fallback_to_body {
            return None;
        }
        warn!(heading = section.heading, "no fenced block in section, using its body as code");
        Some(body)
    }

    /// Single value held by the section numbered `index`.
    ///
    /// The section's code is reduced to the text after its last `=`, trimmed, with
    /// surrounding single and then double quotes removed, so `a`, `"a"` and
    /// `name = 'a'` all yield `a`.
    pub fn parse_str<'a>(&self, index: usize, document: &'a str) -> Result<&'a str, ExtractError> {
        let blocks = self.parse_blocks(document);
        let section = blocks
            .numbered(index)
            .ok_or(ExtractError::NotFound { index })?;
        let code = self.section_code(section, None).unwrap_or_default();
        let value = code.rsplit('=').next().unwrap_or(code).trim();
        Ok(value.trim_matches('\'').trim_matches('"'))
    }

    /// Structured list literal in the section matching `heading`.
    ///
    /// The section's code block is searched first, then its whole body.
    pub fn parse_list_literal<'a>(
        &self,
        heading: &str,
        document: &'a str,
        lang: Option<&str>,
    ) -> Result<ListLiteral<'a>, ExtractError> {
        let section = self.section(heading, document)?;
        let syntax = ListSyntax::from_lang(lang);

        if let Some(block) = find_code_block(section.body, lang) {
            if let Some(list) = find_list_literal(block.content, syntax) {
                return Ok(list);
            }
            debug!(heading, "no list literal in code block, searching the section body");
        }
        find_list_literal(section.body, syntax).ok_or_else(|| ExtractError::no_list_literal(heading))
    }

    /// Entries of the list literal in the section matching `heading`, in source order.
    pub fn parse_file_list(
        &self,
        heading: &str,
        document: &str,
        lang: Option<&str>,
    ) -> Result<Vec<String>, ExtractError> {
        self.parse_list_literal(heading, document, lang)
            .map(|list| list.strings())
    }
}

impl Default for CodeParser {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
