//! Headings
//!
//! Two concerns live here: recognizing which lines open a section, and deciding whether
//! a heading is the one a caller asked for. Both work on Unicode text; nothing assumes
//! ASCII headings (`## 任务列表` is as good a title as `## Task list`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::codeparser::config::{HeadingConfig, MatchingConfig};

static ATX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(#+)[ \t]*(.*?)[ \t]*$").unwrap());

static NUMBERED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\d+[.)、:：][ \t]*\S").unwrap());

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)(?:\D|$)").unwrap());

/// How a section was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeadingKind {
    /// `##`-style marker with the number of `#` characters
    Atx { level: usize },
    /// Bare numbered title such as `1. Task list`
    Numbered { number: usize },
    /// Text before the first heading
    Preamble,
}

/// Decides which lines are headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingRule {
    pub min_level: usize,
    pub numbered_titles: bool,
}

impl HeadingRule {
    pub fn from_config(config: &HeadingConfig) -> Self {
        Self {
            min_level: config.min_level.max(1),
            numbered_titles: config.numbered_titles,
        }
    }

    /// Returns the heading text and kind when `line` opens a section.
    pub fn classify<'a>(&self, line: &'a str) -> Option<(&'a str, HeadingKind)> {
        if let Some(caps) = ATX_HEADING.captures(line) {
            let level = caps.get(1).map_or(0, |m| m.len());
            let text = caps.get(2).map_or("", |m| m.as_str());
            if level >= self.min_level && !text.is_empty() {
                return Some((text, HeadingKind::Atx { level }));
            }
            return None;
        }
        if self.numbered_titles && NUMBERED_TITLE.is_match(line) {
            let text = line.trim();
            return heading_number(text).map(|number| (text, HeadingKind::Numbered { number }));
        }
        None
    }
}

impl Default for HeadingRule {
    fn default() -> Self {
        Self::from_config(&HeadingConfig::default())
    }
}

/// Leading number of a heading (`"2. Python package name"` → 2).
pub fn heading_number(text: &str) -> Option<usize> {
    LEADING_NUMBER
        .captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The "heading equals" predicate, plus the optional containment fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatcher {
    pub ignore_case: bool,
    pub substring_fallback: bool,
}

impl HeadingMatcher {
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            ignore_case: config.ignore_case,
            substring_fallback: config.substring_fallback,
        }
    }

    fn normalize(&self, text: &str) -> String {
        let text = text.trim().trim_end_matches([':', '：']).trim_end();
        if self.ignore_case {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    /// Whether `heading` names the section `wanted`.
    pub fn equals(&self, heading: &str, wanted: &str) -> bool {
        self.normalize(heading) == self.normalize(wanted)
    }

    /// Whether `heading` mentions `wanted`. An empty request mentions nothing.
    pub fn contains(&self, heading: &str, wanted: &str) -> bool {
        let wanted = self.normalize(wanted);
        !wanted.is_empty() && self.normalize(heading).contains(&wanted)
    }

    /// Index of the heading that answers `wanted`: the first equal one, else (when the
    /// fallback is on) the first one containing it.
    pub fn position<'a, I>(&self, headings: I, wanted: &str) -> Option<usize>
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let mut headings = headings.into_iter();
        if let Some(index) = headings.clone().position(|h| self.equals(h, wanted)) {
            return Some(index);
        }
        if self.substring_fallback {
            return headings.position(|h| self.contains(h, wanted));
        }
        None
    }
}

impl Default for HeadingMatcher {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}
