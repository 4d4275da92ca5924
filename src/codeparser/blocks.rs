//! Block map
//!
//! Partitions a document into sections. Every line that is not a heading belongs to the
//! body of the nearest heading above it; non-blank text before the first heading forms a
//! preamble section keyed by the empty string.
//!
//! Headings are only recognized outside closed code fences, so a `## comment` inside a
//! Python block never splits the document. A fence that is never closed does not hide
//! the headings that follow it.
//!
//! Duplicate headings keep all their sections in [`Blocks::sections`]; map-style lookups
//! (`get`, `find`, `to_map`) resolve to the first one in document order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::ops::Range;

use crate::codeparser::fence::code_blocks;
use crate::codeparser::heading::{heading_number, HeadingKind, HeadingMatcher, HeadingRule};
use crate::codeparser::lines::lines;

/// A heading and the text it owns.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Section<'a> {
    /// Heading text without markers or surrounding whitespace
    pub heading: &'a str,
    #[serde(flatten)]
    pub kind: HeadingKind,
    /// Raw body, from the line after the heading up to the next heading
    pub body: &'a str,
    /// Byte range of the whole section, heading line included
    #[serde(skip)]
    pub span: Range<usize>,
}

impl<'a> Section<'a> {
    /// Body with surrounding whitespace removed.
    pub fn content(&self) -> &'a str {
        self.body.trim()
    }

    /// Leading number of the heading, if it has one.
    pub fn number(&self) -> Option<usize> {
        match self.kind {
            HeadingKind::Numbered { number } => Some(number),
            HeadingKind::Atx { .. } => heading_number(self.heading),
            HeadingKind::Preamble => None,
        }
    }
}

/// The sections of a document in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocks<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> Blocks<'a> {
    pub fn parse(source: &'a str, rule: &HeadingRule) -> Self {
        let fenced: Vec<Range<usize>> = code_blocks(source)
            .into_iter()
            .filter(|block| block.closed)
            .map(|block| block.span)
            .collect();

        let mut next_fence = 0;
        let mut headings = Vec::new();
        for line in lines(source) {
            while next_fence < fenced.len() && fenced[next_fence].end <= line.start {
                next_fence += 1;
            }
            if next_fence < fenced.len() && fenced[next_fence].start <= line.start {
                continue;
            }
            if let Some((text, kind)) = rule.classify(line.text) {
                headings.push((line, text, kind));
            }
        }

        let mut sections = Vec::with_capacity(headings.len() + 1);
        let first_start = headings.first().map_or(source.len(), |(line, _, _)| line.start);
        let preamble = &source[..first_start];
        if !preamble.trim().is_empty() {
            sections.push(Section {
                heading: "",
                kind: HeadingKind::Preamble,
                body: preamble,
                span: 0..first_start,
            });
        }

        for (i, (line, text, kind)) in headings.iter().enumerate() {
            let end = headings
                .get(i + 1)
                .map_or(source.len(), |(next, _, _)| next.start);
            sections.push(Section {
                heading: *text,
                kind: *kind,
                body: &source[line.end..end],
                span: line.start..end,
            });
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section<'a>> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Distinct headings in document order.
    pub fn keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            if !keys.contains(&section.heading) {
                keys.push(section.heading);
            }
        }
        keys
    }

    /// Whether a heading with exactly this text exists.
    pub fn contains_key(&self, heading: &str) -> bool {
        self.sections.iter().any(|s| s.heading == heading)
    }

    /// Trimmed body of the first section whose heading is exactly `heading`.
    pub fn get(&self, heading: &str) -> Option<&'a str> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)
            .map(Section::content)
    }

    /// Section answering `wanted` under the matcher's rules.
    pub fn find(&self, matcher: &HeadingMatcher, wanted: &str) -> Option<&Section<'a>> {
        let index = matcher.position(self.sections.iter().map(|s| s.heading), wanted)?;
        self.sections.get(index)
    }

    /// First section whose heading is numbered `index`.
    pub fn numbered(&self, index: usize) -> Option<&Section<'a>> {
        self.sections.iter().find(|s| s.number() == Some(index))
    }

    /// Heading → trimmed body; the first of duplicate headings wins.
    pub fn to_map(&self) -> HashMap<&'a str, &'a str> {
        let mut map = HashMap::with_capacity(self.sections.len());
        for section in &self.sections {
            map.entry(section.heading).or_insert_with(|| section.content());
        }
        map
    }
}

impl<'a, 'b> IntoIterator for &'b Blocks<'a> {
    type Item = &'b Section<'a>;
    type IntoIter = std::slice::Iter<'b, Section<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

/// Serialized as an ordered heading → body map.
impl Serialize for Blocks<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = self.keys();
        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            map.serialize_entry(key, self.get(key).unwrap_or_default())?;
        }
        map.end()
    }
}
