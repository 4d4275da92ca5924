//! List Literals
//!
//! Locates a bracketed, comma-separated list inside source-like text and decodes it.
//!
//! Pipeline:
//!     1. Tokenization with logos ([token])
//!     2. Comment stripping, as allowed by the [`ListSyntax`]
//!     3. Candidate selection among the `[` tokens
//!     4. Parsing from the candidate with the chumsky grammar ([grammar])
//!     5. Conversion of byte ranges into borrowed values and decoded strings
//!
//! Candidate Selection
//!
//!     A response may hold several bracketed spans: type annotations (`List[str]`),
//!     indexing, markdown links. Candidates are tried in three passes and the first
//!     successful parse wins:
//!
//!     - `[` right after an assignment (`=`, `:=`, or `= vec!`)
//!     - `[` not glued to a preceding value (not a subscript)
//!     - any `[`
//!
//!     Brackets are paired in one pass first. A candidate is only parsed over the
//!     tokens up to its own `]`, at most once across all passes, and skipped when it
//!     never closes or nests deeper than [`MAX_NESTING`]. A failed attempt moves on to
//!     the next `[`, so nested lists inside a broken outer one are still found. At
//!     most [`MAX_NESTING`] attempts cover any one token, which keeps the search
//!     linear in the input.

pub mod grammar;
pub mod token;

use chumsky::Parser;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Cow;
use std::ops::Range;
use tracing::{debug, warn};

use crate::codeparser::fence::canonical_lang;
use grammar::{EntryWithSpans, ListWithSpans, TokenSpan};
use token::{tokenize, Token};

/// Deepest bracket nesting inside a candidate list the grammar will attempt.
pub const MAX_NESTING: usize = 32;

/// Which list-literal conventions to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSyntax {
    /// `'`/`"` strings, `#` comments
    Python,
    /// `"` strings only, no comments
    Json,
    /// `'`/`"` strings, `//` and `/* */` comments
    CLike,
    /// Everything above
    #[default]
    Any,
}

impl ListSyntax {
    /// Syntax implied by a language hint; unknown or missing hints accept everything.
    pub fn from_lang(lang: Option<&str>) -> Self {
        let Some(lang) = lang else {
            return ListSyntax::Any;
        };
        match canonical_lang(lang).as_str() {
            "python" => ListSyntax::Python,
            "json" => ListSyntax::Json,
            "javascript" | "typescript" | "rust" | "go" | "java" | "c" | "cpp" | "csharp"
            | "kotlin" | "swift" | "scala" => ListSyntax::CLike,
            _ => ListSyntax::Any,
        }
    }

    pub(crate) fn accepts_string(self, token: Token) -> bool {
        match token {
            Token::DoubleQuoted => true,
            Token::SingleQuoted => self != ListSyntax::Json,
            _ => false,
        }
    }

    fn skips(self, token: Token) -> bool {
        match token {
            Token::HashComment => matches!(self, ListSyntax::Python | ListSyntax::Any),
            Token::LineComment | Token::BlockComment => {
                matches!(self, ListSyntax::CLike | ListSyntax::Any)
            }
            _ => false,
        }
    }
}

/// An entry of a list literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal<'a> {
    /// Quoted string with quotes removed and escapes decoded
    Str(Cow<'a, str>),
    /// Nested list
    List(ListLiteral<'a>),
    /// Anything else (numbers, names, tuples, dicts), verbatim
    Raw(&'a str),
}

impl<'a> Literal<'a> {
    /// Plain-text form: the decoded string, or the verbatim source otherwise.
    pub fn as_text(&self) -> Cow<'a, str> {
        match self {
            Literal::Str(value) => value.clone(),
            Literal::List(list) => Cow::Borrowed(list.source),
            Literal::Raw(raw) => Cow::Borrowed(raw),
        }
    }
}

impl Serialize for Literal<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Str(value) => serializer.serialize_str(value),
            Literal::List(list) => list.serialize(serializer),
            Literal::Raw(raw) => serializer.serialize_str(raw),
        }
    }
}

/// A decoded list literal and the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLiteral<'a> {
    pub items: Vec<Literal<'a>>,
    /// Verbatim text from `[` to `]`
    pub source: &'a str,
    /// Byte range of `source` within the scanned text
    pub span: Range<usize>,
}

impl<'a> ListLiteral<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Literal<'a>> {
        self.items.iter()
    }

    /// Entries as owned strings, in source order.
    pub fn strings(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.as_text().into_owned())
            .collect()
    }
}

impl Serialize for ListLiteral<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

/// Find and decode the preferred list literal in `source`.
pub fn find_list_literal(source: &str, syntax: ListSyntax) -> Option<ListLiteral<'_>> {
    let tokens: Vec<TokenSpan> = tokenize(source)
        .into_iter()
        .filter(|(t, _)| !syntax.skips(*t))
        .collect();

    let mut scan = Scan::new(source, &tokens, syntax);
    for pass in [Candidate::Assigned, Candidate::Standalone, Candidate::Any] {
        if let Some(list) = scan.run(pass) {
            debug!(?pass, span = ?list.span, "list literal found");
            return Some(convert_list(source, list));
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Assigned,
    Standalone,
    Any,
}

impl Candidate {
    fn admits(self, source: &str, tokens: &[TokenSpan], index: usize) -> bool {
        match self {
            Candidate::Assigned => is_assigned(source, tokens, index),
            Candidate::Standalone => !is_subscript(tokens, index),
            Candidate::Any => true,
        }
    }
}

fn bare_text<'s>(source: &'s str, tokens: &[TokenSpan], index: usize) -> Option<&'s str> {
    match tokens.get(index) {
        Some((Token::Bare, span)) => Some(&source[span.clone()]),
        _ => None,
    }
}

fn is_assigned(source: &str, tokens: &[TokenSpan], index: usize) -> bool {
    let Some(prev) = index.checked_sub(1) else {
        return false;
    };
    match bare_text(source, tokens, prev) {
        Some(text) if text.ends_with('=') => true,
        Some(text) if text.ends_with('!') => prev
            .checked_sub(1)
            .and_then(|before| bare_text(source, tokens, before))
            .is_some_and(|text| text.ends_with('=')),
        _ => false,
    }
}

fn is_subscript(tokens: &[TokenSpan], index: usize) -> bool {
    let Some(prev) = index.checked_sub(1) else {
        return false;
    };
    let (prev_token, prev_span) = &tokens[prev];
    let glued = prev_span.end == tokens[index].1.start;
    glued
        && matches!(
            prev_token,
            Token::Bare
                | Token::CloseBracket
                | Token::CloseParen
                | Token::DoubleQuoted
                | Token::SingleQuoted
        )
}

/// Matching closer and inner nesting depth of an opening bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    close: usize,
    depth: usize,
}

fn closes(open: Token, close: Token) -> bool {
    matches!(
        (open, close),
        (Token::OpenBracket, Token::CloseBracket)
            | (Token::OpenParen, Token::CloseParen)
            | (Token::OpenBrace, Token::CloseBrace)
    )
}

/// Pair up brackets in one pass. A closer that does not match the innermost open
/// bracket leaves every bracket still open without a region: no list can span it.
fn bracket_regions(tokens: &[TokenSpan]) -> Vec<Option<Region>> {
    let mut regions = vec![None; tokens.len()];
    let mut open: Vec<(usize, usize)> = Vec::new();
    for (index, (token, _)) in tokens.iter().enumerate() {
        match token {
            Token::OpenBracket | Token::OpenParen | Token::OpenBrace => open.push((index, 1)),
            Token::CloseBracket | Token::CloseParen | Token::CloseBrace => match open.pop() {
                Some((start, depth)) if closes(tokens[start].0, *token) => {
                    regions[start] = Some(Region {
                        close: index,
                        depth,
                    });
                    if let Some(parent) = open.last_mut() {
                        parent.1 = parent.1.max(depth + 1);
                    }
                }
                _ => open.clear(),
            },
            _ => {}
        }
    }
    regions
}

/// Candidate search state shared by the passes. Each `[` is parsed at most once, and
/// only over the tokens up to its matching `]`.
struct Scan<'s, 't> {
    source: &'s str,
    tokens: &'t [TokenSpan],
    syntax: ListSyntax,
    regions: Vec<Option<Region>>,
    tried: Vec<bool>,
}

impl<'s, 't> Scan<'s, 't> {
    fn new(source: &'s str, tokens: &'t [TokenSpan], syntax: ListSyntax) -> Self {
        Self {
            source,
            tokens,
            syntax,
            regions: bracket_regions(tokens),
            tried: vec![false; tokens.len()],
        }
    }

    fn run(&mut self, pass: Candidate) -> Option<ListWithSpans> {
        let parser = grammar::list_literal(self.syntax);
        for index in 0..self.tokens.len() {
            if self.tokens[index].0 != Token::OpenBracket
                || self.tried[index]
                || !pass.admits(self.source, self.tokens, index)
            {
                continue;
            }
            self.tried[index] = true;

            let at = self.tokens[index].1.start;
            let Some(region) = self.regions[index] else {
                debug!(at, "bracket never closed");
                continue;
            };
            if region.depth > MAX_NESTING {
                warn!(at, depth = region.depth, "bracket nesting too deep, skipping candidate");
                continue;
            }
            match parser.parse(self.tokens[index..=region.close].to_vec()) {
                Ok(list) => return Some(list),
                Err(_) => debug!(at, "not a list literal"),
            }
        }
        None
    }
}

fn convert_list(source: &str, list: ListWithSpans) -> ListLiteral<'_> {
    let items = list
        .items
        .into_iter()
        .map(|entry| convert_entry(source, entry))
        .collect();
    ListLiteral {
        items,
        source: &source[list.span.clone()],
        span: list.span,
    }
}

fn convert_entry(source: &str, entry: EntryWithSpans) -> Literal<'_> {
    match entry {
        EntryWithSpans::Str { span } => Literal::Str(unquote(&source[span])),
        EntryWithSpans::Raw(span) => Literal::Raw(&source[span]),
        EntryWithSpans::List(list) => Literal::List(convert_list(source, list)),
    }
}

/// Strip the surrounding quotes of a string token and decode its escapes.
fn unquote(quoted: &str) -> Cow<'_, str> {
    // Quotes are single ASCII bytes.
    let inner = &quoted[1..quoted.len() - 1];
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = if hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        chars.nth(3);
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some(escaped @ ('\\' | '\'' | '"' | '/')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
