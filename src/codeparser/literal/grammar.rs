//! List literal grammar
//!
//! Parser combinators over `(Token, byte range)` pairs. The grammar is permissive about
//! what an entry is, strict about structure:
//!
//!     list    := "[" (entry ("," entry)* ","?)? "]"
//!     entry   := piece+
//!     piece   := string | bare | list | "(" entries ")" | "{" entries "}"
//!
//! An entry made of exactly one string piece is a string, one list piece is a nested
//! list; any other entry is kept as the raw source it spans. The parser produces byte
//! ranges only; conversion into borrowed values happens in the parent module.

use chumsky::prelude::*;
use std::ops::Range;

use super::token::Token;
use super::ListSyntax;

/// Type alias for token with span
pub(crate) type TokenSpan = (Token, Range<usize>);

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenSpan>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EntryWithSpans {
    Str { span: Range<usize> },
    Raw(Range<usize>),
    List(ListWithSpans),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListWithSpans {
    pub items: Vec<EntryWithSpans>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
enum Piece {
    Str(Range<usize>),
    List(ListWithSpans),
    Other(Range<usize>),
}

impl Piece {
    fn span(&self) -> &Range<usize> {
        match self {
            Piece::Str(span) | Piece::Other(span) => span,
            Piece::List(list) => &list.span,
        }
    }
}

fn pieces_to_entry(pieces: Vec<Piece>) -> EntryWithSpans {
    let start = pieces.first().map_or(0, |p| p.span().start);
    let end = pieces.last().map_or(start, |p| p.span().end);
    match <[Piece; 1]>::try_from(pieces) {
        Ok([Piece::Str(span)]) => EntryWithSpans::Str { span },
        Ok([Piece::List(list)]) => EntryWithSpans::List(list),
        _ => EntryWithSpans::Raw(start..end),
    }
}

/// Helper: match a specific token type, keeping its byte range
fn token(t: Token) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| *tok == t).map(|(_, span)| span)
}

/// `"[" (entry ("," entry)* ","?)? "]"` for a given entry parser
fn bracketed<P>(entry: P) -> impl Parser<TokenSpan, ListWithSpans, Error = ParserError> + Clone
where
    P: Parser<TokenSpan, EntryWithSpans, Error = ParserError> + Clone,
{
    token(Token::OpenBracket)
        .then(entry.separated_by(token(Token::Comma)).allow_trailing())
        .then(token(Token::CloseBracket))
        .map(|((open, items), close)| ListWithSpans {
            items,
            span: open.start..close.end,
        })
}

// Every piece starts with a distinct token, so no alternative re-parses a nested
// group another one already rejected.
fn entry(syntax: ListSyntax) -> impl Parser<TokenSpan, EntryWithSpans, Error = ParserError> + Clone {
    recursive(move |entry| {
        let entries = entry
            .clone()
            .separated_by(token(Token::Comma))
            .allow_trailing();

        let tuple = token(Token::OpenParen)
            .then(entries.clone())
            .then(token(Token::CloseParen))
            .map(|((open, _), close)| Piece::Other(open.start..close.end));

        let dict = token(Token::OpenBrace)
            .then(entries)
            .then(token(Token::CloseBrace))
            .map(|((open, _), close)| Piece::Other(open.start..close.end));

        let string = filter(move |(t, _): &TokenSpan| syntax.accepts_string(*t))
            .map(|(_, span)| Piece::Str(span));

        let scalar =
            filter(|(t, _): &TokenSpan| t.is_scalar()).map(|(_, span)| Piece::Other(span));

        string
            .or(scalar)
            .or(tuple)
            .or(dict)
            .or(bracketed(entry).map(Piece::List))
            .repeated()
            .at_least(1)
            .map(pieces_to_entry)
    })
}

/// Parse a list literal at the start of the token stream. Trailing tokens are ignored.
pub(crate) fn list_literal(
    syntax: ListSyntax,
) -> impl Parser<TokenSpan, ListWithSpans, Error = ParserError> + Clone {
    bracketed(entry(syntax))
}
