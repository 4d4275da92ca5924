//! Token definitions for list literals
//!
//! The tokens are defined using the logos derive macro. They only need to be fine-grained
//! enough to find brackets, separators and string boundaries; everything else is `Bare`
//! text whose exact source is recovered from spans.

use logos::{Lexer, Logos};
use std::ops::Range;

/// Tokens of source-like text around list literals
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,

    // Strings never span lines; an unterminated quote lexes as `StrayQuote`.
    #[token("\"", |lex| close_quote(lex, b'"'))]
    DoubleQuoted,
    #[token("'", |lex| close_quote(lex, b'\''))]
    SingleQuoted,

    #[regex(r"#[^\n]*")]
    HashComment,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", close_block_comment)]
    BlockComment,

    /// A quote that never closes on its line
    StrayQuote,
    #[token("/")]
    Slash,
    #[regex(r#"[^\[\](){},"'#/ \t\r\n\f]+"#)]
    Bare,
}

impl Token {
    pub fn is_string(&self) -> bool {
        matches!(self, Token::DoubleQuoted | Token::SingleQuoted)
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            Token::HashComment | Token::LineComment | Token::BlockComment
        )
    }

    /// Tokens that can be part of a bare (unquoted) value
    pub fn is_scalar(&self) -> bool {
        matches!(self, Token::Bare | Token::Slash | Token::StrayQuote) || self.is_comment()
    }
}

/// Extend a string token up to its closing `quote`, honoring backslash escapes.
fn close_quote(lex: &mut Lexer<Token>, quote: u8) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' if rest.get(i + 1).is_some_and(|b| *b != b'\n') => i += 2,
            b'\n' => return false,
            b if b == quote => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    false
}

/// Extend a `/*` token past the matching `*/`.
fn close_block_comment(lex: &mut Lexer<Token>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Tokenize `source`, keeping byte ranges.
///
/// A quote that never closes becomes a one-byte `StrayQuote` and lexing resumes right
/// after it; any other input no rule accepts becomes `Bare`.
pub fn tokenize(source: &str) -> Vec<(Token, Range<usize>)> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| {
            let token = token.unwrap_or_else(|_| match &source[span.clone()] {
                "\"" | "'" => Token::StrayQuote,
                _ => Token::Bare,
            });
            (token, span)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            kinds(r#"task_list = ["a.py", 'b.py',]"#),
            vec![
                Token::Bare,
                Token::Bare,
                Token::OpenBracket,
                Token::DoubleQuoted,
                Token::Comma,
                Token::SingleQuoted,
                Token::Comma,
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_strings_hold_delimiters() {
        let tokens = tokenize(r#"["a, [b]", 'it\'s']"#);
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1], (Token::DoubleQuoted, 1..9));
        assert_eq!(tokens[3].0, Token::SingleQuoted);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("[\"a\", # first\n // second\n /* third */ ]"),
            vec![
                Token::OpenBracket,
                Token::DoubleQuoted,
                Token::Comma,
                Token::HashComment,
                Token::LineComment,
                Token::BlockComment,
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_is_stray() {
        assert_eq!(
            kinds("[\"open, x]"),
            vec![
                Token::OpenBracket,
                Token::StrayQuote,
                Token::Bare,
                Token::Comma,
                Token::Bare,
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_block_comment_spans() {
        let source = "[\"a.ts\", /* entry * point */ \"b.ts\"]";
        let tokens = tokenize(source);

        assert_eq!(tokens[3].0, Token::BlockComment);
        assert_eq!(&source[tokens[3].1.clone()], "/* entry * point */");
        assert_eq!(tokens[4].0, Token::DoubleQuoted);
    }

    #[test]
    fn test_unclosed_block_comment_keeps_lexing() {
        assert_eq!(
            kinds("/* open [a]"),
            vec![
                Token::Bare,
                Token::Bare,
                Token::OpenBracket,
                Token::Bare,
                Token::CloseBracket,
            ]
        );
    }

    #[test]
    fn test_stray_quote_is_one_byte() {
        let tokens = tokenize("['a', 'b]\n'c'");
        assert_eq!(tokens[1], (Token::SingleQuoted, 1..4));
        assert_eq!(tokens[3], (Token::StrayQuote, 6..7));
        assert_eq!(tokens[4].0, Token::Bare);
        assert_eq!(tokens[5].0, Token::CloseBracket);
        assert_eq!(tokens[6].0, Token::SingleQuoted);
    }

    #[test]
    fn test_unicode_text() {
        let tokens = tokenize("[\"知识库.py\", 数字]");
        assert_eq!(tokens[1].0, Token::DoubleQuoted);
        assert_eq!(tokens[3].0, Token::Bare);
    }
}
