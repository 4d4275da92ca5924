//! Fenced Code Blocks
//!
//! Models answer with code wrapped in backtick (or tilde) fences, usually tagged with a
//! language. Model output is often sloppy about closing them, so the scanner is
//! forgiving:
//!
//!     1. The first later occurrence of the opening run closes the block, whether it
//!        sits on a line of its own or at the end of a code line (`]```` is common).
//!     2. Failing that, the block runs to the end of the text and is marked unclosed.
//!
//! Content is always the verbatim slice between the opening fence line and the closing
//! fence (or the indentation in front of it). Nothing is dedented or trimmed.

use serde::Serialize;
use std::ops::Range;
use tracing::{debug, warn};

use crate::codeparser::lines::{lines, Line};

/// A fenced block found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock<'a> {
    /// Everything after the opening fence characters, trimmed
    pub info: &'a str,
    /// First word of the info string
    pub lang: Option<&'a str>,
    /// Verbatim content, including the newline before the closing fence
    pub content: &'a str,
    /// Byte range from the opening fence line to the end of the closing fence line
    #[serde(skip)]
    pub span: Range<usize>,
    /// Whether a closing fence was found
    pub closed: bool,
}

impl<'a> CodeBlock<'a> {
    /// Whether this block is tagged with `lang` (aliases such as `py` count).
    pub fn is_lang(&self, lang: &str) -> bool {
        self.lang.is_some_and(|tag| lang_matches(tag, lang))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Recognize an opening fence line, returning the fence and its info string.
    fn open(line: &str) -> Option<(Fence, &str)> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next()?;
        if marker != '`' && marker != '~' {
            return None;
        }
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        // Fence characters are ASCII, so `len` is also a byte offset.
        let info = trimmed[len..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some((Fence { marker, len }, info))
    }

    fn run(&self) -> String {
        std::iter::repeat(self.marker).take(self.len).collect()
    }
}

/// First word of an info string, without pandoc-style `{.lang}` decoration.
fn lang_tag(info: &str) -> Option<&str> {
    let word = info.split_whitespace().next()?;
    let word = word.trim_start_matches(['{', '.']).trim_end_matches('}');
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Canonical lowercase name of a language tag.
pub(crate) fn canonical_lang(lang: &str) -> String {
    let lower = lang.trim().to_lowercase();
    let canonical = match lower.as_str() {
        "py" | "py3" | "python3" => "python",
        "js" | "jsx" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "rs" => "rust",
        "sh" | "bash" | "zsh" | "shell-session" => "shell",
        "yml" => "yaml",
        "c++" | "cc" | "cxx" => "cpp",
        "golang" => "go",
        _ => return lower,
    };
    canonical.to_string()
}

fn lang_matches(tag: &str, lang: &str) -> bool {
    canonical_lang(tag) == canonical_lang(lang)
}

fn end_of_line_at(source: &str, pos: usize) -> usize {
    source[pos..]
        .find('\n')
        .map_or(source.len(), |offset| pos + offset + 1)
}

/// Every fenced block in `source`, in document order.
pub fn code_blocks(source: &str) -> Vec<CodeBlock<'_>> {
    let all: Vec<Line<'_>> = lines(source).collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < all.len() {
        let line = all[i];
        let Some((fence, info)) = Fence::open(line.text) else {
            i += 1;
            continue;
        };
        let content_start = line.end;
        let run = fence.run();

        let Some(offset) = source[content_start..].find(&run) else {
            debug!(at = line.start, "fence never closed");
            blocks.push(CodeBlock {
                info,
                lang: lang_tag(info),
                content: &source[content_start..],
                span: line.start..source.len(),
                closed: false,
            });
            break;
        };

        let close_at = content_start + offset;
        let close_line_start = source[..close_at].rfind('\n').map_or(0, |p| p + 1);
        let content_end = if close_line_start >= content_start
            && source[close_line_start..close_at].trim().is_empty()
        {
            close_line_start
        } else {
            close_at
        };
        let close_end = end_of_line_at(source, close_at + run.len());

        blocks.push(CodeBlock {
            info,
            lang: lang_tag(info),
            content: &source[content_start..content_end],
            span: line.start..close_end,
            closed: true,
        });
        while i < all.len() && all[i].start < close_end {
            i += 1;
        }
    }

    blocks
}

/// The block to read code from: the first one tagged `lang` when a tag is requested
/// and present, otherwise the first block.
pub fn find_code_block<'a>(source: &'a str, lang: Option<&str>) -> Option<CodeBlock<'a>> {
    let blocks = code_blocks(source);
    if let Some(lang) = lang {
        if let Some(index) = blocks.iter().position(|block| block.is_lang(lang)) {
            return blocks.into_iter().nth(index);
        }
        debug!(lang, "no block tagged with requested language");
    }
    blocks.into_iter().next()
}

/// Single-shot extraction over a whole response.
///
/// Returns the content of the first fenced block (tagged `lang` if possible). When the
/// text has no fence at all it is assumed to be code already and returned whole.
pub fn extract_code_block<'a>(text: &'a str, lang: Option<&str>) -> &'a str {
    match find_code_block(text, lang) {
        Some(block) => block.content,
        None => {
            warn!("no fenced block found, using the whole text as code");
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_content_is_verbatim() {
        let source = "intro\n```python\n    x = 1\n\ny = 2\n```\nafter\n";
        let blocks = code_blocks(source);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lang, Some("python"));
        assert_eq!(blocks[0].content, "    x = 1\n\ny = 2\n");
        assert!(blocks[0].closed);
        assert_eq!(&source[blocks[0].span.clone()], "```python\n    x = 1\n\ny = 2\n```\n");
    }

    #[test]
    fn test_multiple_blocks_and_tilde_fences() {
        let source = "```json\n{}\n```\ntext\n~~~~ rust\nfn main() {}\n~~~~\n";
        let blocks = code_blocks(source);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lang, Some("json"));
        assert_eq!(blocks[1].lang, Some("rust"));
        assert_eq!(blocks[1].content, "fn main() {}\n");
    }

    #[test]
    fn test_longer_fence_holds_shorter_one() {
        let source = "````markdown\n```python\nx\n```\n````\n";
        let blocks = code_blocks(source);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "```python\nx\n```\n");
    }

    #[test]
    fn test_mid_line_close() {
        let source = "```python\nx = [1, 2]```\n## Next\n```\nz\n```\n";
        let blocks = code_blocks(source);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].content, "x = [1, 2]");
        assert_eq!(blocks[1].content, "z\n");
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let source = "```python\nprint('hi')\n";
        let blocks = code_blocks(source);

        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].closed);
        assert_eq!(blocks[0].content, "print('hi')\n");
    }

    #[test]
    fn test_inline_code_is_not_a_fence() {
        assert!(code_blocks("use ```rust``` blocks\n").is_empty());
    }

    #[test]
    fn test_pandoc_style_info() {
        let blocks = code_blocks("``` {.python .numberLines}\npass\n```\n");
        assert_eq!(blocks[0].lang, Some("python"));
    }

    #[test]
    fn test_lang_preference_and_aliases() {
        let source = "```text\nnotes\n```\n```py\nprint(1)\n```\n";

        assert_eq!(extract_code_block(source, Some("python")), "print(1)\n");
        assert_eq!(extract_code_block(source, Some("go")), "notes\n");
        assert_eq!(extract_code_block(source, None), "notes\n");
    }

    #[test]
    fn test_whole_text_fallback() {
        let text = "def product(xs):\n    return 1\n";
        assert_eq!(extract_code_block(text, Some("python")), text);
    }

    #[test]
    fn test_canonical_lang() {
        assert_eq!(canonical_lang("Python3"), "python");
        assert_eq!(canonical_lang("TS"), "typescript");
        assert_eq!(canonical_lang("kotlin"), "kotlin");
    }
}
