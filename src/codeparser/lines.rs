//! Line iteration with byte offsets
//!
//! Every scanner in the crate works line by line but returns slices of the original
//! document, so lines carry the offsets needed to cut those slices.

/// A physical line of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content without the `\n` / `\r\n` terminator
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset just past the terminator (start of the next line)
    pub end: usize,
}

/// Iterate over the lines of `source`. A trailing line without terminator is included;
/// an empty source yields nothing.
pub fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    source.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);
        Line {
            text,
            start,
            end: offset,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_cover_source() {
        let source = "## A\r\nbody\nlast";
        let collected: Vec<_> = lines(source).collect();

        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0].text, "## A");
        assert_eq!(&source[collected[0].start..collected[0].end], "## A\r\n");
        assert_eq!(collected[1].text, "body");
        assert_eq!(collected[2].text, "last");
        assert_eq!(collected[2].end, source.len());
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(lines("").count(), 0);
    }
}
