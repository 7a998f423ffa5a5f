//! Script block extraction for single-file components.
//!
//! A component file is markup with one or more embedded `<script>` elements.
//! Only the text inside those elements matters for import discovery, so this
//! module locates them and hands back their raw content.

use std::fmt;

const OPEN_TAG: &str = "<script";
const CLOSE_TAG: &str = "</script";

/// Errors that can occur while extracting script content.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The file is not valid UTF-8 text.
    #[error("File is not valid UTF-8 (at byte {0})")]
    InvalidUtf8(usize),

    /// A `<script` opening tag is never closed with `>`.
    #[error("Unterminated <script> tag at byte {0}")]
    UnterminatedTag(usize),

    /// A `<script>` element has no matching `</script>`.
    #[error("Unclosed <script> element opened at byte {0}")]
    UnclosedElement(usize),

    /// A `</script>` appears without an opening tag.
    #[error("Unexpected </script> at byte {0}")]
    UnexpectedClose(usize),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// One `<script>` element found in a component file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'a> {
    /// Attribute text of the opening tag (e.g. ` setup lang="ts"`)
    pub attributes: &'a str,
    /// Raw content between the opening and closing tags
    pub content: &'a str,
}

impl fmt::Display for ScriptBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<script{}>{}</script>", self.attributes, self.content)
    }
}

/// Extracts the script text from raw component bytes.
///
/// All script elements are joined in document order with a newline between
/// them. A file without any script element yields an empty string.
///
/// # Example
///
/// ```
/// use vuedeps::parser::script::extract_script;
///
/// let source = b"<template><div/></template><script>import A from './A'</script>";
/// assert_eq!(extract_script(source).unwrap(), "import A from './A'");
/// ```
pub fn extract_script(bytes: &[u8]) -> ParseResult<String> {
    let source = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8(e.valid_up_to()))?;

    let blocks = script_blocks(source)?;
    let script = blocks
        .iter()
        .map(|block| block.content)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(script)
}

/// Locates every `<script>` element in `source`.
pub fn script_blocks(source: &str) -> ParseResult<Vec<ScriptBlock<'_>>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    loop {
        let rest = &source[cursor..];
        let next_open = find_tag(rest, OPEN_TAG);
        let next_close = find_tag(rest, CLOSE_TAG);

        let open = match (next_open, next_close) {
            (None, None) => break,
            (None, Some(close)) => return Err(ParseError::UnexpectedClose(cursor + close)),
            (Some(open), Some(close)) if close < open => {
                return Err(ParseError::UnexpectedClose(cursor + close))
            }
            (Some(open), _) => cursor + open,
        };

        let attrs_start = open + OPEN_TAG.len();
        let tag_end = source[attrs_start..]
            .find('>')
            .map(|i| attrs_start + i)
            .ok_or(ParseError::UnterminatedTag(open))?;

        let attributes = &source[attrs_start..tag_end];

        // `<script ... />` has no body
        if attributes.ends_with('/') {
            blocks.push(ScriptBlock {
                attributes: &attributes[..attributes.len() - 1],
                content: "",
            });
            cursor = tag_end + 1;
            continue;
        }

        let content_start = tag_end + 1;
        let close = find_tag(&source[content_start..], CLOSE_TAG)
            .map(|i| content_start + i)
            .ok_or(ParseError::UnclosedElement(open))?;

        let close_end = source[close..]
            .find('>')
            .map(|i| close + i)
            .ok_or(ParseError::UnterminatedTag(close))?;

        blocks.push(ScriptBlock {
            attributes,
            content: &source[content_start..close],
        });
        cursor = close_end + 1;
    }

    Ok(blocks)
}

/// Finds `tag` where it is followed by whitespace, `>` or `/`, so that
/// `<scripts>` or `<script-like>` are not mistaken for script elements.
fn find_tag(haystack: &str, tag: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(found) = haystack[offset..].find(tag) {
        let start = offset + found;
        let after = haystack[start + tag.len()..].chars().next();
        match after {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(start),
            _ => offset = start + tag.len(),
        }
    }
    None
}
