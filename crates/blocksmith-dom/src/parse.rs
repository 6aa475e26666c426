//! Parser for the authored-markup subset blocks are built from.
//!
//! CMS-exported block markup is a small, regular HTML dialect: nested divs,
//! headings, paragraphs, anchors, pictures and images. This parser covers
//! that subset only; it is not a general HTML parser. Comments are skipped,
//! whitespace-only text between tags is dropped, and entities are decoded
//! with `html-escape`.

use crate::node::{Document, NodeId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
    #[error("closing tag </{found}> at byte {at} does not match open <{expected}>")]
    MismatchedClose {
        expected: String,
        found: String,
        at: usize,
    },
    #[error("closing tag </{found}> at byte {at} has no matching open tag")]
    UnopenedClose { found: String, at: usize },
    #[error("malformed tag at byte {0}")]
    MalformedTag(usize),
    #[error("no element found in input")]
    EmptyInput,
}

/// Elements that never have children and need no closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr", "source", "input", "meta", "link"];

pub(crate) fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Parses a fragment into `doc`, returning the top-level node ids.
pub fn parse_fragment(doc: &mut Document, html: &str) -> Result<Vec<NodeId>, ParseError> {
    Parser::new(html).run(doc)
}

/// Parses markup expected to contain a single block element.
///
/// Returns the document and the first top-level element; leading text and
/// comments are tolerated but a fragment with no element at all is an error.
pub fn parse_block(html: &str) -> Result<(Document, NodeId), ParseError> {
    let mut doc = Document::new();
    let roots = parse_fragment(&mut doc, html)?;
    let block = roots
        .iter()
        .copied()
        .find(|&id| doc.is_element(id))
        .ok_or(ParseError::EmptyInput)?;
    Ok((doc, block))
}

/// A byte cursor over the input with absolute position tracking.
struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.s.as_bytes()[self.i..].starts_with(pat.as_bytes())
    }

    fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.i += 1;
        }
    }

    fn run(&mut self, doc: &mut Document) -> Result<Vec<NodeId>, ParseError> {
        let mut roots = Vec::new();
        // Stack of open elements; children attach to the top entry.
        let mut open: Vec<(NodeId, String)> = Vec::new();

        while !self.eof() {
            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.starts_with("</") {
                let at = self.i;
                let tag = self.read_close_tag()?;
                match open.pop() {
                    Some((_, expected)) if expected == tag => {}
                    Some((_, expected)) => {
                        return Err(ParseError::MismatchedClose {
                            expected,
                            found: tag,
                            at,
                        });
                    }
                    None => return Err(ParseError::UnopenedClose { found: tag, at }),
                }
            } else if self.peek() == Some(b'<') {
                let (id, tag, self_closing) = self.read_open_tag(doc)?;
                match open.last() {
                    Some(&(parent, _)) => doc
                        .append_child(parent, id)
                        .expect("open stack entries are elements"),
                    None => roots.push(id),
                }
                if !self_closing && !is_void_tag(&tag) {
                    open.push((id, tag));
                }
            } else {
                self.read_text(doc, open.last().map(|&(id, _)| id), &mut roots)?;
            }
        }

        if !open.is_empty() {
            return Err(ParseError::UnexpectedEof(self.i));
        }
        Ok(roots)
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let start = self.i;
        self.bump_n(4);
        match self.s[self.i..].find("-->") {
            Some(offset) => {
                self.bump_n(offset + 3);
                Ok(())
            }
            None => Err(ParseError::UnexpectedEof(start)),
        }
    }

    fn read_name(&mut self) -> String {
        let start = self.i;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.i += 1;
        }
        self.s[start..self.i].to_ascii_lowercase()
    }

    fn read_close_tag(&mut self) -> Result<String, ParseError> {
        let at = self.i;
        self.bump_n(2);
        let tag = self.read_name();
        if tag.is_empty() {
            return Err(ParseError::MalformedTag(at));
        }
        self.skip_whitespace();
        if self.peek() != Some(b'>') {
            return Err(ParseError::MalformedTag(at));
        }
        self.bump_n(1);
        Ok(tag)
    }

    fn read_open_tag(&mut self, doc: &mut Document) -> Result<(NodeId, String, bool), ParseError> {
        let at = self.i;
        self.bump_n(1);
        let tag = self.read_name();
        if tag.is_empty() {
            return Err(ParseError::MalformedTag(at));
        }
        let id = doc.create_element(&tag);

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnexpectedEof(at)),
                Some(b'>') => {
                    self.bump_n(1);
                    return Ok((id, tag, false));
                }
                Some(b'/') if self.starts_with("/>") => {
                    self.bump_n(2);
                    return Ok((id, tag, true));
                }
                Some(_) => {
                    let name = self.read_name();
                    if name.is_empty() {
                        return Err(ParseError::MalformedTag(self.i));
                    }
                    let value = if self.peek() == Some(b'=') {
                        self.bump_n(1);
                        self.read_attr_value(at)?
                    } else {
                        String::new()
                    };
                    doc.set_attr(id, &name, &value);
                }
            }
        }
    }

    fn read_attr_value(&mut self, tag_start: usize) -> Result<String, ParseError> {
        match self.peek() {
            Some(b'"') => {
                self.bump_n(1);
                let start = self.i;
                match self.s[self.i..].find('"') {
                    Some(offset) => {
                        let raw = &self.s[start..start + offset];
                        self.bump_n(offset + 1);
                        Ok(html_escape::decode_html_entities(raw).into_owned())
                    }
                    None => Err(ParseError::UnexpectedEof(tag_start)),
                }
            }
            _ => {
                // Bare value: up to whitespace, '/' or '>'.
                let start = self.i;
                while self
                    .peek()
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>' && b != b'/')
                {
                    self.i += 1;
                }
                Ok(self.s[start..self.i].to_string())
            }
        }
    }

    fn read_text(
        &mut self,
        doc: &mut Document,
        parent: Option<NodeId>,
        roots: &mut Vec<NodeId>,
    ) -> Result<(), ParseError> {
        let start = self.i;
        let end = match self.s[self.i..].find('<') {
            Some(offset) => self.i + offset,
            None => self.s.len(),
        };
        self.i = end;
        let raw = &self.s[start..end];
        // Whitespace runs between tags are authoring indentation, not content.
        if raw.trim().is_empty() {
            return Ok(());
        }
        let decoded = html_escape::decode_html_entities(raw).into_owned();
        let text = doc.create_text(&decoded);
        match parent {
            Some(parent) => doc
                .append_child(parent, text)
                .expect("open stack entries are elements"),
            None => roots.push(text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_block_markup() {
        let (doc, block) = parse_block(
            r#"<div class="facts-figures-cards block">
                <div><div><h2>42%</h2><p>of authors prefer tables</p></div></div>
            </div>"#,
        )
        .unwrap();

        assert_eq!(doc.tag(block), Some("div"));
        assert!(doc.has_class(block, "facts-figures-cards"));
        assert!(doc.has_class(block, "block"));

        let heading = doc.first_heading(block).unwrap();
        assert_eq!(doc.tag(heading), Some("h2"));
        assert_eq!(doc.text_content(heading), "42%");
    }

    #[test]
    fn parses_attributes_and_void_elements() {
        let (doc, block) =
            parse_block(r#"<div><picture><img src="/bg.jpg" alt="Skyline"></picture></div>"#)
                .unwrap();
        let img = doc.first_with_tag(block, "img").unwrap();
        assert_eq!(doc.attr(img, "src"), Some("/bg.jpg"));
        assert_eq!(doc.attr(img, "alt"), Some("Skyline"));
    }

    #[test]
    fn decodes_entities_in_text() {
        let (doc, block) = parse_block("<p>Fish &amp; chips &lt;50</p>").unwrap();
        assert_eq!(doc.text_content(block), "Fish & chips <50");
    }

    #[test]
    fn skips_comments_and_interelement_whitespace() {
        let (doc, block) =
            parse_block("<div>\n  <!-- authoring note -->\n  <p>text</p>\n</div>").unwrap();
        let children = doc.children(block);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.tag(children[0]), Some("p"));
    }

    #[test]
    fn keeps_inline_whitespace() {
        let (doc, block) = parse_block("<p>Shop <a href=\"/x\">now</a></p>").unwrap();
        assert_eq!(doc.text_content(block), "Shop now");
    }

    #[test]
    fn mismatched_close_is_an_error() {
        let err = parse_block("<div><p>text</div>").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedClose { .. }));
    }

    #[test]
    fn unclosed_element_is_an_error() {
        let err = parse_block("<div><p>text</p>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn stray_close_is_an_error() {
        let err = parse_block("</div>").unwrap_err();
        assert!(matches!(err, ParseError::UnopenedClose { .. }));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_block("   "), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn boolean_attributes_parse_as_empty() {
        let (doc, block) = parse_block("<img data-deferred src=\"/a.jpg\">").unwrap();
        assert_eq!(doc.attr(block, "data-deferred"), Some(""));
    }

    #[test]
    fn self_closing_slash_is_accepted() {
        let (doc, block) = parse_block(r#"<div><img src="/a.jpg"/><p>x</p></div>"#).unwrap();
        assert_eq!(doc.children(block).len(), 2);
    }
}
