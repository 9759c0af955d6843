//! Template markup parsing.
//!
//! Handles the element subset panel templates use: nested tags, quoted or
//! bare attributes, self-closing and void tags, text, and comments. Entities
//! are passed through untouched.

use crate::error::{DomError, DomResult};

/// Tags that never have a closing tag.
const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

/// A parsed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    /// Child content.
    pub children: Vec<Markup>,
}

/// A piece of parsed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// An element and its children.
    Element(ElementSpec),
    /// Non-blank text, trimmed.
    Text(String),
}

/// Parses a markup fragment into its top-level nodes.
///
/// # Errors
///
/// Returns [`DomError::Markup`] on unterminated tags, mismatched closing
/// tags, or stray closing tags.
pub fn parse(markup: &str) -> DomResult<Vec<Markup>> {
    let mut parser = Parser { src: markup, pos: 0 };
    parser.nodes(None)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::Markup {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn name(&mut self) -> DomResult<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        Ok(self.src[start..self.pos].to_ascii_lowercase())
    }

    /// Parses sibling nodes until the closing tag `until` (or end of input at
    /// the top level).
    fn nodes(&mut self, until: Option<&str>) -> DomResult<Vec<Markup>> {
        let mut nodes = Vec::new();

        loop {
            let text_end = self.rest().find('<').map_or(self.src.len(), |i| self.pos + i);
            let text = self.src[self.pos..text_end].trim();
            if !text.is_empty() {
                nodes.push(Markup::Text(text.to_string()));
            }
            self.pos = text_end;

            if self.pos >= self.src.len() {
                return match until {
                    Some(tag) => Err(self.error(format!("unclosed <{tag}>"))),
                    None => Ok(nodes),
                };
            }

            if self.eat("<!--") {
                let end = self
                    .rest()
                    .find("-->")
                    .ok_or_else(|| self.error("unterminated comment"))?;
                self.pos += end + 3;
                continue;
            }

            if self.eat("</") {
                let name = self.name()?;
                self.skip_whitespace();
                if !self.eat(">") {
                    return Err(self.error("expected '>'"));
                }
                return match until {
                    Some(tag) if tag == name => Ok(nodes),
                    Some(tag) => Err(self.error(format!("expected </{tag}>, found </{name}>"))),
                    None => Err(self.error(format!("stray </{name}>"))),
                };
            }

            self.bump();
            nodes.push(Markup::Element(self.element()?));
        }
    }

    /// Parses an element after its `<`.
    fn element(&mut self) -> DomResult<ElementSpec> {
        let tag = self.name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            if self.eat("/>") {
                return Ok(ElementSpec { tag, attributes, children: Vec::new() });
            }
            if self.eat(">") {
                break;
            }
            if self.peek().is_none() {
                return Err(self.error(format!("unterminated <{tag}>")));
            }

            let name = self.name()?;
            self.skip_whitespace();
            let value = if self.eat("=") {
                self.skip_whitespace();
                self.attribute_value()?
            } else {
                String::new()
            };
            attributes.push((name, value));
        }

        let children = if VOID_TAGS.contains(&tag.as_str()) {
            Vec::new()
        } else {
            self.nodes(Some(tag.as_str()))?
        };

        Ok(ElementSpec { tag, attributes, children })
    }

    fn attribute_value(&mut self) -> DomResult<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let end = self
                    .rest()
                    .find(quote)
                    .ok_or_else(|| self.error("unterminated attribute value"))?;
                let value = self.rest()[..end].to_string();
                self.pos += end + 1;
                Ok(value)
            }
            Some(_) => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| !c.is_whitespace() && c != '>' && c != '/')
                {
                    self.bump();
                }
                Ok(self.src[start..self.pos].to_string())
            }
            None => Err(self.error("expected attribute value")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(markup: &Markup) -> &ElementSpec {
        match markup {
            Markup::Element(element) => element,
            Markup::Text(text) => panic!("expected element, got text {text:?}"),
        }
    }

    #[test]
    fn test_nested_template() {
        let parsed = parse(
            r#"<div class="tooltip"><div class="tooltip-inner">
                <div class="tooltip-head"></div><div class="tooltip-body"></div>
            </div><div class="tooltip-arrow"></div></div>"#,
        )
        .unwrap();

        assert_eq!(parsed.len(), 1);
        let root = element(&parsed[0]);
        assert_eq!(root.tag, "div");
        assert_eq!(root.attributes, vec![("class".to_string(), "tooltip".to_string())]);
        assert_eq!(root.children.len(), 2);
        assert_eq!(element(&root.children[0]).children.len(), 2);
    }

    #[test]
    fn test_attributes_and_void_tags() {
        let parsed = parse("<p id=x data-on hidden='yes'>a<br>b<img src=\"i.png\"/></p>").unwrap();
        let p = element(&parsed[0]);

        assert_eq!(
            p.attributes,
            vec![
                ("id".to_string(), "x".to_string()),
                ("data-on".to_string(), String::new()),
                ("hidden".to_string(), "yes".to_string()),
            ]
        );
        assert_eq!(p.children.len(), 4);
        assert_eq!(p.children[0], Markup::Text("a".to_string()));
        assert_eq!(element(&p.children[1]).tag, "br");
    }

    #[test]
    fn test_comments_are_skipped() {
        let parsed = parse("<!-- panel --><span>hi</span>").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_malformed_markup() {
        assert!(matches!(parse("<div>"), Err(DomError::Markup { .. })));
        assert!(matches!(parse("<div></span>"), Err(DomError::Markup { .. })));
        assert!(matches!(parse("</div>"), Err(DomError::Markup { .. })));
        assert!(matches!(parse("<div class=\"x>"), Err(DomError::Markup { .. })));
    }
}
