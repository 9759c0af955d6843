//! Compound selectors: `tag`, `.class`, `#id` and combinations like
//! `div.tooltip-head`. Combinators are not supported.

use crate::error::{DomError, DomResult};
use crate::node::Node;

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parses a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidSelector`] for empty input, whitespace, or
    /// an empty `.`/`#` component.
    pub fn parse(input: &str) -> DomResult<Self> {
        let input = input.trim();
        let invalid = || DomError::InvalidSelector(input.to_string());

        if input.is_empty() || input.contains(char::is_whitespace) {
            return Err(invalid());
        }

        let mut selector = Self::default();
        let mut rest = input;

        let tag_len = rest.find(['.', '#']).unwrap_or(rest.len());
        if tag_len > 0 {
            selector.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let len = body.find(['.', '#']).unwrap_or(body.len());
            if len == 0 {
                return Err(invalid());
            }
            let name = body[..len].to_string();
            if marker == '.' {
                selector.classes.push(name);
            } else {
                selector.id = Some(name);
            }
            rest = &body[len..];
        }

        Ok(selector)
    }

    /// Returns true if the node satisfies every part of the selector.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != node.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.element_id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| node.has_class(class))
    }
}

/// Returns true if the value looks like a node reference (`#id` or `.class`)
/// rather than literal text.
#[must_use]
pub fn is_reference(value: &str) -> bool {
    value.starts_with('#') || value.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    fn node(tag: &str, id: Option<&str>, classes: &[&str]) -> Node {
        let mut node = Node::new(NodeId::new(1), tag);
        if let Some(id) = id {
            node.attributes.insert("id".to_string(), id.to_string());
        }
        node.classes = classes.iter().map(ToString::to_string).collect();
        node
    }

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse("div.tooltip-head#main").unwrap();

        assert!(selector.matches(&node("div", Some("main"), &["tooltip-head", "x"])));
        assert!(!selector.matches(&node("span", Some("main"), &["tooltip-head"])));
        assert!(!selector.matches(&node("div", None, &["tooltip-head"])));
    }

    #[test]
    fn test_class_only() {
        let selector = Selector::parse(".tooltip-body").unwrap();

        assert!(selector.matches(&node("div", None, &["tooltip-body"])));
        assert!(!selector.matches(&node("div", None, &["tooltip-head"])));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse(".a .b").is_err());
        assert!(Selector::parse("div.").is_err());
        assert!(Selector::parse("#").is_err());
    }

    #[test]
    fn test_reference_detection() {
        assert!(is_reference("#help"));
        assert!(is_reference(".hint"));
        assert!(!is_reference("plain text"));
    }
}
