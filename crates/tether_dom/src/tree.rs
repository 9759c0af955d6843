//! Node tree: the document that anchors and panels live in.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{DomError, DomResult};
use crate::geometry::{Edges, Rect};
use crate::node::{Node, NodeFlags, NodeId};
use crate::selector::Selector;
use crate::template::{self, ElementSpec, Markup};

/// Owns every node and the parent/child relationships between them.
#[derive(Debug)]
pub struct NodeTree {
    /// Nodes indexed by ID.
    nodes: HashMap<NodeId, Node>,
    /// Root node IDs, in insertion order.
    roots: Vec<NodeId>,
    /// Parent-child relationships.
    children: HashMap<NodeId, Vec<NodeId>>,
    /// ID counter for generating unique IDs.
    next_id: u64,
}

impl NodeTree {
    /// Creates a new empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::with_capacity(64),
            roots: Vec::with_capacity(8),
            children: HashMap::with_capacity(64),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Creates a new root element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.next_id();
        self.nodes.insert(id, Node::new(id, tag));
        self.roots.push(id);
        self.children.insert(id, Vec::new());
        id
    }

    /// Creates a new element as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the parent does not exist.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> DomResult<NodeId> {
        if !self.contains(parent) {
            return Err(DomError::NodeNotFound(parent));
        }

        let id = self.next_id();
        let mut node = Node::new(id, tag);
        node.parent = Some(parent);

        self.nodes.insert(id, node);
        self.children.entry(parent).or_default().push(id);
        self.children.insert(id, Vec::new());
        Ok(id)
    }

    /// Builds a new root subtree from template markup.
    ///
    /// Text inside an element becomes that element's inner markup.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Markup`] if the markup does not parse or does not
    /// contain exactly one top-level element.
    pub fn instantiate(&mut self, markup: &str) -> DomResult<NodeId> {
        let parsed = template::parse(markup)?;
        let mut elements = parsed.iter().filter_map(|m| match m {
            Markup::Element(element) => Some(element),
            Markup::Text(_) => None,
        });

        let (Some(root), None) = (elements.next(), elements.next()) else {
            return Err(DomError::Markup {
                offset: 0,
                reason: "template must have exactly one root element".to_string(),
            });
        };

        let id = self.create_element(&root.tag);
        self.fill(id, root)?;
        trace!(root = id.raw(), "instantiated template");
        Ok(id)
    }

    fn fill(&mut self, id: NodeId, spec: &ElementSpec) -> DomResult<()> {
        for (name, value) in &spec.attributes {
            self.set_attribute(id, name, value)?;
        }

        let mut text = Vec::new();
        for child in &spec.children {
            match child {
                Markup::Element(element) => {
                    let child_id = self.append_element(id, &element.tag)?;
                    self.fill(child_id, element)?;
                }
                Markup::Text(content) => text.push(content.as_str()),
            }
        }
        if !text.is_empty() {
            self.set_html(id, &text.join(" "))?;
        }
        Ok(())
    }

    /// Removes a node and all its descendants.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(children) = self.children.remove(&id) {
            for child in children {
                self.remove(child);
            }
        }

        if let Some(parent) = self.nodes.get(&id).and_then(|node| node.parent) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|&c| c != id);
            }
        }

        self.roots.retain(|&r| r != id);
        self.nodes.remove(&id);
    }

    /// Returns true if the node exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Gets a node by ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(&id).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(DomError::NodeNotFound(id))
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns all root nodes.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all node IDs in depth-first order.
    pub fn iter_dfs(&self) -> impl Iterator<Item = NodeId> + '_ {
        NodeDfsIterator {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Returns the descendants of `id` (not `id` itself) in depth-first order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        NodeDfsIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Returns the first descendant of `root` matching the selector.
    #[must_use]
    pub fn query(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root)
            .find(|id| self.nodes.get(id).is_some_and(|node| selector.matches(node)))
    }

    /// Returns every descendant of `root` matching the selector.
    #[must_use]
    pub fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|id| self.nodes.get(id).is_some_and(|node| selector.matches(node)))
            .collect()
    }

    /// Returns the first node anywhere in the tree matching the selector.
    #[must_use]
    pub fn query_document(&self, selector: &Selector) -> Option<NodeId> {
        self.iter_dfs()
            .find(|id| self.nodes.get(id).is_some_and(|node| selector.matches(node)))
    }

    /// Returns every node in the tree matching the selector.
    #[must_use]
    pub fn query_document_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.iter_dfs()
            .filter(|id| self.nodes.get(id).is_some_and(|node| selector.matches(node)))
            .collect()
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.nodes.get(&id).and_then(|node| node.attribute(name))
    }

    /// Sets an attribute. `class` replaces the class list.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let node = self.node_mut(id)?;
        let name = name.to_ascii_lowercase();
        if name == "class" {
            node.classes.clear();
            for class in value.split_whitespace() {
                if !node.has_class(class) {
                    node.classes.push(class.to_string());
                }
            }
        } else {
            node.attributes.insert(name, value.to_string());
        }
        Ok(())
    }

    /// Adds a class if not already present.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let node = self.node_mut(id)?;
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Returns the inner markup.
    #[must_use]
    pub fn html(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.html.as_str())
    }

    /// Replaces the inner markup.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_html(&mut self, id: NodeId, html: &str) -> DomResult<()> {
        self.node_mut(id)?.html = html.to_string();
        Ok(())
    }

    /// Returns the bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn rect(&self, id: NodeId) -> DomResult<Rect> {
        Ok(self.node(id)?.rect)
    }

    /// Sets the bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> DomResult<()> {
        self.node_mut(id)?.rect = rect;
        Ok(())
    }

    /// Returns the margins.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn margin(&self, id: NodeId) -> DomResult<Edges> {
        Ok(self.node(id)?.margin)
    }

    /// Sets the margins.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_margin(&mut self, id: NodeId, margin: Edges) -> DomResult<()> {
        self.node_mut(id)?.margin = margin;
        Ok(())
    }

    /// Returns true if the node exists and is visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_visible)
    }

    /// Shows or hides a node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> DomResult<()> {
        self.node_mut(id)?.flags.assign(NodeFlags::VISIBLE, visible);
        Ok(())
    }

    /// Records whether the pointer is over a node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_hovered(&mut self, id: NodeId, hovered: bool) -> DomResult<()> {
        self.node_mut(id)?.flags.assign(NodeFlags::HOVERED, hovered);
        Ok(())
    }

    /// Returns true if the node exists and accepts input.
    #[must_use]
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_enabled)
    }

    /// Enables or disables input on a node.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> DomResult<()> {
        self.node_mut(id)?.flags.assign(NodeFlags::ENABLED, enabled);
        Ok(())
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over the node tree.
struct NodeDfsIterator<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl Iterator for NodeDfsIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        if let Some(children) = self.tree.children.get(&id) {
            for &child in children.iter().rev() {
                self.stack.push(child);
            }
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<div class="tooltip">
        <div class="tooltip-inner">
            <div class="tooltip-head"></div>
            <div class="tooltip-body">Loading...</div>
        </div>
        <div class="tooltip-arrow"></div>
    </div>"#;

    #[test]
    fn test_tree_hierarchy() {
        let mut tree = NodeTree::new();

        let root = tree.create_element("div");
        let a = tree.append_element(root, "span").unwrap();
        let b = tree.append_element(root, "span").unwrap();

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.get(a).unwrap().parent, Some(root));
    }

    #[test]
    fn test_instantiate_and_query() {
        let mut tree = NodeTree::new();
        let panel = tree.instantiate(TEMPLATE).unwrap();

        let head = tree.query(panel, &Selector::parse(".tooltip-head").unwrap()).unwrap();
        let body = tree.query(panel, &Selector::parse(".tooltip-body").unwrap()).unwrap();

        assert_eq!(tree.html(head), Some(""));
        assert_eq!(tree.html(body), Some("Loading..."));
        assert_eq!(tree.len(), 5);
        assert!(tree.query(panel, &Selector::parse(".tooltip").unwrap()).is_none());
        assert_eq!(tree.query_document(&Selector::parse(".tooltip").unwrap()), Some(panel));

        let regions = tree.query_all(panel, &Selector::parse("div").unwrap());
        assert_eq!(regions.len(), 4);
        assert_eq!(regions[1], head);
    }

    #[test]
    fn test_instantiate_rejects_multiple_roots() {
        let mut tree = NodeTree::new();

        assert!(tree.instantiate("<div></div><div></div>").is_err());
        assert!(tree.instantiate("just text").is_err());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = NodeTree::new();
        let panel = tree.instantiate(TEMPLATE).unwrap();
        let other = tree.create_element("a");

        tree.remove(panel);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.roots(), &[other]);
        assert_eq!(tree.iter_dfs().collect::<Vec<_>>(), vec![other]);
    }

    #[test]
    fn test_class_attribute_dedupes() {
        let mut tree = NodeTree::new();
        let a = tree.create_element("a");

        tree.set_attribute(a, "class", "js-tooltip js-tooltip x").unwrap();
        tree.add_class(a, "x").unwrap();

        assert_eq!(tree.attribute(a, "class").as_deref(), Some("js-tooltip x"));
    }

    #[test]
    fn test_enabled_flag() {
        let mut tree = NodeTree::new();
        let a = tree.create_element("button");
        assert!(tree.is_enabled(a));

        tree.set_enabled(a, false).unwrap();

        assert!(!tree.is_enabled(a));
        assert!(!tree.is_enabled(NodeId::new(404)));
    }

    #[test]
    fn test_missing_node_errors() {
        let mut tree = NodeTree::new();
        let ghost = NodeId::new(99);

        assert_eq!(tree.set_visible(ghost, true), Err(DomError::NodeNotFound(ghost)));
        assert!(!tree.is_visible(ghost));
    }
}
