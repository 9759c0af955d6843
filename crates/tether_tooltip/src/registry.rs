//! Delegate binding for many controllers over one document.
//!
//! Each bound controller owns the nodes matching its delegate selector. Input
//! is routed to the controller that owns the event's node; a node belongs to
//! at most one controller, first bind wins.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use tether_dom::{InputEvent, NodeId, NodeTree, Selector};

use crate::controller::{FetchCompletion, FloatingPanelController};
use crate::error::TooltipResult;
use crate::traits::{Closeable, OpenOutcome};

/// Handle to a bound controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub u32);

/// Owns controllers and routes document input to them.
#[derive(Debug, Default)]
pub struct TooltipRegistry {
    controllers: BTreeMap<ControllerId, FloatingPanelController>,
    anchors: HashMap<NodeId, ControllerId>,
    next_id: u32,
}

impl TooltipRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `controller` and attaches it to every node
    /// matching its delegate selector.
    ///
    /// # Errors
    ///
    /// Fails if the delegate selector does not parse.
    pub fn bind(
        &mut self,
        tree: &NodeTree,
        mut controller: FloatingPanelController,
    ) -> TooltipResult<ControllerId> {
        let selector = Selector::parse(&controller.config().delegate)?;
        let id = ControllerId(self.next_id);
        self.next_id += 1;

        let attached = self.attach_matches(tree, id, &mut controller, &selector)?;
        debug!(controller = id.0, attached, "controller bound");

        self.controllers.insert(id, controller);
        Ok(id)
    }

    fn attach_matches(
        &mut self,
        tree: &NodeTree,
        id: ControllerId,
        controller: &mut FloatingPanelController,
        selector: &Selector,
    ) -> TooltipResult<usize> {
        let mut attached = 0;
        for node in tree.query_document_all(selector) {
            match self.anchors.get(&node) {
                Some(&owner) if owner == id => {}
                Some(&owner) => {
                    warn!(node = node.raw(), owner = owner.0, "node already bound, skipping");
                }
                None => {
                    controller.attach(node)?;
                    self.anchors.insert(node, id);
                    attached += 1;
                }
            }
        }
        Ok(attached)
    }

    /// Re-applies every delegate after the document changed: new matches are
    /// attached, removed nodes are detached.
    ///
    /// Returns the number of newly attached nodes.
    ///
    /// # Errors
    ///
    /// Fails if a delegate selector does not parse.
    pub fn rescan(&mut self, tree: &mut NodeTree) -> TooltipResult<usize> {
        let stale: Vec<(NodeId, ControllerId)> = self
            .anchors
            .iter()
            .filter(|(node, _)| !tree.contains(**node))
            .map(|(&node, &id)| (node, id))
            .collect();
        for (node, id) in stale {
            self.anchors.remove(&node);
            if let Some(controller) = self.controllers.get_mut(&id) {
                controller.detach(tree, node);
            }
        }

        let ids: Vec<ControllerId> = self.controllers.keys().copied().collect();
        let mut attached = 0;
        for id in ids {
            let Some(mut controller) = self.controllers.remove(&id) else {
                continue;
            };
            let result = match Selector::parse(&controller.config().delegate) {
                Ok(selector) => self.attach_matches(tree, id, &mut controller, &selector),
                Err(e) => Err(e.into()),
            };
            self.controllers.insert(id, controller);
            attached += result?;
        }
        Ok(attached)
    }

    /// Routes an input event to the controller owning its node.
    ///
    /// # Errors
    ///
    /// Propagates the owning controller's error.
    pub fn dispatch(
        &mut self,
        tree: &mut NodeTree,
        event: InputEvent,
    ) -> TooltipResult<Option<(ControllerId, OpenOutcome)>> {
        let Some(&id) = self.anchors.get(&event.node()) else {
            return Ok(None);
        };
        let Some(controller) = self.controllers.get_mut(&id) else {
            return Ok(None);
        };
        Ok(controller.handle_input(tree, event)?.map(|outcome| (id, outcome)))
    }

    /// Advances every controller's clock and picks up fetch answers.
    pub fn pump(&mut self, tree: &mut NodeTree, now_ms: u64) -> Vec<(ControllerId, FetchCompletion)> {
        let mut completions = Vec::new();
        for (&id, controller) in &mut self.controllers {
            if let Err(e) = controller.tick(tree, now_ms) {
                warn!(controller = id.0, error = %e, "reveal failed");
            }
            completions.extend(
                controller
                    .complete_fetches(tree)
                    .into_iter()
                    .map(|completion| (id, completion)),
            );
        }
        completions
    }

    /// Disposes a controller and releases its nodes.
    ///
    /// Returns false if the id is unknown.
    pub fn unbind(&mut self, tree: &mut NodeTree, id: ControllerId) -> bool {
        let Some(mut controller) = self.controllers.remove(&id) else {
            return false;
        };
        controller.dispose(tree);
        self.anchors.retain(|_, owner| *owner != id);
        debug!(controller = id.0, "controller unbound");
        true
    }

    /// Returns a controller.
    #[must_use]
    pub fn controller(&self, id: ControllerId) -> Option<&FloatingPanelController> {
        self.controllers.get(&id)
    }

    /// Returns a controller mutably.
    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut FloatingPanelController> {
        self.controllers.get_mut(&id)
    }

    /// Returns the controller a node is bound to.
    #[must_use]
    pub fn controller_for(&self, node: NodeId) -> Option<ControllerId> {
        self.anchors.get(&node).copied()
    }

    /// Number of bound controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TooltipConfig;

    fn tagged(tree: &mut NodeTree, class: &str, content: &str) -> NodeId {
        let id = tree.create_element("span");
        tree.set_attribute(id, "class", class).unwrap();
        tree.set_attribute(id, "data-tooltip", content).unwrap();
        id
    }

    #[test]
    fn test_first_bind_owns_node() {
        let mut tree = NodeTree::new();
        let shared = tagged(&mut tree, "js-tooltip", "hi");
        let mut registry = TooltipRegistry::new();

        let first = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let second = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let a = registry.bind(&tree, first).unwrap();
        let b = registry.bind(&tree, second).unwrap();

        assert_eq!(registry.controller_for(shared), Some(a));
        assert!(registry.controller(b).unwrap().anchors().is_empty());
    }

    #[test]
    fn test_rescan_tracks_document_changes() {
        let mut tree = NodeTree::new();
        let old = tagged(&mut tree, "js-tooltip", "old");
        let mut registry = TooltipRegistry::new();
        let controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let id = registry.bind(&tree, controller).unwrap();

        tree.remove(old);
        let new = tagged(&mut tree, "js-tooltip", "new");

        assert_eq!(registry.rescan(&mut tree).unwrap(), 1);
        assert_eq!(registry.controller_for(new), Some(id));
        assert_eq!(registry.controller_for(old), None);
        assert_eq!(registry.controller(id).unwrap().anchors(), &[new]);
    }

    #[test]
    fn test_unbind_disposes() {
        let mut tree = NodeTree::new();
        let node = tagged(&mut tree, "js-tooltip", "hi");
        let mut registry = TooltipRegistry::new();
        let controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let panel = controller.panel();
        let id = registry.bind(&tree, controller).unwrap();

        assert!(registry.unbind(&mut tree, id));
        assert!(!registry.unbind(&mut tree, id));
        assert!(!tree.contains(panel));
        assert_eq!(registry.controller_for(node), None);
        assert!(registry.is_empty());
    }
}
