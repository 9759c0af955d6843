//! The floating panel controller.
//!
//! Owns one panel element in the document, decides what it shows and where,
//! and drives its visibility from pointer input, deferred fetches and the
//! caller's clock.
//!
//! ## Lifecycle
//!
//! ```text
//! new ──> hidden ──open──> shown / scheduled / following / pending
//!            ^                        │
//!            └────── close / leave ───┘        dispose ──> (InvalidState)
//! ```
//!
//! Every `open` that gets past content resolution starts a new generation.
//! An open waiting on a key records it together with that generation; a
//! fetch answer for the key is applied only while that record is current,
//! whichever open issued the fetch.

use std::fmt;

use crossbeam_channel::Receiver;
use tracing::{debug, trace, warn};

use tether_dom::{is_reference, InputEvent, NodeId, NodeTree, Point, PointerState, Rect, Selector, Throttle};

use crate::cache::{CacheEntry, ContentCache};
use crate::config::{TooltipConfig, TriggerMode};
use crate::error::{TooltipError, TooltipResult};
use crate::events::{EventEmitter, PanelEvent};
use crate::fetch::{response_channel, ContentFetcher, FetchResponder, FetchResponse, FetchTicket};
use crate::placement::{measure, place, Placement, PlacementSpec, PlacementTarget};
use crate::traits::{Closeable, OpenOutcome, OpenRequest, Openable, Positionable, SkipReason};

/// An issued fetch the panel is waiting on.
struct PendingOpen {
    key: String,
    title: Option<String>,
    generation: u64,
}

/// What happened to one fetch answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCompletion {
    /// Stored and shown.
    Applied {
        /// Content key.
        key: String,
        /// Result of presenting the content.
        outcome: OpenOutcome,
    },
    /// Stored only; the panel had moved on or was disposed.
    Cached {
        /// Content key.
        key: String,
    },
    /// The fetch failed. Not retried.
    Failed(TooltipError),
}

/// Controller for a single floating panel.
pub struct FloatingPanelController {
    config: TooltipConfig,
    placement: PlacementSpec,
    /// Panel root and its regions.
    panel: NodeId,
    head: NodeId,
    body: NodeId,
    cache: ContentCache,
    fetcher: Option<Box<dyn ContentFetcher>>,
    responder: FetchResponder,
    responses: Receiver<FetchResponse>,
    emitter: EventEmitter,
    /// Anchors whose input this controller reacts to.
    anchors: Vec<NodeId>,
    /// Anchor of the current open.
    anchor: Option<NodeId>,
    /// Anchor whose pointer-leave closes the panel.
    leave_armed: Option<NodeId>,
    following: bool,
    throttle: Throttle,
    pointer: PointerState,
    reveal_at: Option<u64>,
    pending: Option<PendingOpen>,
    generation: u64,
    now_ms: u64,
    disposed: bool,
}

impl FloatingPanelController {
    /// Creates the panel in `tree` and returns its controller.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::Template`] if the template does not parse or
    /// lacks an element for the title or body selector.
    pub fn new(tree: &mut NodeTree, config: TooltipConfig) -> TooltipResult<Self> {
        Self::with_emitter(tree, config, EventEmitter::new())
    }

    /// Like [`new`](Self::new), with subscribers registered up front so they
    /// see the `Init` event.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_emitter(
        tree: &mut NodeTree,
        config: TooltipConfig,
        mut emitter: EventEmitter,
    ) -> TooltipResult<Self> {
        let placement = config.placement();
        let panel = tree
            .instantiate(&config.template)
            .map_err(|e| TooltipError::Template(e.to_string()))?;

        let (head, body) = match Self::find_regions(tree, panel, &config) {
            Ok(regions) => regions,
            Err(e) => {
                tree.remove(panel);
                return Err(e);
            }
        };

        tree.add_class(panel, placement.anchor_corner().class_name())?;
        tree.set_visible(panel, false)?;

        let (responder, responses) = response_channel();
        emitter.emit(&PanelEvent::Init);
        debug!(panel = panel.raw(), position = %placement.anchor_corner(), "panel initialized");

        Ok(Self {
            throttle: Throttle::new(config.pointer_throttle_ms),
            config,
            placement,
            panel,
            head,
            body,
            cache: ContentCache::new(),
            fetcher: None,
            responder,
            responses,
            emitter,
            anchors: Vec::new(),
            anchor: None,
            leave_armed: None,
            following: false,
            pointer: PointerState::new(),
            reveal_at: None,
            pending: None,
            generation: 0,
            now_ms: 0,
            disposed: false,
        })
    }

    /// Locates the head and body regions inside a fresh panel.
    fn find_regions(
        tree: &NodeTree,
        panel: NodeId,
        config: &TooltipConfig,
    ) -> TooltipResult<(NodeId, NodeId)> {
        let head = Self::find_region(tree, panel, &config.title_selector)?;
        let body = Self::find_region(tree, panel, &config.body_selector)?;
        Ok((head, body))
    }

    fn find_region(tree: &NodeTree, panel: NodeId, selector: &str) -> TooltipResult<NodeId> {
        let parsed = Selector::parse(selector).map_err(|e| TooltipError::Template(e.to_string()))?;
        tree.query(panel, &parsed)
            .ok_or_else(|| TooltipError::Template(format!("no element matches {selector:?}")))
    }

    /// Installs the content fetcher.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl ContentFetcher + 'static) -> Self {
        self.set_fetcher(fetcher);
        self
    }

    /// Replaces the content fetcher.
    pub fn set_fetcher(&mut self, fetcher: impl ContentFetcher + 'static) {
        self.fetcher = Some(Box::new(fetcher));
    }

    /// Subscribes to lifecycle events.
    pub fn subscribe(&mut self) -> Receiver<PanelEvent> {
        self.emitter.subscribe()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    /// Returns the placement spec.
    #[must_use]
    pub fn placement(&self) -> &PlacementSpec {
        &self.placement
    }

    /// Returns the panel root node.
    #[must_use]
    pub fn panel(&self) -> NodeId {
        self.panel
    }

    /// Returns the head (title) region.
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// Returns the body (content) region.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Returns the content cache.
    #[must_use]
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Returns the anchor of the current open.
    #[must_use]
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Returns the attached anchors.
    #[must_use]
    pub fn anchors(&self) -> &[NodeId] {
        &self.anchors
    }

    /// Returns true while pointer moves reposition the panel.
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Returns the pending reveal deadline, if any.
    #[must_use]
    pub fn reveal_at(&self) -> Option<u64> {
        self.reveal_at
    }

    /// Returns true once disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Starts reacting to input on `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::InvalidState`] once disposed.
    pub fn attach(&mut self, anchor: NodeId) -> TooltipResult<()> {
        if self.disposed {
            return Err(TooltipError::InvalidState);
        }
        if !self.anchors.contains(&anchor) {
            self.anchors.push(anchor);
        }
        Ok(())
    }

    /// Stops reacting to input on `anchor`, closing the panel if it is open
    /// for it.
    pub fn detach(&mut self, tree: &mut NodeTree, anchor: NodeId) {
        self.anchors.retain(|&a| a != anchor);
        if self.leave_armed == Some(anchor) {
            self.leave_armed = None;
        }
        if self.anchor == Some(anchor) {
            self.close(tree);
        }
    }

    /// Reads a title or content attribute. A `#id`/`.class` value that
    /// matches a node yields that node's inner markup.
    fn resolve_attribute(tree: &NodeTree, anchor: NodeId, attribute: &str) -> Option<String> {
        let value = tree.attribute(anchor, attribute)?;
        if is_reference(&value) {
            let target = Selector::parse(&value)
                .ok()
                .and_then(|selector| tree.query_document(&selector));
            if let Some(target) = target {
                return tree.html(target).map(str::to_string).filter(|html| !html.is_empty());
            }
        }
        Some(value).filter(|value| !value.is_empty())
    }

    /// Starts a new generation for `anchor`, dropping whatever the previous
    /// open left pending. A panel still showing for the previous open is
    /// hidden first so every `Show` is paired with a `Hide`.
    fn begin_open(&mut self, tree: &mut NodeTree, anchor: Option<NodeId>) -> TooltipResult<()> {
        self.generation += 1;
        self.pending = None;
        self.reveal_at = None;
        self.following = false;
        if tree.is_visible(self.panel) {
            tree.set_visible(self.panel, false)?;
            self.emitter.emit(&PanelEvent::Hide);
            debug!(panel = self.panel.raw(), anchor = ?self.anchor, "panel hidden for new open");
        }
        self.anchor = anchor;
        Ok(())
    }

    /// Fills the regions, sizes and places the panel, and reveals it now,
    /// later, or on the first pointer position.
    fn present(
        &mut self,
        tree: &mut NodeTree,
        content: Option<String>,
        title: Option<String>,
    ) -> TooltipResult<OpenOutcome> {
        let title = title.filter(|_| self.config.show_title);

        match &title {
            Some(title) => {
                tree.set_html(self.head, title)?;
                tree.set_visible(self.head, true)?;
            }
            None => tree.set_visible(self.head, false)?,
        }
        match &content {
            Some(content) => {
                tree.set_html(self.body, content)?;
                tree.set_visible(self.body, true)?;
            }
            None => tree.set_visible(self.body, false)?,
        }

        let size = measure(&self.config.metrics, title.as_deref(), content.as_deref());
        let origin = tree.rect(self.panel)?.origin();
        tree.set_rect(self.panel, Rect::from_origin_size(origin, size))?;

        if self.placement.follows_pointer() {
            self.following = true;
            self.throttle.reset();
            if let Some(pointer) = self.pointer.position() {
                self.follow_to(tree, pointer)?;
            }
            return Ok(OpenOutcome::Following);
        }

        let anchor_rect = match self.anchor {
            Some(anchor) => tree.rect(anchor)?,
            None => Rect::ZERO,
        };
        self.reposition(tree, PlacementTarget::Anchor(anchor_rect))?;

        if self.config.show_delay_ms > 0 {
            let reveal_at_ms = self.now_ms.saturating_add(self.config.show_delay_ms);
            self.reveal_at = Some(reveal_at_ms);
            debug!(reveal_at_ms, "panel reveal scheduled");
            return Ok(OpenOutcome::Scheduled { reveal_at_ms });
        }

        self.reveal(tree)?;
        Ok(OpenOutcome::Shown)
    }

    fn reveal(&mut self, tree: &mut NodeTree) -> TooltipResult<()> {
        tree.set_visible(self.panel, true)?;
        self.emitter.emit(&PanelEvent::Show { anchor: self.anchor });
        debug!(panel = self.panel.raw(), anchor = ?self.anchor, "panel shown");
        Ok(())
    }

    fn follow_to(&mut self, tree: &mut NodeTree, pointer: Point) -> TooltipResult<Placement> {
        let placement = self.reposition(tree, PlacementTarget::Pointer(pointer))?;
        trace!(x = placement.origin.x, y = placement.origin.y, "panel follows pointer");
        if !tree.is_visible(self.panel) {
            self.reveal(tree)?;
        }
        Ok(placement)
    }

    /// Starts an open that shows `key` once its fetch answers.
    fn await_content(
        &mut self,
        tree: &mut NodeTree,
        anchor: Option<NodeId>,
        key: &str,
        title: Option<String>,
    ) -> TooltipResult<()> {
        self.begin_open(tree, anchor)?;
        self.pending = Some(PendingOpen {
            key: key.to_string(),
            title,
            generation: self.generation,
        });
        if self.config.show_loading {
            tree.set_html(self.body, &self.config.loading_message)?;
        }
        Ok(())
    }

    /// Issues a fetch for `key`.
    fn request(
        &mut self,
        tree: &mut NodeTree,
        anchor: Option<NodeId>,
        key: String,
        title: Option<String>,
    ) -> TooltipResult<OpenOutcome> {
        if self.fetcher.is_none() {
            return Err(TooltipError::FetchFailure {
                key,
                reason: "no content fetcher installed".to_string(),
            });
        }

        self.await_content(tree, anchor, &key, title)?;
        self.cache.begin(&key);

        let ticket = FetchTicket {
            key,
            generation: self.generation,
        };
        debug!(key = %ticket.key, generation = ticket.generation, "fetching panel content");
        if let Some(fetcher) = self.fetcher.as_mut() {
            fetcher.fetch(ticket, self.responder.clone());
        }
        Ok(OpenOutcome::Pending)
    }

    /// Routes a pointer event.
    ///
    /// Returns the outcome when the event opened the panel. Disabled anchors
    /// neither open nor toggle it.
    ///
    /// # Errors
    ///
    /// Propagates errors from the `open` the event triggered.
    pub fn handle_input(
        &mut self,
        tree: &mut NodeTree,
        event: InputEvent,
    ) -> TooltipResult<Option<OpenOutcome>> {
        if self.disposed {
            return Ok(None);
        }

        self.now_ms = self.now_ms.max(event.time_ms());
        self.pointer.observe(&event);

        let node = event.node();
        let attached = self.anchors.contains(&node) && tree.is_enabled(node);

        match event {
            InputEvent::PointerEnter { .. } => {
                if tree.contains(node) {
                    tree.set_hovered(node, true)?;
                }
                if attached && self.config.mode == TriggerMode::Hover {
                    return self.open(tree, OpenRequest::anchor(node)).map(Some);
                }
            }
            InputEvent::PointerLeave { .. } => {
                if tree.contains(node) {
                    tree.set_hovered(node, false)?;
                }
                if self.leave_armed == Some(node) {
                    self.leave_armed = None;
                    self.close(tree);
                }
            }
            InputEvent::PointerMove { position, time_ms, .. } => {
                if self.following && self.anchor == Some(node) && self.throttle.ready(time_ms) {
                    self.follow_to(tree, position)?;
                }
            }
            InputEvent::Click { .. } => {
                if attached && self.config.mode == TriggerMode::Click {
                    let showing = tree.is_visible(self.panel) || self.reveal_at.is_some();
                    if showing && self.anchor == Some(node) {
                        self.close(tree);
                    } else {
                        return self.open(tree, OpenRequest::anchor(node)).map(Some);
                    }
                }
            }
        }
        Ok(None)
    }

    /// Picks up fetch answers.
    ///
    /// Every successful answer is cached, last write winning. It is shown
    /// only if it answers the current generation and the controller is not
    /// disposed.
    pub fn complete_fetches(&mut self, tree: &mut NodeTree) -> Vec<FetchCompletion> {
        let responses: Vec<FetchResponse> = self.responses.try_iter().collect();
        responses
            .into_iter()
            .map(|response| self.apply_response(tree, response))
            .collect()
    }

    fn apply_response(&mut self, tree: &mut NodeTree, response: FetchResponse) -> FetchCompletion {
        let FetchResponse { ticket, result } = response;

        let pending = match self.pending.take() {
            Some(pending)
                if !self.disposed
                    && pending.generation == self.generation
                    && pending.key == ticket.key =>
            {
                Some(pending)
            }
            other => {
                self.pending = other;
                None
            }
        };

        match result {
            Ok(content) => {
                self.cache.store(&ticket.key, content.clone());
                if self.disposed {
                    return FetchCompletion::Cached { key: ticket.key };
                }
                self.emitter.emit(&PanelEvent::Load { key: ticket.key.clone() });

                let Some(pending) = pending else {
                    debug!(key = %ticket.key, generation = ticket.generation, "stale fetch cached");
                    return FetchCompletion::Cached { key: ticket.key };
                };

                let content = Some(content).filter(|c| !c.is_empty());
                if content.is_none() && pending.title.is_none() {
                    return FetchCompletion::Applied {
                        key: ticket.key,
                        outcome: OpenOutcome::Skipped(SkipReason::EmptyContent),
                    };
                }
                match self.present(tree, content, pending.title) {
                    Ok(outcome) => FetchCompletion::Applied { key: ticket.key, outcome },
                    Err(e) => FetchCompletion::Failed(e),
                }
            }
            Err(reason) => {
                self.cache.abandon(&ticket.key);
                warn!(key = %ticket.key, %reason, "panel content fetch failed");
                if pending.is_some() {
                    self.close(tree);
                }
                FetchCompletion::Failed(TooltipError::FetchFailure {
                    key: ticket.key,
                    reason,
                })
            }
        }
    }

    /// Advances the clock and performs a due reveal.
    ///
    /// Returns true if the panel was revealed.
    ///
    /// # Errors
    ///
    /// Fails only if the panel was removed from the document behind the
    /// controller's back.
    pub fn tick(&mut self, tree: &mut NodeTree, now_ms: u64) -> TooltipResult<bool> {
        self.now_ms = self.now_ms.max(now_ms);
        if self.disposed {
            return Ok(false);
        }
        match self.reveal_at {
            Some(at) if self.now_ms >= at => {
                self.reveal_at = None;
                self.reveal(tree)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Openable for FloatingPanelController {
    fn open(&mut self, tree: &mut NodeTree, request: OpenRequest) -> TooltipResult<OpenOutcome> {
        if self.disposed {
            return Err(TooltipError::InvalidState);
        }

        let OpenRequest { anchor, content, title } = request;
        if anchor.is_none() && content.is_none() {
            return Err(TooltipError::MissingAnchor);
        }

        let mut content = content.filter(|c| !c.is_empty());
        let mut title = title.filter(|t| !t.is_empty());

        if let Some(anchor) = anchor {
            if !tree.contains(anchor) {
                return Err(TooltipError::UnknownNode(anchor));
            }
            if self.config.mode == TriggerMode::Hover {
                self.leave_armed = Some(anchor);
            }
            if title.is_none() {
                title = Self::resolve_attribute(tree, anchor, &self.config.title_attribute);
            }
            if content.is_none() {
                content = Self::resolve_attribute(tree, anchor, &self.config.content_attribute);
            }
        }

        let Some(content) = content else {
            debug!(anchor = ?anchor, "no panel content, skipping");
            return Ok(OpenOutcome::Skipped(SkipReason::EmptyContent));
        };

        if !self.config.uses_fetch {
            self.begin_open(tree, anchor)?;
            return self.present(tree, Some(content), title);
        }

        match self.cache.get(&content) {
            Some(CacheEntry::Ready(cached)) => {
                let cached = Some(cached.clone()).filter(|c| !c.is_empty());
                if cached.is_none() && title.is_none() {
                    return Ok(OpenOutcome::Skipped(SkipReason::EmptyContent));
                }
                trace!(key = %content, "panel content cache hit");
                self.begin_open(tree, anchor)?;
                self.present(tree, cached, title)
            }
            Some(CacheEntry::InFlight) => {
                trace!(key = %content, "panel content already in flight");
                let waiting = self.anchor == anchor
                    && self.pending.as_ref().is_some_and(|p| p.key == content);
                if !waiting {
                    self.await_content(tree, anchor, &content, title)?;
                }
                Ok(OpenOutcome::Pending)
            }
            None => self.request(tree, anchor, content, title),
        }
    }

    fn is_open(&self, tree: &NodeTree) -> bool {
        !self.disposed && tree.is_visible(self.panel)
    }
}

impl Closeable for FloatingPanelController {
    fn close(&mut self, tree: &mut NodeTree) {
        if self.disposed {
            return;
        }

        let was_visible = tree.is_visible(self.panel);
        let had_reveal = self.reveal_at.take().is_some();
        self.following = false;
        self.leave_armed = None;
        if self.pending.take().is_some() {
            self.generation += 1;
        }

        if was_visible {
            if let Err(e) = tree.set_visible(self.panel, false) {
                warn!(error = %e, "panel missing while closing");
            }
        }
        if was_visible || had_reveal {
            self.emitter.emit(&PanelEvent::Hide);
            debug!(panel = self.panel.raw(), "panel hidden");
        }
    }

    fn dispose(&mut self, tree: &mut NodeTree) {
        if self.disposed {
            return;
        }

        self.close(tree);
        tree.remove(self.panel);
        self.anchors.clear();
        self.anchor = None;
        self.fetcher = None;
        self.disposed = true;
        self.emitter.emit(&PanelEvent::Dispose);
        debug!(panel = self.panel.raw(), "panel disposed");
    }
}

impl Positionable for FloatingPanelController {
    fn reposition(&mut self, tree: &mut NodeTree, target: PlacementTarget) -> TooltipResult<Placement> {
        if self.disposed {
            return Err(TooltipError::InvalidState);
        }

        let rect = tree.rect(self.panel)?;
        let margin = tree.margin(self.panel)?;
        let placement = place(&self.placement, target, rect.size(), margin.bottom);
        tree.set_rect(self.panel, rect.moved_to(placement.origin))?;
        Ok(placement)
    }
}

impl fmt::Debug for FloatingPanelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatingPanelController")
            .field("panel", &self.panel)
            .field("anchor", &self.anchor)
            .field("generation", &self.generation)
            .field("following", &self.following)
            .field("reveal_at", &self.reveal_at)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_dom::Size;

    fn anchor(tree: &mut NodeTree, content: Option<&str>, title: Option<&str>) -> NodeId {
        let id = tree.create_element("a");
        tree.set_rect(id, Rect::new(100.0, 100.0, 50.0, 20.0)).unwrap();
        if let Some(content) = content {
            tree.set_attribute(id, "data-tooltip", content).unwrap();
        }
        if let Some(title) = title {
            tree.set_attribute(id, "title", title).unwrap();
        }
        id
    }

    #[test]
    fn test_init_hides_panel_and_tags_position() {
        let mut tree = NodeTree::new();
        let mut emitter = EventEmitter::new();
        let events = emitter.subscribe();

        let controller = FloatingPanelController::with_emitter(
            &mut tree,
            TooltipConfig::default().with_position("bottomCenter"),
            emitter,
        )
        .unwrap();

        assert!(!tree.is_visible(controller.panel()));
        assert!(tree.get(controller.panel()).unwrap().has_class("bottom-center"));
        assert_eq!(events.try_recv(), Ok(PanelEvent::Init));
    }

    #[test]
    fn test_bad_template_leaves_no_nodes() {
        let mut tree = NodeTree::new();
        let config = TooltipConfig::default().with_template(
            "<div><p class=\"head\"></p></div>",
            ".head",
            ".missing",
        );

        let err = FloatingPanelController::new(&mut tree, config).unwrap_err();

        assert!(matches!(err, TooltipError::Template(_)));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_attribute_content_and_title() {
        let mut tree = NodeTree::new();
        let mut controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let a = anchor(&mut tree, Some("Body"), Some("Head"));

        let outcome = controller.open(&mut tree, OpenRequest::anchor(a)).unwrap();

        assert_eq!(outcome, OpenOutcome::Shown);
        assert_eq!(tree.html(controller.head()), Some("Head"));
        assert_eq!(tree.html(controller.body()), Some("Body"));
        assert!(tree.is_visible(controller.head()));
        assert!(controller.is_open(&tree));
    }

    #[test]
    fn test_show_title_disabled_hides_head() {
        let mut tree = NodeTree::new();
        let config = TooltipConfig::default().with_show_title(false);
        let mut controller = FloatingPanelController::new(&mut tree, config).unwrap();
        let a = anchor(&mut tree, Some("Body"), Some("Head"));

        controller.open(&mut tree, OpenRequest::anchor(a)).unwrap();

        assert!(!tree.is_visible(controller.head()));
        assert!(tree.is_visible(controller.body()));
    }

    #[test]
    fn test_reference_content_reads_target_markup() {
        let mut tree = NodeTree::new();
        let mut controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        tree.instantiate(r#"<div id="help">Press F1</div>"#).unwrap();
        let a = anchor(&mut tree, Some("#help"), None);
        let dangling = anchor(&mut tree, Some("#nowhere"), None);

        controller.open(&mut tree, OpenRequest::anchor(a)).unwrap();
        assert_eq!(tree.html(controller.body()), Some("Press F1"));

        controller.open(&mut tree, OpenRequest::anchor(dangling)).unwrap();
        assert_eq!(tree.html(controller.body()), Some("#nowhere"));
    }

    #[test]
    fn test_literal_overrides_attributes() {
        let mut tree = NodeTree::new();
        let mut controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let a = anchor(&mut tree, Some("attr"), Some("attr title"));

        controller
            .open(&mut tree, OpenRequest::anchor(a).with_content("literal").with_title("T"))
            .unwrap();

        assert_eq!(tree.html(controller.body()), Some("literal"));
        assert_eq!(tree.html(controller.head()), Some("T"));
    }

    #[test]
    fn test_missing_anchor_and_content() {
        let mut tree = NodeTree::new();
        let mut controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();

        let err = controller.open(&mut tree, OpenRequest::default()).unwrap_err();
        assert_eq!(err, TooltipError::MissingAnchor);

        let ghost = NodeId::new(999);
        let err = controller.open(&mut tree, OpenRequest::anchor(ghost)).unwrap_err();
        assert_eq!(err, TooltipError::UnknownNode(ghost));
    }

    #[test]
    fn test_anchorless_open_places_at_origin() {
        let mut tree = NodeTree::new();
        let config = TooltipConfig::default().with_position("bottomRight");
        let mut controller = FloatingPanelController::new(&mut tree, config).unwrap();

        let outcome = controller.open(&mut tree, OpenRequest::literal("hi")).unwrap();

        assert_eq!(outcome, OpenOutcome::Shown);
        assert_eq!(tree.rect(controller.panel()).unwrap().origin(), Point::ZERO);
    }

    #[test]
    fn test_reposition_keeps_visibility() {
        let mut tree = NodeTree::new();
        let config = TooltipConfig::default().with_position("bottomRight");
        let mut controller = FloatingPanelController::new(&mut tree, config).unwrap();
        let panel = controller.panel();
        tree.set_rect(panel, Rect::new(0.0, 0.0, 40.0, 30.0)).unwrap();

        let placement = controller
            .reposition(&mut tree, PlacementTarget::Anchor(Rect::new(10.0, 10.0, 10.0, 10.0)))
            .unwrap();

        assert_eq!(placement.origin, Point::new(20.0, 20.0));
        assert_eq!(tree.rect(panel).unwrap().size(), Size::new(40.0, 30.0));
        assert!(!tree.is_visible(panel));
    }

    #[test]
    fn test_missing_fetcher_is_a_fetch_failure() {
        let mut tree = NodeTree::new();
        let config = TooltipConfig::default().with_fetch(true);
        let mut controller = FloatingPanelController::new(&mut tree, config).unwrap();
        let a = anchor(&mut tree, Some("/help"), None);

        let err = controller.open(&mut tree, OpenRequest::anchor(a)).unwrap_err();

        assert!(matches!(err, TooltipError::FetchFailure { .. }));
        assert!(controller.cache().is_empty());
        assert!(!controller.is_open(&tree));
    }

    #[test]
    fn test_loading_message_while_pending() {
        let mut tree = NodeTree::new();
        let config = TooltipConfig::default().with_fetch(true);
        let mut controller = FloatingPanelController::new(&mut tree, config)
            .unwrap()
            .with_fetcher(|_: FetchTicket, _: FetchResponder| {});
        let a = anchor(&mut tree, Some("/help"), None);

        let outcome = controller.open(&mut tree, OpenRequest::anchor(a)).unwrap();

        assert_eq!(outcome, OpenOutcome::Pending);
        assert_eq!(tree.html(controller.body()), Some("Loading..."));
        assert!(!controller.is_open(&tree));
    }

    #[test]
    fn test_detach_closes_current_anchor() {
        let mut tree = NodeTree::new();
        let mut controller = FloatingPanelController::new(&mut tree, TooltipConfig::default()).unwrap();
        let a = anchor(&mut tree, Some("hi"), None);
        controller.attach(a).unwrap();
        controller.open(&mut tree, OpenRequest::anchor(a)).unwrap();

        controller.detach(&mut tree, a);

        assert!(controller.anchors().is_empty());
        assert!(!controller.is_open(&tree));
    }
}
