//! # TETHER Floating Panels
//!
//! Tooltip-style panels attached to anchor elements:
//! - Open on hover or click, close on leave
//! - Corner-to-corner placement against an anchor, or following the pointer
//! - Title and body resolved from anchor attributes or literals
//! - Deferred content with a per-controller cache
//! - Lifecycle events over channels
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  FLOATING PANEL PIPELINE                │
//! ├────────────────────────────────────────────────────────┤
//! │  InputEvent → Registry → Controller → NodeTree panel   │
//! │                              ↓   ↑                      │
//! │                  ContentFetcher → responses → cache     │
//! │                              ↓                          │
//! │                     PanelEvent subscribers              │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller never blocks and never spawns. Time, input and fetch
//! answers are all pushed in by the embedding application:
//!
//! ```text
//! loop {
//!     registry.dispatch(&mut tree, event)?;   // pointer input
//!     registry.pump(&mut tree, now_ms);       // reveals + fetch answers
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod fetch;
pub mod placement;
pub mod registry;
pub mod traits;

pub use cache::{CacheEntry, ContentCache};
pub use config::{PanelMetrics, TooltipConfig, TriggerMode, DEFAULT_TEMPLATE};
pub use controller::{FetchCompletion, FloatingPanelController};
pub use error::{TooltipError, TooltipResult};
pub use events::{EventEmitter, PanelEvent};
pub use fetch::{response_channel, ContentFetcher, FetchResponder, FetchResponse, FetchTicket, StaticFetcher};
pub use placement::{Placement, PlacementSpec, PlacementTarget};
pub use registry::{ControllerId, TooltipRegistry};
pub use traits::{Closeable, OpenOutcome, OpenRequest, Openable, Positionable, SkipReason};
