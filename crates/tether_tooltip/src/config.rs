//! Controller configuration.
//!
//! Loaded once from TOML or built in code with the `with_*` setters.
//!
//! ```toml
//! mode = "click"
//! uses_fetch = true
//! position = "bottom-center"
//! show_delay_ms = 150
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use tether_dom::Corner;

use crate::error::{TooltipError, TooltipResult};
use crate::placement::PlacementSpec;

/// Default panel markup.
pub const DEFAULT_TEMPLATE: &str = concat!(
    r#"<div class="tooltip">"#,
    r#"<div class="tooltip-inner">"#,
    r#"<div class="tooltip-head"></div>"#,
    r#"<div class="tooltip-body"></div>"#,
    "</div>",
    r#"<div class="tooltip-arrow"></div>"#,
    "</div>",
);

/// What opens the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Pointer enter opens, pointer leave closes.
    #[default]
    Hover,
    /// Click toggles.
    Click,
}

/// Text measurement used to size the panel.
///
/// Monospace estimate: every character is `char_width` wide, lines wrap at
/// `max_width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelMetrics {
    /// Width of one character.
    pub char_width: f32,
    /// Height of one line.
    pub line_height: f32,
    /// Padding inside the panel, per side.
    pub padding: f32,
    /// Maximum content width before wrapping.
    pub max_width: f32,
}

impl Default for PanelMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            padding: 8.0,
            max_width: 300.0,
        }
    }
}

/// Configuration for one floating panel controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Selector for the anchors a registry binds the controller to.
    pub delegate: String,
    /// What opens the panel.
    pub mode: TriggerMode,
    /// Treat resolved content as a key for the content fetcher.
    pub uses_fetch: bool,
    /// Follow the pointer instead of sticking to the anchor.
    pub follow_pointer: bool,
    /// Corner of the anchor (or pointer) the panel is placed at.
    pub position: String,
    /// Show the loading message while a fetch is outstanding.
    pub show_loading: bool,
    /// Body text used while loading.
    pub loading_message: String,
    /// Show the head region when a title resolves.
    pub show_title: bool,
    /// Anchor attribute holding the title.
    pub title_attribute: String,
    /// Anchor attribute holding the content (or content key).
    pub content_attribute: String,
    /// Minimum interval between handled pointer moves.
    pub pointer_throttle_ms: u64,
    /// Extra horizontal offset.
    pub x_offset: i32,
    /// Extra vertical offset.
    pub y_offset: i32,
    /// Delay before an anchor-relative panel is revealed.
    pub show_delay_ms: u64,
    /// Selector for the head region inside the template.
    pub title_selector: String,
    /// Selector for the body region inside the template.
    pub body_selector: String,
    /// Panel markup.
    pub template: String,
    /// Text measurement.
    pub metrics: PanelMetrics,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            delegate: ".js-tooltip".to_string(),
            mode: TriggerMode::Hover,
            uses_fetch: false,
            follow_pointer: false,
            position: Corner::TopRight.name().to_string(),
            show_loading: true,
            loading_message: "Loading...".to_string(),
            show_title: true,
            title_attribute: "title".to_string(),
            content_attribute: "data-tooltip".to_string(),
            pointer_throttle_ms: 50,
            x_offset: 0,
            y_offset: 0,
            show_delay_ms: 0,
            title_selector: ".tooltip-head".to_string(),
            body_selector: ".tooltip-body".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            metrics: PanelMetrics::default(),
        }
    }
}

impl TooltipConfig {
    /// Parses a configuration from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::Config`] if the TOML is malformed.
    pub fn from_toml_str(source: &str) -> TooltipResult<Self> {
        toml::from_str(source).map_err(|e| TooltipError::Config(e.to_string()))
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`TooltipError::Config`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> TooltipResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| TooltipError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Sets the trigger mode.
    #[must_use]
    pub fn with_mode(mut self, mode: TriggerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables deferred content fetching.
    #[must_use]
    pub fn with_fetch(mut self, uses_fetch: bool) -> Self {
        self.uses_fetch = uses_fetch;
        self
    }

    /// Enables pointer following.
    #[must_use]
    pub fn with_follow_pointer(mut self, follow: bool) -> Self {
        self.follow_pointer = follow;
        self
    }

    /// Sets the placement corner by name.
    #[must_use]
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Sets the placement offsets.
    #[must_use]
    pub fn with_offsets(mut self, x: i32, y: i32) -> Self {
        self.x_offset = x;
        self.y_offset = y;
        self
    }

    /// Sets the reveal delay.
    #[must_use]
    pub fn with_show_delay(mut self, delay_ms: u64) -> Self {
        self.show_delay_ms = delay_ms;
        self
    }

    /// Sets the pointer-move throttle interval.
    #[must_use]
    pub fn with_pointer_throttle(mut self, interval_ms: u64) -> Self {
        self.pointer_throttle_ms = interval_ms;
        self
    }

    /// Enables or disables the head region.
    #[must_use]
    pub fn with_show_title(mut self, show: bool) -> Self {
        self.show_title = show;
        self
    }

    /// Enables or disables the loading message.
    #[must_use]
    pub fn with_show_loading(mut self, show: bool) -> Self {
        self.show_loading = show;
        self
    }

    /// Sets the panel template and its region selectors.
    #[must_use]
    pub fn with_template(
        mut self,
        template: impl Into<String>,
        title_selector: impl Into<String>,
        body_selector: impl Into<String>,
    ) -> Self {
        self.template = template.into();
        self.title_selector = title_selector.into();
        self.body_selector = body_selector.into();
        self
    }

    /// Builds the placement spec.
    ///
    /// An unparseable position is kept as `None` so each placement mode can
    /// fall back to its own default corner.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn placement(&self) -> PlacementSpec {
        let corner = Corner::parse(&self.position);
        if corner.is_none() {
            warn!(position = %self.position, "unknown corner name, using fallback corners");
        }
        PlacementSpec::new(
            corner,
            self.x_offset as f32,
            self.y_offset as f32,
            self.follow_pointer,
        )
    }
}
