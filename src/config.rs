//! Declarative cursor configuration shared between the embedding application
//! and the synchronizer.
//!
//! The configuration is a plain value object: the embedding layer owns it,
//! hands copies to [`CursorSynchronizer`](crate::sync::CursorSynchronizer),
//! and receives updated copies back whenever user interaction moves a cursor.
//! Neither side ever holds a live reference into the other's state.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// CrosshairStyle
// ─────────────────────────────────────────────────────────────────────────────

/// Which crosshair lines a cursor renders, spanning the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrosshairStyle {
    Horizontal,
    Vertical,
    Both,
}

impl CrosshairStyle {
    /// Whether a vertical crosshair line is part of this style.
    pub fn has_vertical(self) -> bool {
        matches!(self, CrosshairStyle::Vertical | CrosshairStyle::Both)
    }

    /// Whether a horizontal crosshair line is part of this style.
    pub fn has_horizontal(self) -> bool {
        matches!(self, CrosshairStyle::Horizontal | CrosshairStyle::Both)
    }
}

impl Default for CrosshairStyle {
    fn default() -> Self {
        CrosshairStyle::Both
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CursorModel
// ─────────────────────────────────────────────────────────────────────────────

/// Desired state of an individual cursor.
///
/// The target series is identified by name, not index: series order and
/// identity on the chart may change independently of this configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorModel {
    /// Desired data-space x position.
    pub x: f64,
    /// Desired data-space y position.
    pub y: f64,
    /// Free-form label, displayed by the embedding application.
    pub label: String,
    /// Name of the series this cursor snaps to.
    pub series_name: String,
    /// Whether the cursor is rendered at all.
    pub visible: bool,
}

impl CursorModel {
    pub fn new(x: f64, y: f64, series_name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: String::new(),
            series_name: series_name.into(),
            visible: true,
        }
    }
}

impl Default for CursorModel {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            label: String::new(),
            series_name: String::new(),
            visible: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CursorOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Widget-wide cursor settings plus the ordered list of per-cursor models.
///
/// Order is significant: index `i` of `cursors` corresponds to the i-th live
/// cursor created by the synchronizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorOptions {
    /// Crosshair style applied to every cursor.
    pub crosshair_style: CrosshairStyle,
    /// Whether the embedding layer shows the snapped value next to cursors.
    pub show_value: bool,
    /// Whether the embedding layer shows cursor labels.
    pub show_label: bool,
    /// Desired cursors, in creation order.
    pub cursors: Vec<CursorModel>,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            crosshair_style: CrosshairStyle::Both,
            show_value: true,
            show_label: false,
            cursors: Vec::new(),
        }
    }
}
