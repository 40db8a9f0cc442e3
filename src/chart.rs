//! The charting-surface collaborator interface.
//!
//! The cursor engine does not render a chart itself; it talks to one through
//! [`ChartSurface`]. The trait covers exactly what the engine consumes:
//! series/point lookup, per-series axis conversion and extremes, point
//! selection, pan/zoom configuration, cursor-icon control, and primitive
//! drawing with lifetime-managed removal.
//!
//! A reference implementation backed by `egui_plot` lives in
//! [`crate::egui_chart`]; tests use a mock.

use downcast_rs::{impl_downcast, Downcast};
use egui::Color32;
use egui::CursorIcon;
use egui_plot::MarkerShape;

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// One data point of a series, with its current selection state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    pub selected: bool,
}

impl SeriesPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            selected: false,
        }
    }
}

/// Current visible range of one axis, in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtremes {
    pub min: f64,
    pub max: f64,
}

impl AxisExtremes {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether a data-space value lies within the visible range (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A position in chart-pixel space (origin at the plot area's top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pan / zoom
// ─────────────────────────────────────────────────────────────────────────────

/// The chart's pan/zoom interaction configuration.
///
/// Saved, disabled, and restored around a cursor drag so the gesture does not
/// pan or zoom the chart underneath the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanZoomConfig {
    pub panning_enabled: bool,
    pub zoom_enabled: bool,
}

impl PanZoomConfig {
    /// Configuration with all pan/zoom interaction off.
    pub fn disabled() -> Self {
        Self {
            panning_enabled: false,
            zoom_enabled: false,
        }
    }
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            panning_enabled: true,
            zoom_enabled: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a drawn shape, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub u64);

/// Which part of a cursor a shape realizes. Carried on every shape for
/// external diagnostics; the engine itself never reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPart {
    VerticalCrosshair,
    VerticalCrosshairInteractor,
    HorizontalCrosshair,
    HorizontalCrosshairInteractor,
    Target,
    TargetInteractor,
}

/// Diagnostic identity of a drawn shape: which cursor, which part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeTag {
    pub cursor_id: u64,
    pub part: CursorPart,
}

/// Style attributes for a drawn shape.
///
/// An `opacity` of zero marks an interactor: an invisible, wide hit area that
/// still participates in pointer targeting and carries a hover icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub stroke: Color32,
    pub fill: Color32,
    pub stroke_width: f32,
    pub z_index: i32,
    pub opacity: f32,
    /// Icon to show while the pointer hovers this shape.
    pub hover_icon: Option<CursorIcon>,
    pub tag: ShapeTag,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pointer events
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Keyboard modifier state accompanying a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub command: bool,
}

impl PointerModifiers {
    /// Whether this modifier set requests an additive selection toggle.
    pub fn additive(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// A pointer event normalized to chart-pixel coordinates by the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
    pub modifiers: PointerModifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind,
            modifiers: PointerModifiers::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChartSurface
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the cursor engine needs from a chart.
///
/// Axis conversions and extremes are per-series, since a series carries its
/// own axis binding. All pixel coordinates are chart pixels (origin at the
/// plot area's top-left, y growing downward).
pub trait ChartSurface: Downcast {
    /// Number of series currently on the chart.
    fn series_count(&self) -> usize;

    /// Name of a series, or `None` for an out-of-range index.
    fn series_name(&self, series: usize) -> Option<&str>;

    /// Resolve a series name to its current index.
    fn find_series(&self, name: &str) -> Option<usize>;

    /// The points of a series. Out-of-range indices yield an empty slice.
    fn points(&self, series: usize) -> &[SeriesPoint];

    /// Set a point's selection state. With `accumulate` false, every other
    /// point on the chart is deselected first (exclusive select).
    fn set_point_selected(&mut self, series: usize, point: usize, selected: bool, accumulate: bool);

    /// Explicit color of a series, if one is set.
    fn series_color(&self, series: usize) -> Option<Color32>;

    /// Marker shape of a series, if one is set.
    fn series_marker(&self, series: usize) -> Option<MarkerShape>;

    /// Convert a data-space x value to a chart pixel via the series' x axis.
    fn x_to_pixel(&self, series: usize, value: f64) -> f64;

    /// Convert a data-space y value to a chart pixel via the series' y axis.
    fn y_to_pixel(&self, series: usize, value: f64) -> f64;

    /// Visible extremes of the series' x axis.
    fn x_extremes(&self, series: usize) -> AxisExtremes;

    /// Visible extremes of the series' y axis.
    fn y_extremes(&self, series: usize) -> AxisExtremes;

    /// Current pan/zoom interaction configuration.
    fn pan_zoom(&self) -> PanZoomConfig;

    /// Replace the pan/zoom interaction configuration.
    fn set_pan_zoom(&mut self, config: PanZoomConfig);

    /// Override the pointer icon for the chart container (`None` restores
    /// the default).
    fn set_cursor_icon(&mut self, icon: Option<CursorIcon>);

    /// Whether the chart is in point-selection mode (enables the cursor
    /// click-to-select passthrough).
    fn selection_mode(&self) -> bool;

    /// Draw a line between two chart-pixel positions.
    fn draw_line(&mut self, from: PixelPosition, to: PixelPosition, style: ShapeStyle) -> ShapeId;

    /// Draw a marker symbol centered on a chart-pixel position.
    fn draw_marker(
        &mut self,
        marker: MarkerShape,
        center: PixelPosition,
        size: f32,
        style: ShapeStyle,
    ) -> ShapeId;

    /// Remove a previously drawn shape. Unknown ids are ignored.
    fn remove_shape(&mut self, shape: ShapeId);
}

impl_downcast!(ChartSurface);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_contains_is_inclusive() {
        let ext = AxisExtremes::new(-1.0, 4.0);
        assert!(ext.contains(-1.0));
        assert!(ext.contains(4.0));
        assert!(ext.contains(0.0));
        assert!(!ext.contains(4.0001));
        assert!(!ext.contains(-1.0001));
    }

    #[test]
    fn additive_modifiers() {
        let mut m = PointerModifiers::default();
        assert!(!m.additive());
        m.shift = true;
        assert!(m.additive());
        m = PointerModifiers {
            ctrl: true,
            ..Default::default()
        };
        assert!(m.additive());
    }
}
