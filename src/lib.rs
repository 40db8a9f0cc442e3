//! plotcursor crate root: re-exports and module wiring.
//!
//! Interactive snap-to-point cursor overlays for scatter charts:
//! - `config`: declarative cursor configuration ([`CursorOptions`])
//! - `chart`: the [`ChartSurface`] collaborator trait a chart must implement
//! - `cursor`: one live cursor — snapping, drag gesture, rendering
//! - `sync`: the [`CursorSynchronizer`] reconciling live cursors against the
//!   configuration and relaying position feedback
//! - `egui_chart`: reference surface backed by egui/egui_plot
//!
//! The typical embedding wires a [`CursorSynchronizer`] to a chart, calls
//! [`CursorSynchronizer::reconcile`] whenever the chart or the configuration
//! changes, and listens on [`CursorSynchronizer::subscribe_options`] for
//! configurations updated by user drags.

mod app;
pub mod chart;
pub mod config;
pub mod cursor;
pub mod egui_chart;
pub mod sync;

// Public re-exports for a compact external API
pub use app::{run_scatter, ScatterCursorApp};
pub use chart::{
    AxisExtremes, ChartSurface, CursorPart, PanZoomConfig, PixelPosition, PointerEvent,
    PointerKind, PointerModifiers, SeriesPoint, ShapeId, ShapeStyle, ShapeTag,
};
pub use config::{CrosshairStyle, CursorModel, CursorOptions};
pub use cursor::{Cursor, CursorPosition, SnapMode};
pub use egui_chart::{EguiScatterChart, ScatterSeries};
pub use sync::CursorSynchronizer;
