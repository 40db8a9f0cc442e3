//! A single interactive cursor: crosshair lines plus a draggable target glyph
//! that snaps to the nearest data point of its bound series.
//!
//! A [`Cursor`] owns its rendered shapes on the [`ChartSurface`], its snapping
//! logic, and a drag state machine. It never talks to the configuration layer
//! directly; it reports completed moves through its position stream and the
//! [`CursorSynchronizer`](crate::sync::CursorSynchronizer) folds them back
//! into the configuration.
//!
//! Rendering is never synchronous: every mutation latches a redraw request,
//! and the owner flushes at most one repaint per frame via
//! [`Cursor::flush_redraw`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};

use egui::{Color32, CursorIcon};
use egui_plot::MarkerShape;

use crate::chart::{
    ChartSurface, CursorPart, PanZoomConfig, PixelPosition, PointerEvent, PointerKind,
    PointerModifiers, ShapeId, ShapeStyle, ShapeTag,
};
use crate::config::CrosshairStyle;

const VISUAL_STROKE_WIDTH: f32 = 2.0;
const INTERACTION_STROKE_WIDTH: f32 = 4.0;
// Draw above data and grid lines, and below tooltips.
const VISUAL_Z_INDEX: i32 = 5;
const INTERACTION_Z_INDEX: i32 = 6;
const TARGET_SIZE: f32 = 10.0;
const CLICK_SEARCH_RADIUS: f64 = 5.0;
const DEFAULT_COLOR: Color32 = Color32::GRAY;

static NEXT_CURSOR_ID: AtomicU64 = AtomicU64::new(0);

// ─────────────────────────────────────────────────────────────────────────────
// Public vocabulary
// ─────────────────────────────────────────────────────────────────────────────

/// Which pixel-space distance a nearest-point search minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapMode {
    /// Horizontal distance only.
    X,
    /// Vertical distance only.
    Y,
    /// Euclidean distance.
    XY,
}

/// Event emitted on the position stream after a completed drag gesture or a
/// programmatic snap that changed the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
    /// Series the cursor is bound to, `None` while unresolved.
    pub series: Option<usize>,
    /// Identity of the emitting cursor.
    pub cursor_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NearestPoint {
    series: usize,
    index: usize,
    x: f64,
    y: f64,
    distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrabbedPart {
    VerticalLine,
    HorizontalLine,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        mode: SnapMode,
        search_all_series: bool,
        start: PixelPosition,
        moved: bool,
        saved_pan_zoom: PanZoomConfig,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────────────────────────

/// One live cursor marker on a chart.
pub struct Cursor {
    id: u64,
    x: f64,
    y: f64,
    /// Series binding as requested by the owner; may be unresolved.
    requested_series: Option<usize>,
    /// Effective series used for axes and rendering, after the
    /// fall-back-to-last-series rule.
    bound_series: Option<usize>,
    crosshair_style: CrosshairStyle,
    show_target: bool,
    visible: bool,
    destroyed: bool,

    color: Color32,
    target_marker: MarkerShape,
    /// Full opacity when an exact data point sits at (x, y), half otherwise.
    opacity: f32,

    // Pixel-space cache, valid only for the chart's current axis extremes.
    x_pixel: f64,
    y_pixel: f64,
    in_x_range: bool,
    in_y_range: bool,

    redraw_requested: bool,
    redraw_waiters: Vec<Sender<()>>,
    position_listeners: Vec<Sender<CursorPosition>>,
    visuals: Vec<ShapeId>,
    drag: DragState,
}

impl Cursor {
    /// Create a cursor bound to `series`, resolve its axes, render it, and
    /// compute its pixel cache.
    ///
    /// The owner must forward the chart's redraw event to
    /// [`Cursor::handle_chart_redraw`] for the cursor's whole lifetime, and
    /// flush deferred repaints once per frame with [`Cursor::flush_redraw`].
    pub fn new(
        chart: &mut dyn ChartSurface,
        x: f64,
        y: f64,
        series: usize,
        show_target: bool,
        crosshair_style: CrosshairStyle,
    ) -> Self {
        let mut cursor = Self {
            id: NEXT_CURSOR_ID.fetch_add(1, Ordering::Relaxed),
            x,
            y,
            requested_series: Some(series),
            bound_series: None,
            crosshair_style,
            show_target,
            visible: true,
            destroyed: false,
            color: DEFAULT_COLOR,
            target_marker: MarkerShape::Circle,
            opacity: 0.5,
            x_pixel: 0.0,
            y_pixel: 0.0,
            in_x_range: false,
            in_y_range: false,
            redraw_requested: false,
            redraw_waiters: Vec::new(),
            position_listeners: Vec::new(),
            visuals: Vec::new(),
            drag: DragState::Idle,
        };
        cursor.update_series_state(chart);
        cursor.update_point_state(chart);
        cursor.draw(chart);
        cursor
    }

    /// Identity token, carried on every drawn shape and position event.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// The requested series binding (`None` when unresolved).
    pub fn series(&self) -> Option<usize> {
        self.requested_series
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn crosshair_style(&self) -> CrosshairStyle {
        self.crosshair_style
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Move the cursor to a data-space position and schedule a repaint.
    pub fn set_position(&mut self, chart: &dyn ChartSurface, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.update_point_state(chart);
        self.request_redraw();
    }

    /// Re-bind the cursor to another series (or to the unresolved state) and
    /// schedule a repaint.
    pub fn set_series(&mut self, chart: &dyn ChartSurface, series: Option<usize>) {
        self.requested_series = series;
        self.update_series_state(chart);
        self.update_point_state(chart);
        self.request_redraw();
    }

    pub fn set_crosshair_style(&mut self, style: CrosshairStyle) {
        self.crosshair_style = style;
        self.request_redraw();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.request_redraw();
    }

    pub fn set_show_target(&mut self, show_target: bool) {
        self.show_target = show_target;
        self.request_redraw();
    }

    // ── Pixel space ──────────────────────────────────────────────────────────

    /// The cached pixel position of the cursor's current (x, y).
    pub fn pixel_position(&self) -> PixelPosition {
        PixelPosition::new(self.x_pixel, self.y_pixel)
    }

    /// Convert a data-space coordinate to pixels via the cursor's bound axes.
    /// Falls back to the cached position while the binding is unresolved.
    pub fn pixel_position_of(&self, chart: &dyn ChartSurface, x: f64, y: f64) -> PixelPosition {
        match self.bound_series {
            Some(series) => {
                PixelPosition::new(chart.x_to_pixel(series, x), chart.y_to_pixel(series, y))
            }
            None => self.pixel_position(),
        }
    }

    // ── Snapping ─────────────────────────────────────────────────────────────

    /// Snap to the nearest point of the cursor's own series under Euclidean
    /// distance. Pixel arguments default to the cursor's cached position.
    pub fn snap_to_nearest_point_on_series(
        &mut self,
        chart: &dyn ChartSurface,
        x_pixel: Option<f64>,
        y_pixel: Option<f64>,
        visible_only: bool,
    ) {
        self.snap_to_nearest_point(chart, x_pixel, y_pixel, false, SnapMode::XY, visible_only);
    }

    /// General nearest-point snap.
    ///
    /// With `search_all_series` the candidates come from every series on the
    /// chart and a successful match re-binds the cursor. With `visible_only`
    /// candidates outside the current axis extremes lose to visible ones,
    /// falling back to the global nearest when nothing is visible. A search
    /// over an empty candidate set leaves the position untouched.
    pub fn snap_to_nearest_point(
        &mut self,
        chart: &dyn ChartSurface,
        x_pixel: Option<f64>,
        y_pixel: Option<f64>,
        search_all_series: bool,
        mode: SnapMode,
        visible_only: bool,
    ) {
        let px = x_pixel.unwrap_or(self.x_pixel);
        let py = y_pixel.unwrap_or(self.y_pixel);
        let previous = (self.x, self.y);

        let candidates: Vec<usize> = if search_all_series {
            (0..chart.series_count()).collect()
        } else {
            self.requested_series
                .filter(|&s| s < chart.series_count())
                .into_iter()
                .collect()
        };

        let nearest = Self::find_nearest_point(chart, &candidates, px, py, mode, visible_only);
        let Some(nearest) = nearest else {
            // No candidate points: no snap occurred.
            self.update_point_state(chart);
            self.request_redraw();
            return;
        };

        self.x = nearest.x;
        self.y = nearest.y;
        if search_all_series {
            self.requested_series = Some(nearest.series);
            self.update_series_state(chart);
        }
        self.update_point_state(chart);

        // Programmatic snaps report immediately; drag moves stay silent until
        // the gesture completes on pointer-up.
        if (self.x, self.y) != previous && matches!(self.drag, DragState::Idle) {
            self.emit_position();
        }
        self.request_redraw();
    }

    // ── Streams ──────────────────────────────────────────────────────────────

    /// Subscribe to the position stream. The channel disconnects when the
    /// cursor is destroyed.
    pub fn subscribe_position(&mut self) -> Receiver<CursorPosition> {
        let (tx, rx) = channel();
        self.position_listeners.push(tx);
        rx
    }

    /// One-shot signal resolved when the current (or next) coalesced redraw
    /// batch is flushed.
    pub fn redraw_settled(&mut self) -> Receiver<()> {
        let (tx, rx) = channel();
        self.redraw_waiters.push(tx);
        rx
    }

    // ── Events ───────────────────────────────────────────────────────────────

    /// React to the chart's redraw event: re-resolve the series binding,
    /// recompute the pixel cache, and repaint immediately. Absorbed as a
    /// no-op after destruction.
    pub fn handle_chart_redraw(&mut self, chart: &mut dyn ChartSurface) {
        if self.destroyed {
            return;
        }
        self.update_series_state(chart);
        self.update_point_state(chart);
        self.draw(chart);
    }

    /// Route a normalized pointer event through the drag state machine.
    /// Returns whether the event was consumed.
    pub fn handle_pointer(&mut self, chart: &mut dyn ChartSurface, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => self.begin_drag(chart, event),
            PointerKind::Move => self.drag_move(chart, event),
            PointerKind::Up => self.end_drag(chart, event),
        }
    }

    /// Whether a drag gesture is currently active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Flush the pending redraw batch, if any, and resolve outstanding
    /// [`Cursor::redraw_settled`] signals.
    pub fn flush_redraw(&mut self, chart: &mut dyn ChartSurface) {
        if !self.redraw_requested {
            return;
        }
        self.redraw_requested = false;
        self.draw(chart);
        for waiter in self.redraw_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }

    /// Remove all rendered shapes and close the position stream. Idempotent;
    /// later redraw or pointer callbacks become no-ops.
    pub fn destroy(&mut self, chart: &mut dyn ChartSurface) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.destroy_visuals(chart);
        self.position_listeners.clear();
        self.redraw_waiters.clear();
    }

    // ── Drag state machine ───────────────────────────────────────────────────

    fn begin_drag(&mut self, chart: &mut dyn ChartSurface, event: &PointerEvent) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(part) = self.hit_test(chart, event.x, event.y) else {
            return false;
        };
        let (mode, icon, search_all_series) = match part {
            GrabbedPart::Target => (SnapMode::XY, CursorIcon::Move, true),
            GrabbedPart::VerticalLine => (SnapMode::X, CursorIcon::ResizeColumn, false),
            GrabbedPart::HorizontalLine => (SnapMode::Y, CursorIcon::ResizeRow, false),
        };

        let saved_pan_zoom = chart.pan_zoom();
        chart.set_pan_zoom(PanZoomConfig::disabled());
        chart.set_cursor_icon(Some(icon));

        self.drag = DragState::Dragging {
            mode,
            search_all_series,
            start: PixelPosition::new(event.x, event.y),
            moved: false,
            saved_pan_zoom,
        };
        true
    }

    fn drag_move(&mut self, chart: &mut dyn ChartSurface, event: &PointerEvent) -> bool {
        let DragState::Dragging {
            mode,
            search_all_series,
            start,
            ..
        } = self.drag
        else {
            return false;
        };
        // The pointer has not actually moved yet: skip the snap so a plain
        // click can still select a point on release.
        if event.x == start.x && event.y == start.y {
            return true;
        }
        if let DragState::Dragging { moved, .. } = &mut self.drag {
            *moved = true;
        }
        self.snap_to_nearest_point(
            chart,
            Some(event.x),
            Some(event.y),
            search_all_series,
            mode,
            false,
        );
        true
    }

    fn end_drag(&mut self, chart: &mut dyn ChartSurface, event: &PointerEvent) -> bool {
        let DragState::Dragging {
            moved,
            saved_pan_zoom,
            ..
        } = self.drag
        else {
            return false;
        };
        self.drag = DragState::Idle;
        chart.set_pan_zoom(saved_pan_zoom);
        chart.set_cursor_icon(None);

        if !moved {
            self.click_select(chart, event.x, event.y, event.modifiers);
        }
        // Fired even without net movement, so observers can settle UI state.
        self.emit_position();
        true
    }

    fn click_select(
        &self,
        chart: &mut dyn ChartSurface,
        x_pixel: f64,
        y_pixel: f64,
        modifiers: PointerModifiers,
    ) {
        if !chart.selection_mode() {
            return;
        }
        let all: Vec<usize> = (0..chart.series_count()).collect();
        let Some(nearest) =
            Self::find_nearest_point(&*chart, &all, x_pixel, y_pixel, SnapMode::XY, false)
        else {
            return;
        };
        if nearest.distance >= CLICK_SEARCH_RADIUS {
            return;
        }
        if modifiers.additive() {
            let selected = chart
                .points(nearest.series)
                .get(nearest.index)
                .map(|p| p.selected)
                .unwrap_or(false);
            chart.set_point_selected(nearest.series, nearest.index, !selected, true);
        } else {
            chart.set_point_selected(nearest.series, nearest.index, true, false);
        }
    }

    /// Which part of the cursor, if any, a pointer-down at the given pixel
    /// position grabs. Mirrors the drawn interactor geometry.
    fn hit_test(&self, chart: &dyn ChartSurface, x_pixel: f64, y_pixel: f64) -> Option<GrabbedPart> {
        if self.destroyed || !self.visible {
            return None;
        }
        let series = self.bound_series?;

        // The target interactor sits above the crosshair lines.
        if self.in_x_range && self.in_y_range {
            let dx = x_pixel - self.x_pixel;
            let dy = y_pixel - self.y_pixel;
            if (dx * dx + dy * dy).sqrt() <= TARGET_SIZE as f64 / 2.0 {
                return Some(GrabbedPart::Target);
            }
        }
        let half_width = INTERACTION_STROKE_WIDTH as f64 / 2.0;
        if self.crosshair_style.has_vertical() && self.in_x_range {
            let extremes = chart.y_extremes(series);
            let a = chart.y_to_pixel(series, extremes.min);
            let b = chart.y_to_pixel(series, extremes.max);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            if (x_pixel - self.x_pixel).abs() <= half_width && y_pixel >= lo && y_pixel <= hi {
                return Some(GrabbedPart::VerticalLine);
            }
        }
        if self.crosshair_style.has_horizontal() && self.in_y_range {
            let extremes = chart.x_extremes(series);
            let a = chart.x_to_pixel(series, extremes.min);
            let b = chart.x_to_pixel(series, extremes.max);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            if (y_pixel - self.y_pixel).abs() <= half_width && x_pixel >= lo && x_pixel <= hi {
                return Some(GrabbedPart::HorizontalLine);
            }
        }
        None
    }

    // ── Internal state upkeep ────────────────────────────────────────────────

    fn update_series_state(&mut self, chart: &dyn ChartSurface) {
        let count = chart.series_count();
        self.bound_series = match self.requested_series {
            Some(series) if series < count => Some(series),
            // An unresolved binding falls back to the chart's last series;
            // with no series at all the cursor stays unbound and draws
            // nothing.
            _ if count > 0 => Some(count - 1),
            _ => None,
        };
        let Some(series) = self.bound_series else {
            return;
        };
        self.color = chart.series_color(series).unwrap_or(DEFAULT_COLOR);
        self.target_marker = chart.series_marker(series).unwrap_or(MarkerShape::Circle);
    }

    fn update_point_state(&mut self, chart: &dyn ChartSurface) {
        let Some(series) = self.bound_series else {
            return;
        };
        // Exact f64 comparison is intended: a snapped position is copied
        // verbatim from a data point.
        let exact = chart
            .points(series)
            .iter()
            .any(|p| p.x == self.x && p.y == self.y);
        self.opacity = if exact { 1.0 } else { 0.5 };

        self.x_pixel = chart.x_to_pixel(series, self.x);
        self.y_pixel = chart.y_to_pixel(series, self.y);
        self.in_x_range = chart.x_extremes(series).contains(self.x);
        self.in_y_range = chart.y_extremes(series).contains(self.y);
    }

    fn emit_position(&mut self) {
        let event = CursorPosition {
            x: self.x,
            y: self.y,
            series: self.requested_series,
            cursor_id: self.id,
        };
        self.position_listeners.retain(|tx| tx.send(event).is_ok());
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    fn draw(&mut self, chart: &mut dyn ChartSurface) {
        if self.destroyed {
            return;
        }
        self.destroy_visuals(chart);
        if !self.visible {
            return;
        }
        self.draw_vertical_crosshair(chart);
        self.draw_horizontal_crosshair(chart);
        self.draw_target(chart);
    }

    fn destroy_visuals(&mut self, chart: &mut dyn ChartSurface) {
        for shape in self.visuals.drain(..) {
            chart.remove_shape(shape);
        }
    }

    fn draw_vertical_crosshair(&mut self, chart: &mut dyn ChartSurface) {
        if !self.crosshair_style.has_vertical() || !self.in_x_range {
            return;
        }
        let Some(series) = self.bound_series else {
            return;
        };
        let extremes = chart.y_extremes(series);
        let from = PixelPosition::new(self.x_pixel, chart.y_to_pixel(series, extremes.min));
        let to = PixelPosition::new(self.x_pixel, chart.y_to_pixel(series, extremes.max));

        let visual = chart.draw_line(from, to, self.visual_style(CursorPart::VerticalCrosshair));
        let interactor = chart.draw_line(
            from,
            to,
            self.interactor_style(CursorPart::VerticalCrosshairInteractor, CursorIcon::ResizeColumn),
        );
        self.visuals.push(visual);
        self.visuals.push(interactor);
    }

    fn draw_horizontal_crosshair(&mut self, chart: &mut dyn ChartSurface) {
        if !self.crosshair_style.has_horizontal() || !self.in_y_range {
            return;
        }
        let Some(series) = self.bound_series else {
            return;
        };
        let extremes = chart.x_extremes(series);
        let from = PixelPosition::new(chart.x_to_pixel(series, extremes.min), self.y_pixel);
        let to = PixelPosition::new(chart.x_to_pixel(series, extremes.max), self.y_pixel);

        let visual = chart.draw_line(from, to, self.visual_style(CursorPart::HorizontalCrosshair));
        let interactor = chart.draw_line(
            from,
            to,
            self.interactor_style(CursorPart::HorizontalCrosshairInteractor, CursorIcon::ResizeRow),
        );
        self.visuals.push(visual);
        self.visuals.push(interactor);
    }

    fn draw_target(&mut self, chart: &mut dyn ChartSurface) {
        if !self.in_x_range || !self.in_y_range {
            return;
        }
        let center = PixelPosition::new(self.x_pixel, self.y_pixel);
        if self.show_target {
            let visual = chart.draw_marker(
                self.target_marker,
                center,
                TARGET_SIZE,
                self.visual_style(CursorPart::Target),
            );
            self.visuals.push(visual);
        }
        // The interactor is drawn even when the glyph itself is hidden, so
        // the cursor can still be grabbed at its snapped position.
        let interactor = chart.draw_marker(
            MarkerShape::Circle,
            center,
            TARGET_SIZE,
            self.interactor_style(CursorPart::TargetInteractor, CursorIcon::Move),
        );
        self.visuals.push(interactor);
    }

    fn visual_style(&self, part: CursorPart) -> ShapeStyle {
        ShapeStyle {
            stroke: self.color,
            fill: self.color,
            stroke_width: VISUAL_STROKE_WIDTH,
            z_index: VISUAL_Z_INDEX,
            opacity: self.opacity,
            hover_icon: None,
            tag: ShapeTag {
                cursor_id: self.id,
                part,
            },
        }
    }

    fn interactor_style(&self, part: CursorPart, icon: CursorIcon) -> ShapeStyle {
        ShapeStyle {
            // A stroke and fill are still set so surfaces that cull fully
            // transparent shapes keep the hit area alive.
            stroke: Color32::BLACK,
            fill: Color32::BLACK,
            stroke_width: INTERACTION_STROKE_WIDTH,
            z_index: INTERACTION_Z_INDEX,
            opacity: 0.0,
            hover_icon: Some(icon),
            tag: ShapeTag {
                cursor_id: self.id,
                part,
            },
        }
    }

    // ── Nearest-point search ─────────────────────────────────────────────────

    fn find_nearest_point(
        chart: &dyn ChartSurface,
        series: &[usize],
        x_pixel: f64,
        y_pixel: f64,
        mode: SnapMode,
        visible_only: bool,
    ) -> Option<NearestPoint> {
        let mut nearest: Option<NearestPoint> = None;
        let mut nearest_visible: Option<NearestPoint> = None;

        for &s in series {
            if s >= chart.series_count() {
                continue;
            }
            let x_extremes = chart.x_extremes(s);
            let y_extremes = chart.y_extremes(s);
            for (index, point) in chart.points(s).iter().enumerate() {
                let distance = match mode {
                    SnapMode::X => (chart.x_to_pixel(s, point.x) - x_pixel).abs(),
                    SnapMode::Y => (chart.y_to_pixel(s, point.y) - y_pixel).abs(),
                    SnapMode::XY => {
                        let dx = chart.x_to_pixel(s, point.x) - x_pixel;
                        let dy = chart.y_to_pixel(s, point.y) - y_pixel;
                        (dx * dx + dy * dy).sqrt()
                    }
                };
                let candidate = NearestPoint {
                    series: s,
                    index,
                    x: point.x,
                    y: point.y,
                    distance,
                };
                if visible_only
                    && x_extremes.contains(point.x)
                    && y_extremes.contains(point.y)
                    && nearest_visible.map_or(true, |n| distance < n.distance)
                {
                    nearest_visible = Some(candidate);
                }
                if nearest.map_or(true, |n| distance < n.distance) {
                    nearest = Some(candidate);
                }
            }
        }

        if visible_only && nearest_visible.is_some() {
            return nearest_visible;
        }
        nearest
    }
}
