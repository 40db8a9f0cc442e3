//! Reference [`ChartSurface`] implementation backed by `egui_plot`.
//!
//! [`EguiScatterChart`] renders its series through an `egui_plot::Plot` and
//! paints the cursor engine's retained shapes as a pixel-space overlay on top
//! of the plot area. It also normalizes pointer input to chart pixels and
//! synthesizes the chart redraw event whenever the plot bounds, the plot
//! rectangle, or the series data change.

use egui::{Color32, CursorIcon, Pos2, Rect, Stroke};
use egui_plot::{Legend, MarkerShape, Plot, Points};

use crate::chart::{
    AxisExtremes, ChartSurface, PanZoomConfig, PixelPosition, PointerEvent, PointerKind,
    PointerModifiers, SeriesPoint, ShapeId, ShapeStyle,
};
use crate::sync::CursorSynchronizer;

// ─────────────────────────────────────────────────────────────────────────────
// Series
// ─────────────────────────────────────────────────────────────────────────────

/// One scatter series: a name, a look, and its points.
pub struct ScatterSeries {
    pub name: String,
    pub color: Color32,
    pub marker: MarkerShape,
    pub points: Vec<SeriesPoint>,
}

impl ScatterSeries {
    pub fn new(
        name: impl Into<String>,
        color: Color32,
        marker: MarkerShape,
        points: Vec<[f64; 2]>,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            marker,
            points: points
                .into_iter()
                .map(|p| SeriesPoint::new(p[0], p[1]))
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Retained overlay shapes
// ─────────────────────────────────────────────────────────────────────────────

enum ShapeKind {
    Line {
        from: PixelPosition,
        to: PixelPosition,
    },
    Marker {
        marker: MarkerShape,
        center: PixelPosition,
        size: f32,
    },
}

struct RetainedShape {
    id: ShapeId,
    kind: ShapeKind,
    style: ShapeStyle,
}

impl RetainedShape {
    /// Whether a chart-pixel position falls within this shape's hit area.
    fn hit(&self, x: f64, y: f64) -> bool {
        match self.kind {
            ShapeKind::Line { from, to } => {
                segment_distance(x, y, from, to) <= self.style.stroke_width as f64 / 2.0
            }
            ShapeKind::Marker { center, size, .. } => {
                let dx = x - center.x;
                let dy = y - center.y;
                (dx * dx + dy * dy).sqrt() <= size as f64 / 2.0
            }
        }
    }
}

fn segment_distance(x: f64, y: f64, a: PixelPosition, b: PixelPosition) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (x - a.x, y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * abx - x, a.y + t * aby - y);
    (cx * cx + cy * cy).sqrt()
}

// ─────────────────────────────────────────────────────────────────────────────
// EguiScatterChart
// ─────────────────────────────────────────────────────────────────────────────

/// A scatter chart widget implementing [`ChartSurface`] on top of `egui_plot`.
pub struct EguiScatterChart {
    series: Vec<ScatterSeries>,
    pan_zoom: PanZoomConfig,
    icon_override: Option<CursorIcon>,
    selection_mode: bool,
    shapes: Vec<RetainedShape>,
    next_shape_id: u64,

    // Last frame's pixel mapping; conversions are undefined until the first
    // frame has rendered.
    plot_rect: Rect,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
    frame_valid: bool,
    data_dirty: bool,
}

impl EguiScatterChart {
    pub fn new(series: Vec<ScatterSeries>) -> Self {
        Self {
            series,
            pan_zoom: PanZoomConfig::default(),
            icon_override: None,
            selection_mode: false,
            shapes: Vec::new(),
            next_shape_id: 0,
            plot_rect: Rect::NOTHING,
            x_bounds: (0.0, 1.0),
            y_bounds: (0.0, 1.0),
            frame_valid: false,
            data_dirty: false,
        }
    }

    /// Enable or disable point-selection mode (the cursor click passthrough).
    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.selection_mode = enabled;
    }

    /// Replace the points of a named series. Triggers a chart redraw event on
    /// the next frame.
    pub fn replace_points(&mut self, series: &str, points: Vec<[f64; 2]>) {
        if let Some(s) = self.series.iter_mut().find(|s| s.name == series) {
            s.points = points
                .into_iter()
                .map(|p| SeriesPoint::new(p[0], p[1]))
                .collect();
            self.data_dirty = true;
        }
    }

    /// Render the chart, route pointer input, and flush cursor repaints.
    /// Call once per frame.
    pub fn show(&mut self, ui: &mut egui::Ui, sync: &mut CursorSynchronizer, plot_id: &str) {
        let allow_drag = self.pan_zoom.panning_enabled;
        let allow_zoom = self.pan_zoom.zoom_enabled;

        let plot = Plot::new(plot_id.to_owned())
            .allow_drag(allow_drag)
            .allow_scroll(allow_zoom)
            .allow_zoom(allow_zoom)
            .allow_boxed_zoom(allow_zoom)
            .legend(Legend::default());

        let response = plot.show(ui, |plot_ui| {
            for s in &self.series {
                let pts: Vec<[f64; 2]> = s.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(s.name.clone(), pts)
                        .radius(3.0)
                        .shape(s.marker)
                        .color(s.color),
                );
                let selected: Vec<[f64; 2]> = s
                    .points
                    .iter()
                    .filter(|p| p.selected)
                    .map(|p| [p.x, p.y])
                    .collect();
                if !selected.is_empty() {
                    plot_ui.points(
                        Points::new("", selected)
                            .radius(5.5)
                            .shape(MarkerShape::Circle)
                            .color(Color32::WHITE),
                    );
                }
            }
            (plot_ui.plot_bounds(), plot_ui.response().rect)
        });
        let (bounds, rect) = response.inner;

        let xr = bounds.range_x();
        let yr = bounds.range_y();
        let new_x = (*xr.start(), *xr.end());
        let new_y = (*yr.start(), *yr.end());
        let redrawn = !self.frame_valid
            || new_x != self.x_bounds
            || new_y != self.y_bounds
            || rect != self.plot_rect
            || self.data_dirty;
        self.plot_rect = rect;
        self.x_bounds = new_x;
        self.y_bounds = new_y;
        self.frame_valid = true;
        self.data_dirty = false;

        if redrawn {
            sync.handle_chart_redraw(self);
        }

        self.route_pointer_events(ui, sync, rect);
        sync.tick(self);

        self.paint_overlay(ui, rect);
        self.apply_cursor_icon(ui, rect);
    }

    fn route_pointer_events(
        &mut self,
        ui: &mut egui::Ui,
        sync: &mut CursorSynchronizer,
        rect: Rect,
    ) {
        let (events, modifiers) = ui.ctx().input(|i| (i.events.clone(), i.modifiers));
        let modifiers = PointerModifiers {
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            shift: modifiers.shift,
            command: modifiers.command,
        };
        for event in events {
            let (pos, kind) = match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => (
                    pos,
                    if pressed {
                        PointerKind::Down
                    } else {
                        PointerKind::Up
                    },
                ),
                egui::Event::PointerMoved(pos) => (pos, PointerKind::Move),
                _ => continue,
            };
            let pointer = PointerEvent {
                x: (pos.x - rect.min.x) as f64,
                y: (pos.y - rect.min.y) as f64,
                kind,
                modifiers,
            };
            sync.handle_pointer(self, &pointer);
        }
    }

    fn paint_overlay(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let mut order: Vec<&RetainedShape> = self.shapes.iter().collect();
        order.sort_by_key(|s| s.style.z_index);

        for shape in order {
            // Interactor hit areas are invisible.
            if shape.style.opacity <= 0.0 {
                continue;
            }
            let color = apply_opacity(shape.style.stroke, shape.style.opacity);
            let stroke = Stroke::new(shape.style.stroke_width, color);
            match shape.kind {
                ShapeKind::Line { from, to } => {
                    painter.line_segment([to_screen(rect, from), to_screen(rect, to)], stroke);
                }
                ShapeKind::Marker {
                    marker,
                    center,
                    size,
                } => {
                    paint_marker(&painter, marker, to_screen(rect, center), size, stroke);
                }
            }
        }
    }

    fn apply_cursor_icon(&self, ui: &egui::Ui, rect: Rect) {
        let mut icon = self.icon_override;
        if icon.is_none() {
            if let Some(pos) = ui.ctx().input(|i| i.pointer.hover_pos()) {
                let x = (pos.x - rect.min.x) as f64;
                let y = (pos.y - rect.min.y) as f64;
                // Topmost hit area wins.
                icon = self
                    .shapes
                    .iter()
                    .filter(|s| s.style.hover_icon.is_some() && s.hit(x, y))
                    .max_by_key(|s| s.style.z_index)
                    .and_then(|s| s.style.hover_icon);
            }
        }
        if let Some(icon) = icon {
            ui.ctx().output_mut(|o| o.cursor_icon = icon);
        }
    }
}

fn to_screen(rect: Rect, p: PixelPosition) -> Pos2 {
    Pos2::new(rect.min.x + p.x as f32, rect.min.y + p.y as f32)
}

fn apply_opacity(color: Color32, opacity: f32) -> Color32 {
    if opacity >= 1.0 {
        return color;
    }
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
}

fn paint_marker(painter: &egui::Painter, marker: MarkerShape, center: Pos2, size: f32, stroke: Stroke) {
    let r = size / 2.0;
    match marker {
        MarkerShape::Square => {
            let rect = Rect::from_center_size(center, egui::vec2(size, size));
            painter.rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Middle);
        }
        MarkerShape::Diamond => {
            let points = vec![
                Pos2::new(center.x, center.y - r),
                Pos2::new(center.x + r, center.y),
                Pos2::new(center.x, center.y + r),
                Pos2::new(center.x - r, center.y),
            ];
            painter.add(egui::Shape::closed_line(points, stroke));
        }
        _ => {
            painter.circle_stroke(center, r, stroke);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChartSurface
// ─────────────────────────────────────────────────────────────────────────────

impl ChartSurface for EguiScatterChart {
    fn series_count(&self) -> usize {
        self.series.len()
    }

    fn series_name(&self, series: usize) -> Option<&str> {
        self.series.get(series).map(|s| s.name.as_str())
    }

    fn find_series(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|s| s.name == name)
    }

    fn points(&self, series: usize) -> &[SeriesPoint] {
        self.series
            .get(series)
            .map(|s| s.points.as_slice())
            .unwrap_or(&[])
    }

    fn set_point_selected(&mut self, series: usize, point: usize, selected: bool, accumulate: bool) {
        if !accumulate {
            for s in &mut self.series {
                for p in &mut s.points {
                    p.selected = false;
                }
            }
        }
        if let Some(p) = self
            .series
            .get_mut(series)
            .and_then(|s| s.points.get_mut(point))
        {
            p.selected = selected;
        }
    }

    fn series_color(&self, series: usize) -> Option<Color32> {
        self.series.get(series).map(|s| s.color)
    }

    fn series_marker(&self, series: usize) -> Option<MarkerShape> {
        self.series.get(series).map(|s| s.marker)
    }

    fn x_to_pixel(&self, _series: usize, value: f64) -> f64 {
        let (min, max) = self.x_bounds;
        if max <= min {
            return 0.0;
        }
        (value - min) / (max - min) * self.plot_rect.width() as f64
    }

    fn y_to_pixel(&self, _series: usize, value: f64) -> f64 {
        let (min, max) = self.y_bounds;
        if max <= min {
            return 0.0;
        }
        // Pixel y grows downward.
        (1.0 - (value - min) / (max - min)) * self.plot_rect.height() as f64
    }

    fn x_extremes(&self, _series: usize) -> AxisExtremes {
        AxisExtremes::new(self.x_bounds.0, self.x_bounds.1)
    }

    fn y_extremes(&self, _series: usize) -> AxisExtremes {
        AxisExtremes::new(self.y_bounds.0, self.y_bounds.1)
    }

    fn pan_zoom(&self) -> PanZoomConfig {
        self.pan_zoom
    }

    fn set_pan_zoom(&mut self, config: PanZoomConfig) {
        self.pan_zoom = config;
    }

    fn set_cursor_icon(&mut self, icon: Option<CursorIcon>) {
        self.icon_override = icon;
    }

    fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    fn draw_line(&mut self, from: PixelPosition, to: PixelPosition, style: ShapeStyle) -> ShapeId {
        let id = ShapeId(self.next_shape_id);
        self.next_shape_id += 1;
        self.shapes.push(RetainedShape {
            id,
            kind: ShapeKind::Line { from, to },
            style,
        });
        id
    }

    fn draw_marker(
        &mut self,
        marker: MarkerShape,
        center: PixelPosition,
        size: f32,
        style: ShapeStyle,
    ) -> ShapeId {
        let id = ShapeId(self.next_shape_id);
        self.next_shape_id += 1;
        self.shapes.push(RetainedShape {
            id,
            kind: ShapeKind::Marker {
                marker,
                center,
                size,
            },
            style,
        });
        id
    }

    fn remove_shape(&mut self, shape: ShapeId) {
        self.shapes.retain(|s| s.id != shape);
    }
}
