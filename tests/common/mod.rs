//! Shared mock chart surface for the integration tests.
//!
//! The mock maps data space to pixel space with a fixed scale of
//! [`PIXELS_PER_UNIT`] on both axes (no y inversion), records every drawn
//! shape together with its diagnostic tag, and counts draw/remove calls so
//! tests can observe rendering behavior.

#![allow(dead_code)]

use egui::{Color32, CursorIcon};
use egui_plot::MarkerShape;
use plotcursor::{
    AxisExtremes, ChartSurface, CursorPart, PanZoomConfig, PixelPosition, PointerEvent,
    PointerKind, PointerModifiers, SeriesPoint, ShapeId, ShapeStyle,
};

pub const PIXELS_PER_UNIT: f64 = 10.0;

pub struct MockSeries {
    pub name: String,
    pub color: Option<Color32>,
    pub marker: Option<MarkerShape>,
    pub points: Vec<SeriesPoint>,
}

#[derive(Clone, Copy)]
pub struct DrawnShape {
    pub id: ShapeId,
    pub style: ShapeStyle,
}

pub struct MockChart {
    pub series: Vec<MockSeries>,
    pub x_extremes: AxisExtremes,
    pub y_extremes: AxisExtremes,
    pub pan_zoom: PanZoomConfig,
    pub cursor_icon: Option<CursorIcon>,
    pub selection_mode: bool,
    pub shapes: Vec<DrawnShape>,
    pub draw_calls: usize,
    pub remove_calls: usize,
    next_shape_id: u64,
}

impl MockChart {
    pub fn new(series: Vec<(&str, Vec<(f64, f64)>)>) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|(name, points)| MockSeries {
                    name: name.to_string(),
                    color: Some(Color32::LIGHT_BLUE),
                    marker: Some(MarkerShape::Circle),
                    points: points
                        .into_iter()
                        .map(|(x, y)| SeriesPoint::new(x, y))
                        .collect(),
                })
                .collect(),
            x_extremes: AxisExtremes::new(-10.0, 10.0),
            y_extremes: AxisExtremes::new(-10.0, 10.0),
            pan_zoom: PanZoomConfig::default(),
            cursor_icon: None,
            selection_mode: false,
            shapes: Vec::new(),
            draw_calls: 0,
            remove_calls: 0,
            next_shape_id: 0,
        }
    }

    pub fn shapes_for_cursor(&self, cursor_id: u64) -> Vec<DrawnShape> {
        self.shapes
            .iter()
            .filter(|s| s.style.tag.cursor_id == cursor_id)
            .copied()
            .collect()
    }

    pub fn has_part(&self, cursor_id: u64, part: CursorPart) -> bool {
        self.shapes
            .iter()
            .any(|s| s.style.tag.cursor_id == cursor_id && s.style.tag.part == part)
    }

    pub fn part_style(&self, cursor_id: u64, part: CursorPart) -> Option<ShapeStyle> {
        self.shapes
            .iter()
            .find(|s| s.style.tag.cursor_id == cursor_id && s.style.tag.part == part)
            .map(|s| s.style)
    }

    pub fn selected_points(&self) -> Vec<(usize, usize)> {
        let mut selected = Vec::new();
        for (si, series) in self.series.iter().enumerate() {
            for (pi, point) in series.points.iter().enumerate() {
                if point.selected {
                    selected.push((si, pi));
                }
            }
        }
        selected
    }
}

impl ChartSurface for MockChart {
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
        self.series.get(series).and_then(|s| s.color)
    }

    fn series_marker(&self, series: usize) -> Option<MarkerShape> {
        self.series.get(series).and_then(|s| s.marker)
    }

    fn x_to_pixel(&self, _series: usize, value: f64) -> f64 {
        value * PIXELS_PER_UNIT
    }

    fn y_to_pixel(&self, _series: usize, value: f64) -> f64 {
        value * PIXELS_PER_UNIT
    }

    fn x_extremes(&self, _series: usize) -> AxisExtremes {
        self.x_extremes
    }

    fn y_extremes(&self, _series: usize) -> AxisExtremes {
        self.y_extremes
    }

    fn pan_zoom(&self) -> PanZoomConfig {
        self.pan_zoom
    }

    fn set_pan_zoom(&mut self, config: PanZoomConfig) {
        self.pan_zoom = config;
    }

    fn set_cursor_icon(&mut self, icon: Option<CursorIcon>) {
        self.cursor_icon = icon;
    }

    fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    fn draw_line(&mut self, _from: PixelPosition, _to: PixelPosition, style: ShapeStyle) -> ShapeId {
        let id = ShapeId(self.next_shape_id);
        self.next_shape_id += 1;
        self.draw_calls += 1;
        self.shapes.push(DrawnShape { id, style });
        id
    }

    fn draw_marker(
        &mut self,
        _marker: MarkerShape,
        _center: PixelPosition,
        _size: f32,
        style: ShapeStyle,
    ) -> ShapeId {
        let id = ShapeId(self.next_shape_id);
        self.next_shape_id += 1;
        self.draw_calls += 1;
        self.shapes.push(DrawnShape { id, style });
        id
    }

    fn remove_shape(&mut self, shape: ShapeId) {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != shape);
        if self.shapes.len() != before {
            self.remove_calls += 1;
        }
    }
}

/// A primary-button pointer event at chart-pixel coordinates.
pub fn pointer(kind: PointerKind, x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(kind, x, y)
}

/// Same as [`pointer`], with modifier keys held.
pub fn pointer_with(kind: PointerKind, x: f64, y: f64, modifiers: PointerModifiers) -> PointerEvent {
    PointerEvent {
        modifiers,
        ..PointerEvent::new(kind, x, y)
    }
}
