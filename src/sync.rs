//! Keeps the set of live [`Cursor`]s aligned with the declarative
//! [`CursorOptions`], and folds user-driven position changes back into the
//! configuration.
//!
//! The embedding layer calls [`CursorSynchronizer::reconcile`] whenever the
//! chart or the configuration changes; descriptors and live cursors are
//! correlated by index. Updated configuration snapshots are republished on a
//! channel obtainable via [`CursorSynchronizer::subscribe_options`].

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::chart::{ChartSurface, PointerEvent, PointerKind};
use crate::config::CursorOptions;
use crate::cursor::{Cursor, CursorPosition};

struct LiveCursor {
    cursor: Cursor,
    position_rx: Receiver<CursorPosition>,
}

/// Reconciles live cursors against the configuration and relays position
/// feedback. One instance per chart widget.
pub struct CursorSynchronizer {
    options: CursorOptions,
    cursors: Vec<LiveCursor>,
    options_listeners: Vec<Sender<CursorOptions>>,
}

impl CursorSynchronizer {
    pub fn new() -> Self {
        Self {
            options: CursorOptions::default(),
            cursors: Vec::new(),
            options_listeners: Vec::new(),
        }
    }

    /// The synchronizer's current configuration snapshot.
    pub fn options(&self) -> &CursorOptions {
        &self.options
    }

    /// Number of live cursors.
    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    /// Live cursors in creation order.
    pub fn cursors(&self) -> impl Iterator<Item = &Cursor> {
        self.cursors.iter().map(|live| &live.cursor)
    }

    /// The live cursor at a given index, if any.
    pub fn cursor(&self, index: usize) -> Option<&Cursor> {
        self.cursors.get(index).map(|live| &live.cursor)
    }

    /// Subscribe to republished configuration snapshots. Every send is a
    /// defensive copy; dead receivers are pruned on the next publish.
    pub fn subscribe_options(&mut self) -> Receiver<CursorOptions> {
        let (tx, rx) = channel();
        self.options_listeners.push(tx);
        rx
    }

    // ── Reconciliation ───────────────────────────────────────────────────────

    /// Align live cursors with `options`: destroy stale cursors, update the
    /// surviving ones, create the missing ones — in that order.
    ///
    /// The configuration is copied at this boundary; the caller's object is
    /// never aliased or mutated.
    pub fn reconcile(&mut self, chart: &mut dyn ChartSurface, options: &CursorOptions) {
        self.options = options.clone();
        self.destroy_stale(chart);
        self.update_valid(chart);
        self.create_new(chart);
        self.pump_position_events(chart);
    }

    /// Drop every descriptor whose series name no longer resolves, compacting
    /// the list in place. Returns whether anything was removed.
    ///
    /// Not invoked from [`CursorSynchronizer::reconcile`]; reserved for hosts
    /// that want to prune the configuration when series vanish.
    pub fn validate_series(options: &mut CursorOptions, chart: &dyn ChartSurface) -> bool {
        let before = options.cursors.len();
        options
            .cursors
            .retain(|model| chart.find_series(&model.series_name).is_some());
        options.cursors.len() != before
    }

    fn destroy_stale(&mut self, chart: &mut dyn ChartSurface) {
        let keep = self.options.cursors.len();
        for live in self.cursors.iter_mut().skip(keep) {
            live.cursor.destroy(chart);
        }
        self.cursors.truncate(keep);
    }

    fn update_valid(&mut self, chart: &mut dyn ChartSurface) {
        let count = self.cursors.len().min(self.options.cursors.len());
        let style = self.options.crosshair_style;
        for i in 0..count {
            let model = &self.options.cursors[i];
            let series = chart.find_series(&model.series_name);
            let live = &mut self.cursors[i];

            // Resync against possibly-changed series data at the cursor's
            // current pixel position; this is not a user-visible move.
            let pixel = live.cursor.pixel_position();
            live.cursor.set_series(chart, series);
            live.cursor.set_crosshair_style(style);
            live.cursor.set_visible(model.visible);
            live.cursor
                .snap_to_nearest_point_on_series(chart, Some(pixel.x), Some(pixel.y), false);
        }
    }

    fn create_new(&mut self, chart: &mut dyn ChartSurface) {
        let style = self.options.crosshair_style;
        for i in self.cursors.len()..self.options.cursors.len() {
            let model = &self.options.cursors[i];
            // Descriptors whose series cannot be resolved are skipped.
            let Some(series) = chart.find_series(&model.series_name) else {
                continue;
            };
            let mut cursor = Cursor::new(chart, model.x, model.y, series, true, style);
            cursor.set_visible(model.visible);
            let position_rx = cursor.subscribe_position();

            // Construction-time snap targets the nearest point still in view.
            let pixel = cursor.pixel_position_of(chart, model.x, model.y);
            cursor.snap_to_nearest_point_on_series(chart, Some(pixel.x), Some(pixel.y), true);

            self.cursors.push(LiveCursor {
                cursor,
                position_rx,
            });
        }
    }

    // ── Event routing ────────────────────────────────────────────────────────

    /// Route a normalized pointer event to the live cursors. Returns whether
    /// any cursor consumed it.
    pub fn handle_pointer(&mut self, chart: &mut dyn ChartSurface, event: &PointerEvent) -> bool {
        let mut consumed = false;
        match event.kind {
            // Later cursors draw on top, so they get first grab.
            PointerKind::Down => {
                for live in self.cursors.iter_mut().rev() {
                    if live.cursor.handle_pointer(chart, event) {
                        consumed = true;
                        break;
                    }
                }
            }
            PointerKind::Move | PointerKind::Up => {
                for live in self.cursors.iter_mut() {
                    if live.cursor.handle_pointer(chart, event) {
                        consumed = true;
                        break;
                    }
                }
            }
        }
        self.pump_position_events(chart);
        consumed
    }

    /// Forward the chart's redraw event to every live cursor.
    pub fn handle_chart_redraw(&mut self, chart: &mut dyn ChartSurface) {
        for live in self.cursors.iter_mut() {
            live.cursor.handle_chart_redraw(chart);
        }
    }

    /// Flush every cursor's coalesced redraw batch. Call once per host frame.
    pub fn tick(&mut self, chart: &mut dyn ChartSurface) {
        for live in self.cursors.iter_mut() {
            live.cursor.flush_redraw(chart);
        }
    }

    /// Destroy every live cursor and drop all subscriptions.
    pub fn destroy(&mut self, chart: &mut dyn ChartSurface) {
        for live in self.cursors.iter_mut() {
            live.cursor.destroy(chart);
        }
        self.cursors.clear();
        self.options_listeners.clear();
    }

    // ── Position feedback ────────────────────────────────────────────────────

    fn pump_position_events(&mut self, chart: &mut dyn ChartSurface) {
        let mut events = Vec::new();
        for live in &self.cursors {
            while let Ok(event) = live.position_rx.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            self.apply_position_event(chart, event);
        }
    }

    fn apply_position_event(&mut self, chart: &dyn ChartSurface, event: CursorPosition) {
        let Some(index) = self
            .cursors
            .iter()
            .position(|live| live.cursor.id() == event.cursor_id)
        else {
            return;
        };
        let Some(model) = self.options.cursors.get(index) else {
            return;
        };
        let live = &self.cursors[index].cursor;
        // A gesture that released where it started produces no net change;
        // skip the write-back so idle release cycles leave the configuration
        // untouched.
        if live.x() == model.x && live.y() == model.y {
            return;
        }

        // Bring every descriptor up to date with its cursor before touching
        // the one that moved, so the republished snapshot is consistent.
        self.copy_cursor_positions_to_options();

        let model = &mut self.options.cursors[index];
        model.x = event.x;
        model.y = event.y;
        if let Some(name) = event.series.and_then(|s| chart.series_name(s)) {
            model.series_name = name.to_string();
        }
        self.publish_options();
    }

    fn copy_cursor_positions_to_options(&mut self) {
        for (i, live) in self.cursors.iter().enumerate() {
            if let Some(model) = self.options.cursors.get_mut(i) {
                model.x = live.cursor.x();
                model.y = live.cursor.y();
            }
        }
    }

    fn publish_options(&mut self) {
        let snapshot = self.options.clone();
        self.options_listeners
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl Default for CursorSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
