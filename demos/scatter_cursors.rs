//! Demo: two scatter series with draggable snap-to-point cursors
//!
//! What it demonstrates
//! - Declaring cursors via `CursorOptions` and letting the synchronizer
//!   create, snap, and track them.
//! - Dragging the crosshair lines (axis-locked snapping) and the target glyph
//!   (free snapping across all series, re-binding the cursor's series).
//! - The "Cursors" window mirroring the configuration republished after each
//!   completed drag.
//!
//! How to run
//! ```bash
//! cargo run --example scatter_cursors
//! ```

use egui::Color32;
use egui_plot::MarkerShape;
use plotcursor::{run_scatter, CursorModel, CursorOptions, EguiScatterChart, ScatterSeries};

fn main() -> eframe::Result<()> {
    // Deterministic sample data: a damped sine and a drifting parabola.
    let damped: Vec<[f64; 2]> = (0..140)
        .map(|i| {
            let x = i as f64 * 0.25;
            [x, (x * 0.9).sin() * (-x * 0.06).exp() * 8.0]
        })
        .collect();
    let drift: Vec<[f64; 2]> = (0..70)
        .map(|i| {
            let x = i as f64 * 0.5;
            [x, 0.02 * (x - 18.0) * (x - 18.0) - 4.0]
        })
        .collect();

    let chart = EguiScatterChart::new(vec![
        ScatterSeries::new(
            "damped",
            Color32::from_rgb(0x4c, 0xc9, 0xf0),
            MarkerShape::Circle,
            damped,
        ),
        ScatterSeries::new(
            "drift",
            Color32::from_rgb(0xf7, 0x72, 0x5e),
            MarkerShape::Diamond,
            drift,
        ),
    ]);

    let mut options = CursorOptions::default();
    options.show_label = true;
    let mut a = CursorModel::new(5.0, 2.0, "damped");
    a.label = "A".to_string();
    let mut b = CursorModel::new(20.0, -3.0, "drift");
    b.label = "B".to_string();
    options.cursors.push(a);
    options.cursors.push(b);

    run_scatter("plotcursor — scatter cursors", chart, options)
}
