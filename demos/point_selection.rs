//! Demo: point-selection passthrough
//!
//! What it demonstrates
//! - With selection mode enabled on the chart, a plain click on a cursor
//!   visual selects the nearest data point within a 5 px radius.
//! - Shift- or Ctrl-click toggles points in and out of an additive selection;
//!   a plain click selects exclusively.
//! - Dragging still works as usual; a click is only recognized when the
//!   pointer did not move between press and release.
//!
//! How to run
//! ```bash
//! cargo run --example point_selection
//! ```

use egui::Color32;
use egui_plot::MarkerShape;
use plotcursor::{run_scatter, CursorModel, CursorOptions, EguiScatterChart, ScatterSeries};

fn main() -> eframe::Result<()> {
    let staircase: Vec<[f64; 2]> = (0..40)
        .map(|i| {
            let x = i as f64;
            [x, (i / 4) as f64 * 1.5]
        })
        .collect();

    let mut chart = EguiScatterChart::new(vec![ScatterSeries::new(
        "staircase",
        Color32::from_rgb(0x90, 0xe0, 0x39),
        MarkerShape::Square,
        staircase,
    )]);
    chart.set_selection_mode(true);

    let mut options = CursorOptions::default();
    options.cursors.push(CursorModel::new(10.0, 3.0, "staircase"));

    run_scatter("plotcursor — point selection", chart, options)
}
