//! Entry point for running a scatter chart with cursor overlays as a native
//! window.
//!
//! [`run_scatter`] is the quickest way to get a window on screen; embedding
//! applications that already run their own eframe loop can use
//! [`ScatterCursorApp`] (or drive [`EguiScatterChart::show`] directly) instead.

use eframe::egui;

use crate::config::CursorOptions;
use crate::egui_chart::EguiScatterChart;
use crate::sync::CursorSynchronizer;

/// A minimal eframe app wrapping a chart, a synchronizer, and the cursor
/// configuration.
pub struct ScatterCursorApp {
    chart: EguiScatterChart,
    sync: CursorSynchronizer,
    options_rx: std::sync::mpsc::Receiver<CursorOptions>,
    pending_options: Option<CursorOptions>,
    latest_options: CursorOptions,
}

impl ScatterCursorApp {
    pub fn new(chart: EguiScatterChart, options: CursorOptions) -> Self {
        let mut sync = CursorSynchronizer::new();
        let options_rx = sync.subscribe_options();
        Self {
            chart,
            sync,
            options_rx,
            latest_options: options.clone(),
            pending_options: Some(options),
        }
    }
}

impl eframe::App for ScatterCursorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart.show(ui, &mut self.sync, "scatter_cursors");

            // The first reconciliation waits for the first rendered frame so
            // the pixel mapping exists before cursors snap.
            if let Some(options) = self.pending_options.take() {
                self.sync.reconcile(&mut self.chart, &options);
            }
        });

        // Pick up configuration snapshots republished after drags.
        while let Ok(options) = self.options_rx.try_recv() {
            self.latest_options = options;
        }

        if self.latest_options.show_value && !self.latest_options.cursors.is_empty() {
            egui::Window::new("Cursors")
                .default_open(true)
                .resizable(false)
                .show(ctx, |ui| {
                    egui::Grid::new("cursor_values").striped(true).show(ui, |ui| {
                        for (i, cursor) in self.latest_options.cursors.iter().enumerate() {
                            if self.latest_options.show_label && !cursor.label.is_empty() {
                                ui.label(&cursor.label);
                            } else {
                                ui.label(format!("#{i}"));
                            }
                            ui.label(&cursor.series_name);
                            ui.label(format!("x = {:.3}", cursor.x));
                            ui.label(format!("y = {:.3}", cursor.y));
                            ui.end_row();
                        }
                    });
                });
        }
    }
}

/// Open `chart` in a native window with cursors driven by `options`.
/// Blocks until the window is closed.
pub fn run_scatter(
    title: &str,
    chart: EguiScatterChart,
    options: CursorOptions,
) -> eframe::Result<()> {
    let app = ScatterCursorApp::new(chart, options);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1000.0, 700.0)),
        ..Default::default()
    };
    eframe::run_native(title, native_options, Box::new(|_cc| Ok(Box::new(app))))
}
