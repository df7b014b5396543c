mod analysis;
mod app;
mod data;
mod error;
mod plot;
mod state;
mod transform;
mod ui;

use app::AnalystApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Analyst – Data Analysis Tool",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the chart preview.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AnalystApp::default()))
        }),
    )
}
