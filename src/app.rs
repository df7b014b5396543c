use eframe::egui::{self, Color32, RichText};

use crate::state::{AppState, Tab};
use crate::ui::{analysis_tab, data_tab, preprocess_tab, viz_tab};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AnalystApp {
    pub state: AppState,
}

impl eframe::App for AnalystApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: tab bar ----
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Rusty Analyst");
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.state.active_tab, tab, tab.label());
                }
            });
        });

        // ---- Bottom panel: status bar ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match (&self.state.table, &self.state.source_name) {
                    (Some(table), Some(name)) => {
                        ui.label(format!(
                            "{name}: {} rows × {} columns",
                            table.n_rows(),
                            table.n_cols()
                        ));
                    }
                    _ => {
                        ui.label("No data loaded");
                    }
                }
                ui.separator();
                if let Some(status) = &self.state.status {
                    let text = RichText::new(&status.text);
                    if status.is_error {
                        ui.label(text.color(Color32::RED));
                    } else {
                        ui.label(text);
                    }
                }
            });
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::Data => data_tab::data_tab(ui, &mut self.state),
            Tab::Preprocessing => preprocess_tab::preprocess_tab(ui, &mut self.state),
            Tab::Analysis => analysis_tab::analysis_tab(ui, &mut self.state),
            Tab::Visualization => viz_tab::viz_tab(ui, &mut self.state),
        });
    }
}
