use eframe::egui::{self, ScrollArea, TextStyle, Ui};

use crate::analysis::AnalysisKind;
use crate::state::AppState;
use crate::ui::column_combo;

// ---------------------------------------------------------------------------
// Analysis tab – descriptive stats, correlation, regression
// ---------------------------------------------------------------------------

pub fn analysis_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Analysis");
    ui.separator();

    let columns = state
        .table
        .as_ref()
        .map(|t| t.column_names())
        .unwrap_or_default();

    ui.add_enabled_ui(state.has_table(), |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Analysis Type:");
            egui::ComboBox::from_id_salt("analysis_kind")
                .selected_text(state.analysis_kind.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for kind in AnalysisKind::ALL {
                        ui.selectable_value(&mut state.analysis_kind, kind, kind.label());
                    }
                });

            // Variable pair only matters for regression.
            ui.add_enabled_ui(state.analysis_kind == AnalysisKind::Regression, |ui: &mut Ui| {
                ui.label("Independent Variable:");
                column_combo(ui, "independent", &mut state.independent, &columns);
                ui.label("Dependent Variable:");
                column_combo(ui, "dependent", &mut state.dependent, &columns);
            });

            if ui.button("Run Analysis").clicked() {
                state.run_analysis();
            }

            ui.add_enabled_ui(state.report.is_some(), |ui: &mut Ui| {
                if ui.button("Export Results").clicked() {
                    save_report_dialog(state);
                }
            });
        });
    });

    ui.add_space(6.0);

    match &state.report {
        Some(report) => {
            let text = report.text();
            ScrollArea::both().auto_shrink([false, false]).show(ui, |ui: &mut Ui| {
                ui.style_mut().override_text_style = Some(TextStyle::Monospace);
                ui.label(text);
            });
        }
        None => {
            ui.label("Run an analysis to see results here.");
        }
    }
}

fn save_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export results")
        .add_filter("Text", &["txt"])
        .set_file_name("analysis.txt")
        .save_file();

    if let Some(path) = file {
        state.export_report_to(&path);
    }
}
