use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::loader::FileFormat;
use crate::state::AppState;

/// How many rows of the table the preview shows.
const PREVIEW_ROWS: usize = 100;

// ---------------------------------------------------------------------------
// Data tab – loading, preview, export
// ---------------------------------------------------------------------------

pub fn data_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Loading & Exploration");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Load CSV").clicked() {
            open_file_dialog(state, FileFormat::Csv);
        }
        if ui.button("Load Excel").clicked() {
            open_file_dialog(state, FileFormat::Excel);
        }
        if ui.button("Load JSON").clicked() {
            open_file_dialog(state, FileFormat::Json);
        }

        ui.separator();

        ui.add_enabled_ui(state.has_table(), |ui: &mut Ui| {
            if ui.button("Export Data").clicked() {
                save_table_dialog(state);
            }
        });
    });

    ui.add_space(6.0);

    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data loaded. Load a CSV, Excel or JSON file to begin.");
        });
        return;
    };

    // Snapshot the preview so the table borrow ends before widgets run.
    let names = table.column_names();
    let types: Vec<String> = table.columns().iter().map(|c| c.ty.to_string()).collect();
    let n_preview = table.n_rows().min(PREVIEW_ROWS);
    let rows: Vec<Vec<String>> = (0..n_preview).map(|r| table.row_display(r)).collect();
    let caption = format!(
        "{}: {} rows × {} columns (showing first {})",
        state.source_name.as_deref().unwrap_or("table"),
        table.n_rows(),
        table.n_cols(),
        n_preview
    );

    ui.label(RichText::new(caption).weak());
    ui.add_space(4.0);

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(TableColumn::auto().at_least(70.0), names.len())
            .header(22.0, |mut header| {
                for (name, ty) in names.iter().zip(types.iter()) {
                    header.col(|ui| {
                        ui.strong(format!("{name} ({ty})"));
                    });
                }
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(18.0, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_file_dialog(state: &mut AppState, format: FileFormat) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {} data", format.label()))
        .add_filter(format.label(), format.extensions())
        .pick_file();

    if let Some(path) = file {
        state.load(&path, format);
    }
}

fn save_table_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export data")
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("JSON", &["json"])
        .set_file_name("data.csv")
        .save_file();

    if let Some(path) = file {
        state.export_table_to(&path);
    }
}
