use eframe::egui::{self, Ui};

use crate::data::model::ColumnType;
use crate::state::{AppState, MissingChoice};
use crate::transform::filter::FilterOp;
use crate::ui::column_combo;

// ---------------------------------------------------------------------------
// Preprocessing tab – missing values, filtering, type conversion
// ---------------------------------------------------------------------------

pub fn preprocess_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Preprocessing");
    ui.separator();

    let columns = state
        .table
        .as_ref()
        .map(|t| t.column_names())
        .unwrap_or_default();

    ui.add_enabled_ui(state.has_table(), |ui: &mut Ui| {
        missing_values_section(ui, state);
        ui.add_space(8.0);
        filter_section(ui, state, &columns);
        ui.add_space(8.0);
        conversion_section(ui, state, &columns);
    });

    if !state.has_table() {
        ui.add_space(8.0);
        ui.label("Load a dataset on the Data tab to enable preprocessing.");
    }
}

fn missing_values_section(ui: &mut Ui, state: &mut AppState) {
    ui.group(|ui: &mut Ui| {
        ui.strong("Missing Values");
        for choice in MissingChoice::ALL {
            if choice == MissingChoice::Custom {
                ui.horizontal(|ui: &mut Ui| {
                    ui.radio_value(&mut state.missing_choice, choice, choice.label());
                    ui.add(
                        egui::TextEdit::singleline(&mut state.custom_fill)
                            .desired_width(80.0)
                            .hint_text("0"),
                    );
                });
            } else {
                ui.radio_value(&mut state.missing_choice, choice, choice.label());
            }
        }
        if ui.button("Apply Preprocessing").clicked() {
            state.apply_missing();
        }
    });
}

fn filter_section(ui: &mut Ui, state: &mut AppState, columns: &[String]) {
    ui.group(|ui: &mut Ui| {
        ui.strong("Data Filtering");
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Column:");
            column_combo(ui, "filter_column", &mut state.filter_column, columns);

            ui.label("Condition:");
            egui::ComboBox::from_id_salt("filter_op")
                .selected_text(state.filter_op.symbol())
                .show_ui(ui, |ui: &mut Ui| {
                    for op in FilterOp::ALL {
                        ui.selectable_value(&mut state.filter_op, op, op.symbol());
                    }
                });

            ui.label("Value:");
            ui.add(egui::TextEdit::singleline(&mut state.filter_value).desired_width(90.0));

            if ui.button("Apply Filter").clicked() {
                state.apply_filter();
            }
        });
    });
}

fn conversion_section(ui: &mut Ui, state: &mut AppState, columns: &[String]) {
    ui.group(|ui: &mut Ui| {
        ui.strong("Data Type Conversion");
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Column:");
            column_combo(ui, "convert_column", &mut state.convert_column, columns);

            ui.label("Convert to:");
            egui::ComboBox::from_id_salt("convert_target")
                .selected_text(state.convert_target.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for ty in ColumnType::ALL {
                        ui.selectable_value(&mut state.convert_target, ty, ty.label());
                    }
                });

            if ui.button("Convert").clicked() {
                state.apply_convert();
            }
        });
    });
}
