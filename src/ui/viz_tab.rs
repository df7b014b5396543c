use eframe::egui::{self, ScrollArea, Ui};

use crate::plot::style::{Palette, PlotTheme};
use crate::plot::ChartKind;
use crate::state::AppState;
use crate::ui::column_combo;

// ---------------------------------------------------------------------------
// Visualization tab – plot spec controls and the rendered preview
// ---------------------------------------------------------------------------

pub fn viz_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Visualization");
    ui.separator();

    let columns = state
        .table
        .as_ref()
        .map(|t| t.column_names())
        .unwrap_or_default();

    ui.add_enabled_ui(state.has_table(), |ui: &mut Ui| {
        controls(ui, state, &columns);
    });

    ui.add_space(6.0);

    if let Some(png) = &state.preview_png {
        let uri = format!("bytes://chart-{}.png", state.preview_revision);
        let image = egui::Image::from_bytes(uri, png.clone());
        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui: &mut Ui| {
            ui.add(image.max_width(ui.available_width()));
        });
    } else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Pick a chart kind and press Generate Plot.");
        });
    }
}

fn controls(ui: &mut Ui, state: &mut AppState, columns: &[String]) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.group(|ui: &mut Ui| {
            ui.label("X Column:");
            column_combo(ui, "plot_x", &mut state.plot.x, columns);

            // Y is meaningless for single-column and whole-table charts.
            ui.add_enabled_ui(state.plot.kind.requires_y(), |ui: &mut Ui| {
                ui.label("Y Column:");
                let mut y = state.plot.y.clone().unwrap_or_default();
                if column_combo(ui, "plot_y", &mut y, columns) {
                    state.plot.y = Some(y);
                }
            });
        });

        ui.group(|ui: &mut Ui| {
            ui.label("Plot Type:");
            egui::ComboBox::from_id_salt("chart_kind")
                .selected_text(state.plot.kind.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut state.plot.kind, kind, kind.label());
                    }
                });
        });

        ui.group(|ui: &mut Ui| {
            ui.label("Color:");
            ui.add(egui::TextEdit::singleline(&mut state.plot.color).desired_width(70.0));

            ui.label("Palette:");
            egui::ComboBox::from_id_salt("palette")
                .selected_text(state.plot.palette.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for palette in Palette::ALL {
                        ui.selectable_value(&mut state.plot.palette, palette, palette.label());
                    }
                });

            ui.label("Style:");
            egui::ComboBox::from_id_salt("theme")
                .selected_text(state.plot.theme.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for theme in PlotTheme::ALL {
                        ui.selectable_value(&mut state.plot.theme, theme, theme.label());
                    }
                });
        });

        ui.group(|ui: &mut Ui| {
            ui.label("Title:");
            ui.add(egui::TextEdit::singleline(&mut state.plot.title).desired_width(120.0));
            ui.label("X Label:");
            ui.add(egui::TextEdit::singleline(&mut state.plot.x_label).desired_width(90.0));
            ui.label("Y Label:");
            ui.add(egui::TextEdit::singleline(&mut state.plot.y_label).desired_width(90.0));
        });

        if ui.button("Generate Plot").clicked() {
            state.generate_plot();
        }
        ui.add_enabled_ui(state.figure.is_some(), |ui: &mut Ui| {
            if ui.button("Export Plot").clicked() {
                save_plot_dialog(state);
            }
        });
    });
}

fn save_plot_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export plot")
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("SVG", &["svg"])
        .set_file_name("chart.png")
        .save_file();

    if let Some(path) = file {
        state.export_figure_to(&path);
    }
}
