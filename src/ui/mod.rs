//! Presentation layer: the four tab panels the app shell dispatches to.
//! Widgets stay thin — every action routes into an [`AppState`] method and
//! each control's enabled state is a pure function of "is a table loaded".
//!
//! [`AppState`]: crate::state::AppState

pub mod analysis_tab;
pub mod data_tab;
pub mod preprocess_tab;
pub mod viz_tab;

use eframe::egui::{self, Ui};

/// Column-name dropdown. Returns true when the selection changed.
pub(crate) fn column_combo(
    ui: &mut Ui,
    id: &str,
    current: &mut String,
    columns: &[String],
) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.clone())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(current == col, col).clicked() {
                    *current = col.clone();
                    changed = true;
                }
            }
        });
    changed
}
