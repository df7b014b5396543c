use std::path::Path;

use crate::analysis::{run_analysis, AnalysisKind, AnalysisReport, AnalysisRequest};
use crate::data::export::{export_report, export_table};
use crate::data::loader::{load_file, FileFormat};
use crate::data::model::{ColumnType, Table};
use crate::error::Error;
use crate::plot::figure::{build_figure, Figure};
use crate::plot::render::{export_figure, preview_size, render_png_bytes};
use crate::plot::PlotSpec;
use crate::transform::convert::coerce_column;
use crate::transform::filter::{apply_filter, FilterOp, FilterPredicate};
use crate::transform::missing::{handle_missing, MissingPolicy};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Data,
    Preprocessing,
    Analysis,
    Visualization,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Data,
        Tab::Preprocessing,
        Tab::Analysis,
        Tab::Visualization,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Data => "Data",
            Tab::Preprocessing => "Preprocessing",
            Tab::Analysis => "Analysis",
            Tab::Visualization => "Visualization",
        }
    }
}

/// Message shown in the bottom status bar.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

/// Missing-value radio selection; the custom literal lives in its own text
/// field so switching choices does not lose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingChoice {
    Drop,
    Mean,
    Median,
    Mode,
    Custom,
}

impl MissingChoice {
    pub const ALL: [MissingChoice; 5] = [
        MissingChoice::Drop,
        MissingChoice::Mean,
        MissingChoice::Median,
        MissingChoice::Mode,
        MissingChoice::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MissingChoice::Drop => "Drop rows with missing values",
            MissingChoice::Mean => "Fill with mean",
            MissingChoice::Median => "Fill with median",
            MissingChoice::Mode => "Fill with mode",
            MissingChoice::Custom => "Fill with specific value:",
        }
    }

    pub fn to_policy(self, custom: &str) -> MissingPolicy {
        match self {
            MissingChoice::Drop => MissingPolicy::DropRows,
            MissingChoice::Mean => MissingPolicy::FillMean,
            MissingChoice::Median => MissingPolicy::FillMedian,
            MissingChoice::Mode => MissingPolicy::FillMode,
            MissingChoice::Custom => MissingPolicy::FillValue(custom.to_string()),
        }
    }
}

/// The full UI state, independent of rendering. Holds the single current
/// table; every operation replaces it wholesale on success and leaves it
/// untouched on failure.
pub struct AppState {
    /// Loaded table (None until the user loads a file).
    pub table: Option<Table>,

    /// File name of the loaded table, for the status bar.
    pub source_name: Option<String>,

    /// Last-produced analysis report.
    pub report: Option<AnalysisReport>,

    /// Last-produced figure and its rendered preview.
    pub figure: Option<Figure>,
    pub preview_png: Option<Vec<u8>>,
    /// Bumped per render so the preview image URI is unique.
    pub preview_revision: u64,

    /// Status / error message shown in the UI.
    pub status: Option<StatusLine>,

    pub active_tab: Tab,

    // -- Preprocessing tab --
    pub missing_choice: MissingChoice,
    pub custom_fill: String,
    pub filter_column: String,
    pub filter_op: FilterOp,
    pub filter_value: String,
    pub convert_column: String,
    pub convert_target: ColumnType,

    // -- Analysis tab --
    pub analysis_kind: AnalysisKind,
    pub independent: String,
    pub dependent: String,

    // -- Visualization tab --
    pub plot: PlotSpec,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_name: None,
            report: None,
            figure: None,
            preview_png: None,
            preview_revision: 0,
            status: None,
            active_tab: Tab::Data,
            missing_choice: MissingChoice::Drop,
            custom_fill: String::new(),
            filter_column: String::new(),
            filter_op: FilterOp::Gt,
            filter_value: String::new(),
            convert_column: String::new(),
            convert_target: ColumnType::Numeric,
            analysis_kind: AnalysisKind::Descriptive,
            independent: String::new(),
            dependent: String::new(),
            plot: PlotSpec::default(),
        }
    }
}

impl AppState {
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{text}");
        self.status = Some(StatusLine {
            text,
            is_error: false,
        });
    }

    pub fn error(&mut self, err: &Error) {
        log::error!("{err}");
        self.status = Some(StatusLine {
            text: err.to_string(),
            is_error: true,
        });
    }

    /// Ingest a newly loaded table: reset the per-column selections and
    /// discard the previous report and chart.
    pub fn set_table(&mut self, table: Table, source_name: String) {
        let columns = table.column_names();
        let first = columns.first().cloned().unwrap_or_default();
        let second = columns.get(1).cloned().unwrap_or_else(|| first.clone());

        self.filter_column = first.clone();
        self.convert_column = first.clone();
        self.independent = first.clone();
        self.dependent = second.clone();
        self.plot.x = first;
        self.plot.y = Some(second);

        self.report = None;
        self.figure = None;
        self.preview_png = None;

        self.info(format!(
            "Data loaded: {} rows, {} columns",
            table.n_rows(),
            table.n_cols()
        ));
        self.table = Some(table);
        self.source_name = Some(source_name);
    }

    /// Load a file and replace the session table. A failed load keeps the
    /// previous table untouched.
    pub fn load(&mut self, path: &Path, format: FileFormat) {
        match load_file(path, format) {
            Ok(table) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                log::info!(
                    "loaded {name}: {} rows, columns {:?}",
                    table.n_rows(),
                    table.column_names()
                );
                self.set_table(table, name);
            }
            Err(e) => self.error(&e),
        }
    }

    // -- Transformation pipeline --

    pub fn apply_missing(&mut self) {
        let Some(table) = &self.table else { return };
        let policy = self.missing_choice.to_policy(&self.custom_fill);
        let cleaned = handle_missing(table, &policy);
        self.info(format!(
            "Preprocessing applied: {} rows remaining",
            cleaned.n_rows()
        ));
        self.table = Some(cleaned);
    }

    pub fn apply_filter(&mut self) {
        let Some(table) = &self.table else { return };
        let predicate = FilterPredicate {
            column: self.filter_column.clone(),
            op: self.filter_op,
            value: self.filter_value.clone(),
        };
        match apply_filter(table, &predicate) {
            Ok(filtered) => {
                self.info(format!(
                    "Filter applied: {} rows remaining",
                    filtered.n_rows()
                ));
                self.table = Some(filtered);
            }
            Err(e) => self.error(&e),
        }
    }

    pub fn apply_convert(&mut self) {
        let Some(table) = &self.table else { return };
        match coerce_column(table, &self.convert_column, self.convert_target) {
            Ok(converted) => {
                self.info(format!(
                    "Column '{}' converted to {}",
                    self.convert_column, self.convert_target
                ));
                self.table = Some(converted);
            }
            Err(e) => self.error(&e),
        }
    }

    // -- Analysis --

    pub fn run_analysis(&mut self) {
        let Some(table) = &self.table else { return };
        let request = AnalysisRequest {
            kind: self.analysis_kind,
            x: Some(self.independent.clone()).filter(|s| !s.is_empty()),
            y: Some(self.dependent.clone()).filter(|s| !s.is_empty()),
        };
        match run_analysis(table, &request) {
            Ok(report) => {
                self.info(format!("{} complete", self.analysis_kind.label()));
                self.report = Some(report);
            }
            Err(e) => self.error(&e),
        }
    }

    // -- Visualization --

    pub fn generate_plot(&mut self) {
        let Some(table) = &self.table else { return };
        let result = build_figure(table, &self.plot)
            .and_then(|figure| {
                let png = render_png_bytes(&figure, preview_size(figure.spec.kind))?;
                Ok((figure, png))
            });
        match result {
            Ok((figure, png)) => {
                self.figure = Some(figure);
                self.preview_png = Some(png);
                self.preview_revision += 1;
                self.info(format!("{} generated", self.plot.kind.label()));
            }
            Err(e) => self.error(&e),
        }
    }

    // -- Export --

    pub fn export_table_to(&mut self, path: &Path) {
        let Some(table) = &self.table else { return };
        match export_table(table, path) {
            Ok(()) => self.info(format!("Data exported to {}", path.display())),
            Err(e) => self.error(&e),
        }
    }

    pub fn export_report_to(&mut self, path: &Path) {
        let Some(report) = &self.report else { return };
        match export_report(&report.text(), path) {
            Ok(()) => self.info(format!("Results exported to {}", path.display())),
            Err(e) => self.error(&e),
        }
    }

    pub fn export_figure_to(&mut self, path: &Path) {
        let Some(figure) = &self.figure else { return };
        match export_figure(figure, path) {
            Ok(()) => self.info(format!("Plot exported to {}", path.display())),
            Err(e) => self.error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn state_with_table() -> AppState {
        let mut state = AppState::default();
        let table = Table::new(vec![
            Column::new(
                "x",
                vec![CellValue::Float(1.0), CellValue::Float(2.0), CellValue::Null],
            ),
            Column::new(
                "city",
                vec![
                    CellValue::Text("Oslo".into()),
                    CellValue::Text("Rome".into()),
                    CellValue::Text("Lima".into()),
                ],
            ),
        ]);
        state.set_table(table, "sample.csv".into());
        state
    }

    #[test]
    fn set_table_seeds_column_selections() {
        let state = state_with_table();
        assert_eq!(state.filter_column, "x");
        assert_eq!(state.independent, "x");
        assert_eq!(state.dependent, "city");
        assert_eq!(state.plot.y.as_deref(), Some("city"));
    }

    #[test]
    fn failed_filter_keeps_the_table_and_reports_the_error() {
        let mut state = state_with_table();
        state.filter_column = "missing".into();
        state.filter_value = "1".into();
        state.apply_filter();

        assert!(state.status.as_ref().unwrap().is_error);
        assert_eq!(state.table.as_ref().unwrap().n_rows(), 3);
    }

    #[test]
    fn missing_value_pass_replaces_the_table() {
        let mut state = state_with_table();
        state.missing_choice = MissingChoice::Drop;
        state.apply_missing();
        assert_eq!(state.table.as_ref().unwrap().n_rows(), 2);
    }

    #[test]
    fn failed_load_keeps_the_previous_table_byte_for_byte() {
        let mut state = state_with_table();
        let before = state.table.clone();

        let dir = std::env::temp_dir().join("rusty-analyst-state-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        state.load(&path, FileFormat::Csv);

        assert!(state.status.as_ref().unwrap().is_error);
        assert_eq!(state.table, before);
    }

    #[test]
    fn loading_a_new_table_discards_report_and_figure() {
        let mut state = state_with_table();
        state.run_analysis();
        assert!(state.report.is_some());

        let replacement = Table::new(vec![Column::new(
            "only",
            vec![CellValue::Integer(1)],
        )]);
        state.set_table(replacement, "other.csv".into());
        assert!(state.report.is_none());
        assert!(state.figure.is_none());
    }
}
