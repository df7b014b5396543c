//! Analysis engine: read-only derived summaries of the current table,
//! formatted into a plain-text report the Analysis tab displays and exports.

pub mod correlation;
pub mod describe;
pub mod regression;

use crate::data::model::Table;
use crate::error::{Error, Result};

use self::correlation::CorrelationMatrix;
use self::describe::ColumnSummary;

// ---------------------------------------------------------------------------
// Requests and reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Descriptive,
    Correlation,
    Regression,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::Descriptive,
        AnalysisKind::Correlation,
        AnalysisKind::Regression,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Descriptive => "Descriptive Statistics",
            AnalysisKind::Correlation => "Correlation Matrix",
            AnalysisKind::Regression => "Regression Analysis",
        }
    }
}

/// What to compute; regression carries its variable pair.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    /// Independent variable (regression only).
    pub x: Option<String>,
    /// Dependent variable (regression only).
    pub y: Option<String>,
}

/// The last-produced analysis result, kept on the session for display and
/// plain-text export.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub title: String,
    pub body: String,
}

impl AnalysisReport {
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.title, self.body)
    }
}

/// Run one analysis over the table. Pure read; failures surface as typed
/// errors and leave no partial report behind.
pub fn run_analysis(table: &Table, request: &AnalysisRequest) -> Result<AnalysisReport> {
    match request.kind {
        AnalysisKind::Descriptive => Ok(AnalysisReport {
            title: "Descriptive Statistics:".into(),
            body: format_describe(&describe::describe(table)),
        }),
        AnalysisKind::Correlation => {
            let matrix = correlation::correlation_matrix(table)?;
            Ok(AnalysisReport {
                title: "Correlation Matrix:".into(),
                body: format_correlation(&matrix),
            })
        }
        AnalysisKind::Regression => {
            let (x, y) = match (&request.x, &request.y) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(Error::TypeMismatch(
                        "select independent and dependent variables for regression".into(),
                    ))
                }
            };
            let fit = regression::linear_regression(table, x, y)?;
            Ok(AnalysisReport {
                title: format!("Regression Analysis: {y} ~ {x}"),
                body: format!(
                    "Regression Equation: {}\n\
                     Coefficient of Determination (R²): {:.4}\n\n\
                     Interpretation:\n{}",
                    fit.equation(),
                    fit.r_squared,
                    fit.interpretation()
                ),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

/// One row per column: numeric statistics where they apply, unique/top/freq
/// for the rest, `-` elsewhere.
fn format_describe(summaries: &[ColumnSummary]) -> String {
    let name_width = summaries
        .iter()
        .map(|s| s.name.len())
        .chain(std::iter::once("column".len()))
        .max()
        .unwrap_or(6);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:<11}  {:>7}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>7}  {:>12}  {:>5}\n",
        "column", "type", "count", "mean", "std", "min", "25%", "50%", "75%", "max", "unique", "top", "freq",
    ));
    for s in summaries {
        let (mean, std, min, q1, median, q3, max) = match &s.numeric {
            Some(n) => (
                fmt_stat(n.mean),
                fmt_stat(n.std),
                fmt_stat(n.min),
                fmt_stat(n.q1),
                fmt_stat(n.median),
                fmt_stat(n.q3),
                fmt_stat(n.max),
            ),
            None => (
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
            ),
        };
        let (unique, top, freq) = match &s.categorical {
            Some(c) => (c.unique.to_string(), c.top.clone(), c.freq.to_string()),
            None => ("-".into(), "-".into(), "-".into()),
        };
        out.push_str(&format!(
            "{:<name_width$}  {:<11}  {:>7}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>7}  {:>12}  {:>5}\n",
            s.name,
            s.ty.label(),
            s.count,
            mean,
            std,
            min,
            q1,
            median,
            q3,
            max,
            unique,
            top,
            freq,
        ));
    }
    out
}

fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let name_width = matrix
        .columns
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0)
        .max(8);

    let mut out = String::new();
    out.push_str(&" ".repeat(name_width));
    for name in &matrix.columns {
        out.push_str(&format!("  {name:>name_width$}"));
    }
    out.push('\n');
    for (i, name) in matrix.columns.iter().enumerate() {
        out.push_str(&format!("{name:<name_width$}"));
        for j in 0..matrix.size() {
            out.push_str(&format!("  {:>name_width$}", fmt_stat(matrix.values[i][j])));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "x",
                vec![
                    CellValue::Float(1.0),
                    CellValue::Float(2.0),
                    CellValue::Float(3.0),
                    CellValue::Float(4.0),
                ],
            ),
            Column::new(
                "y",
                vec![
                    CellValue::Float(2.0),
                    CellValue::Float(4.0),
                    CellValue::Float(6.0),
                    CellValue::Float(8.0),
                ],
            ),
            Column::new(
                "city",
                vec![
                    CellValue::Text("Oslo".into()),
                    CellValue::Text("Rome".into()),
                    CellValue::Text("Rome".into()),
                    CellValue::Text("Lima".into()),
                ],
            ),
        ])
    }

    #[test]
    fn descriptive_report_lists_every_column() {
        let report = run_analysis(
            &sample(),
            &AnalysisRequest {
                kind: AnalysisKind::Descriptive,
                x: None,
                y: None,
            },
        )
        .unwrap();
        assert!(report.body.contains("x"));
        assert!(report.body.contains("city"));
        assert!(report.body.contains("Rome"));
    }

    #[test]
    fn regression_report_carries_equation_and_r_squared() {
        let report = run_analysis(
            &sample(),
            &AnalysisRequest {
                kind: AnalysisKind::Regression,
                x: Some("x".into()),
                y: Some("y".into()),
            },
        )
        .unwrap();
        assert_eq!(report.title, "Regression Analysis: y ~ x");
        assert!(report.body.contains("y = 2.0000x + 0.0000"));
        assert!(report.body.contains("(R²): 1.0000"));
        assert!(report.body.contains("100.00% of the variability"));
    }

    #[test]
    fn correlation_needs_two_numeric_columns() {
        let t = Table::new(vec![Column::new(
            "only",
            vec![CellValue::Float(1.0), CellValue::Float(2.0)],
        )]);
        let err = run_analysis(
            &t,
            &AnalysisRequest {
                kind: AnalysisKind::Correlation,
                x: None,
                y: None,
            },
        );
        assert!(matches!(err, Err(Error::InsufficientColumns(_))));
    }
}
