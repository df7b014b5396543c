use chrono::NaiveDateTime;

use crate::analysis::correlation::{correlation_matrix, CorrelationMatrix};
use crate::analysis::describe::quantile;
use crate::analysis::regression::{linear_regression, RegressionFit};
use crate::data::model::{CellValue, Column, ColumnType, Table};
use crate::error::{Error, Result};
use crate::plot::decompose::{decompose, Decomposition};
use crate::plot::{ChartKind, PlotSpec};

// ---------------------------------------------------------------------------
// Prepared figure data
// ---------------------------------------------------------------------------

/// One histogram bin: `[lo, hi)` and its count (the last bin is closed).
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Five-number summary with 1.5·IQR whiskers; values beyond the whiskers
/// are listed as outliers.
#[derive(Debug, Clone)]
pub struct BoxSummary {
    pub whisker_lo: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_hi: f64,
    pub outliers: Vec<f64>,
}

/// One panel of the pair-plot grid at (row, col): a histogram on the
/// diagonal, a scatter off it.
#[derive(Debug, Clone)]
pub enum PairPanel {
    Hist {
        row: usize,
        col: usize,
        bins: Vec<Bin>,
    },
    Scatter {
        row: usize,
        col: usize,
        points: Vec<(f64, f64)>,
    },
}

/// Chart data prepared from the table, ready to draw.
#[derive(Debug, Clone)]
pub enum FigureData {
    Histogram { bins: Vec<Bin> },
    Box { summary: BoxSummary },
    Scatter { points: Vec<(f64, f64)> },
    Line { points: Vec<(f64, f64)> },
    Bar { bars: Vec<(String, usize)> },
    Heatmap { matrix: CorrelationMatrix },
    Pair { columns: Vec<String>, panels: Vec<PairPanel> },
    Regression { points: Vec<(f64, f64)>, fit: RegressionFit },
    Decomposition(Decomposition),
}

/// The last-produced chart: the spec that requested it plus the prepared
/// data. Rendering is a separate, read-only step.
#[derive(Debug, Clone)]
pub struct Figure {
    pub spec: PlotSpec,
    pub data: FigureData,
}

// ---------------------------------------------------------------------------
// Figure preparation
// ---------------------------------------------------------------------------

/// Prepare the chart data a plot spec asks for. Every failure (missing or
/// wrong-typed column, too few numeric columns, too short a series) is a
/// typed error; the table is never touched.
pub fn build_figure(table: &Table, spec: &PlotSpec) -> Result<Figure> {
    let data = match spec.kind {
        ChartKind::Histogram => FigureData::Histogram {
            bins: histogram_bins(&numeric_cells(table, &spec.x)?, 10),
        },
        ChartKind::BoxPlot => FigureData::Box {
            summary: box_summary(&numeric_cells(table, &spec.x)?),
        },
        ChartKind::Scatter => FigureData::Scatter {
            points: xy_points(table, &spec.x, require_y(spec)?)?,
        },
        ChartKind::Line => FigureData::Line {
            points: xy_points(table, &spec.x, require_y(spec)?)?,
        },
        ChartKind::Bar => FigureData::Bar {
            bars: top_value_counts(column(table, &spec.x)?, 10),
        },
        ChartKind::Heatmap => FigureData::Heatmap {
            matrix: correlation_matrix(table)?,
        },
        ChartKind::PairPlot => pair_panels(table)?,
        ChartKind::RegressionPlot => {
            let y = require_y(spec)?;
            let fit = linear_regression(table, &spec.x, y)?;
            FigureData::Regression {
                points: xy_points(table, &spec.x, y)?,
                fit,
            }
        }
        ChartKind::Decomposition => {
            let y = require_y(spec)?;
            FigureData::Decomposition(decompose(&timestamped_values(table, &spec.x, y)?)?)
        }
    };
    Ok(Figure {
        spec: spec.clone(),
        data,
    })
}

fn column<'t>(table: &'t Table, name: &str) -> Result<&'t Column> {
    table
        .column(name)
        .ok_or_else(|| Error::TypeMismatch(format!("column '{name}' does not exist")))
}

fn require_y(spec: &PlotSpec) -> Result<&str> {
    spec.y
        .as_deref()
        .filter(|y| !y.is_empty())
        .ok_or_else(|| {
            Error::TypeMismatch(format!(
                "{} requires a Y column",
                spec.kind.label()
            ))
        })
}

fn numeric_cells(table: &Table, name: &str) -> Result<Vec<f64>> {
    let column = column(table, name)?;
    if !column.is_numeric() {
        return Err(Error::TypeMismatch(format!(
            "column '{name}' is not numeric"
        )));
    }
    Ok(column.numeric_values())
}

/// Paired (x, y) values of two numeric columns, null pairs skipped.
fn xy_points(table: &Table, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let xc = column(table, x)?;
    let yc = column(table, y)?;
    if !xc.is_numeric() || !yc.is_numeric() {
        return Err(Error::TypeMismatch(format!(
            "columns '{x}' and '{y}' must both be numeric"
        )));
    }
    Ok(xc
        .values
        .iter()
        .zip(yc.values.iter())
        .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
        .collect())
}

fn timestamped_values(table: &Table, x: &str, y: &str) -> Result<Vec<(NaiveDateTime, f64)>> {
    let xc = column(table, x)?;
    if xc.ty != ColumnType::DateTime {
        return Err(Error::TypeMismatch(format!(
            "time series decomposition requires a datetime X column, '{x}' is {}",
            xc.ty
        )));
    }
    let yc = column(table, y)?;
    if !yc.is_numeric() {
        return Err(Error::TypeMismatch(format!("column '{y}' is not numeric")));
    }
    Ok(xc
        .values
        .iter()
        .zip(yc.values.iter())
        .filter_map(|(a, b)| match (a, b.as_f64()) {
            (CellValue::DateTime(t), Some(v)) => Some((*t, v)),
            _ => None,
        })
        .collect())
}

/// Equal-width bins over the value range. A constant column gets one bin.
pub fn histogram_bins(values: &[f64], n_bins: usize) -> Vec<Bin> {
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![Bin {
            lo: min,
            hi: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            lo: min + i as f64 * width,
            hi: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

fn box_summary(values: &[f64]) -> BoxSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.is_empty() {
        return BoxSummary {
            whisker_lo: 0.0,
            q1: 0.0,
            median: 0.0,
            q3: 0.0,
            whisker_hi: 0.0,
            outliers: Vec::new(),
        };
    }

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let fence_lo = q1 - 1.5 * iqr;
    let fence_hi = q3 + 1.5 * iqr;

    let whisker_lo = sorted
        .iter()
        .cloned()
        .find(|v| *v >= fence_lo)
        .unwrap_or(sorted[0]);
    let whisker_hi = sorted
        .iter()
        .cloned()
        .rev()
        .find(|v| *v <= fence_hi)
        .unwrap_or(sorted[sorted.len() - 1]);
    let outliers = sorted
        .iter()
        .cloned()
        .filter(|v| *v < fence_lo || *v > fence_hi)
        .collect();

    BoxSummary {
        whisker_lo,
        q1,
        median,
        q3,
        whisker_hi,
        outliers,
    }
}

/// The `n` most frequent values of a column, most frequent first; frequency
/// ties resolve to the smaller value.
fn top_value_counts(column: &Column, n: usize) -> Vec<(String, usize)> {
    let counts = column.value_counts();
    let mut entries: Vec<(CellValue, usize)> = counts.into_iter().collect();
    entries.sort_by(|(va, ca), (vb, cb)| cb.cmp(ca).then_with(|| va.cmp(vb)));
    entries
        .into_iter()
        .take(n)
        .map(|(v, c)| (v.to_string(), c))
        .collect()
}

fn pair_panels(table: &Table) -> Result<FigureData> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(Error::InsufficientColumns(
            "pair plot requires at least two numeric columns".into(),
        ));
    }

    let columns: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
    let mut panels = Vec::with_capacity(columns.len() * columns.len());
    for (row, yc) in numeric.iter().enumerate() {
        for (col, xc) in numeric.iter().enumerate() {
            if row == col {
                panels.push(PairPanel::Hist {
                    row,
                    col,
                    bins: histogram_bins(&xc.numeric_values(), 10),
                });
            } else {
                let points = xc
                    .values
                    .iter()
                    .zip(yc.values.iter())
                    .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
                    .collect();
                panels.push(PairPanel::Scatter { row, col, points });
            }
        }
    }
    Ok(FigureData::Pair { columns, panels })
}
