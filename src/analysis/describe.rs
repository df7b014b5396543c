use crate::data::model::{Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Per-column summary, one row of the "describe all columns" report.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub ty: ColumnType,
    /// Non-null cell count.
    pub count: usize,
    pub numeric: Option<NumericSummary>,
    pub categorical: Option<CategoricalSummary>,
}

#[derive(Debug, Clone)]
pub struct NumericSummary {
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct CategoricalSummary {
    pub unique: usize,
    /// Most frequent value, rendered for display.
    pub top: String,
    pub freq: usize,
}

/// Summarize every column: numeric columns get the five-number summary plus
/// mean/std, everything else gets unique/top/freq. Pure read.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table.columns().iter().map(describe_column).collect()
}

fn describe_column(column: &Column) -> ColumnSummary {
    let count = column.values.len() - column.null_count();
    let (numeric, categorical) = if column.is_numeric() {
        (numeric_summary(&column.numeric_values()), None)
    } else {
        (None, categorical_summary(column))
    };
    ColumnSummary {
        name: column.name.clone(),
        ty: column.ty,
        count,
        numeric,
        categorical,
    }
}

fn numeric_summary(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    Some(NumericSummary {
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolation quantile over an already sorted slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

fn categorical_summary(column: &Column) -> Option<CategoricalSummary> {
    let counts = column.value_counts();
    let top_count = counts.values().copied().max()?;
    let top = counts
        .iter()
        .find(|(_, &n)| n == top_count)
        .map(|(v, _)| v.to_string())?;
    Some(CategoricalSummary {
        unique: counts.len(),
        top,
        freq: top_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn numeric_summary_matches_hand_computed_values() {
        let t = Table::new(vec![Column::new(
            "x",
            vec![
                CellValue::Float(1.0),
                CellValue::Float(2.0),
                CellValue::Float(3.0),
                CellValue::Float(4.0),
            ],
        )]);
        let summaries = describe(&t);
        let s = summaries[0].numeric.as_ref().unwrap();
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.q3, 3.25);
        // sample std of 1..4
        assert!((s.std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn count_excludes_nulls() {
        let t = Table::new(vec![Column::new(
            "x",
            vec![CellValue::Float(1.0), CellValue::Null, CellValue::Float(3.0)],
        )]);
        assert_eq!(describe(&t)[0].count, 2);
    }

    #[test]
    fn categorical_summary_reports_unique_top_freq() {
        let t = Table::new(vec![Column::new(
            "city",
            vec![
                CellValue::Text("Rome".into()),
                CellValue::Text("Oslo".into()),
                CellValue::Text("Rome".into()),
            ],
        )]);
        let s = &describe(&t)[0];
        let cat = s.categorical.as_ref().unwrap();
        assert_eq!(cat.unique, 2);
        assert_eq!(cat.top, "Rome");
        assert_eq!(cat.freq, 2);
    }
}
