use crate::data::model::{CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Missing-value handling
// ---------------------------------------------------------------------------

/// Policy for one imputation pass. Policies are mutually exclusive; one is
/// applied per invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingPolicy {
    /// Drop every row containing at least one null cell.
    DropRows,
    /// Fill nulls in numeric columns with the column mean.
    FillMean,
    /// Fill nulls in numeric columns with the column median.
    FillMedian,
    /// Fill nulls in every column with its most frequent value.
    FillMode,
    /// Fill every null with one literal, parsed as a number when it parses.
    /// A blank literal fills with zero.
    FillValue(String),
}

/// Apply one missing-value policy, returning the cleaned table.
pub fn handle_missing(table: &Table, policy: &MissingPolicy) -> Table {
    match policy {
        MissingPolicy::DropRows => drop_null_rows(table),
        MissingPolicy::FillMean => fill_numeric_with(table, mean),
        MissingPolicy::FillMedian => fill_numeric_with(table, median),
        MissingPolicy::FillMode => fill_with_mode(table),
        MissingPolicy::FillValue(literal) => fill_with_value(table, literal),
    }
}

fn drop_null_rows(table: &Table) -> Table {
    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&row| table.columns().iter().all(|c| !c.values[row].is_null()))
        .collect();
    table.select_rows(&keep)
}

/// Fill nulls in numeric columns using a statistic of the non-null values.
/// Columns with no numeric values are left alone.
fn fill_numeric_with(table: &Table, stat: fn(&[f64]) -> Option<f64>) -> Table {
    let mut out = table.clone();
    for idx in 0..table.n_cols() {
        let column = &table.columns()[idx];
        if !column.is_numeric() {
            continue;
        }
        let Some(fill) = stat(&column.numeric_values()) else {
            continue;
        };
        let values = column
            .values
            .iter()
            .map(|v| {
                if v.is_null() {
                    CellValue::Float(fill)
                } else {
                    v.clone()
                }
            })
            .collect();
        out = out.replace_column(idx, Column::with_type(column.name.clone(), column.ty, values));
    }
    out
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Per-column most frequent value; ties resolve to the smallest value, the
/// way an ordered count map yields them.
fn fill_with_mode(table: &Table) -> Table {
    let mut out = table.clone();
    for idx in 0..table.n_cols() {
        let column = &table.columns()[idx];
        let counts = column.value_counts();
        let Some(top) = counts.values().copied().max() else {
            continue;
        };
        // counts is ordered by value, so the first hit at the maximal count
        // is the smallest candidate.
        let Some(mode) = counts
            .iter()
            .find(|(_, &n)| n == top)
            .map(|(v, _)| v.clone())
        else {
            continue;
        };

        let values = column
            .values
            .iter()
            .map(|v| if v.is_null() { mode.clone() } else { v.clone() })
            .collect();
        out = out.replace_column(idx, Column::with_type(column.name.clone(), column.ty, values));
    }
    out
}

fn fill_with_value(table: &Table, literal: &str) -> Table {
    let fill = if literal.trim().is_empty() {
        CellValue::Float(0.0)
    } else {
        match literal.trim().parse::<f64>() {
            Ok(v) => CellValue::Float(v),
            Err(_) => CellValue::Text(literal.trim().to_string()),
        }
    };

    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let values: Vec<CellValue> = column
                .values
                .iter()
                .map(|v| if v.is_null() { fill.clone() } else { v.clone() })
                .collect();
            // A text fill can break a numeric column's type tag (and vice
            // versa), so re-infer from the cells.
            Column::new(column.name.clone(), values)
        })
        .collect();
    Table::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnType;

    fn table_with_gaps() -> Table {
        Table::new(vec![
            Column::new(
                "x",
                vec![
                    CellValue::Float(1.0),
                    CellValue::Null,
                    CellValue::Float(3.0),
                    CellValue::Float(4.0),
                ],
            ),
            Column::new(
                "label",
                vec![
                    CellValue::Text("a".into()),
                    CellValue::Text("a".into()),
                    CellValue::Null,
                    CellValue::Text("b".into()),
                ],
            ),
        ])
    }

    #[test]
    fn drop_rows_removes_exactly_the_incomplete_rows() {
        let cleaned = handle_missing(&table_with_gaps(), &MissingPolicy::DropRows);
        assert_eq!(cleaned.n_rows(), 2);
        assert_eq!(cleaned.column("x").unwrap().values[0], CellValue::Float(1.0));
        assert_eq!(cleaned.column("x").unwrap().values[1], CellValue::Float(4.0));
    }

    #[test]
    fn mean_fill_targets_numeric_columns_only() {
        let cleaned = handle_missing(&table_with_gaps(), &MissingPolicy::FillMean);
        assert_eq!(cleaned.n_rows(), 4);
        let x = cleaned.column("x").unwrap();
        assert_eq!(x.values[1], CellValue::Float((1.0 + 3.0 + 4.0) / 3.0));
        assert_eq!(x.null_count(), 0);
        // text column untouched
        assert_eq!(cleaned.column("label").unwrap().values[2], CellValue::Null);
    }

    #[test]
    fn median_fill_uses_the_middle_value() {
        let cleaned = handle_missing(&table_with_gaps(), &MissingPolicy::FillMedian);
        assert_eq!(cleaned.column("x").unwrap().values[1], CellValue::Float(3.0));
    }

    #[test]
    fn mode_fill_uses_the_most_frequent_value() {
        let cleaned = handle_missing(&table_with_gaps(), &MissingPolicy::FillMode);
        assert_eq!(
            cleaned.column("label").unwrap().values[2],
            CellValue::Text("a".into())
        );
    }

    #[test]
    fn mode_fill_prefers_the_smallest_value_on_ties() {
        let t = Table::new(vec![Column::new(
            "label",
            vec![
                CellValue::Text("b".into()),
                CellValue::Text("a".into()),
                CellValue::Null,
                CellValue::Text("b".into()),
                CellValue::Text("a".into()),
            ],
        )]);
        let cleaned = handle_missing(&t, &MissingPolicy::FillMode);
        assert_eq!(
            cleaned.column("label").unwrap().values[2],
            CellValue::Text("a".into())
        );
    }

    #[test]
    fn value_fill_parses_numbers_and_defaults_to_zero() {
        let numeric = handle_missing(&table_with_gaps(), &MissingPolicy::FillValue("9".into()));
        assert_eq!(numeric.column("x").unwrap().values[1], CellValue::Float(9.0));

        let blank = handle_missing(&table_with_gaps(), &MissingPolicy::FillValue("".into()));
        assert_eq!(blank.column("x").unwrap().values[1], CellValue::Float(0.0));

        let text = handle_missing(&table_with_gaps(), &MissingPolicy::FillValue("n/a".into()));
        assert_eq!(
            text.column("x").unwrap().values[1],
            CellValue::Text("n/a".into())
        );
        // the numeric column now holds mixed cells and re-infers to text
        assert_eq!(text.column("x").unwrap().ty, ColumnType::Text);
    }

    #[test]
    fn fill_never_changes_row_count() {
        for policy in [
            MissingPolicy::FillMean,
            MissingPolicy::FillMedian,
            MissingPolicy::FillMode,
            MissingPolicy::FillValue("0".into()),
        ] {
            assert_eq!(handle_missing(&table_with_gaps(), &policy).n_rows(), 4);
        }
    }
}
