use crate::data::model::{CellValue, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Pearson correlation matrix
// ---------------------------------------------------------------------------

/// Square, symmetric correlation matrix over the numeric columns, with 1.0
/// on the diagonal. Entries with no overlapping observations are NaN.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

/// Compute pairwise Pearson correlation over the numeric columns.
///
/// Fails with [`Error::InsufficientColumns`] when fewer than two numeric
/// columns exist. Row pairs where either cell is null are skipped, so
/// columns with scattered gaps still correlate over their overlap.
pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix> {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(Error::InsufficientColumns(
            "not enough numeric columns for a correlation matrix (need at least 2)".into(),
        ));
    }

    let columns: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
    let cells: Vec<&[CellValue]> = numeric.iter().map(|c| c.values.as_slice()).collect();

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(cells[i], cells[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}

/// Pearson r over the rows where both cells are numeric.
fn pearson(a: &[CellValue], b: &[CellValue]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn numeric_column(name: &str, values: &[f64]) -> Column {
        Column::new(
            name,
            values.iter().map(|&v| CellValue::Float(v)).collect(),
        )
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let t = Table::new(vec![
            numeric_column("a", &[1.0, 2.0, 3.0, 4.0]),
            numeric_column("b", &[2.0, 1.0, 4.0, 3.0]),
            numeric_column("c", &[4.0, 3.0, 2.0, 1.0]),
        ]);
        let m = correlation_matrix(&t).unwrap();
        assert_eq!(m.size(), 3);
        for i in 0..3 {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
    }

    #[test]
    fn perfectly_correlated_and_anticorrelated_pairs() {
        let t = Table::new(vec![
            numeric_column("x", &[1.0, 2.0, 3.0]),
            numeric_column("double", &[2.0, 4.0, 6.0]),
            numeric_column("neg", &[3.0, 2.0, 1.0]),
        ]);
        let m = correlation_matrix(&t).unwrap();
        assert!((m.values[0][1] - 1.0).abs() < 1e-12);
        assert!((m.values[0][2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_numeric_column_is_insufficient() {
        let t = Table::new(vec![
            numeric_column("x", &[1.0, 2.0]),
            Column::new(
                "label",
                vec![CellValue::Text("a".into()), CellValue::Text("b".into())],
            ),
        ]);
        assert!(matches!(
            correlation_matrix(&t),
            Err(Error::InsufficientColumns(_))
        ));
    }

    #[test]
    fn null_rows_are_skipped_pairwise() {
        let t = Table::new(vec![
            Column::new(
                "a",
                vec![
                    CellValue::Float(1.0),
                    CellValue::Null,
                    CellValue::Float(3.0),
                    CellValue::Float(4.0),
                ],
            ),
            Column::new(
                "b",
                vec![
                    CellValue::Float(2.0),
                    CellValue::Float(9.0),
                    CellValue::Float(6.0),
                    CellValue::Float(8.0),
                ],
            ),
        ]);
        let m = correlation_matrix(&t).unwrap();
        // overlap rows are (1,2), (3,6), (4,8): exactly proportional
        assert!((m.values[0][1] - 1.0).abs() < 1e-12);
    }
}
