use crate::data::model::Table;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Ordinary least squares, one predictor
// ---------------------------------------------------------------------------

/// Fitted line `y = slope·x + intercept` with its goodness of fit.
#[derive(Debug, Clone)]
pub struct RegressionFit {
    pub x_column: String,
    pub y_column: String,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Number of complete (x, y) observations used.
    pub n: usize,
}

impl RegressionFit {
    pub fn equation(&self) -> String {
        format!("y = {:.4}x + {:.4}", self.slope, self.intercept)
    }

    pub fn interpretation(&self) -> String {
        format!(
            "- For each unit increase in {x}, {y} changes by {slope:.4}\n\
             - When {x} is 0, {y} is {intercept:.4}\n\
             - The model explains {pct:.2}% of the variability in {y}",
            x = self.x_column,
            y = self.y_column,
            slope = self.slope,
            intercept = self.intercept,
            pct = self.r_squared * 100.0,
        )
    }
}

/// Fit a least-squares line of `y_column` on `x_column` via the closed-form
/// normal equations. Both columns must be numeric, else
/// [`Error::TypeMismatch`]. Rows where either cell is null are dropped.
/// Deterministic: identical input always yields the identical fit.
pub fn linear_regression(table: &Table, x_column: &str, y_column: &str) -> Result<RegressionFit> {
    let x = table.column(x_column).ok_or_else(|| {
        Error::TypeMismatch(format!("column '{x_column}' does not exist"))
    })?;
    let y = table.column(y_column).ok_or_else(|| {
        Error::TypeMismatch(format!("column '{y_column}' does not exist"))
    })?;
    if !x.is_numeric() || !y.is_numeric() {
        return Err(Error::TypeMismatch(
            "both variables must be numeric for regression analysis".into(),
        ));
    }

    let pairs: Vec<(f64, f64)> = x
        .values
        .iter()
        .zip(y.values.iter())
        .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return Err(Error::TypeMismatch(format!(
            "regression needs at least 2 complete observations, found {}",
            pairs.len()
        )));
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in &pairs {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    // Degenerate x (zero variance) yields a NaN fit rather than a crash,
    // matching what a numeric solver would report.
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in &pairs {
        let predicted = slope * x + intercept;
        ss_res += (y - predicted) * (y - predicted);
        ss_tot += (y - mean_y) * (y - mean_y);
    }
    let r_squared = if ss_tot == 0.0 {
        // constant y is reproduced exactly by the fitted horizontal line
        if ss_res == 0.0 {
            1.0
        } else {
            f64::NAN
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(RegressionFit {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        slope,
        intercept,
        r_squared,
        n: pairs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn numeric_column(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|&v| CellValue::Float(v)).collect())
    }

    #[test]
    fn exact_fit_recovers_slope_intercept_and_unit_r_squared() {
        let t = Table::new(vec![
            numeric_column("x", &[1.0, 2.0, 3.0, 4.0]),
            numeric_column("y", &[2.0, 4.0, 6.0, 8.0]),
        ]);
        let fit = linear_regression(&t, "x", "y").unwrap();
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.intercept, 0.0);
        assert_eq!(fit.r_squared, 1.0);
        assert_eq!(fit.n, 4);
    }

    #[test]
    fn noisy_fit_reports_partial_r_squared() {
        let t = Table::new(vec![
            numeric_column("x", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            numeric_column("y", &[1.2, 1.9, 3.3, 3.8, 5.1]),
        ]);
        let fit = linear_regression(&t, "x", "y").unwrap();
        assert!(fit.r_squared > 0.95 && fit.r_squared < 1.0);
        assert!((fit.slope - 1.0).abs() < 0.1);
    }

    #[test]
    fn non_numeric_input_is_a_type_mismatch() {
        let t = Table::new(vec![
            numeric_column("x", &[1.0, 2.0]),
            Column::new(
                "label",
                vec![CellValue::Text("a".into()), CellValue::Text("b".into())],
            ),
        ]);
        assert!(matches!(
            linear_regression(&t, "x", "label"),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn null_rows_are_dropped_before_fitting() {
        let t = Table::new(vec![
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
                "y",
                vec![
                    CellValue::Float(2.0),
                    CellValue::Float(100.0),
                    CellValue::Float(6.0),
                    CellValue::Float(8.0),
                ],
            ),
        ]);
        let fit = linear_regression(&t, "x", "y").unwrap();
        assert_eq!(fit.n, 3);
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.r_squared, 1.0);
    }
}
