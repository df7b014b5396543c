use std::cmp::Ordering;

use crate::data::model::{CellValue, ColumnType, Table};
use crate::error::{Error, Result};
use crate::transform::convert::parse_datetime;

// ---------------------------------------------------------------------------
// Filter predicate: column ⟨op⟩ literal
// ---------------------------------------------------------------------------

/// Comparison operator of a row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl FilterOp {
    pub const ALL: [FilterOp; 6] = [
        FilterOp::Gt,
        FilterOp::Ge,
        FilterOp::Lt,
        FilterOp::Le,
        FilterOp::Eq,
        FilterOp::Ne,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Eq => "==",
            FilterOp::Ne => "!=",
        }
    }

    fn matches(&self, ord: Ordering) -> bool {
        match self {
            FilterOp::Gt => ord == Ordering::Greater,
            FilterOp::Ge => ord != Ordering::Less,
            FilterOp::Lt => ord == Ordering::Less,
            FilterOp::Le => ord != Ordering::Greater,
            FilterOp::Eq => ord == Ordering::Equal,
            FilterOp::Ne => ord != Ordering::Equal,
        }
    }
}

/// A row filter: keep the rows where `column ⟨op⟩ value` holds.
///
/// The literal is held as raw text and parsed against the column's type when
/// the filter runs. Evaluation is structural — the value is compared cell by
/// cell, never spliced into a query expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// The parsed form of the literal, fixed before any row is visited.
enum Literal {
    Number(f64),
    Date(chrono::NaiveDateTime),
    Text(String),
}

/// Apply the predicate, returning a new table containing the matching rows.
/// Null cells never match. Fails with [`Error::Filter`] when the column does
/// not exist or the literal cannot be compared against the column's type;
/// the input table is untouched on failure.
pub fn apply_filter(table: &Table, pred: &FilterPredicate) -> Result<Table> {
    let column = table.column(&pred.column).ok_or_else(|| {
        Error::Filter(format!("column '{}' does not exist", pred.column))
    })?;

    let literal = match column.ty {
        ColumnType::Numeric => {
            let v = pred.value.trim().parse::<f64>().map_err(|_| {
                Error::Filter(format!(
                    "'{}' is not numeric, cannot compare against numeric column '{}'",
                    pred.value, pred.column
                ))
            })?;
            Literal::Number(v)
        }
        ColumnType::DateTime => {
            let dt = parse_datetime(pred.value.trim()).ok_or_else(|| {
                Error::Filter(format!(
                    "'{}' is not a date, cannot compare against datetime column '{}'",
                    pred.value, pred.column
                ))
            })?;
            Literal::Date(dt)
        }
        ColumnType::Text | ColumnType::Categorical => Literal::Text(pred.value.clone()),
    };

    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&row| cell_matches(&column.values[row], &literal, pred.op))
        .collect();

    Ok(table.select_rows(&keep))
}

fn cell_matches(cell: &CellValue, literal: &Literal, op: FilterOp) -> bool {
    if cell.is_null() {
        return false;
    }
    let ord = match literal {
        Literal::Number(rhs) => match cell.as_f64() {
            Some(lhs) => lhs.partial_cmp(rhs),
            None => None,
        },
        Literal::Date(rhs) => match cell {
            CellValue::DateTime(lhs) => Some(lhs.cmp(rhs)),
            _ => None,
        },
        Literal::Text(rhs) => Some(cell.to_string().as_str().cmp(rhs.as_str())),
    };
    ord.is_some_and(|o| op.matches(o))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "temp",
                vec![
                    CellValue::Float(-3.5),
                    CellValue::Float(17.0),
                    CellValue::Null,
                    CellValue::Float(21.5),
                ],
            ),
            Column::new(
                "city",
                vec![
                    CellValue::Text("Oslo".into()),
                    CellValue::Text("Rome".into()),
                    CellValue::Text("Lima".into()),
                    CellValue::Text("Rome".into()),
                ],
            ),
        ])
    }

    #[test]
    fn numeric_comparison_keeps_matching_rows_and_skips_nulls() {
        let pred = FilterPredicate {
            column: "temp".into(),
            op: FilterOp::Gt,
            value: "0".into(),
        };
        let out = apply_filter(&sample(), &pred).unwrap();
        assert_eq!(out.n_rows(), 2);
        assert_eq!(out.column("city").unwrap().values[0], CellValue::Text("Rome".into()));
    }

    #[test]
    fn text_equality() {
        let pred = FilterPredicate {
            column: "city".into(),
            op: FilterOp::Eq,
            value: "Rome".into(),
        };
        let out = apply_filter(&sample(), &pred).unwrap();
        assert_eq!(out.n_rows(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let pred = FilterPredicate {
            column: "temp".into(),
            op: FilterOp::Le,
            value: "17".into(),
        };
        let once = apply_filter(&sample(), &pred).unwrap();
        let twice = apply_filter(&once, &pred).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn quote_characters_in_the_literal_are_plain_text() {
        // A literal containing quote/backtick characters is compared as-is,
        // it cannot alter how the predicate is evaluated.
        let pred = FilterPredicate {
            column: "city".into(),
            op: FilterOp::Eq,
            value: "Rome` or `1==1".into(),
        };
        let out = apply_filter(&sample(), &pred).unwrap();
        assert_eq!(out.n_rows(), 0);
    }

    #[test]
    fn unknown_column_is_a_filter_error() {
        let pred = FilterPredicate {
            column: "nope".into(),
            op: FilterOp::Eq,
            value: "1".into(),
        };
        assert!(matches!(
            apply_filter(&sample(), &pred),
            Err(Error::Filter(_))
        ));
    }

    #[test]
    fn non_numeric_literal_against_numeric_column_is_a_filter_error() {
        let table = sample();
        let pred = FilterPredicate {
            column: "temp".into(),
            op: FilterOp::Gt,
            value: "warm".into(),
        };
        let err = apply_filter(&table, &pred);
        assert!(matches!(err, Err(Error::Filter(_))));
        // failure leaves the input untouched
        assert_eq!(table.n_rows(), 4);
    }
}
