use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a `BTreeMap` key downstream (mode counts, unique values), so
/// `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeMap/BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                DateTime(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric operations.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Parse a raw token the way a permissive CSV reader would: integer,
    /// then float, then boolean, else text. Empty input is `Null`.
    pub fn parse_token(s: &str) -> CellValue {
        let t = s.trim();
        if t.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = t.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(v) = t.parse::<f64>() {
            return CellValue::Float(v);
        }
        if t == "true" || t == "false" {
            return CellValue::Bool(t == "true");
        }
        CellValue::Text(t.to_string())
    }
}

// ---------------------------------------------------------------------------
// ColumnType – logical type tag of a column
// ---------------------------------------------------------------------------

/// Logical column type. Set on load from the cells, re-tagged by coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
    DateTime,
    Categorical,
}

impl ColumnType {
    pub const ALL: [ColumnType; 4] = [
        ColumnType::Numeric,
        ColumnType::Text,
        ColumnType::DateTime,
        ColumnType::Categorical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::DateTime => "datetime",
            ColumnType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column – one named, typed sequence of cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring the logical type from the cells.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let ty = infer_type(&values);
        Column {
            name: name.into(),
            ty,
            values,
        }
    }

    pub fn with_type(name: impl Into<String>, ty: ColumnType, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            ty,
            values,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.ty == ColumnType::Numeric
    }

    /// Non-null values interpreted as `f64`, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Count of each distinct non-null value, keyed in sorted order.
    pub fn value_counts(&self) -> BTreeMap<CellValue, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.values {
            if !v.is_null() {
                *counts.entry(v.clone()).or_insert(0usize) += 1;
            }
        }
        counts
    }

}

/// Infer a logical type from the non-null cells: all numbers → `Numeric`,
/// all datetimes → `DateTime`, all booleans → `Categorical`, else `Text`.
fn infer_type(values: &[CellValue]) -> ColumnType {
    let mut any = false;
    let mut all_numeric = true;
    let mut all_datetime = true;
    let mut all_bool = true;
    for v in values {
        match v {
            CellValue::Null => continue,
            CellValue::Integer(_) | CellValue::Float(_) => {
                all_datetime = false;
                all_bool = false;
            }
            CellValue::DateTime(_) => {
                all_numeric = false;
                all_bool = false;
            }
            CellValue::Bool(_) => {
                all_numeric = false;
                all_datetime = false;
            }
            CellValue::Text(_) => {
                all_numeric = false;
                all_datetime = false;
                all_bool = false;
            }
        }
        any = true;
    }
    if !any {
        return ColumnType::Text;
    }
    if all_numeric {
        ColumnType::Numeric
    } else if all_datetime {
        ColumnType::DateTime
    } else if all_bool {
        ColumnType::Categorical
    } else {
        ColumnType::Text
    }
}

// ---------------------------------------------------------------------------
// Table – the complete in-memory dataset
// ---------------------------------------------------------------------------

/// The in-memory dataset the session operates on: an ordered set of named
/// columns with equal row counts and unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns
                .windows(2)
                .all(|w| w[0].values.len() == w[1].values.len()),
            "all columns must have the same row count"
        );
        Table { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Columns whose logical type is numeric, in table order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    /// New table keeping only the rows at `indices`, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                ty: c.ty,
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Table::new(columns)
    }

    /// New table with the column at `index` replaced.
    pub fn replace_column(&self, index: usize, column: Column) -> Table {
        let mut columns = self.columns.clone();
        columns[index] = column;
        Table::new(columns)
    }

    /// One row of display strings, for the preview widget.
    pub fn row_display(&self, row: usize) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.values[row].to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_covers_the_common_shapes() {
        assert_eq!(CellValue::parse_token("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse_token("4.25"), CellValue::Float(4.25));
        assert_eq!(CellValue::parse_token("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::parse_token("hello"),
            CellValue::Text("hello".into())
        );
        assert_eq!(CellValue::parse_token("  "), CellValue::Null);
    }

    #[test]
    fn type_inference() {
        let numeric = Column::new(
            "a",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)],
        );
        assert_eq!(numeric.ty, ColumnType::Numeric);

        let text = Column::new("b", vec![CellValue::Integer(1), CellValue::Text("x".into())]);
        assert_eq!(text.ty, ColumnType::Text);

        let empty = Column::new("c", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(empty.ty, ColumnType::Text);
    }

    #[test]
    fn select_rows_keeps_column_shape() {
        let t = Table::new(vec![
            Column::new(
                "a",
                vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
            ),
            Column::new(
                "b",
                vec![
                    CellValue::Text("x".into()),
                    CellValue::Text("y".into()),
                    CellValue::Text("z".into()),
                ],
            ),
        ]);
        let kept = t.select_rows(&[0, 2]);
        assert_eq!(kept.n_rows(), 2);
        assert_eq!(kept.n_cols(), 2);
        assert_eq!(
            kept.column("b").unwrap().values[1],
            CellValue::Text("z".into())
        );
    }

    #[test]
    fn value_counts_skips_nulls() {
        let c = Column::new(
            "a",
            vec![
                CellValue::Text("x".into()),
                CellValue::Text("x".into()),
                CellValue::Null,
                CellValue::Text("y".into()),
            ],
        );
        let counts = c.value_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&CellValue::Text("x".into())], 2);
    }
}
