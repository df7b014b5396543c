//! Visualization engine.
//!
//! `figure` prepares chart data from the table (pure, testable), `render`
//! draws the prepared figure with plotters into PNG bytes for the on-screen
//! preview or into an image file on export, `decompose` holds the
//! time-series decomposition, and `style` maps the user-facing cosmetic
//! options (color, palette, theme) onto drawing parameters.

pub mod decompose;
pub mod figure;
pub mod render;
pub mod style;

use self::style::{Palette, PlotTheme};

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    BoxPlot,
    Scatter,
    Line,
    Bar,
    Heatmap,
    PairPlot,
    RegressionPlot,
    Decomposition,
}

impl ChartKind {
    pub const ALL: [ChartKind; 9] = [
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Heatmap,
        ChartKind::PairPlot,
        ChartKind::RegressionPlot,
        ChartKind::Decomposition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::PairPlot => "Pair Plot",
            ChartKind::RegressionPlot => "Regression Plot",
            ChartKind::Decomposition => "Time Series Decomposition",
        }
    }

    /// Whether the kind plots a Y column against X. Kinds drawing a single
    /// column or the whole table ignore Y.
    pub fn requires_y(&self) -> bool {
        matches!(
            self,
            ChartKind::Scatter
                | ChartKind::Line
                | ChartKind::RegressionPlot
                | ChartKind::Decomposition
        )
    }
}

// ---------------------------------------------------------------------------
// Plot specification
// ---------------------------------------------------------------------------

/// Everything the user picked in the Visualization tab: what to draw and how
/// it should look.
#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub kind: ChartKind,
    pub x: String,
    pub y: Option<String>,
    /// Hex series color, e.g. `#3498db`.
    pub color: String,
    pub palette: Palette,
    pub theme: PlotTheme,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotSpec {
    fn default() -> Self {
        PlotSpec {
            kind: ChartKind::Histogram,
            x: String::new(),
            y: None,
            color: "#3498db".into(),
            palette: Palette::Viridis,
            theme: PlotTheme::Classic,
            title: "Data Visualization".into(),
            x_label: "X Axis".into(),
            y_label: "Y Axis".into(),
        }
    }
}
