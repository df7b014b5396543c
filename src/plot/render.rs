use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{Error, Result};
use crate::plot::figure::{Bin, BoxSummary, Figure, FigureData, PairPanel};
use crate::plot::ChartKind;

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Preview size for the Visualization tab, in pixels.
pub fn preview_size(kind: ChartKind) -> (u32, u32) {
    match kind {
        ChartKind::PairPlot | ChartKind::Decomposition => (900, 900),
        _ => (900, 620),
    }
}

fn export_size(kind: ChartKind) -> (u32, u32) {
    match kind {
        ChartKind::PairPlot | ChartKind::Decomposition => (1200, 1200),
        _ => (1200, 800),
    }
}

/// Render the figure into PNG bytes (the preview image).
pub fn render_png_bytes(figure: &Figure, (width, height): (u32, u32)) -> Result<Vec<u8>> {
    let buf = render_rgb_buffer(figure, width, height)?;
    encode_png(buf, width, height)
}

/// Write the figure to an image file; the extension picks the format
/// (`.png`, `.jpg`/`.jpeg`, `.svg`).
pub fn export_figure(figure: &Figure, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let size = export_size(figure.spec.kind);

    match ext.as_str() {
        "png" | "jpg" | "jpeg" => {
            let buf = render_rgb_buffer(figure, size.0, size.1)?;
            let img = image::RgbImage::from_raw(size.0, size.1, buf)
                .ok_or_else(|| Error::Export("failed to assemble image buffer".into()))?;
            img.save(path).map_err(|e| Error::Export(e.to_string()))
        }
        "svg" => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(figure, &root)?;
            root.present().map_err(render_err)
        }
        other => Err(Error::Export(format!(
            "unsupported chart format '.{other}' (expected .png, .jpg or .svg)"
        ))),
    }
}

fn render_rgb_buffer(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present().map_err(render_err)?;
    }
    Ok(buf)
}

fn encode_png(buf: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let img = image::RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| Error::Export("failed to assemble image buffer".into()))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut out),
            image::ImageFormat::Png,
        )
        .map_err(|e| Error::Export(e.to_string()))?;
    Ok(out)
}

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Export(format!("chart rendering failed: {e}"))
}

// ---------------------------------------------------------------------------
// Figure dispatch
// ---------------------------------------------------------------------------

fn draw_figure<DB: DrawingBackend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()> {
    let theme = figure.spec.theme;
    root.fill(&theme.background()).map_err(render_err)?;

    match &figure.data {
        FigureData::Histogram { bins } => draw_histogram(figure, bins, root),
        FigureData::Box { summary } => draw_box(figure, summary, root),
        FigureData::Scatter { points } => draw_scatter(figure, points, root),
        FigureData::Line { points } => draw_line(figure, points, root),
        FigureData::Bar { bars } => draw_bar(figure, bars, root),
        FigureData::Heatmap { matrix } => draw_heatmap(figure, matrix, root),
        FigureData::Pair { columns, panels } => draw_pair(figure, columns, panels, root),
        FigureData::Regression { points, fit } => draw_regression(figure, points, fit, root),
        FigureData::Decomposition(d) => draw_decomposition(figure, d, root),
    }
}

// ---------------------------------------------------------------------------
// Shared styling helpers
// ---------------------------------------------------------------------------

fn series_color(figure: &Figure) -> RGBColor {
    crate::plot::style::parse_hex_color(&figure.spec.color).unwrap_or(RGBColor(52, 152, 219))
}

fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Standard single-panel chart frame: caption, margins, label areas.
macro_rules! chart_frame {
    ($figure:expr, $root:expr, $x_range:expr, $y_range:expr) => {{
        let fg = $figure.spec.theme.foreground();
        ChartBuilder::on($root)
            .caption(
                &$figure.spec.title,
                ("sans-serif", 24).into_font().color(&fg),
            )
            .margin(12)
            .x_label_area_size(42)
            .y_label_area_size(56)
            .build_cartesian_2d($x_range, $y_range)
            .map_err(render_err)?
    }};
}

macro_rules! mesh_frame {
    ($figure:expr, $chart:expr) => {{
        let fg = $figure.spec.theme.foreground();
        $chart
            .configure_mesh()
            .x_desc($figure.spec.x_label.clone())
            .y_desc($figure.spec.y_label.clone())
            .label_style(("sans-serif", 14).into_font().color(&fg))
            .axis_style(fg)
            .light_line_style(fg.mix(0.08))
            .bold_line_style(fg.mix(0.16))
            .draw()
            .map_err(render_err)?;
    }};
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

fn draw_histogram<DB: DrawingBackend>(
    figure: &Figure,
    bins: &[Bin],
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let x_range = padded_range(bins.iter().flat_map(|b| [b.lo, b.hi].into_iter()));
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64;

    let mut chart = chart_frame!(figure, root, x_range, 0.0..(max_count * 1.05));
    mesh_frame!(figure, chart);

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], color.filled())
        }))
        .map_err(render_err)?;
    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new(
                [(b.lo, 0.0), (b.hi, b.count as f64)],
                figure.spec.theme.background().stroke_width(1),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_box<DB: DrawingBackend>(
    figure: &Figure,
    summary: &BoxSummary,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let fg = figure.spec.theme.foreground();
    let y_range = padded_range(
        [summary.whisker_lo, summary.whisker_hi]
            .into_iter()
            .chain(summary.outliers.iter().copied()),
    );

    let mut chart = chart_frame!(figure, root, 0.0..1.0, y_range);
    chart
        .configure_mesh()
        .disable_x_axis()
        .y_desc(figure.spec.y_label.clone())
        .label_style(("sans-serif", 14).into_font().color(&fg))
        .axis_style(fg)
        .light_line_style(fg.mix(0.08))
        .bold_line_style(fg.mix(0.16))
        .draw()
        .map_err(render_err)?;

    let box_style = color.mix(0.35).filled();
    let stroke = color.stroke_width(2);
    chart
        .draw_series([
            Rectangle::new([(0.3, summary.q1), (0.7, summary.q3)], box_style),
            Rectangle::new([(0.3, summary.q1), (0.7, summary.q3)], stroke),
        ])
        .map_err(render_err)?;
    chart
        .draw_series(
            [
                // median bar, whisker stems, whisker caps
                vec![(0.3, summary.median), (0.7, summary.median)],
                vec![(0.5, summary.whisker_lo), (0.5, summary.q1)],
                vec![(0.5, summary.q3), (0.5, summary.whisker_hi)],
                vec![(0.42, summary.whisker_lo), (0.58, summary.whisker_lo)],
                vec![(0.42, summary.whisker_hi), (0.58, summary.whisker_hi)],
            ]
            .into_iter()
            .map(|pts| PathElement::new(pts, color.stroke_width(2))),
        )
        .map_err(render_err)?;
    chart
        .draw_series(
            summary
                .outliers
                .iter()
                .map(|&v| Circle::new((0.5, v), 3, fg.mix(0.7).filled())),
        )
        .map_err(render_err)?;
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    figure: &Figure,
    points: &[(f64, f64)],
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = chart_frame!(figure, root, x_range, y_range);
    mesh_frame!(figure, chart);

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.8).filled())),
        )
        .map_err(render_err)?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    figure: &Figure,
    points: &[(f64, f64)],
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = chart_frame!(figure, root, x_range, y_range);
    mesh_frame!(figure, chart);

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(2),
        ))
        .map_err(render_err)?;
    Ok(())
}

fn draw_bar<DB: DrawingBackend>(
    figure: &Figure,
    bars: &[(String, usize)],
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let fg = figure.spec.theme.foreground();
    let max = bars.iter().map(|(_, c)| *c).max().unwrap_or(1);

    let mut chart = chart_frame!(
        figure,
        root,
        (0..bars.len()).into_segmented(),
        0..(max + max / 10 + 1)
    );
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(figure.spec.x_label.clone())
        .y_desc(figure.spec.y_label.clone())
        .x_labels(bars.len().max(1))
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => bars
                .get(*i)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .label_style(("sans-serif", 13).into_font().color(&fg))
        .axis_style(fg)
        .light_line_style(fg.mix(0.08))
        .bold_line_style(fg.mix(0.16))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, count))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0),
                    (SegmentValue::Exact(i + 1), *count),
                ],
                color.filled(),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_heatmap<DB: DrawingBackend>(
    figure: &Figure,
    matrix: &crate::analysis::correlation::CorrelationMatrix,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let fg = figure.spec.theme.foreground();
    let n = matrix.size();

    let mut chart = chart_frame!(
        figure,
        root,
        (0..n).into_segmented(),
        (0..n).into_segmented()
    );
    let columns = matrix.columns.clone();
    let rows = columns.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n.max(1))
        .y_labels(n.max(1))
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => columns.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| match v {
            // row 0 is drawn at the top
            SegmentValue::CenterOf(i) => rows
                .get(n - 1 - (*i).min(n - 1))
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .label_style(("sans-serif", 13).into_font().color(&fg))
        .axis_style(fg)
        .draw()
        .map_err(render_err)?;

    for i in 0..n {
        for j in 0..n {
            let value = matrix.values[i][j];
            let cell = if value.is_nan() {
                RGBColor(127, 127, 127)
            } else {
                figure.spec.palette.color_at((value + 1.0) / 2.0)
            };
            let grid_y = n - 1 - i;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [
                        (SegmentValue::Exact(j), SegmentValue::Exact(grid_y)),
                        (SegmentValue::Exact(j + 1), SegmentValue::Exact(grid_y + 1)),
                    ],
                    cell.filled(),
                )))
                .map_err(render_err)?;

            let luminance =
                0.299 * cell.0 as f64 + 0.587 * cell.1 as f64 + 0.114 * cell.2 as f64;
            let text_color = if luminance > 140.0 {
                RGBColor(0, 0, 0)
            } else {
                RGBColor(255, 255, 255)
            };
            let label = if value.is_nan() {
                "NaN".to_string()
            } else {
                format!("{value:.2}")
            };
            chart
                .draw_series(std::iter::once(Text::new(
                    label,
                    (SegmentValue::CenterOf(j), SegmentValue::CenterOf(grid_y)),
                    ("sans-serif", 14)
                        .into_font()
                        .color(&text_color)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                )))
                .map_err(render_err)?;
        }
    }
    Ok(())
}

fn draw_pair<DB: DrawingBackend>(
    figure: &Figure,
    columns: &[String],
    panels: &[PairPanel],
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let fg = figure.spec.theme.foreground();
    let n = columns.len();
    // one hue per column for the diagonal distributions
    let hues = crate::plot::style::series_colors(n);

    let titled = root
        .titled(&figure.spec.title, ("sans-serif", 24).into_font().color(&fg))
        .map_err(render_err)?;
    let areas = titled.split_evenly((n, n));

    for panel in panels {
        let (row, col, area) = match panel {
            PairPanel::Hist { row, col, .. } => (*row, *col, &areas[row * n + col]),
            PairPanel::Scatter { row, col, .. } => (*row, *col, &areas[row * n + col]),
        };

        match panel {
            PairPanel::Hist { bins, .. } => {
                let x_range = padded_range(bins.iter().flat_map(|b| [b.lo, b.hi].into_iter()));
                let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64;
                let mut chart = ChartBuilder::on(area)
                    .caption(&columns[row], ("sans-serif", 13).into_font().color(&fg))
                    .margin(4)
                    .x_label_area_size(18)
                    .y_label_area_size(24)
                    .build_cartesian_2d(x_range, 0.0..(max_count * 1.05))
                    .map_err(render_err)?;
                chart
                    .configure_mesh()
                    .label_style(("sans-serif", 9).into_font().color(&fg))
                    .axis_style(fg)
                    .light_line_style(fg.mix(0.06))
                    .bold_line_style(fg.mix(0.12))
                    .draw()
                    .map_err(render_err)?;
                let hue = hues.get(row).copied().unwrap_or(color);
                chart
                    .draw_series(bins.iter().map(|b| {
                        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], hue.filled())
                    }))
                    .map_err(render_err)?;
            }
            PairPanel::Scatter { points, .. } => {
                let x_range = padded_range(points.iter().map(|p| p.0));
                let y_range = padded_range(points.iter().map(|p| p.1));
                let mut chart = ChartBuilder::on(area)
                    .caption(
                        format!("{} / {}", columns[row], columns[col]),
                        ("sans-serif", 13).into_font().color(&fg),
                    )
                    .margin(4)
                    .x_label_area_size(18)
                    .y_label_area_size(24)
                    .build_cartesian_2d(x_range, y_range)
                    .map_err(render_err)?;
                chart
                    .configure_mesh()
                    .label_style(("sans-serif", 9).into_font().color(&fg))
                    .axis_style(fg)
                    .light_line_style(fg.mix(0.06))
                    .bold_line_style(fg.mix(0.12))
                    .draw()
                    .map_err(render_err)?;
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), 2, color.mix(0.7).filled())),
                    )
                    .map_err(render_err)?;
            }
        }
    }
    Ok(())
}

fn draw_regression<DB: DrawingBackend>(
    figure: &Figure,
    points: &[(f64, f64)],
    fit: &crate::analysis::regression::RegressionFit,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let fg = figure.spec.theme.foreground();
    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));
    let (x_lo, x_hi) = (x_range.start, x_range.end);
    let (y_lo, y_hi) = (y_range.start, y_range.end);

    let mut chart = chart_frame!(figure, root, x_range, y_range);
    mesh_frame!(figure, chart);

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.5).filled())),
        )
        .map_err(render_err)?;
    chart
        .draw_series(LineSeries::new(
            [
                (x_lo, fit.slope * x_lo + fit.intercept),
                (x_hi, fit.slope * x_hi + fit.intercept),
            ],
            RED.stroke_width(2),
        ))
        .map_err(render_err)?;

    // fitted equation in the upper-left corner, in data coordinates
    let annotation = format!("{}   R² = {:.4}", fit.equation(), fit.r_squared);
    chart
        .draw_series(std::iter::once(Text::new(
            annotation,
            (x_lo + (x_hi - x_lo) * 0.04, y_hi - (y_hi - y_lo) * 0.06),
            ("sans-serif", 16).into_font().color(&fg),
        )))
        .map_err(render_err)?;
    Ok(())
}

fn draw_decomposition<DB: DrawingBackend>(
    figure: &Figure,
    d: &crate::plot::decompose::Decomposition,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let color = series_color(figure);
    let fg = figure.spec.theme.foreground();
    let y_name = figure.spec.y.clone().unwrap_or_default();

    let titled = root
        .titled(
            &format!("Time Series Decomposition: {y_name}"),
            ("sans-serif", 22).into_font().color(&fg),
        )
        .map_err(render_err)?;
    let areas = titled.split_evenly((4, 1));

    let first = d.dates[0];
    let last = d.dates[d.dates.len() - 1];

    let observed: Vec<(chrono::NaiveDate, f64)> =
        d.dates.iter().copied().zip(d.observed.iter().copied()).collect();
    let trend: Vec<(chrono::NaiveDate, f64)> = d
        .dates
        .iter()
        .zip(d.trend.iter())
        .filter_map(|(date, t)| t.map(|t| (*date, t)))
        .collect();
    let seasonal: Vec<(chrono::NaiveDate, f64)> =
        d.dates.iter().copied().zip(d.seasonal.iter().copied()).collect();
    let residual: Vec<(chrono::NaiveDate, f64)> = d
        .dates
        .iter()
        .zip(d.residual.iter())
        .filter_map(|(date, r)| r.map(|r| (*date, r)))
        .collect();

    let panels: [(&str, &[(chrono::NaiveDate, f64)], RGBColor); 4] = [
        ("Original Time Series", &observed, color),
        ("Trend Component", &trend, RGBColor(46, 125, 50)),
        ("Seasonal Component", &seasonal, RGBColor(123, 31, 162)),
        ("Residual Component", &residual, RGBColor(198, 40, 40)),
    ];

    for ((caption, series, line_color), area) in panels.into_iter().zip(areas.iter()) {
        let y_range = padded_range(series.iter().map(|p| p.1));
        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 15).into_font().color(&fg))
            .margin(8)
            .x_label_area_size(26)
            .y_label_area_size(48)
            .build_cartesian_2d(first..last, y_range)
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .label_style(("sans-serif", 11).into_font().color(&fg))
            .axis_style(fg)
            .light_line_style(fg.mix(0.06))
            .bold_line_style(fg.mix(0.12))
            .draw()
            .map_err(render_err)?;
        chart
            .draw_series(LineSeries::new(
                series.iter().copied(),
                line_color.stroke_width(2),
            ))
            .map_err(render_err)?;
    }
    Ok(())
}
