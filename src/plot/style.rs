use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Series color
// ---------------------------------------------------------------------------

/// Parse a `#rrggbb` hex color; the leading `#` is optional.
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(RGBColor(r, g, b))
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn series_colors(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Palettes – sequential gradients and categorical sets
// ---------------------------------------------------------------------------

/// Named palette for value-mapped coloring (heatmap cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Cool,
    Rainbow,
    Category10,
    Set2,
}

impl Palette {
    pub const ALL: [Palette; 9] = [
        Palette::Viridis,
        Palette::Plasma,
        Palette::Inferno,
        Palette::Magma,
        Palette::Cividis,
        Palette::Cool,
        Palette::Rainbow,
        Palette::Category10,
        Palette::Set2,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Palette::Viridis => "viridis",
            Palette::Plasma => "plasma",
            Palette::Inferno => "inferno",
            Palette::Magma => "magma",
            Palette::Cividis => "cividis",
            Palette::Cool => "cool",
            Palette::Rainbow => "rainbow",
            Palette::Category10 => "tab10",
            Palette::Set2 => "Set2",
        }
    }

    /// Color at `t ∈ [0, 1]`. Categorical palettes pick the nearest swatch.
    pub fn color_at(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        let c = match self {
            Palette::Viridis => colorous::VIRIDIS.eval_continuous(t),
            Palette::Plasma => colorous::PLASMA.eval_continuous(t),
            Palette::Inferno => colorous::INFERNO.eval_continuous(t),
            Palette::Magma => colorous::MAGMA.eval_continuous(t),
            Palette::Cividis => colorous::CIVIDIS.eval_continuous(t),
            Palette::Cool => colorous::COOL.eval_continuous(t),
            Palette::Rainbow => colorous::RAINBOW.eval_continuous(t),
            Palette::Category10 => {
                let set = colorous::CATEGORY10;
                set[((t * (set.len() - 1) as f64).round() as usize).min(set.len() - 1)]
            }
            Palette::Set2 => {
                let set = colorous::SET2;
                set[((t * (set.len() - 1) as f64).round() as usize).min(set.len() - 1)]
            }
        };
        RGBColor(c.r, c.g, c.b)
    }
}

// ---------------------------------------------------------------------------
// Themes – background/foreground presets
// ---------------------------------------------------------------------------

/// Overall look of the drawing area, mirroring familiar plotting styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotTheme {
    Classic,
    Ggplot,
    Dark,
    Bmh,
}

impl PlotTheme {
    pub const ALL: [PlotTheme; 4] = [
        PlotTheme::Classic,
        PlotTheme::Ggplot,
        PlotTheme::Dark,
        PlotTheme::Bmh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlotTheme::Classic => "classic",
            PlotTheme::Ggplot => "ggplot",
            PlotTheme::Dark => "dark_background",
            PlotTheme::Bmh => "bmh",
        }
    }

    pub fn background(&self) -> RGBColor {
        match self {
            PlotTheme::Classic => RGBColor(255, 255, 255),
            PlotTheme::Ggplot => RGBColor(234, 234, 242),
            PlotTheme::Dark => RGBColor(25, 25, 25),
            PlotTheme::Bmh => RGBColor(238, 238, 238),
        }
    }

    pub fn foreground(&self) -> RGBColor {
        match self {
            PlotTheme::Dark => RGBColor(230, 230, 230),
            _ => RGBColor(20, 20, 20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_color("#3498db"), Some(RGBColor(0x34, 0x98, 0xdb)));
        assert_eq!(parse_hex_color("ff0000"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_hex_color("#nope!!"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn series_colors_are_distinct() {
        let colors = series_colors(8);
        assert_eq!(colors.len(), 8);
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn palette_endpoints_are_in_range() {
        for p in Palette::ALL {
            let _ = p.color_at(0.0);
            let _ = p.color_at(1.0);
            let _ = p.color_at(2.0); // clamped
        }
    }
}
