//! Boxed legend with an optional title, drawn in pixel coordinates

use crate::FontConfig;
use medarrivals_common::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Swatch drawn next to a legend label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMarker {
    Square,
    Circle,
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
    pub opacity: f64,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, color: RGBColor) -> Self {
        Self {
            label: label.into(),
            color,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Where the legend box is anchored inside the plotting area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperLeft,
    UpperRight,
}

#[derive(Debug, Clone)]
pub struct Legend {
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
    pub marker: LegendMarker,
    pub corner: LegendCorner,
}

impl Legend {
    /// Box size in pixels for the given font
    pub fn size(&self, font: &FontConfig) -> (i32, i32) {
        let line = line_height(font);
        let char_width = (font.size as f64 * 0.6).ceil() as i32;
        let swatch = font.size as i32;

        let widest_label = self.entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0) as i32;
        let title_chars = self.title.as_ref().map(|t| t.chars().count()).unwrap_or(0) as i32;
        let content = (swatch + char_width + widest_label * char_width).max(title_chars * char_width);

        let rows = self.entries.len() as i32 + i32::from(self.title.is_some());
        (content + 2 * padding(font), rows * line + 2 * padding(font))
    }

    /// Top-left pixel of the box within `plot` (x range, y range)
    pub fn origin(&self, font: &FontConfig, plot: (std::ops::Range<i32>, std::ops::Range<i32>)) -> (i32, i32) {
        let (width, _) = self.size(font);
        let inset = padding(font);
        let (xs, ys) = plot;
        match self.corner {
            LegendCorner::UpperLeft => (xs.start + inset, ys.start + inset),
            LegendCorner::UpperRight => (xs.end - inset - width, ys.start + inset),
        }
    }

    /// Draw the legend with its top-left corner at `origin`
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        font: &FontConfig,
        origin: (i32, i32),
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        if self.entries.is_empty() {
            return Ok(());
        }

        let (width, height) = self.size(font);
        let (x0, y0) = origin;
        area.draw(&Rectangle::new([(x0, y0), (x0 + width, y0 + height)], WHITE.mix(0.8).filled()))?;
        area.draw(&Rectangle::new(
            [(x0, y0), (x0 + width, y0 + height)],
            RGBColor(204, 204, 204).stroke_width(1),
        ))?;

        let line = line_height(font);
        let pad = padding(font);
        let swatch = font.size as i32;
        let text_style = (font.family.as_str(), font.size).into_font().color(&BLACK);
        let mut y = y0 + pad;

        if let Some(title) = &self.title {
            area.draw(&Text::new(title.clone(), (x0 + pad, y), text_style.clone()))?;
            y += line;
        }

        for entry in &self.entries {
            let fill = entry.color.mix(entry.opacity).filled();
            match self.marker {
                LegendMarker::Square => {
                    area.draw(&Rectangle::new([(x0 + pad, y), (x0 + pad + swatch, y + swatch)], fill))?;
                }
                LegendMarker::Circle => {
                    let radius = (swatch / 2).max(1);
                    area.draw(&Circle::new((x0 + pad + radius, y + radius), radius as u32, fill))?;
                }
            }
            area.draw(&Text::new(
                entry.label.clone(),
                (x0 + pad + swatch + swatch / 2, y),
                text_style.clone(),
            ))?;
            y += line;
        }

        Ok(())
    }
}

fn line_height(font: &FontConfig) -> i32 {
    (font.size as f64 * 1.5).ceil() as i32
}

fn padding(font: &FontConfig) -> i32 {
    (font.size as i32 / 2).max(2)
}
