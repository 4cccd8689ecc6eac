//! Shared helpers for chart text and scaling

use crate::types::FontConfig;
use medarrivals_common::{format_thousands, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

const ROUTE: &str = "Refugees disembarked via the Mediterranean Route";

fn year_span(start_year: i32, end_year: i32, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("from {} to {}", start_year, end_year)
    } else {
        format!("from {} to {} {}", start_year, end_year, suffix)
    }
}

/// Chart title for the given year range, e.g.
/// `Refugees disembarked via the Mediterranean Route from 2014 to 2022 in Italy`
pub fn route_title(start_year: i32, end_year: i32, suffix: &str) -> String {
    format!("{} {}", ROUTE, year_span(start_year, end_year, suffix))
}

/// Same as [`route_title`], broken before `from` for the bar charts
pub fn wrapped_route_title(start_year: i32, end_year: i32, suffix: &str) -> String {
    format!("{}\n{}", ROUTE, year_span(start_year, end_year, suffix))
}

/// Draw each line of `title` centred at the top of `area` and return the
/// remaining area below it
pub fn titled_area<DB>(area: &DrawingArea<DB, Shift>, title: &str, font: &FontConfig) -> Result<DrawingArea<DB, Shift>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut area = area.clone();
    for line in title.lines() {
        area = area.titled(line, (font.family.as_str(), font.size))?;
    }
    Ok(area)
}

/// Categorical year axis: one evenly spaced slot per year with data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearAxis {
    years: Vec<i32>,
}

impl YearAxis {
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        Self { years }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Plot range with half a slot either side
    pub fn range(&self) -> Range<f64> {
        -0.5..(self.years.len() as f64 - 0.5)
    }

    /// Centre of `year`'s slot
    pub fn position(&self, year: i32) -> Option<f64> {
        self.years.binary_search(&year).ok().map(|index| index as f64)
    }

    /// Tick label at `x`; blank between slots
    pub fn label(&self, x: f64) -> String {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        self.years
            .get(index as usize)
            .map(|year| year.to_string())
            .unwrap_or_default()
    }
}

/// Tick label for a count axis: rounded, thousands separated
pub fn count_label(value: f64) -> String {
    format_thousands(value.round() as i64)
}

/// Upper bound of a count axis with 5% headroom, never zero
pub fn count_axis_max(max_value: u64) -> f64 {
    if max_value == 0 {
        1.0
    } else {
        max_value as f64 * 1.05
    }
}

/// Marker radius in pixels for an area of `individuals / divisor` points²
pub fn marker_radius_px(individuals: u64, divisor: f64, dpi: u32) -> u32 {
    if divisor <= 0.0 {
        return 1;
    }
    let area_pt2 = individuals as f64 / divisor;
    let radius_pt = (area_pt2 / std::f64::consts::PI).sqrt();
    let radius_px = radius_pt * dpi as f64 / 72.0;
    (radius_px.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_title() {
        assert_eq!(
            route_title(2014, 2022, "by country"),
            "Refugees disembarked via the Mediterranean Route from 2014 to 2022 by country"
        );
        assert_eq!(
            route_title(2016, 2018, ""),
            "Refugees disembarked via the Mediterranean Route from 2016 to 2018"
        );
        assert_eq!(
            wrapped_route_title(2014, 2022, "by year"),
            "Refugees disembarked via the Mediterranean Route\nfrom 2014 to 2022 by year"
        );
        let title = wrapped_route_title(2016, 2018, "");
        let lines: Vec<&str> = title.lines().collect();
        assert_eq!(lines, ["Refugees disembarked via the Mediterranean Route", "from 2016 to 2018"]);
    }

    #[test]
    fn test_year_axis_is_categorical() {
        // 2017 has no data and takes no slot
        let axis = YearAxis::new([2018, 2015, 2016, 2015]);
        assert_eq!(axis.len(), 3);
        assert_eq!(axis.range(), -0.5..2.5);
        assert_eq!(axis.position(2015), Some(0.0));
        assert_eq!(axis.position(2018), Some(2.0));
        assert_eq!(axis.position(2017), None);
        assert_eq!(axis.label(2.0), "2018");
        assert_eq!(axis.label(1.5), "");
        assert_eq!(axis.label(-1.0), "");
        assert_eq!(axis.label(3.0), "");
        assert!(YearAxis::default().is_empty());
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(count_label(181_436.4), "181,436");
        assert_eq!(count_label(0.0), "0");
    }

    #[test]
    fn test_count_axis_max() {
        assert_eq!(count_axis_max(0), 1.0);
        assert_eq!(count_axis_max(100), 105.0);
    }

    #[test]
    fn test_marker_radius() {
        // 31,416 individuals -> 314.16 pt² -> 10 pt radius -> 41.7 px at 300 dpi
        assert_eq!(marker_radius_px(31_416, 100.0, 300), 42);
        assert_eq!(marker_radius_px(31_416, 100.0, 72), 10);
        assert_eq!(marker_radius_px(0, 100.0, 300), 1);
        assert_eq!(marker_radius_px(500, 0.0, 300), 1);
    }
}
