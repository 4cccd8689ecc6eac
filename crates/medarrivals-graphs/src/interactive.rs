//! Animated geographic scatter map rendered by Plotly in the browser
//!
//! One `scattergeo` trace per country and one animation frame per year.
//! Marker area follows `individuals`, colour follows the country.

use medarrivals_common::{ArrivalObservation, ArrivalsError, Result};
use medarrivals_data::ArrivalTable;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Plotly's default qualitative palette
const PLOTLY_COLORS: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Largest marker diameter in pixels
const MAX_MARKER_SIZE: f64 = 20.0;

const LEGEND_TITLE: &str = "Arrival country";

#[derive(Debug, Clone)]
pub struct InteractiveMap {
    title: String,
    plotly_js_url: String,
}

impl InteractiveMap {
    pub fn new(title: impl Into<String>, plotly_js_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            plotly_js_url: plotly_js_url.into(),
        }
    }

    /// Plotly figure with `data`, `layout` and `frames`
    pub fn figure(&self, table: &ArrivalTable) -> Value {
        let rows = table.rows();
        let countries = countries_in_order(rows);
        let years: Vec<i32> = table.years().into_iter().collect();
        let max_individuals = rows.iter().map(|r| r.individuals).max().unwrap_or(0);
        let sizeref = if max_individuals == 0 {
            1.0
        } else {
            2.0 * max_individuals as f64 / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
        };

        // Plotly pairs frame traces by index: every country keeps its slot in every frame
        let frames: Vec<Value> = years
            .iter()
            .map(|&year| {
                let traces: Vec<Value> = countries
                    .iter()
                    .enumerate()
                    .map(|(index, country)| {
                        let points: Vec<&ArrivalObservation> = rows
                            .iter()
                            .filter(|r| r.year == year && r.country_name == *country && r.position().is_some())
                            .collect();
                        trace(country, PLOTLY_COLORS[index % PLOTLY_COLORS.len()], year, &points, sizeref)
                    })
                    .collect();
                json!({ "name": year.to_string(), "data": traces })
            })
            .collect();

        let initial = frames.first().map(|f| f["data"].clone()).unwrap_or_else(|| json!([]));

        json!({
            "data": initial,
            "layout": self.layout(&years),
            "frames": frames,
        })
    }

    fn layout(&self, years: &[i32]) -> Value {
        let frame_args = |duration: u64| {
            json!({
                "frame": { "duration": duration, "redraw": true },
                "mode": "immediate",
                "fromcurrent": true,
                "transition": { "duration": duration / 2, "easing": "linear" }
            })
        };
        let steps: Vec<Value> = years
            .iter()
            .map(|year| {
                json!({
                    "label": year.to_string(),
                    "method": "animate",
                    "args": [[year.to_string()], frame_args(0)]
                })
            })
            .collect();

        json!({
            "title": { "text": self.title },
            "legend": { "title": { "text": LEGEND_TITLE }, "itemsizing": "constant", "tracegroupgap": 0 },
            "geo": {
                "projection": { "type": "natural earth" },
                "showcountries": true,
                "countrycolor": "#D3D3D3"
            },
            "margin": { "t": 60 },
            "updatemenus": [{
                "type": "buttons",
                "direction": "left",
                "showactive": false,
                "x": 0.1,
                "y": 0,
                "xanchor": "right",
                "yanchor": "top",
                "pad": { "r": 10, "t": 70 },
                "buttons": [
                    { "label": "&#9654;", "method": "animate", "args": [null, frame_args(500)] },
                    { "label": "&#9724;", "method": "animate", "args": [[null], frame_args(0)] }
                ]
            }],
            "sliders": [{
                "active": 0,
                "currentvalue": { "prefix": "year=" },
                "len": 0.9,
                "x": 0.1,
                "y": 0,
                "xanchor": "left",
                "yanchor": "top",
                "pad": { "b": 10, "t": 60 },
                "steps": steps
            }]
        })
    }

    /// Self-contained HTML page loading Plotly from `plotly_js_url`
    pub fn to_html(&self, table: &ArrivalTable) -> Result<String> {
        let figure = serde_json::to_string(&self.figure(table))?;
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{plotly}"></script>
</head>
<body style="margin:0">
<div id="arrivals-map" style="width:100%;height:100vh;"></div>
<script>
const figure = {figure};
Plotly.newPlot("arrivals-map", figure.data, figure.layout).then(function () {{
    Plotly.addFrames("arrivals-map", figure.frames);
}});
</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            plotly = escape_html(&self.plotly_js_url),
            figure = figure.replace("</", "<\\/"),
        ))
    }

    /// Write the page to a kept temporary file and return its path
    pub fn write_temp(&self, table: &ArrivalTable) -> Result<PathBuf> {
        let html = self.to_html(table)?;
        let mut file = tempfile::Builder::new()
            .prefix("medarrivals-map-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        let (_, path) = file.keep().map_err(|e| ArrivalsError::Io(e.error))?;
        info!("Wrote interactive map to {}", path.display());
        Ok(path)
    }
}

fn trace(country: &str, color: &str, year: i32, points: &[&ArrivalObservation], sizeref: f64) -> Value {
    json!({
        "type": "scattergeo",
        "mode": "markers",
        "name": country,
        "legendgroup": country,
        "showlegend": true,
        "geo": "geo",
        "lat": points.iter().filter_map(|p| p.centroid_lat).collect::<Vec<_>>(),
        "lon": points.iter().filter_map(|p| p.centroid_lon).collect::<Vec<_>>(),
        "hovertext": points.iter().map(|p| p.geomaster_name.as_str()).collect::<Vec<_>>(),
        "hovertemplate": format!(
            "<b>%{{hovertext}}</b><br><br>{}={}<br>year={}<br>individuals=%{{marker.size:,}}<extra></extra>",
            LEGEND_TITLE, country, year
        ),
        "marker": {
            "color": color,
            "size": points.iter().map(|p| p.individuals).collect::<Vec<_>>(),
            "sizemode": "area",
            "sizeref": sizeref,
            "symbol": "circle"
        }
    })
}

/// Countries in order of first appearance
fn countries_in_order(rows: &[ArrivalObservation]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();
    for row in rows {
        if seen.insert(row.country_name.as_str()) {
            ordered.push(row.country_name.clone());
        }
    }
    ordered
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, name: &str, year: i32, individuals: u64) -> ArrivalObservation {
        ArrivalObservation {
            geomaster_name: name.to_string(),
            admin_level: "Admin1".to_string(),
            centroid_lon: Some(14.0),
            centroid_lat: Some(37.0),
            month: None,
            year,
            population_groups_concat: None,
            individuals,
            country_name: country.to_string(),
            last_update: None,
        }
    }

    fn table() -> ArrivalTable {
        ArrivalTable::from_rows(vec![
            row("Italy", "Sicily", 2016, 800),
            row("Greece", "Lesvos", 2015, 500),
            row("Italy", "Lampedusa", 2015, 200),
            row("Greece", "Chios", 2016, 100),
            row("Spain", "Almeria", 2017, 50),
        ])
    }

    fn map() -> InteractiveMap {
        InteractiveMap::new("Arrivals by destination and by year", "https://cdn.plot.ly/plotly-2.27.0.min.js")
    }

    #[test]
    fn test_one_frame_per_year() {
        let figure = map().figure(&table());
        let frames = figure["frames"].as_array().unwrap();
        let names: Vec<&str> = frames.iter().map(|f| f["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["2015", "2016", "2017"]);

        // 2017 only has Spain, but every country keeps its slot
        for frame in frames {
            let names: Vec<&str> = frame["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|t| t["name"].as_str().unwrap())
                .collect();
            assert_eq!(names, ["Italy", "Greece", "Spain"]);
        }
        assert_eq!(frames[2]["data"][0]["lat"], json!([]));
        assert_eq!(frames[2]["data"][0]["marker"]["size"], json!([]));
        assert_eq!(frames[2]["data"][2]["hovertext"][0], "Almeria");
        assert_eq!(frames[0]["data"][2]["lon"], json!([]));

        // the initial traces are the first frame
        assert_eq!(figure["data"], frames[0]["data"]);
    }

    #[test]
    fn test_colors_follow_first_appearance() {
        let figure = map().figure(&table());
        let first = &figure["frames"][0]["data"];
        assert_eq!(first[0]["name"], "Italy");
        assert_eq!(first[0]["marker"]["color"], PLOTLY_COLORS[0]);
        assert_eq!(first[1]["name"], "Greece");
        assert_eq!(first[1]["marker"]["color"], PLOTLY_COLORS[1]);
        assert_eq!(first[1]["hovertext"][0], "Lesvos");
    }

    #[test]
    fn test_marker_scaling_and_layout() {
        let figure = map().figure(&table());
        let marker = &figure["frames"][1]["data"][0]["marker"];
        assert_eq!(marker["size"][0], 800);
        assert_eq!(marker["sizemode"], "area");
        assert_eq!(marker["sizeref"], 2.0 * 800.0 / 400.0);

        let layout = &figure["layout"];
        assert_eq!(layout["geo"]["projection"]["type"], "natural earth");
        assert_eq!(layout["legend"]["title"]["text"], "Arrival country");
        assert_eq!(layout["sliders"][0]["steps"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_unlocated_rows_are_left_off_the_map() {
        let mut unlocated = row("Italy", "Unknown", 2016, 42);
        unlocated.centroid_lon = None;
        unlocated.centroid_lat = None;
        let table = ArrivalTable::from_rows(vec![unlocated, row("Italy", "Sicily", 2016, 800)]);

        let figure = map().figure(&table);
        let italy = &figure["frames"][0]["data"][0];
        assert_eq!(italy["hovertext"], json!(["Sicily"]));
        assert_eq!(italy["lat"], json!([37.0]));
        assert_eq!(italy["marker"]["size"], json!([800]));
    }

    #[test]
    fn test_empty_table() {
        let figure = map().figure(&ArrivalTable::default());
        assert_eq!(figure["data"], json!([]));
        assert!(figure["frames"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_html_page() {
        let table = ArrivalTable::from_rows(vec![row("Italy", "</script><b>", 2016, 10)]);
        let html = map().to_html(&table).unwrap();
        assert!(html.contains(r#"<script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>"#));
        assert!(html.contains("<title>Arrivals by destination and by year</title>"));
        assert!(html.contains("Plotly.addFrames"));
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_write_temp() {
        let path = map().write_temp(&table()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
        std::fs::remove_file(path).unwrap();
    }
}
