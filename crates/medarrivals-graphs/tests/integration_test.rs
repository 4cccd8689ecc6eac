//! Integration tests for medarrivals-graphs
//!
//! Rendering to PNG needs system fonts, so those cases are ignored by default.

use medarrivals_common::{default_countries, ArrivalObservation};
use medarrivals_config::GraphSettings;
use medarrivals_data::{Aggregates, ArrivalTable};
use medarrivals_graphs::{map_file_name, BoundarySet, CountryMapData, GraphManager};
use tempfile::tempdir;

const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"NAME": "Italy"},
     "geometry": {"type": "Polygon", "coordinates": [[[6.6, 36.6], [18.5, 36.6], [18.5, 47.1], [6.6, 47.1], [6.6, 36.6]]]}},
    {"type": "Feature", "properties": {"NAME": "Greece"},
     "geometry": {"type": "MultiPolygon", "coordinates": [
        [[[20.1, 36.8], [26.6, 36.8], [26.6, 41.7], [20.1, 41.7], [20.1, 36.8]]],
        [[[23.5, 34.9], [26.3, 34.9], [26.3, 35.7], [23.5, 35.7], [23.5, 34.9]]]
     ]}},
    {"type": "Feature", "properties": {"NAME": "Atlantis"}, "geometry": null}
  ]
}"#;

fn observation(country: &str, name: &str, year: i32, lon: f64, lat: f64, individuals: u64) -> ArrivalObservation {
    ArrivalObservation {
        geomaster_name: name.to_string(),
        admin_level: "Admin1".to_string(),
        centroid_lon: Some(lon),
        centroid_lat: Some(lat),
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
        observation("Italy", "Sicily", 2016, 14.0, 37.5, 120_000),
        observation("Italy", "Calabria", 2017, 16.3, 39.0, 20_000),
        observation("Greece", "Lesvos", 2015, 26.3, 39.2, 500_000),
        observation("Malta", "Malta", 2018, 14.4, 35.9, 1_400),
    ])
}

#[test]
fn test_malta_maps_against_the_italian_boundary() {
    let boundaries = BoundarySet::from_geojson_str(BOUNDARIES, "NAME").unwrap();
    assert_eq!(boundaries.len(), 2);

    let malta = default_countries().into_iter().find(|c| c.name == "Malta").unwrap();
    let data = CountryMapData::from_table(&table(), &malta, &boundaries);

    assert_eq!(data.boundary.as_ref(), boundaries.get("Italy"));
    assert_eq!(data.points.len(), 1);

    // Italy's outline dominates the extent; Malta's point sits just below it
    let extent = data.bounds().unwrap();
    assert!(extent.min_lon <= 6.6 && extent.max_lon >= 18.5);
    assert!(extent.min_lat <= 35.9);
}

#[test]
fn test_interactive_page_carries_every_year() {
    let dir = tempdir().unwrap();
    let manager = GraphManager::new(GraphSettings::default(), dir.path(), 2014, 2022);
    let map = manager.interactive_map("https://cdn.plot.ly/plotly-2.27.0.min.js");

    let figure = map.figure(&table());
    let frames: Vec<&str> = figure["frames"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(frames, ["2015", "2016", "2017", "2018"]);
    // Italy appears first in the table, so its slot leads even in 2015
    assert_eq!(figure["data"][0]["name"], "Italy");
    assert_eq!(figure["data"][0]["lat"].as_array().unwrap().len(), 0);
    assert_eq!(figure["data"][1]["name"], "Greece");
    assert_eq!(figure["frames"][3]["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "needs system fonts"]
async fn test_render_every_output() {
    let dir = tempdir().unwrap();
    let settings = GraphSettings {
        dpi: 50,
        ..GraphSettings::default()
    };
    let manager = GraphManager::new(settings, dir.path(), 2014, 2022);
    let table = table();
    let boundaries = BoundarySet::from_geojson_str(BOUNDARIES, "NAME").unwrap();

    let charts = manager.render_charts(&Aggregates::compute(table.rows())).await.unwrap();
    assert_eq!(charts.len(), 3);

    let maps = manager.render_maps(&table, &default_countries(), &boundaries).await.unwrap();
    // Spain and Cyprus have neither rows nor boundaries here
    assert_eq!(maps.len(), 3);
    for name in ["Italy", "Greece", "Malta"] {
        assert!(dir.path().join(map_file_name(name)).exists());
    }
}
