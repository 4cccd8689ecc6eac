//! Country boundaries from a GeoJSON FeatureCollection
//!
//! The default source is the Natural Earth 1:110m admin-0 layer. Only
//! Polygon and MultiPolygon geometries are kept; holes are ignored when
//! drawing but preserved here.

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};
use geojson::{GeoJson, PolygonType, Value};
use medarrivals_common::{with_context, ArrivalsError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Boundary geometries keyed by country name
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    by_name: HashMap<String, MultiPolygon<f64>>,
}

impl BoundarySet {
    /// Load from an http(s) URL or a local file path
    pub async fn load(source: &str, name_property: &str) -> Result<Self> {
        let body = if source.starts_with("http://") || source.starts_with("https://") {
            info!("Downloading country boundaries from {}", source);
            let response = reqwest::get(source).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ArrivalsError::source_with_status(
                    format!("boundary download from {} returned {}", source, status),
                    status.as_u16(),
                ));
            }
            response
                .text()
                .await
                .map_err(|e| ArrivalsError::network_with_source("Failed to read boundary data", e))?
        } else {
            info!("Reading country boundaries from {}", source);
            std::fs::read_to_string(Path::new(source))
                .map_err(|e| with_context!(e, "Failed to read boundaries from {}", source))?
        };

        Self::from_geojson_str(&body, name_property)
    }

    /// Parse a FeatureCollection, naming each feature by `name_property`
    pub fn from_geojson_str(body: &str, name_property: &str) -> Result<Self> {
        let geojson: GeoJson = body
            .parse()
            .map_err(|e| ArrivalsError::graph_with_source("Invalid boundary GeoJSON", e))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(ArrivalsError::graph("Boundary GeoJSON must be a FeatureCollection"));
        };

        let mut by_name = HashMap::new();
        for feature in collection.features {
            let Some(name) = feature.property(name_property).and_then(|v| v.as_str()).map(str::to_string) else {
                continue;
            };
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let polygons = match geometry.value {
                Value::Polygon(rings) => vec![to_polygon(&rings)],
                Value::MultiPolygon(parts) => parts.iter().map(|rings| to_polygon(rings)).collect(),
                _ => {
                    debug!(name = %name, "Skipping non-polygon boundary");
                    continue;
                }
            };
            by_name.insert(name, MultiPolygon::new(polygons));
        }

        info!(countries = by_name.len(), "Loaded country boundaries");
        Ok(Self { by_name })
    }

    pub fn get(&self, name: &str) -> Option<&MultiPolygon<f64>> {
        self.by_name.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, boundary: MultiPolygon<f64>) {
        self.by_name.insert(name.into(), boundary);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn to_polygon(rings: &PolygonType) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| {
        LineString::new(
            ring.iter()
                .filter(|position| position.len() >= 2)
                .map(|position| Coord {
                    x: position[0],
                    y: position[1],
                })
                .collect(),
        )
    });
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

/// Bounding box of a boundary, if it has any coordinates
pub fn boundary_bounds(boundary: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    boundary.bounding_rect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"NAME": "Cyprus", "ISO_A3": "CYP"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[32.2, 35.0], [34.6, 35.0], [34.6, 35.7], [32.2, 35.7], [32.2, 35.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"NAME": "Greece"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20.0, 37.0], [26.0, 37.0], [26.0, 41.7], [20.0, 37.0]]],
                        [[[23.5, 34.9], [26.3, 34.9], [26.3, 35.6], [23.5, 34.9]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {"NAME": "Nowhere"},
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
            },
            {
                "type": "Feature",
                "properties": {"ADMIN": "Unnamed"},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let set = BoundarySet::from_geojson_str(COLLECTION, "NAME").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("Cyprus").unwrap().0.len(), 1);
        assert_eq!(set.get("Greece").unwrap().0.len(), 2);
        assert!(set.get("Nowhere").is_none());
        assert!(set.get("Unnamed").is_none());
    }

    #[test]
    fn test_alternative_name_property() {
        let set = BoundarySet::from_geojson_str(COLLECTION, "ADMIN").unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("Unnamed").is_some());
    }

    #[test]
    fn test_bounds() {
        let set = BoundarySet::from_geojson_str(COLLECTION, "NAME").unwrap();
        let rect = boundary_bounds(set.get("Greece").unwrap()).unwrap();
        assert_eq!(rect.min().x, 20.0);
        assert_eq!(rect.min().y, 34.9);
        assert_eq!(rect.max().x, 26.3);
        assert_eq!(rect.max().y, 41.7);
    }

    #[test]
    fn test_rejects_non_collections() {
        let point = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(
            BoundarySet::from_geojson_str(point, "NAME"),
            Err(ArrivalsError::Graph { .. })
        ));
        assert!(BoundarySet::from_geojson_str("not json", "NAME").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.geojson");
        std::fs::write(&path, COLLECTION).unwrap();

        let set = BoundarySet::load(path.to_str().unwrap(), "NAME").await.unwrap();
        assert_eq!(set.len(), 2);

        let missing = BoundarySet::load("/nonexistent/countries.geojson", "NAME").await;
        assert!(matches!(missing, Err(ArrivalsError::Generic { .. })));
    }
}
