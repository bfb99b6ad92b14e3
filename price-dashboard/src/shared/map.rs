//! Geospatial projection of prediction rows
//!
//! Rows with both coordinates become markers coloured along the
//! green → yellow → red price gradient. The gradient is scaled to the
//! plotted rows only; outliers override it with a fixed amber highlight.

use crate::shared::calc::{min_max, price_color};
use crate::shared::types::{Record, PREDICTION_COLUMN};
use serde_json::Value;
use std::collections::BTreeSet;

/// Outlier highlight (amber)
pub const OUTLIER_COLOR: (u8, u8, u8) = (0xF5, 0x9E, 0x0B);

/// Degrees of padding added around the fitted bounding box
pub const FIT_PADDING_DEG: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    /// Original row index
    pub index: usize,
    pub lat: f64,
    pub lon: f64,
    pub price: f64,
    pub color: (u8, u8, u8),
    pub outlier: bool,
    /// Stroke weight: 3 for outliers, 1 otherwise
    pub weight: u8,
    pub income: Option<f64>,
    pub ocean: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub min_price: f64,
    pub max_price: f64,
    pub lon_bounds: [f64; 2],
    pub lat_bounds: [f64; 2],
}

impl MapView {
    pub fn outliers(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(|m| m.outlier)
    }
}

/// Build markers for every row carrying latitude, longitude and a price.
/// Returns `None` when no row can be plotted.
pub fn project_markers(rows: &[Record], outliers: &BTreeSet<usize>) -> Option<MapView> {
    let located: Vec<(usize, f64, f64, f64, &Record)> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let lat = row.get("latitude").and_then(Value::as_f64)?;
            let lon = row.get("longitude").and_then(Value::as_f64)?;
            let price = row.get(PREDICTION_COLUMN).and_then(Value::as_f64)?;
            Some((index, lat, lon, price, row))
        })
        .collect();

    if located.is_empty() {
        return None;
    }

    let (min_price, max_price) = min_max(located.iter().map(|m| m.3))?;
    let (min_lat, max_lat) = min_max(located.iter().map(|m| m.1))?;
    let (min_lon, max_lon) = min_max(located.iter().map(|m| m.2))?;

    let markers = located
        .into_iter()
        .map(|(index, lat, lon, price, row)| {
            let outlier = outliers.contains(&index);
            MapMarker {
                index,
                lat,
                lon,
                price,
                color: if outlier {
                    OUTLIER_COLOR
                } else {
                    price_color(price, min_price, max_price)
                },
                outlier,
                weight: if outlier { 3 } else { 1 },
                income: row.get("median_income").and_then(Value::as_f64),
                ocean: row
                    .get("ocean_proximity")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        })
        .collect();

    Some(MapView {
        markers,
        min_price,
        max_price,
        lon_bounds: [min_lon - FIT_PADDING_DEG, max_lon + FIT_PADDING_DEG],
        lat_bounds: [min_lat - FIT_PADDING_DEG, max_lat + FIT_PADDING_DEG],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::calc::hsl_to_rgb;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Record> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_markers_scale_to_plotted_rows() {
        let data = rows(json!([
            {"latitude": 37.88, "longitude": -122.23, "predicted_price": 9_000_000.0},
            {"latitude": 34.05, "longitude": -118.24, "predicted_price": 1_000_000.0},
            {"longitude": -120.0, "predicted_price": 1.0},
            {"latitude": 36.0, "longitude": -119.0, "predicted_price": 5_000_000.0}
        ]));

        let view = project_markers(&data, &BTreeSet::new()).unwrap();

        assert_eq!(view.markers.len(), 3);
        assert_eq!(view.min_price, 1_000_000.0);
        assert_eq!(view.max_price, 9_000_000.0);
        assert_eq!(view.markers[0].color, hsl_to_rgb(0.0, 0.7, 0.5));
        assert_eq!(view.markers[1].color, hsl_to_rgb(120.0, 0.7, 0.5));
        assert_eq!(view.markers[2].index, 3);
        assert!((view.lat_bounds[0] - (34.05 - FIT_PADDING_DEG)).abs() < 1e-9);
        assert!((view.lon_bounds[1] - (-118.24 + FIT_PADDING_DEG)).abs() < 1e-9);
    }

    #[test]
    fn test_outliers_use_original_index() {
        let data = rows(json!([
            {"predicted_price": 5.0},
            {"latitude": 37.0, "longitude": -122.0, "predicted_price": 10.0},
            {"latitude": 38.0, "longitude": -121.0, "predicted_price": 20.0}
        ]));

        let view = project_markers(&data, &BTreeSet::from([2])).unwrap();

        let flagged: Vec<usize> = view.outliers().map(|m| m.index).collect();
        assert_eq!(flagged, vec![2]);
        assert_eq!(view.markers[1].color, OUTLIER_COLOR);
        assert_eq!(view.markers[1].weight, 3);
        assert_eq!(view.markers[0].weight, 1);
    }

    #[test]
    fn test_no_coordinates_renders_nothing() {
        let data = rows(json!([{"predicted_price": 1.0}]));
        assert!(project_markers(&data, &BTreeSet::new()).is_none());
        assert!(project_markers(&[], &BTreeSet::new()).is_none());
    }
}
