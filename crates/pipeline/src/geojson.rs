//! GeoJSON output of the export.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::aggregate::PerImageSummary;
use crate::ingest::Polygon;
use crate::mercator::reproject_polygon;

/// A `MultiPolygon` geometry holding one member whose rings are the drawn
/// answers: `[[answer1, answer2, ...]]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<Vec<Polygon>>,
}

impl Geometry {
    pub fn multi_polygon(polygons: Vec<Polygon>) -> Self {
        Self {
            kind: "MultiPolygon",
            coordinates: vec![polygons],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Turn one image summary into a map feature.
///
/// Returns `None` if the image has no geolocation question or if none of its
/// polygons keeps a vertex after reprojection.
pub fn build_feature(summary: PerImageSummary) -> Option<Feature> {
    let polygons: Vec<Polygon> = summary
        .geolocations()?
        .iter()
        .map(|polygon| reproject_polygon(polygon))
        .filter(|polygon| !polygon.is_empty())
        .collect();

    if polygons.is_empty() {
        tracing::debug!(image_url = %summary.image_url, "No projectable geometry, skipping image");
        return None;
    }

    Some(Feature {
        kind: "Feature",
        geometry: Geometry::multi_polygon(polygons),
        properties: summary.into_properties(),
    })
}

/// Build the collection of features for all image summaries.
pub fn build_feature_collection(summaries: Vec<PerImageSummary>) -> FeatureCollection {
    FeatureCollection::new(summaries.into_iter().filter_map(build_feature).collect())
}
