//! Timestamped GeoJSON feature building
//!
//! Turns normalized records into a GeoJSON `FeatureCollection` for animated
//! playback: one blue LineString per activity segment, one red Point per
//! place visit, each tagged with its `[start, end]` time interval.

use serde::Serialize;

use crate::error::TimelineError;
use crate::heatmap::{mean_center, MapCenter};
use crate::types::{ActivitySegment, PlaceVisit, TimelineData};

/// Playback stepping period hint handed to the animated renderer.
pub const PLAYBACK_PERIOD: &str = "PT1H";

/// Fixed marker style shared by all features.
const FILL_OPACITY: f64 = 0.6;
const MARKER_RADIUS: u32 = 5;

/// GeoJSON geometry; coordinates are `[longitude, latitude]` per the GeoJSON
/// convention (the reverse of the heatmap's lat-first triples).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: [[f64; 2]; 2] },
    Point { coordinates: [f64; 2] },
}

/// Marker color: blue for movement, red for stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureColor {
    Blue,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub color: FeatureColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconStyle {
    pub fill_color: FeatureColor,
    pub fill_opacity: f64,
    pub stroke: bool,
    pub radius: u32,
}

impl IconStyle {
    fn circle(color: FeatureColor) -> Self {
        Self {
            fill_color: color,
            fill_opacity: FILL_OPACITY,
            stroke: true,
            radius: MARKER_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    /// `[start, end]` in ISO-8601, consumed by the renderer's time slider
    pub times: [String; 2],
    pub style: FeatureStyle,
    pub icon: &'static str,
    pub iconstyle: IconStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

/// Time-series payload: the feature collection, the map center, and the
/// renderer's animation hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesLayer {
    pub center: MapCenter,
    pub collection: FeatureCollection,
    pub period: &'static str,
    pub add_last_point: bool,
}

/// Build the time-series payload.
///
/// Features keep extraction order: all activity segments first, then all
/// place visits. The combined list is not re-sorted by start time; temporal
/// playback ordering is the renderer's concern.
pub fn build_timeseries(data: &TimelineData) -> Result<TimeSeriesLayer, TimelineError> {
    let center = mean_center(data)?;

    let mut features = Vec::with_capacity(data.segments.len() + data.visits.len());
    features.extend(data.segments.iter().map(segment_feature));
    features.extend(data.visits.iter().map(visit_feature));

    Ok(TimeSeriesLayer {
        center,
        collection: FeatureCollection {
            kind: "FeatureCollection",
            features,
        },
        period: PLAYBACK_PERIOD,
        add_last_point: true,
    })
}

fn segment_feature(segment: &ActivitySegment) -> Feature {
    Feature {
        kind: "Feature",
        geometry: Geometry::LineString {
            coordinates: [
                [segment.start_longitude, segment.start_latitude],
                [segment.end_longitude, segment.end_latitude],
            ],
        },
        properties: FeatureProperties {
            times: [
                segment.start_timestamp.to_rfc3339(),
                segment.end_timestamp.to_rfc3339(),
            ],
            style: FeatureStyle {
                color: FeatureColor::Blue,
            },
            icon: "circle",
            iconstyle: IconStyle::circle(FeatureColor::Blue),
        },
    }
}

fn visit_feature(visit: &PlaceVisit) -> Feature {
    Feature {
        kind: "Feature",
        geometry: Geometry::Point {
            coordinates: [visit.longitude, visit.latitude],
        },
        properties: FeatureProperties {
            times: [
                visit.start_timestamp.to_rfc3339(),
                visit.end_timestamp.to_rfc3339(),
            ],
            style: FeatureStyle {
                color: FeatureColor::Red,
            },
            icon: "circle",
            iconstyle: IconStyle::circle(FeatureColor::Red),
        },
    }
}
