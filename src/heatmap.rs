//! Heatmap feature building
//!
//! Turns normalized records into the weighted point set a leaflet-style heat
//! layer consumes: two points per activity segment (start and end), one per
//! place visit, all with weight 1.

use serde::{Serialize, Serializer};

use crate::error::TimelineError;
use crate::types::TimelineData;

/// One weighted heatmap sample.
///
/// Serializes as the `[latitude, longitude, weight]` triple expected by the
/// rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

impl Serialize for HeatmapPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.latitude, self.longitude, self.weight).serialize(serializer)
    }
}

/// Initial map viewport center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub latitude: f64,
    pub longitude: f64,
}

/// Heatmap payload: the point samples plus the map center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLayer {
    pub center: MapCenter,
    pub points: Vec<HeatmapPoint>,
}

/// Build the heatmap payload.
///
/// Emits activity-segment points first (start then end, in segment order),
/// then place-visit points in visit order. No dedup and no weighting by
/// duration or confidence.
pub fn build_heatmap(data: &TimelineData) -> Result<HeatmapLayer, TimelineError> {
    let center = mean_center(data)?;

    let mut points = Vec::with_capacity(data.segments.len() * 2 + data.visits.len());
    for segment in &data.segments {
        points.push(HeatmapPoint {
            latitude: segment.start_latitude,
            longitude: segment.start_longitude,
            weight: 1.0,
        });
        points.push(HeatmapPoint {
            latitude: segment.end_latitude,
            longitude: segment.end_longitude,
            weight: 1.0,
        });
    }
    for visit in &data.visits {
        points.push(HeatmapPoint {
            latitude: visit.latitude,
            longitude: visit.longitude,
            weight: 1.0,
        });
    }

    Ok(HeatmapLayer { center, points })
}

/// Arithmetic mean of activity-segment start coordinates.
///
/// Place visits do not move the center. With zero segments the mean is
/// undefined, so this fails with `EmptyDataset` before any payload is built.
pub fn mean_center(data: &TimelineData) -> Result<MapCenter, TimelineError> {
    if data.segments.is_empty() {
        return Err(TimelineError::EmptyDataset);
    }

    let count = data.segments.len() as f64;
    let (lat_sum, lon_sum) = data
        .segments
        .iter()
        .fold((0.0, 0.0), |(lat, lon), segment| {
            (lat + segment.start_latitude, lon + segment.start_longitude)
        });

    Ok(MapCenter {
        latitude: lat_sum / count,
        longitude: lon_sum / count,
    })
}
