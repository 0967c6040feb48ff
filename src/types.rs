//! Normalized timeline record types
//!
//! These are the typed records that come out of the extractor and flow into
//! the feature builders: movement between two locations (activity segments)
//! and stationary stays (place visits).

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Serialize an absent optional field as the `"N/A"` sentinel.
///
/// The export's tabular output convention uses `"N/A"` for missing optional
/// columns; inside the crate those fields stay `Option` and the sentinel only
/// exists at the serialization boundary.
fn na_if_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str("N/A"),
    }
}

/// A recorded movement between two locations with a time span and an
/// inferred travel mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySegment {
    /// Start coordinate (degrees, decoded from the export's E7 fixed point)
    pub start_latitude: f64,
    pub start_longitude: f64,
    /// End coordinate (degrees)
    pub end_latitude: f64,
    pub end_longitude: f64,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    /// Inferred travel mode (e.g. "WALKING", "IN_PASSENGER_VEHICLE")
    #[serde(serialize_with = "na_if_none")]
    pub activity_type: Option<String>,
    /// Vendor confidence; a string in current exports, a number in older ones
    #[serde(serialize_with = "na_if_none")]
    pub confidence: Option<Value>,
    /// Travelled distance (meters)
    #[serde(serialize_with = "na_if_none")]
    pub distance: Option<f64>,
}

/// A recorded stationary stay at one location with a time span.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceVisit {
    /// Visit coordinate (degrees)
    pub latitude: f64,
    pub longitude: f64,
    /// Vendor place identifier
    #[serde(serialize_with = "na_if_none")]
    pub place_id: Option<String>,
    #[serde(serialize_with = "na_if_none")]
    pub address: Option<String>,
    #[serde(serialize_with = "na_if_none")]
    pub name: Option<String>,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    #[serde(serialize_with = "na_if_none")]
    pub visit_confidence: Option<Value>,
}

/// Records extracted from one or more timeline documents.
///
/// Both collections preserve document order; multi-file aggregation is plain
/// concatenation in upload order with no dedup and no re-sort by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineData {
    pub segments: Vec<ActivitySegment>,
    pub visits: Vec<PlaceVisit>,
}

impl TimelineData {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.visits.is_empty()
    }

    /// Append another document's records, keeping encounter order.
    pub fn append(&mut self, mut other: TimelineData) {
        self.segments.append(&mut other.segments);
        self.visits.append(&mut other.visits);
    }
}
