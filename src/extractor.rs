//! Timeline document extraction
//!
//! Parses one raw timeline export (the nested `timelineObjects` JSON format)
//! and normalizes it into typed records: E7 fixed-point coordinates become
//! float degrees, ISO-8601 strings become `DateTime<Utc>`, and optional
//! fields become `Option`.

use crate::error::TimelineError;
use crate::types::{ActivitySegment, PlaceVisit, TimelineData};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Divisor for the export's E7 fixed-point coordinate encoding.
const E7: f64 = 1e7;

/// Extract normalized records from one raw timeline document.
///
/// The walk preserves `timelineObjects` order within each output collection.
/// Elements tagged as neither an activity segment nor a place visit are
/// dropped without error; any per-item failure fails the whole document.
pub fn extract(raw: &[u8]) -> Result<TimelineData, TimelineError> {
    let document: RawDocument =
        serde_json::from_slice(raw).map_err(|e| TimelineError::MalformedInput(e.to_string()))?;

    let mut data = TimelineData::default();

    for (index, object) in document.timeline_objects.into_iter().enumerate() {
        match (object.activity_segment, object.place_visit) {
            (Some(segment), None) => data.segments.push(convert_segment(segment)?),
            (None, Some(visit)) => data.visits.push(convert_visit(visit)?),
            // unknown record kinds are skipped, not an error
            (None, None) => {}
            (Some(_), Some(_)) => {
                return Err(TimelineError::MalformedInput(format!(
                    "timelineObjects[{index}] is tagged as both activitySegment and placeVisit"
                )));
            }
        }
    }

    Ok(data)
}

fn convert_segment(raw: RawActivitySegment) -> Result<ActivitySegment, TimelineError> {
    let start = raw
        .start_location
        .ok_or(TimelineError::MissingField("activitySegment.startLocation"))?;
    let end = raw
        .end_location
        .ok_or(TimelineError::MissingField("activitySegment.endLocation"))?;
    let duration = raw
        .duration
        .ok_or(TimelineError::MissingField("activitySegment.duration"))?;

    Ok(ActivitySegment {
        start_latitude: coordinate(
            start.latitude_e7,
            "activitySegment.startLocation.latitudeE7",
        )?,
        start_longitude: coordinate(
            start.longitude_e7,
            "activitySegment.startLocation.longitudeE7",
        )?,
        end_latitude: coordinate(end.latitude_e7, "activitySegment.endLocation.latitudeE7")?,
        end_longitude: coordinate(end.longitude_e7, "activitySegment.endLocation.longitudeE7")?,
        start_timestamp: instant(
            duration.start_timestamp,
            "activitySegment.duration.startTimestamp",
        )?,
        end_timestamp: instant(
            duration.end_timestamp,
            "activitySegment.duration.endTimestamp",
        )?,
        activity_type: raw.activity_type,
        confidence: raw.confidence,
        distance: raw.distance,
    })
}

fn convert_visit(raw: RawPlaceVisit) -> Result<PlaceVisit, TimelineError> {
    let location = raw
        .location
        .ok_or(TimelineError::MissingField("placeVisit.location"))?;
    let duration = raw
        .duration
        .ok_or(TimelineError::MissingField("placeVisit.duration"))?;

    Ok(PlaceVisit {
        latitude: coordinate(location.latitude_e7, "placeVisit.location.latitudeE7")?,
        longitude: coordinate(location.longitude_e7, "placeVisit.location.longitudeE7")?,
        place_id: location.place_id,
        address: location.address,
        name: location.name,
        start_timestamp: instant(
            duration.start_timestamp,
            "placeVisit.duration.startTimestamp",
        )?,
        end_timestamp: instant(duration.end_timestamp, "placeVisit.duration.endTimestamp")?,
        visit_confidence: raw.visit_confidence,
    })
}

fn coordinate(value: Option<i64>, field: &'static str) -> Result<f64, TimelineError> {
    let e7 = value.ok_or(TimelineError::MissingField(field))?;
    Ok(e7 as f64 / E7)
}

fn instant(value: Option<String>, field: &'static str) -> Result<DateTime<Utc>, TimelineError> {
    let value = value.ok_or(TimelineError::MissingField(field))?;
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| TimelineError::InvalidTimestamp { field, value })
}

// Raw export structures. Every field is optional here; required-field checks
// happen in the conversion step so errors can name the exact path.

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "timelineObjects")]
    timeline_objects: Vec<RawTimelineObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimelineObject {
    activity_segment: Option<RawActivitySegment>,
    place_visit: Option<RawPlaceVisit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivitySegment {
    start_location: Option<RawLocation>,
    end_location: Option<RawLocation>,
    duration: Option<RawDuration>,
    activity_type: Option<String>,
    confidence: Option<Value>,
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlaceVisit {
    location: Option<RawVisitLocation>,
    duration: Option<RawDuration>,
    visit_confidence: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    latitude_e7: Option<i64>,
    longitude_e7: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVisitLocation {
    latitude_e7: Option<i64>,
    longitude_e7: Option<i64>,
    place_id: Option<String>,
    address: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDuration {
    start_timestamp: Option<String>,
    end_timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_document() -> &'static str {
        r#"{
            "timelineObjects": [
                {
                    "activitySegment": {
                        "startLocation": { "latitudeE7": 377749000, "longitudeE7": -1224194000 },
                        "endLocation": { "latitudeE7": 377750000, "longitudeE7": -1224195000 },
                        "duration": {
                            "startTimestamp": "2024-05-01T10:00:00Z",
                            "endTimestamp": "2024-05-01T10:15:00Z"
                        },
                        "activityType": "WALKING",
                        "confidence": "HIGH",
                        "distance": 1250.0
                    }
                },
                {
                    "placeVisit": {
                        "location": {
                            "latitudeE7": 377751000,
                            "longitudeE7": -1224196000,
                            "placeId": "ChIJIQBpAG2ahYAR_6128GcTUEo",
                            "address": "San Francisco, CA",
                            "name": "Coffee"
                        },
                        "duration": {
                            "startTimestamp": "2024-05-01T10:20:00Z",
                            "endTimestamp": "2024-05-01T11:00:00Z"
                        },
                        "visitConfidence": 92
                    }
                },
                { "unknownRecord": {} },
                {
                    "activitySegment": {
                        "startLocation": { "latitudeE7": 377752000, "longitudeE7": -1224197000 },
                        "endLocation": { "latitudeE7": 377753000, "longitudeE7": -1224198000 },
                        "duration": {
                            "startTimestamp": "2024-05-01T11:05:00Z",
                            "endTimestamp": "2024-05-01T11:30:00Z"
                        }
                    }
                }
            ]
        }"#
    }

    #[test]
    fn partitions_objects_preserving_order() {
        let data = extract(sample_document().as_bytes()).unwrap();

        assert_eq!(data.segments.len(), 2);
        assert_eq!(data.visits.len(), 1);
        assert!(data.segments[0].start_timestamp < data.segments[1].start_timestamp);
    }

    #[test]
    fn normalizes_e7_coordinates_and_timestamps() {
        let data = extract(sample_document().as_bytes()).unwrap();
        let segment = &data.segments[0];

        assert!((segment.start_latitude - 37.7749).abs() < 1e-7);
        assert!((segment.start_longitude - (-122.4194)).abs() < 1e-7);
        assert!((segment.end_latitude - 37.7750).abs() < 1e-7);
        assert_eq!(
            segment.start_timestamp.to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
        assert_eq!(segment.activity_type.as_deref(), Some("WALKING"));
        assert_eq!(segment.distance, Some(1250.0));
    }

    #[test]
    fn missing_optionals_become_none() {
        let data = extract(sample_document().as_bytes()).unwrap();
        let segment = &data.segments[1];

        assert_eq!(segment.activity_type, None);
        assert_eq!(segment.confidence, None);
        assert_eq!(segment.distance, None);
    }

    #[test]
    fn visit_fields_are_carried_through() {
        let data = extract(sample_document().as_bytes()).unwrap();
        let visit = &data.visits[0];

        assert!((visit.latitude - 37.7751).abs() < 1e-7);
        assert_eq!(visit.place_id.as_deref(), Some("ChIJIQBpAG2ahYAR_6128GcTUEo"));
        assert_eq!(visit.address.as_deref(), Some("San Francisco, CA"));
        assert_eq!(visit.visit_confidence, Some(serde_json::json!(92)));
    }

    #[test]
    fn invalid_json_is_malformed_input() {
        let err = extract(b"not valid json").unwrap_err();
        assert!(matches!(err, TimelineError::MalformedInput(_)));
    }

    #[test]
    fn missing_timeline_objects_key_is_malformed_input() {
        let err = extract(br#"{"locations": []}"#).unwrap_err();
        assert!(matches!(err, TimelineError::MalformedInput(_)));
    }

    #[test]
    fn missing_required_coordinate_names_the_field() {
        let doc = br#"{
            "timelineObjects": [{
                "activitySegment": {
                    "startLocation": { "longitudeE7": -1224194000 },
                    "endLocation": { "latitudeE7": 377750000, "longitudeE7": -1224195000 },
                    "duration": {
                        "startTimestamp": "2024-05-01T10:00:00Z",
                        "endTimestamp": "2024-05-01T10:15:00Z"
                    }
                }
            }]
        }"#;

        match extract(doc).unwrap_err() {
            TimelineError::MissingField(field) => {
                assert_eq!(field, "activitySegment.startLocation.latitudeE7")
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_timestamp_is_invalid_timestamp() {
        let doc = br#"{
            "timelineObjects": [{
                "placeVisit": {
                    "location": { "latitudeE7": 377751000, "longitudeE7": -1224196000 },
                    "duration": {
                        "startTimestamp": "last tuesday",
                        "endTimestamp": "2024-05-01T11:00:00Z"
                    }
                }
            }]
        }"#;

        match extract(doc).unwrap_err() {
            TimelineError::InvalidTimestamp { field, value } => {
                assert_eq!(field, "placeVisit.duration.startTimestamp");
                assert_eq!(value, "last tuesday");
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn dual_tagged_element_is_rejected() {
        let doc = br#"{
            "timelineObjects": [{
                "activitySegment": {
                    "startLocation": { "latitudeE7": 1, "longitudeE7": 2 },
                    "endLocation": { "latitudeE7": 3, "longitudeE7": 4 },
                    "duration": {
                        "startTimestamp": "2024-05-01T10:00:00Z",
                        "endTimestamp": "2024-05-01T10:15:00Z"
                    }
                },
                "placeVisit": {
                    "location": { "latitudeE7": 5, "longitudeE7": 6 },
                    "duration": {
                        "startTimestamp": "2024-05-01T10:00:00Z",
                        "endTimestamp": "2024-05-01T10:15:00Z"
                    }
                }
            }]
        }"#;

        match extract(doc).unwrap_err() {
            TimelineError::MalformedInput(message) => {
                assert!(message.contains("timelineObjects[0]"))
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let first = extract(sample_document().as_bytes()).unwrap();
        let second = extract(sample_document().as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let doc = br#"{
            "timelineObjects": [{
                "placeVisit": {
                    "location": { "latitudeE7": 377751000, "longitudeE7": -1224196000 },
                    "duration": {
                        "startTimestamp": "2024-05-01T03:20:00-07:00",
                        "endTimestamp": "2024-05-01T04:00:00-07:00"
                    }
                }
            }]
        }"#;

        let data = extract(doc).unwrap();
        assert_eq!(
            data.visits[0].start_timestamp.to_rfc3339(),
            "2024-05-01T10:20:00+00:00"
        );
    }
}
