//! Timeline Atlas - location-history extraction and map feature building
//!
//! Atlas turns location-history timeline exports (the nested `timelineObjects`
//! JSON format) into map-ready payloads through a small deterministic
//! pipeline: extraction → normalization → feature building.
//!
//! ## Modules
//!
//! - **extractor**: one raw document in, normalized activity segments and
//!   place visits out
//! - **batch**: fold many documents into one record set with per-file errors
//! - **heatmap** / **timeseries**: pure builders producing the two render
//!   payloads (weighted points; timestamped GeoJSON)

pub mod batch;
pub mod error;
pub mod extractor;
pub mod heatmap;
pub mod timeseries;
pub mod types;

pub use batch::{extract_batch, BatchOutcome, SourceError};
pub use error::TimelineError;
pub use extractor::extract;
pub use heatmap::{build_heatmap, HeatmapLayer, HeatmapPoint, MapCenter};
pub use timeseries::{build_timeseries, Feature, FeatureCollection, TimeSeriesLayer};
pub use types::{ActivitySegment, PlaceVisit, TimelineData};

/// Atlas version embedded in CLI output
pub const ATLAS_VERSION: &str = env!("CARGO_PKG_VERSION");
