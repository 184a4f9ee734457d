//! Wire types for the backend REST API.
//!
//! Rows come from several generations of backend functions, so coordinates
//! and amenity hints are kept as loose [`serde_json::Value`]s here and are
//! interpreted by the pipeline's field normalizer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use shachu_core::{OvernightWindow, SearchRegion};

/// Coordinate columns as they appear on a row. Either spelling may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFields {
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

/// One parking spot row returned by the fee-aware ranking procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Numeric or string primary key, depending on the backend function.
    #[serde(default)]
    pub id: Option<Value>,
    /// Usually a string; anything else is coerced or dropped by the normalizer.
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(flatten)]
    pub position: CoordinateFields,
    /// Price rules the fee was computed from; opaque.
    #[serde(default, alias = "rates", alias = "price_rules")]
    pub fee_rules: Value,
    /// Number or decimal string. Sentinels such as "要問合せ" also occur.
    #[serde(default, alias = "total_fee")]
    pub calculated_fee: Option<Value>,
    /// Object or JSON-encoded string.
    #[serde(default)]
    pub nearest_convenience_store: Option<Value>,
    #[serde(default)]
    pub nearest_toilet: Option<Value>,
    #[serde(default, alias = "nearest_hotspring")]
    pub nearest_hot_spring: Option<Value>,
}

/// One row from an amenity table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAmenityRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub position: CoordinateFields,
}

/// JSON body for the ranking procedure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRequest {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    /// RFC 3339 entry time.
    pub entry_time: String,
    pub duration_minutes: u32,
}

impl RankRequest {
    #[must_use]
    pub fn new(region: &SearchRegion, window: &OvernightWindow) -> Self {
        Self {
            min_lat: region.min_lat,
            max_lat: region.max_lat,
            min_lng: region.min_lng,
            max_lng: region.max_lng,
            entry_time: window.start_time.to_rfc3339(),
            duration_minutes: window.duration_minutes,
        }
    }
}
