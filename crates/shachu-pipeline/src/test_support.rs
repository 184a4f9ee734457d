//! In-memory stand-ins for the backend, shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use shachu_backend::{
    AmenityStore, BackendError, CandidateSource, CoordinateFields, RawAmenityRow, RawCandidate,
};
use shachu_core::{AmenityCategory, AmenityPolicy, Coordinate, OvernightWindow, SearchRegion};

/// Metres per degree of latitude on the haversine sphere.
const METERS_PER_DEGREE: f64 = 111_194.93;

/// Moves `origin` by `north_m` and `east_m` metres.
pub(crate) fn offset(origin: Coordinate, north_m: f64, east_m: f64) -> Coordinate {
    let lat = origin.lat + north_m / METERS_PER_DEGREE;
    let lng = origin.lng + east_m / (METERS_PER_DEGREE * origin.lat.to_radians().cos());
    Coordinate::new(lat, lng).expect("offset stays in range")
}

pub(crate) fn row_at(name: &str, at: Coordinate) -> RawAmenityRow {
    RawAmenityRow {
        name: Some(name.to_string()),
        position: CoordinateFields {
            lat: Some(json!(at.lat)),
            lng: Some(json!(at.lng)),
            ..CoordinateFields::default()
        },
    }
}

pub(crate) fn candidate_at(id: u32, at: Coordinate, fee: Option<i64>) -> RawCandidate {
    RawCandidate {
        id: Some(json!(id)),
        name: Some(json!(format!("parking-{id}"))),
        position: CoordinateFields {
            lat: Some(json!(at.lat)),
            lng: Some(json!(at.lng)),
            ..CoordinateFields::default()
        },
        fee_rules: json!({"night_max": fee}),
        calculated_fee: fee.map(|f| json!(f)),
        ..RawCandidate::default()
    }
}

pub(crate) fn hint(name: &str, distance_m: f64) -> Value {
    json!({"name": name, "distance_m": distance_m})
}

/// Amenity rows per category, filtered by bounding box like the real backend.
pub(crate) struct MemoryStore {
    rows: HashMap<AmenityCategory, Vec<RawAmenityRow>>,
    failing: HashSet<AmenityCategory>,
    calls: HashMap<AmenityCategory, AtomicUsize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            failing: HashSet::new(),
            calls: AmenityCategory::ALL
                .into_iter()
                .map(|c| (c, AtomicUsize::new(0)))
                .collect(),
        }
    }
}

impl MemoryStore {
    pub(crate) fn with_rows(mut self, category: AmenityCategory, rows: Vec<RawAmenityRow>) -> Self {
        self.rows.entry(category).or_default().extend(rows);
        self
    }

    pub(crate) fn failing(mut self, category: AmenityCategory) -> Self {
        self.failing.insert(category);
        self
    }

    pub(crate) fn calls(&self, category: AmenityCategory) -> usize {
        self.calls
            .get(&category)
            .map_or(0, |c| c.load(Ordering::SeqCst))
    }

    pub(crate) fn rows_in_box(
        &self,
        category: AmenityCategory,
        center: Coordinate,
        policy: &AmenityPolicy,
    ) -> usize {
        let region = SearchRegion::around(center, policy.delta_at(center.lat));
        self.select(category, &region).len()
    }

    fn select(&self, category: AmenityCategory, region: &SearchRegion) -> Vec<RawAmenityRow> {
        self.rows
            .get(&category)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        crate::normalize::resolve_coordinate(&row.position)
                            .is_none_or(|c| region.contains(c))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl AmenityStore for MemoryStore {
    async fn query(
        &self,
        category: AmenityCategory,
        _table: &str,
        region: &SearchRegion,
    ) -> Result<Vec<RawAmenityRow>, BackendError> {
        if let Some(counter) = self.calls.get(&category) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        if self.failing.contains(&category) {
            return Err(BackendError::UnexpectedStatus {
                status: 503,
                url: format!("memory://{category}"),
            });
        }
        Ok(self.select(category, region))
    }
}

/// Returns a fixed candidate list, or a 503 when `rows` is `None`.
pub(crate) struct StaticSource {
    pub(crate) rows: Option<Vec<RawCandidate>>,
    pub(crate) calls: AtomicUsize,
}

impl StaticSource {
    pub(crate) fn new(rows: Vec<RawCandidate>) -> Self {
        Self {
            rows: Some(rows),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            rows: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl CandidateSource for StaticSource {
    async fn rank(
        &self,
        _region: &SearchRegion,
        _window: &OvernightWindow,
    ) -> Result<Vec<RawCandidate>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.clone().ok_or(BackendError::UnexpectedStatus {
            status: 503,
            url: "memory://rank".to_string(),
        })
    }
}
