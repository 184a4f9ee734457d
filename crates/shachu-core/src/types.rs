//! Domain types handed from the enrichment pipeline to page renderers.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Entry time and length of an overnight stay, passed through to the fee
/// calculator untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvernightWindow {
    pub start_time: DateTime<FixedOffset>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityCategory {
    ConvenienceStore,
    Toilet,
    HotSpring,
}

impl AmenityCategory {
    pub const ALL: [AmenityCategory; 3] = [
        AmenityCategory::ConvenienceStore,
        AmenityCategory::Toilet,
        AmenityCategory::HotSpring,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AmenityCategory::ConvenienceStore => "convenience_store",
            AmenityCategory::Toilet => "toilet",
            AmenityCategory::HotSpring => "hot_spring",
        }
    }
}

impl std::fmt::Display for AmenityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A nearby amenity resolved for a parking candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub category: AmenityCategory,
    pub name: String,
    /// Absent only for backend hints that report a distance without a position.
    pub coordinate: Option<Coordinate>,
    pub distance_m: f64,
}

/// A fully enriched overnight parking option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingCandidate {
    pub id: Option<String>,
    pub name: String,
    pub coordinate: Coordinate,
    /// Backend price rules, opaque to this crate.
    pub raw_fee_rules: serde_json::Value,
    pub calculated_fee: Option<Decimal>,
    pub distance_to_center_m: f64,
    pub walking_minutes: u32,
    pub nearest_amenities: BTreeMap<AmenityCategory, Option<Amenity>>,
}

impl ParkingCandidate {
    #[must_use]
    pub fn amenity(&self, category: AmenityCategory) -> Option<&Amenity> {
        self.nearest_amenities.get(&category).and_then(Option::as_ref)
    }
}

/// Filtered, capped, fee-ordered candidates ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedResultSet(Vec<ParkingCandidate>);

impl RankedResultSet {
    #[must_use]
    pub fn new(candidates: Vec<ParkingCandidate>) -> Self {
        Self(candidates)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParkingCandidate> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ParkingCandidate] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<ParkingCandidate> {
        self.0
    }

    /// `true` when known fees never decrease and every unknown fee sits after
    /// all known ones.
    #[must_use]
    pub fn is_fee_ordered(&self) -> bool {
        fees_are_ordered(self.0.iter().map(|c| c.calculated_fee))
    }
}

impl<'a> IntoIterator for &'a RankedResultSet {
    type Item = &'a ParkingCandidate;
    type IntoIter = std::slice::Iter<'a, ParkingCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Checks non-decreasing fee order with `None` sorted last.
pub fn fees_are_ordered<I>(fees: I) -> bool
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    let mut previous: Option<Option<Decimal>> = None;
    for fee in fees {
        if let Some(prev) = previous {
            match (prev, fee) {
                (Some(a), Some(b)) if a > b => return false,
                (None, Some(_)) => return false,
                _ => {}
            }
        }
        previous = Some(fee);
    }
    true
}
