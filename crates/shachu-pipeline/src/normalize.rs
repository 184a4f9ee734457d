//! Field normalization for backend rows.
//!
//! Backend rows spell coordinates two ways and embed "nearest amenity" hints
//! either as objects or as JSON-encoded strings. Everything is decoded here,
//! once, into typed values; malformed data becomes `None` and is logged,
//! never raised.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use shachu_backend::{CoordinateFields, RawCandidate};
use shachu_core::{haversine_m, Amenity, AmenityCategory, Coordinate, SearchPolicy};

/// A backend candidate with typed fields and decoded hints.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCandidate {
    pub id: Option<String>,
    pub name: String,
    pub coordinate: Coordinate,
    pub raw_fee_rules: Value,
    pub calculated_fee: Option<Decimal>,
    /// Successfully decoded backend hints, at most one per category.
    pub hints: BTreeMap<AmenityCategory, Amenity>,
}

#[derive(Debug, Deserialize)]
struct HintPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "distance")]
    distance_m: Option<Value>,
    #[serde(flatten)]
    position: CoordinateFields,
}

/// Reads a JSON number or a numeric string.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Resolves a coordinate from either spelling, preferring
/// `latitude`/`longitude` when that pair is complete and in range.
///
/// Returns `None` when neither pair yields a valid coordinate.
#[must_use]
pub fn resolve_coordinate(fields: &CoordinateFields) -> Option<Coordinate> {
    let pair = |lat: Option<&Value>, lng: Option<&Value>| {
        let (lat, lng) = number(lat).zip(number(lng))?;
        Coordinate::new(lat, lng).ok()
    };
    pair(fields.latitude.as_ref(), fields.longitude.as_ref())
        .or_else(|| pair(fields.lat.as_ref(), fields.lng.as_ref()))
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Reads a fee from a JSON number or decimal string.
///
/// Anything else ("要問合せ", objects, booleans) is logged and becomes an
/// unknown fee, which sorts last.
fn fee(raw: Option<&Value>) -> Option<Decimal> {
    let value = raw?;
    let parsed = match value {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(fee = %value, "calculated fee is not a number; treating as unknown");
    }
    parsed
}

/// Reads a display name, stringifying numbers.
fn text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            tracing::warn!(name = %other, "candidate name has unexpected type; ignoring");
            None
        }
    }
}

/// Decodes a backend hint for `category`, measured from `origin`.
///
/// Accepts an object or a JSON-encoded string. Returns `None` for absent,
/// null, undecodable, nameless or out-of-radius hints.
#[must_use]
pub fn decode_hint(
    category: AmenityCategory,
    raw: Option<&Value>,
    origin: Coordinate,
    radius_m: f64,
) -> Option<Amenity> {
    let decoded = match raw? {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(%category, error = %e, "amenity hint is not valid JSON; ignoring");
                return None;
            }
        },
        other => other.clone(),
    };

    if decoded.is_null() {
        return None;
    }

    let payload: HintPayload = match serde_json::from_value(decoded) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(%category, error = %e, "amenity hint has unexpected shape; ignoring");
            return None;
        }
    };

    let name = payload.name.filter(|n| !n.trim().is_empty())?;
    let coordinate = resolve_coordinate(&payload.position);
    let distance_m = number(payload.distance_m.as_ref())
        .or_else(|| coordinate.map(|c| haversine_m(origin, c)))
        .filter(|d| d.is_finite() && *d >= 0.0)?;

    if distance_m > radius_m {
        tracing::debug!(
            %category,
            name = %name,
            distance_m,
            radius_m,
            "amenity hint beyond category radius; ignoring"
        );
        return None;
    }

    Some(Amenity {
        category,
        name,
        coordinate,
        distance_m,
    })
}

/// Backend hint wins; the matcher's result fills the gap.
#[must_use]
pub fn merge_amenity(hint: Option<Amenity>, matched: Option<Amenity>) -> Option<Amenity> {
    hint.or(matched)
}

fn id_string(id: Option<&Value>) -> Option<String> {
    match id? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn raw_hint(raw: &RawCandidate, category: AmenityCategory) -> Option<&Value> {
    match category {
        AmenityCategory::ConvenienceStore => raw.nearest_convenience_store.as_ref(),
        AmenityCategory::Toilet => raw.nearest_toilet.as_ref(),
        AmenityCategory::HotSpring => raw.nearest_hot_spring.as_ref(),
    }
}

/// Normalizes one backend candidate.
///
/// Returns `None` (with a warning) when the row has no usable coordinate,
/// since nothing downstream can be computed without one.
#[must_use]
pub fn normalize(raw: RawCandidate, policy: &SearchPolicy) -> Option<NormalizedCandidate> {
    let id = id_string(raw.id.as_ref());
    let name = text(raw.name.as_ref()).unwrap_or_default();
    let Some(coordinate) = resolve_coordinate(&raw.position) else {
        tracing::warn!(
            id = id.as_deref().unwrap_or("-"),
            name = %name,
            "candidate has no usable coordinate; dropping"
        );
        return None;
    };

    let hints = AmenityCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let radius_m = policy.amenity(category).radius_m;
            decode_hint(category, raw_hint(&raw, category), coordinate, radius_m)
                .map(|amenity| (category, amenity))
        })
        .collect();

    Some(NormalizedCandidate {
        id,
        name,
        coordinate,
        calculated_fee: fee(raw.calculated_fee.as_ref()),
        raw_fee_rules: raw.fee_rules,
        hints,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
