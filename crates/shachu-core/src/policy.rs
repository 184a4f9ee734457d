//! Search radii, result caps and ranking limits.
//!
//! Every value has a default matching production usage; a YAML file may
//! override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::delta_for_radius;
use crate::types::AmenityCategory;
use crate::ConfigError;

/// Matching rules for one amenity category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenityPolicy {
    pub radius_m: f64,
    pub max_results: usize,
    /// Minimum bounding-box half width. The box always covers `radius_m`.
    #[serde(default)]
    pub delta_deg: Option<f64>,
    /// Backend table holding this category's rows.
    pub table: String,
}

impl AmenityPolicy {
    fn new(radius_m: f64, max_results: usize, table: &str) -> Self {
        Self {
            radius_m,
            max_results,
            delta_deg: None,
            table: table.to_string(),
        }
    }

    /// Bounding-box half width for a search centered at latitude `lat`.
    ///
    /// An explicit `delta_deg` can widen the box but never shrink it below
    /// what `radius_m` needs at this latitude.
    #[must_use]
    pub fn delta_at(&self, lat: f64) -> f64 {
        let needed = delta_for_radius(self.radius_m, lat);
        self.delta_deg.map_or(needed, |explicit| explicit.max(needed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenityPolicies {
    pub convenience_store: AmenityPolicy,
    pub toilet: AmenityPolicy,
    pub hot_spring: AmenityPolicy,
}

impl Default for AmenityPolicies {
    fn default() -> Self {
        Self {
            convenience_store: AmenityPolicy::new(300.0, 3, "convenience_stores"),
            toilet: AmenityPolicy::new(300.0, 3, "toilets"),
            hot_spring: AmenityPolicy::new(2_000.0, 3, "hot_springs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPolicy {
    /// Half width of the parking-candidate search box around the center.
    pub parking_delta_deg: f64,
    /// Candidates farther than this from the center are dropped.
    pub max_distance_m: f64,
    /// Maximum number of candidates in a result set.
    pub top_n: usize,
    pub amenities: AmenityPolicies,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            parking_delta_deg: 0.0045,
            max_distance_m: 500.0,
            top_n: 10,
            amenities: AmenityPolicies::default(),
        }
    }
}

impl SearchPolicy {
    #[must_use]
    pub fn amenity(&self, category: AmenityCategory) -> &AmenityPolicy {
        match category {
            AmenityCategory::ConvenienceStore => &self.amenities.convenience_store,
            AmenityCategory::Toilet => &self.amenities.toilet,
            AmenityCategory::HotSpring => &self.amenities.hot_spring,
        }
    }
}

/// Load and validate a search policy from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_policy(path: &Path) -> Result<SearchPolicy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_policy(&content, &path.display().to_string())
}

fn parse_policy(content: &str, path: &str) -> Result<SearchPolicy, ConfigError> {
    let policy: SearchPolicy =
        serde_yaml::from_str(content).map_err(|e| ConfigError::FileParse {
            path: path.to_string(),
            source: e,
        })?;
    validate_policy(&policy)?;
    Ok(policy)
}

fn validate_policy(policy: &SearchPolicy) -> Result<(), ConfigError> {
    if !(policy.parking_delta_deg.is_finite() && policy.parking_delta_deg > 0.0) {
        return Err(ConfigError::Validation(format!(
            "parking_delta_deg must be positive, got {}",
            policy.parking_delta_deg
        )));
    }
    if !(policy.max_distance_m.is_finite() && policy.max_distance_m > 0.0) {
        return Err(ConfigError::Validation(format!(
            "max_distance_m must be positive, got {}",
            policy.max_distance_m
        )));
    }
    if policy.top_n == 0 {
        return Err(ConfigError::Validation("top_n must be at least 1".to_string()));
    }

    for category in AmenityCategory::ALL {
        let rules = policy.amenity(category);
        if !(rules.radius_m.is_finite() && rules.radius_m > 0.0) {
            return Err(ConfigError::Validation(format!(
                "{category}: radius_m must be positive, got {}",
                rules.radius_m
            )));
        }
        if rules.max_results == 0 {
            return Err(ConfigError::Validation(format!(
                "{category}: max_results must be at least 1"
            )));
        }
        if let Some(delta) = rules.delta_deg {
            if !(delta.is_finite() && delta > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{category}: delta_deg must be positive, got {delta}"
                )));
            }
        }
        if rules.table.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{category}: table must be non-empty"
            )));
        }
    }

    Ok(())
}
