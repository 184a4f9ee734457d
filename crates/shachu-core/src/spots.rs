use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::ConfigError;

/// A point of interest whose surrounding parking gets its own page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotConfig {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Free-form operator note, logged when the spot yields no results.
    pub notes: Option<String>,
}

impl SpotConfig {
    /// The validated center coordinate of this spot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidCoordinate`] when out of range.
    pub fn center(&self) -> Result<Coordinate, crate::CoreError> {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Deserialize)]
pub struct SpotsFile {
    pub spots: Vec<SpotConfig>,
}

/// Load and validate the spot list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_spots(path: &Path) -> Result<SpotsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let spots_file: SpotsFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_spots(&spots_file)?;

    Ok(spots_file)
}

fn validate_spots(spots_file: &SpotsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for spot in &spots_file.spots {
        let name = spot.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "spot name must be non-empty".to_string(),
            ));
        }

        if spot.center().is_err() {
            return Err(ConfigError::Validation(format!(
                "spot '{name}' has invalid coordinate ({}, {})",
                spot.lat, spot.lng
            )));
        }

        if !seen_names.insert(name.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate spot name: '{name}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "spots_test.rs"]
mod tests;
