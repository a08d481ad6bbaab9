//! Static reference data: surf spot coordinates and the user's preferences
//!
//! Both files are re-read on every call so edits apply without a restart.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const SPOTS_FILE: &str = "surf-spots.json";
pub const PREFERENCES_FILE: &str = "surf-preferences.json";

/// Spot coordinates as stored on disk: `{"lat": .., "long": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    #[serde(rename = "long", alias = "lng")]
    pub lng: f64,
}

/// Spot name -> coordinates
pub type Locations = BTreeMap<String, Location>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Weekend];
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "weekday"),
            DayType::Weekend => write!(f, "weekend"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByDayType<T> {
    pub weekday: T,
    pub weekend: T,
}

impl<T> ByDayType<T> {
    pub fn get(&self, day: DayType) -> &T {
        match day {
            DayType::Weekday => &self.weekday,
            DayType::Weekend => &self.weekend,
        }
    }
}

/// Wave height bounds in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveHeightBounds {
    pub min: f64,
    pub max: f64,
    pub preferred: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub wave_height: WaveHeightBounds,
    pub preferred_beaches: ByDayType<Vec<String>>,
    /// Allowed session windows, e.g. "07:00-09:00"
    pub session_times: ByDayType<Vec<String>>,
    pub skill_level: String,
}

/// Read-only view over the reference data directory
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    dir: PathBuf,
}

impl ReferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn spots_path(&self) -> PathBuf {
        self.dir.join(SPOTS_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    /// Spots file contents, as written
    pub async fn read_spots(&self) -> Result<Value, ConfigError> {
        read_json(&self.spots_path()).await
    }

    /// Preferences file contents, as written
    pub async fn read_preferences(&self) -> Result<Value, ConfigError> {
        read_json(&self.preferences_path()).await
    }

    pub async fn locations(&self) -> Result<Locations, ConfigError> {
        read_json(&self.spots_path()).await
    }

    pub async fn preferences(&self) -> Result<Preferences, ConfigError> {
        read_json(&self.preferences_path()).await
    }

    /// Startup check: both files exist and parse into their typed shapes
    pub async fn verify(&self) -> Result<(), ConfigError> {
        let locations = self.locations().await?;
        let preferences = self.preferences().await?;

        for day in DayType::ALL {
            for beach in unknown_beaches(&preferences, &locations, day) {
                tracing::warn!(%day, beach = %beach, "Preferred beach has no coordinates in {}", SPOTS_FILE);
            }
            if preferences.session_times.get(day).is_empty() {
                tracing::warn!(%day, "No session times configured");
            }
        }

        tracing::info!(
            spots = locations.len(),
            skill_level = %preferences.skill_level,
            dir = %self.dir.display(),
            "Reference data loaded"
        );
        Ok(())
    }
}

/// Preferred beaches for `day` that have no entry in `locations`
pub fn unknown_beaches<'a>(
    preferences: &'a Preferences,
    locations: &'a Locations,
    day: DayType,
) -> impl Iterator<Item = &'a String> + 'a {
    preferences
        .preferred_beaches
        .get(day)
        .iter()
        .filter(move |beach| !locations.contains_key(beach.as_str()))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ReferenceIo { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text)
        .map_err(|source| ConfigError::ReferenceParse { path: path.to_path_buf(), source })
}
