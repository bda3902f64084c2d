//! TOML-based schedule configuration.
//!
//! Stores the static inputs of the dashboard:
//! - Time zone, grid slot size and countdown leads
//! - Class, food and personal event lists
//! - Sleep and morning-routine settings (events are generated from these)
//! - Deadline items
//! - Flavor phrases per progress stage
//!
//! Configuration is stored at `~/.config/weekboard/config.toml` and read once
//! at startup. Times stay as strings here; [`crate::Schedule`] parses and
//! validates them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, CoreError};
use crate::event::ColorTag;

/// One recurring event as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub title: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub location: String,
    /// 0 = Monday ... 6 = Sunday
    pub weekday: u8,
    /// HH:MM or H:MM AM/PM
    pub start: String,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorTag>,
}

impl EventEntry {
    pub fn new(title: &str, kind: &str, weekday: u8, start: &str, duration_minutes: i64) -> Self {
        Self {
            title: title.to_string(),
            kind: kind.to_string(),
            location: String::new(),
            weekday,
            start: start.to_string(),
            duration_minutes,
            color: None,
        }
    }
}

/// One deadline as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineEntry {
    pub title: String,
    #[serde(default)]
    pub kind: String,
    /// YYYY-MM-DD HH:MM, or a bare date for end of day
    pub due: String,
}

/// Sleep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sleep_start")]
    pub start: String,
    #[serde(default = "default_sleep_minutes")]
    pub duration_minutes: i64,
    #[serde(default = "default_sleep_title")]
    pub title: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorTag>,
}

/// Morning routine settings. Its start is the end of sleep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorningConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_morning_minutes")]
    pub duration_minutes: i64,
    #[serde(default = "default_morning_title")]
    pub title: String,
    #[serde(default = "default_morning_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorTag>,
}

/// Flavor phrases shown in the info box, by progress stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorConfig {
    #[serde(default)]
    pub beginning: Vec<String>,
    #[serde(default)]
    pub middle: Vec<String>,
    #[serde(default)]
    pub end: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weekboard/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_departure_lead")]
    pub departure_lead_minutes: u32,
    #[serde(default = "default_lunch_lead")]
    pub lunch_lead_minutes: u32,
    #[serde(default = "default_max_deadlines")]
    pub max_deadlines_per_day: usize,
    #[serde(default = "default_min_column_width")]
    pub min_column_width: usize,
    #[serde(default)]
    pub sleep: SleepConfig,
    #[serde(default)]
    pub morning: MorningConfig,
    #[serde(default)]
    pub flavor: FlavorConfig,
    #[serde(default)]
    pub classes: Vec<EventEntry>,
    #[serde(default)]
    pub food: Vec<EventEntry>,
    #[serde(default)]
    pub personal: Vec<EventEntry>,
    #[serde(default)]
    pub deadlines: Vec<DeadlineEntry>,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_timezone() -> String {
    "America/Toronto".into()
}
fn default_slot_minutes() -> u32 {
    30
}
fn default_departure_lead() -> u32 {
    20
}
fn default_lunch_lead() -> u32 {
    45
}
fn default_max_deadlines() -> usize {
    crate::deadline::DEFAULT_MAX_PER_DAY
}
fn default_min_column_width() -> usize {
    crate::grid::DEFAULT_MIN_COLUMN_WIDTH
}
fn default_sleep_start() -> String {
    "23:00".into()
}
fn default_sleep_minutes() -> i64 {
    600
}
fn default_sleep_title() -> String {
    "Sleep".into()
}
fn default_morning_minutes() -> i64 {
    60
}
fn default_morning_title() -> String {
    "Morning".into()
}
fn default_morning_kind() -> String {
    "routine".into()
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start: default_sleep_start(),
            duration_minutes: default_sleep_minutes(),
            title: default_sleep_title(),
            kind: String::new(),
            color: None,
        }
    }
}

impl Default for MorningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_minutes: default_morning_minutes(),
            title: default_morning_title(),
            kind: default_morning_kind(),
            color: None,
        }
    }
}

impl Default for FlavorConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            beginning: owned(&["Fresh start, stay sharp.", "开始了，专心！", "Settle in and take notes."]),
            middle: owned(&["Halfway there.", "坚持住，过半了！", "Keep the focus going."]),
            end: owned(&["Almost done!", "快下课了！", "Wrap it up strong."]),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            slot_minutes: default_slot_minutes(),
            departure_lead_minutes: default_departure_lead(),
            lunch_lead_minutes: default_lunch_lead(),
            max_deadlines_per_day: default_max_deadlines(),
            min_column_width: default_min_column_width(),
            sleep: SleepConfig::default(),
            morning: MorningConfig::default(),
            flavor: FlavorConfig::default(),
            classes: vec![
                EventEntry::new("CEG 4166", "Lecture", 0, "13:00", 80),
                EventEntry::new("CEG 4195", "Lecture", 0, "14:30", 80),
                EventEntry::new("CEG 4166", "Tutorial", 0, "17:30", 80),
                EventEntry::new("MAT 2384", "Lecture", 0, "19:00", 80),
                EventEntry::new("MAT 2384", "Lecture", 0, "20:30", 80),
                EventEntry::new("CEG 4166", "Lab", 1, "11:30", 170),
                EventEntry::new("CEG 4166", "Lecture", 2, "11:30", 80),
                EventEntry::new("CEG 4195", "Lab", 2, "13:00", 170),
                EventEntry::new("MAT 2384", "Lecture", 2, "16:00", 80),
                EventEntry::new("CEG 4195", "Lecture", 3, "16:00", 80),
            ],
            food: (0..7)
                .map(|day| EventEntry::new("Dinner", "", day, "18:30", 45))
                .collect(),
            personal: Vec::new(),
            deadlines: Vec::new(),
        }
    }
}

/// Returns `~/.config/weekboard[-dev]/` based on WEEKBOARD_ENV.
///
/// Set WEEKBOARD_ENV=dev to use the development directory. The directory is
/// not created here.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WEEKBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("weekboard-dev")
    } else {
        base_dir.join("weekboard")
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match part.parse::<usize>() {
                Ok(index) if current.is_array() => current.get(index)?,
                _ => current.get(part)?,
            };
        }
        Some(current)
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default location, or the built-in schedule if no file
    /// exists there.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::default_path();
        if !path.exists() {
            warn!(path = %path.display(), "no config file, using built-in schedule");
            return Ok(Self::default());
        }
        Ok(Self::load_from(&path)?)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = Self::from_toml(&content)?;
        debug!(path = %path.display(), classes = cfg.classes.len(), "loaded config");
        Ok(cfg)
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Serialize to a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Array entries are addressed by index, e.g. `classes.0.title`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
