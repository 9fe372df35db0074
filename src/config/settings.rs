use anyhow::{Context, Result};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::PrayerName;

pub const DEFAULT_TIME_ZONE: &str = "Asia/Dhaka";

fn default_true() -> bool {
    true
}
fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings JSON must be an object")]
    NotAnObject,
    #[error("Parsing settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown time zone: '{0}'")]
    UnknownTimeZone(String),
}

/// Notification preferences. Field names double as the keys of the exported
/// JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub silent_notifications: bool,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_true")]
    pub fajr_notification: bool,
    #[serde(default = "default_true")]
    pub dhuhr_notification: bool,
    #[serde(default = "default_true")]
    pub asr_notification: bool,
    #[serde(default = "default_true")]
    pub maghrib_notification: bool,
    #[serde(default = "default_true")]
    pub isha_notification: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            silent_notifications: false,
            time_zone: default_time_zone(),
            fajr_notification: true,
            dhuhr_notification: true,
            asr_notification: true,
            maghrib_notification: true,
            isha_notification: true,
        }
    }
}

impl NotificationSettings {
    /// Configured zone, or the default if the stored name no longer parses.
    pub fn tz(&self) -> Tz {
        parse_time_zone(&self.time_zone).unwrap_or_else(|_| {
            log::warn!(
                "Stored time zone '{}' is invalid, using {}",
                self.time_zone,
                DEFAULT_TIME_ZONE
            );
            Tz::Asia__Dhaka
        })
    }

    pub fn set_time_zone(&mut self, name: &str) -> Result<(), SettingsError> {
        let tz = parse_time_zone(name)?;
        self.time_zone = tz.name().to_string();
        Ok(())
    }

    pub fn prayer_enabled(&self, prayer: PrayerName) -> bool {
        *self.prayer_flag(prayer)
    }

    pub fn set_prayer_enabled(&mut self, prayer: PrayerName, enabled: bool) {
        *self.prayer_flag_mut(prayer) = enabled;
    }

    /// Whether any notification at all should be planned for `prayer`.
    pub fn should_notify(&self, prayer: PrayerName) -> bool {
        self.notifications_enabled && self.prayer_enabled(prayer)
    }

    fn prayer_flag(&self, prayer: PrayerName) -> &bool {
        match prayer {
            PrayerName::Fajr => &self.fajr_notification,
            PrayerName::Dhuhr => &self.dhuhr_notification,
            PrayerName::Asr => &self.asr_notification,
            PrayerName::Maghrib => &self.maghrib_notification,
            PrayerName::Isha => &self.isha_notification,
        }
    }

    fn prayer_flag_mut(&mut self, prayer: PrayerName) -> &mut bool {
        match prayer {
            PrayerName::Fajr => &mut self.fajr_notification,
            PrayerName::Dhuhr => &mut self.dhuhr_notification,
            PrayerName::Asr => &mut self.asr_notification,
            PrayerName::Maghrib => &mut self.maghrib_notification,
            PrayerName::Isha => &mut self.isha_notification,
        }
    }

    pub fn export_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lenient import: the document must be a JSON object, but any field that
    /// is missing or of the wrong type takes its default instead of failing.
    pub fn import_json(text: &str) -> Result<Self, SettingsError> {
        let value: Value = serde_json::from_str(text)?;
        let obj = value.as_object().ok_or(SettingsError::NotAnObject)?;
        let defaults = Self::default();

        let time_zone = match obj.get("time_zone").and_then(Value::as_str) {
            Some(name) => match parse_time_zone(name) {
                Ok(tz) => tz.name().to_string(),
                Err(e) => {
                    log::warn!("{}, using {}", e, DEFAULT_TIME_ZONE);
                    defaults.time_zone.clone()
                }
            },
            None => defaults.time_zone.clone(),
        };

        Ok(Self {
            notifications_enabled: bool_or(obj, "notifications_enabled", defaults.notifications_enabled),
            silent_notifications: bool_or(obj, "silent_notifications", defaults.silent_notifications),
            time_zone,
            fajr_notification: bool_or(obj, "fajr_notification", defaults.fajr_notification),
            dhuhr_notification: bool_or(obj, "dhuhr_notification", defaults.dhuhr_notification),
            asr_notification: bool_or(obj, "asr_notification", defaults.asr_notification),
            maghrib_notification: bool_or(obj, "maghrib_notification", defaults.maghrib_notification),
            isha_notification: bool_or(obj, "isha_notification", defaults.isha_notification),
        })
    }
}

fn bool_or(obj: &Map<String, Value>, key: &str, default: bool) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            log::warn!("Ignoring non-boolean '{}' = {}, using {}", key, other, default);
            default
        }
        None => default,
    }
}

pub fn parse_time_zone(name: &str) -> Result<Tz, SettingsError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SettingsError::UnknownTimeZone(name.to_string()))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "namaz").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("namaz.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customised() -> NotificationSettings {
        let mut s = NotificationSettings::default();
        s.silent_notifications = true;
        s.set_time_zone("Europe/London").unwrap();
        s.set_prayer_enabled(PrayerName::Asr, false);
        s.set_prayer_enabled(PrayerName::Isha, false);
        s
    }

    #[test]
    fn export_uses_flat_keys() {
        let json: Value = serde_json::from_str(&customised().export_json().unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 8);
        assert_eq!(obj["notifications_enabled"], true);
        assert_eq!(obj["silent_notifications"], true);
        assert_eq!(obj["time_zone"], "Europe/London");
        assert_eq!(obj["asr_notification"], false);
        assert_eq!(obj["fajr_notification"], true);
    }

    #[test]
    fn export_import_round_trip() {
        let original = customised();
        let back = NotificationSettings::import_json(&original.export_json().unwrap()).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn malformed_fields_fall_back_per_field() {
        let text = r#"{
            "notifications_enabled": "yes",
            "silent_notifications": true,
            "time_zone": "Mars/Olympus_Mons",
            "maghrib_notification": false,
            "isha_notification": 0
        }"#;
        let s = NotificationSettings::import_json(text).unwrap();
        assert!(s.notifications_enabled);
        assert!(s.silent_notifications);
        assert_eq!(s.time_zone, DEFAULT_TIME_ZONE);
        assert!(!s.maghrib_notification);
        assert!(s.isha_notification);
        assert!(s.fajr_notification);
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(matches!(
            NotificationSettings::import_json("[true]"),
            Err(SettingsError::NotAnObject)
        ));
        assert!(matches!(
            NotificationSettings::import_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn should_notify_respects_master_switch() {
        let mut s = customised();
        assert!(s.should_notify(PrayerName::Fajr));
        assert!(!s.should_notify(PrayerName::Asr));
        s.notifications_enabled = false;
        assert!(!s.should_notify(PrayerName::Fajr));
    }

    #[test]
    fn rejects_unknown_zone_on_set() {
        let mut s = NotificationSettings::default();
        assert!(s.set_time_zone("Nowhere/City").is_err());
        assert_eq!(s.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(s.tz(), Tz::Asia__Dhaka);
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());

        let config = AppConfig {
            notifications: customised(),
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[notifications]\nsilent_notifications = true\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.notifications.silent_notifications);
        assert_eq!(config.notifications.time_zone, DEFAULT_TIME_ZONE);
        assert!(config.notifications.isha_notification);
    }
}
