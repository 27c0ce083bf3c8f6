//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the moon-config.toml file.
//! It provides a centralized way to configure the observer location, the ephemeris
//! precision tier, the local display offset and solunar window lengths.

use crate::ephemeris::EphemerisSettings;
use crate::solunar::SolunarConfig;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "moon-config.toml";

/// Application configuration loaded from moon-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Where the Moon is observed from
    pub observer: ObserverConfig,
    /// Calculation and display settings
    #[serde(default)]
    pub ephemeris: EphemerisConfig,
    /// Solunar window lengths
    #[serde(default)]
    pub solunar: SolunarConfig,
}

/// Observer location
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Human-readable place name for reference
    pub name: String,
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
}

/// Ephemeris precision tier and local display offset
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EphemerisConfig {
    #[serde(flatten)]
    pub settings: EphemerisSettings,
    /// Hours east of UTC used when printing local times (CST = -6)
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: f64,
}

fn default_utc_offset_hours() -> f64 {
    -6.0
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        EphemerisConfig {
            settings: EphemerisSettings::default(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl EphemerisConfig {
    /// The display offset as a chrono zone; out-of-range offsets fall back to UTC.
    pub fn local_offset(&self) -> FixedOffset {
        let seconds = (self.utc_offset_hours * 3600.0).round() as i32;
        FixedOffset::east_opt(seconds).unwrap_or_else(|| {
            warn!(
                "utc_offset_hours {} is out of range, using UTC",
                self.utc_offset_hours
            );
            Utc.fix()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: ObserverConfig {
                name: "Lake Bistineau, LA".to_string(),
                latitude: 32.4619,
                longitude: -93.3486,
            },
            ephemeris: EphemerisConfig::default(),
            solunar: SolunarConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from moon-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration for observer: {}", config.observer.name);
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format in {}: {}", path.display(), e);
                    warn!("Using default configuration (Lake Bistineau, LA)");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file at {}, using default configuration (Lake Bistineau, LA)",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ObliquityModel;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.observer.name, "Lake Bistineau, LA");
        assert_eq!(config.observer.latitude, 32.4619);
        assert_eq!(config.observer.longitude, -93.3486);
        assert_eq!(config.ephemeris.settings.obliquity, ObliquityModel::TimeVarying);
        assert_eq!(config.solunar.major_period_minutes, 120);
        assert_eq!(config.solunar.minor_period_minutes, 60);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let toml_str = r#"
            [observer]
            name = "Tromsø"
            latitude = 69.65
            longitude = 18.96

            [ephemeris]
            obliquity = "fixed"
            utc_offset_hours = 1.0
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ephemeris.settings.obliquity, ObliquityModel::Fixed);
        assert_eq!(config.solunar, SolunarConfig::default());
        assert_eq!(config.ephemeris.local_offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_save_then_load() {
        let file = NamedTempFile::new().expect("Should create temp file");
        let mut config = Config::default();
        config.observer.name = "Minden, LA".to_string();
        config.ephemeris.utc_offset_hours = -5.0;
        config.save_to_path(file.path()).expect("Should save config");

        let loaded = Config::load_from_path(file.path());
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().expect("Should create temp file");
        fs::write(file.path(), "observer = 3").expect("Should write");
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_out_of_range_offset_is_utc() {
        let eph = EphemerisConfig {
            utc_offset_hours: 30.0,
            ..EphemerisConfig::default()
        };
        assert_eq!(eph.local_offset().local_minus_utc(), 0);
    }
}
