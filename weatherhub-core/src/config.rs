use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::cities::CityList;

const DEFAULT_AUTO_UPDATE_MINUTES: i64 = 10;

/// One configured city; `key` falls back to `name` when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    pub name: String,
    pub key: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// City refreshed first when none is picked interactively.
    pub default_city: Option<String>,

    /// Auto-update interval in minutes; absent means the built-in default,
    /// zero or negative disables auto-update.
    pub auto_update_minutes: Option<i64>,

    /// Example TOML:
    /// [[cities]]
    /// name = "beijing"
    /// Empty means the built-in seed list.
    #[serde(default)]
    pub cities: Vec<CityConfig>,
}

impl Config {
    /// Effective auto-update interval, applying the built-in default.
    pub fn update_interval_minutes(&self) -> i64 {
        self.auto_update_minutes.unwrap_or(DEFAULT_AUTO_UPDATE_MINUTES)
    }

    pub fn set_default_city(&mut self, city: impl Into<String>) {
        self.default_city = Some(city.into());
    }

    /// Builds the selectable list: configured cities, or the built-in seed
    /// list when none are configured.
    pub fn city_list(&self) -> CityList {
        if self.cities.is_empty() {
            return CityList::with_default_cities();
        }

        let list = CityList::new();
        for city in &self.cities {
            list.add(city.name.clone(), city.key.clone());
        }
        list
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherhub", "weatherhub-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::default();

        assert_eq!(cfg.update_interval_minutes(), DEFAULT_AUTO_UPDATE_MINUTES);
        assert!(cfg.default_city.is_none());

        let list = cfg.city_list();
        assert_eq!(list.count(), 10);
        assert_eq!(list.name_at(0), "beijing");
    }

    #[test]
    fn configured_cities_replace_the_seed_list() {
        let mut cfg = Config::default();
        cfg.cities.push(CityConfig { name: "Xi'an".to_string(), key: Some("xian".to_string()) });
        cfg.cities.push(CityConfig { name: "suzhou".to_string(), key: None });

        let list = cfg.city_list();
        assert_eq!(list.count(), 2);
        assert_eq!(list.name_at(0), "Xi'an");
        assert_eq!(list.key_at(0), "xian");
        assert_eq!(list.key_at(1), "suzhou");
    }

    #[test]
    fn explicit_interval_overrides_the_default() {
        let mut cfg = Config::default();
        cfg.auto_update_minutes = Some(3);
        assert_eq!(cfg.update_interval_minutes(), 3);

        cfg.auto_update_minutes = Some(0);
        assert_eq!(cfg.update_interval_minutes(), 0, "zero means disabled, not defaulted");
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = Config::default();
        cfg.set_default_city("hangzhou");
        cfg.auto_update_minutes = Some(5);
        cfg.cities.push(CityConfig { name: "hangzhou".to_string(), key: None });

        let rendered = toml::to_string_pretty(&cfg).expect("config serializes");
        let parsed: Config = toml::from_str(&rendered).expect("config parses back");

        assert_eq!(parsed.default_city.as_deref(), Some("hangzhou"));
        assert_eq!(parsed.update_interval_minutes(), 5);
        assert_eq!(parsed.cities.len(), 1);
    }
}
