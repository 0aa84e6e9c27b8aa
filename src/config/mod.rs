use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    calendar::Calendar,
    domain::Granularity,
    errors::{EngineError, Result},
};

const HOME_ENV: &str = "EXPENSE_CORE_HOME";
const DEFAULT_DIR_NAME: &str = "expense_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Calendar and view preferences for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// IANA zone whose midnight separates days, e.g. `Europe/Berlin`.
    #[serde(default = "EngineConfig::default_time_zone")]
    pub time_zone: String,
    /// Applied to both period windows and chart buckets.
    #[serde(default = "EngineConfig::default_first_weekday")]
    pub first_weekday: Weekday,
    #[serde(default)]
    pub default_granularity: Granularity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_zone: Self::default_time_zone(),
            first_weekday: Self::default_first_weekday(),
            default_granularity: Granularity::default(),
        }
    }
}

impl EngineConfig {
    pub fn default_time_zone() -> String {
        "UTC".into()
    }

    pub fn default_first_weekday() -> Weekday {
        Weekday::Mon
    }

    pub fn calendar(&self) -> Result<Calendar> {
        let tz: Tz = self.time_zone.trim().parse().map_err(|_| {
            EngineError::Config(format!("unknown time zone `{}`", self.time_zone))
        })?;
        Ok(Calendar::new(tz, self.first_weekday))
    }
}

/// Loads and saves [`EngineConfig`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    /// Uses `EXPENSE_CORE_HOME` when set, otherwise the platform config directory.
    pub fn from_env() -> Result<Self> {
        Self::with_base_dir(base_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<EngineConfig> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            let config = serde_json::from_str(&data)?;
            debug!(path = %self.config_path.display(), "loaded engine config");
            Ok(config)
        } else {
            Ok(EngineConfig::default())
        }
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

fn base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_utc_calendar() {
        let calendar = EngineConfig::default().calendar().unwrap();
        assert_eq!(calendar, Calendar::utc());
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let config = EngineConfig {
            time_zone: "Mars/Olympus_Mons".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.calendar(), Err(EngineError::Config(_))));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"time_zone":"Europe/Berlin"}"#).unwrap();
        assert_eq!(config.first_weekday, Weekday::Mon);
        assert_eq!(config.default_granularity, Granularity::Week);
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/x/config.json")),
            PathBuf::from("/x/config.json.tmp")
        );
    }
}
