// Persisted user preferences

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The two values the tool remembers between runs. Either key may be
/// absent from the file; absence means the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub last_output_dir: String,

    #[serde(default)]
    pub use_nvenc: bool,
}

impl Settings {
    /// Path to the settings file.
    pub fn settings_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("vidshrink");
        Ok(config_dir.join("settings.json"))
    }

    /// Load settings from disk. A missing or unreadable file is not an
    /// error: the tool runs with defaults and says so in the log.
    pub fn load() -> Self {
        match Self::settings_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!("no settings path available, using defaults: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), "could not read settings file: {e}");
                }
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), "ignoring malformed settings file: {e}");
                Self::default()
            }
        }
    }

    /// Full-file overwrite. Callers treat failure as non-fatal; the
    /// in-memory values keep working for the current run.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Check if the settings file exists.
    pub fn exists() -> bool {
        Self::settings_path().map(|p| p.exists()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.last_output_dir, "");
        assert!(!settings.use_nvenc);
    }

    #[test]
    fn test_absent_keys_mean_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let settings: Settings = serde_json::from_str(r#"{"use_nvenc": true}"#).unwrap();
        assert_eq!(settings.last_output_dir, "");
        assert!(settings.use_nvenc);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            last_output_dir: "/home/user/Videos".to_string(),
            use_nvenc: true,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains("last_output_dir"));
        assert!(json.contains("use_nvenc"));

        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let settings = Settings::load_from(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(settings, Settings::default());
    }
}
