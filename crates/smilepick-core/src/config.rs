//! Static picker configuration.
//!
//! Everything here is a tunable constant, not runtime-computed state: input
//! timing thresholds, the recency cap, and the asset base URL used by the
//! forum insertion format. Values load from an optional JSON file; every
//! field has a default so a missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PickerError, PickerResult};

/// Environment variable overriding the profile data directory.
pub const DATA_DIR_ENV: &str = "SMILEPICK_DATA_DIR";

/// Tunables for input handling, ranking, and insertion formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PickerConfig {
    /// Pointer hold time before a press becomes a long-press.
    pub long_press_delay_ms: u64,
    /// Window within which two presses of the repeat-fix key count as one
    /// chord.
    pub double_press_threshold_ms: u64,
    /// Maximum length of the cross-category recency list.
    pub max_recent: usize,
    /// Delay between a toggle request and popup construction, so the
    /// triggering event cannot immediately re-close the popup.
    pub popup_mount_delay_ms: u64,
    /// Base URL embedded in the forum image-tag insertion format.
    pub forum_image_base: String,
    /// Touch platform: plain insertion keeps the popup open and skips the
    /// refocus step.
    pub mobile: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            long_press_delay_ms: 500,
            double_press_threshold_ms: 500,
            max_recent: 12,
            popup_mount_delay_ms: 10,
            forum_image_base: "https://klavogonki.ru".to_owned(),
            mobile: false,
        }
    }
}

impl PickerConfig {
    /// Long-press delay as a [`Duration`].
    #[must_use]
    pub const fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }

    /// Double-press window as a [`Duration`].
    #[must_use]
    pub const fn double_press_threshold(&self) -> Duration {
        Duration::from_millis(self.double_press_threshold_ms)
    }

    /// Popup mount debounce as a [`Duration`].
    #[must_use]
    pub const fn popup_mount_delay(&self) -> Duration {
        Duration::from_millis(self.popup_mount_delay_ms)
    }

    /// Load config from an explicitly provided file.
    ///
    /// Unlike store reads, an explicit `--config` path that is missing or
    /// malformed is an error: the user asked for that file specifically.
    pub fn load_from_file(path: &Path) -> PickerResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| PickerError::InvalidConfig {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|err| PickerError::InvalidConfig {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })
    }
}

/// Resolve the profile data directory: `SMILEPICK_DATA_DIR` wins, else
/// `<home>/.smilepick`.
#[must_use]
pub fn data_dir(home: &Path) -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map_or_else(|| home.join(".smilepick"), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PickerConfig::default();
        assert_eq!(config.long_press_delay(), Duration::from_millis(500));
        assert_eq!(config.double_press_threshold(), Duration::from_millis(500));
        assert_eq!(config.max_recent, 12);
        assert!(!config.mobile);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_recent": 5}"#).unwrap();

        let config = PickerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.max_recent, 5);
        assert_eq!(config.long_press_delay_ms, 500);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PickerConfig::load_from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PickerError::InvalidConfig { .. }));
    }

    #[test]
    fn malformed_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{{{").unwrap();
        assert!(PickerConfig::load_from_file(&path).is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = PickerConfig {
            max_recent: 3,
            mobile: true,
            ..PickerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let decoded: PickerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }
}
