// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and
//! saving user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language, theme mode, last opened directory
//! - `[gallery]` - Gallery scan and thumbnail settings
//! - `[cache]` - Full-size image prefetch cache settings
//! - `[window]` - Persisted window geometry
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable
//! deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `ICED_LIGHTBOX_CONFIG_DIR` environment variable
//! 3. Falls back to the platform-specific config directory
//!
//! # Migration
//!
//! Old flat config files (pre-0.1.0 prototypes) are automatically migrated to
//! the sectioned format when loaded. The next save writes the new format.

use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Application name used for the config directory.
const APP_NAME: &str = "iced_lightbox";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "ICED_LIGHTBOX_CONFIG_DIR";

/// Default edge length for generated thumbnails, in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 256;
/// Supported thumbnail size range; values outside are clamped on use.
pub const MIN_THUMBNAIL_SIZE: u32 = 96;
pub const MAX_THUMBNAIL_SIZE: u32 = 512;

// =============================================================================
// Enums (shared between sections)
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Alphabetical,
    ModifiedDate,
    CreatedDate,
}

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "ro").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,

    /// Directory opened on startup when no path is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
            last_directory: None,
        }
    }
}

/// Gallery scan and thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    /// Image file sorting order in the scanned directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,

    /// Edge length for generated thumbnails, in pixels.
    #[serde(
        default = "default_thumbnail_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_size: Option<u32>,

    /// Whether captions are shown under grid thumbnails.
    #[serde(
        default = "default_show_captions",
        skip_serializing_if = "Option::is_none"
    )]
    pub show_captions: Option<bool>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            sort_order: Some(SortOrder::default()),
            thumbnail_size: default_thumbnail_size(),
            show_captions: default_show_captions(),
        }
    }
}

/// Full-size image prefetch cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Whether neighbor prefetching is enabled.
    #[serde(
        default = "default_cache_enabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<bool>,

    /// Upper bound on cached decoded bytes, in megabytes.
    #[serde(
        default = "default_cache_max_megabytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_megabytes: Option<u64>,

    /// Upper bound on the number of cached images.
    #[serde(
        default = "default_cache_max_entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_entries: Option<usize>,

    /// How many neighbors on each side of the selection to prefetch.
    #[serde(
        default = "default_prefetch_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefetch_count: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_megabytes: default_cache_max_megabytes(),
            max_entries: default_cache_max_entries(),
            prefetch_count: default_prefetch_count(),
        }
    }
}

/// Persisted window geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WindowConfig {
    /// Last window width in logical pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Last window height in logical pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Gallery scan and thumbnail settings.
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Prefetch cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Persisted window geometry.
    #[serde(default)]
    pub window: WindowConfig,
}

// =============================================================================
// Legacy Config (for migration from flat format)
// =============================================================================

/// Legacy flat configuration format.
/// Used for automatic migration of old config files.
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    language: Option<String>,
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    theme_mode: ThemeMode,
    #[serde(default)]
    sort_order: Option<SortOrder>,
    #[serde(default)]
    thumbnail_size: Option<u32>,
    #[serde(default)]
    show_captions: Option<bool>,
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        Config {
            general: GeneralConfig {
                language: legacy.language,
                theme_mode: legacy.theme_mode,
                last_directory: None,
            },
            gallery: GalleryConfig {
                sort_order: legacy.sort_order,
                thumbnail_size: legacy.thumbnail_size,
                show_captions: legacy.show_captions,
            },
            cache: CacheConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_thumbnail_size() -> Option<u32> {
    Some(DEFAULT_THUMBNAIL_SIZE)
}

fn default_show_captions() -> Option<bool> {
    Some(true)
}

fn default_cache_enabled() -> Option<bool> {
    Some(true)
}

fn default_cache_max_megabytes() -> Option<u64> {
    Some(crate::media::prefetch::DEFAULT_CACHE_MAX_MEGABYTES)
}

fn default_cache_max_entries() -> Option<usize> {
    Some(crate::media::prefetch::DEFAULT_CACHE_MAX_ENTRIES)
}

fn default_prefetch_count() -> Option<usize> {
    Some(crate::media::prefetch::DEFAULT_PREFETCH_COUNT)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

/// Clamps a configured thumbnail size into the supported range.
pub fn clamp_thumbnail_size(value: u32) -> u32 {
    value.clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config directory with an optional override.
///
/// Resolution order: explicit override (tests), `ICED_LIGHTBOX_CONFIG_DIR`
/// environment variable, platform config directory with the app name
/// appended.
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional warning key). If loading fails, the
/// default config is returned together with an i18n key explaining that the
/// file could not be read, so startup never aborts on a bad config.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(_) => {
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// Automatically migrates the legacy flat format to the sectioned format.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;

    // Try parsing as the sectioned format first
    if let Ok(config) = toml::from_str::<Config>(&content) {
        // Only accept it when the file actually carries a section table,
        // otherwise an old flat file would deserialize to all-defaults
        if content.contains("[general]")
            || content.contains("[gallery]")
            || content.contains("[cache]")
            || content.contains("[window]")
        {
            return Ok(config);
        }
    }

    // Try parsing as the legacy flat format
    if let Ok(legacy) = toml::from_str::<LegacyConfig>(&content) {
        return Ok(Config::from(legacy));
    }

    // If neither works, parse as sectioned again and let errors propagate
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("ro".to_string()),
                theme_mode: ThemeMode::Light,
                last_directory: Some(PathBuf::from("/photos/kindergarten")),
            },
            gallery: GalleryConfig {
                sort_order: Some(SortOrder::ModifiedDate),
                thumbnail_size: Some(192),
                show_captions: Some(false),
            },
            cache: CacheConfig {
                enabled: Some(true),
                max_megabytes: Some(32),
                max_entries: Some(8),
                prefetch_count: Some(1),
            },
            window: WindowConfig {
                width: Some(1280),
                height: Some(800),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir
            .path()
            .join("deep")
            .join("path")
            .join("settings.toml");

        save_to_path(&Config::default(), &config_path).expect("save should create directories");
        assert!(config_path.exists());
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.general.language, None);
        assert_eq!(config.general.theme_mode, ThemeMode::System);
        assert_eq!(config.gallery.sort_order, Some(SortOrder::Alphabetical));
        assert_eq!(config.gallery.thumbnail_size, Some(DEFAULT_THUMBNAIL_SIZE));
        assert_eq!(config.gallery.show_captions, Some(true));
        assert_eq!(config.cache.enabled, Some(true));
        assert_eq!(config.window.width, None);
    }

    #[test]
    fn legacy_flat_format_migrates_to_sections() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        let legacy_content = r#"
language = "ro"
theme_mode = "dark"
sort_order = "modified-date"
thumbnail_size = 128
"#;
        fs::write(&config_path, legacy_content).expect("failed to write legacy config");

        let loaded = load_from_path(&config_path).expect("failed to load legacy config");

        assert_eq!(loaded.general.language, Some("ro".to_string()));
        assert_eq!(loaded.general.theme_mode, ThemeMode::Dark);
        assert_eq!(loaded.gallery.sort_order, Some(SortOrder::ModifiedDate));
        assert_eq!(loaded.gallery.thumbnail_size, Some(128));
        // Sections absent from the legacy format come back as defaults
        assert_eq!(loaded.cache, CacheConfig::default());
    }

    #[test]
    fn sectioned_format_is_not_mistaken_for_legacy() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        let sectioned = r#"
[general]
language = "en-US"
theme_mode = "light"

[gallery]
sort_order = "created-date"
"#;
        fs::write(&config_path, sectioned).expect("failed to write sectioned config");

        let loaded = load_from_path(&config_path).expect("failed to load sectioned config");
        assert_eq!(loaded.general.language, Some("en-US".to_string()));
        assert_eq!(loaded.general.theme_mode, ThemeMode::Light);
        assert_eq!(loaded.gallery.sort_order, Some(SortOrder::CreatedDate));
    }

    #[test]
    fn theme_mode_deserializes_case_insensitively() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[general]\ntheme_mode = \"DARK\"\n")
            .expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert_eq!(loaded.general.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn invalid_theme_mode_is_rejected() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[general]\ntheme_mode = \"sepia\"\n")
            .expect("failed to write config");

        assert!(load_from_path(&config_path).is_err());
    }

    #[test]
    fn sort_order_uses_kebab_case() {
        let config = Config {
            gallery: GalleryConfig {
                sort_order: Some(SortOrder::ModifiedDate),
                ..GalleryConfig::default()
            },
            ..Config::default()
        };
        let serialized = toml::to_string(&config).expect("failed to serialize config");
        assert!(serialized.contains("modified-date"));
    }

    #[test]
    fn clamp_thumbnail_size_bounds_input() {
        assert_eq!(clamp_thumbnail_size(10), MIN_THUMBNAIL_SIZE);
        assert_eq!(clamp_thumbnail_size(256), 256);
        assert_eq!(clamp_thumbnail_size(4096), MAX_THUMBNAIL_SIZE);
    }

    #[test]
    fn load_with_override_missing_file_returns_defaults_without_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn load_with_override_corrupt_file_returns_defaults_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[general\nbroken").expect("failed to write corrupt config");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning, Some("notification-config-load-error".to_string()));
    }
}
