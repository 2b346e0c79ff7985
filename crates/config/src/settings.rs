// User settings
// Loaded from ~/.config/polaudit/settings.json

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Language of exported sheet names and column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(format!("unknown locale '{other}' (expected 'en' or 'es')")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::En => "en",
            Locale::Es => "es",
        })
    }
}

pub const DEFAULT_FILENAME_PREFIX: &str = "commission_audit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Export
    #[serde(rename = "export.locale")]
    pub locale: Locale,

    #[serde(rename = "export.filenamePrefix")]
    pub filename_prefix: String,

    // Fields
    #[serde(rename = "fields.profile")]
    pub field_profile: Option<PathBuf>,  // None = built-in tables
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            field_profile: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("polaudit");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults.
    /// Writes a commented default file on first use.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            Self::create_default_file(&path);
            return Self::default();
        }

        Self::load_from(&path)
    }

    /// Load settings from a specific file. Missing or invalid files give defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("error parsing {}: {e}; using default settings", path.display());
                Self::default()
            }),
            Err(e) => {
                warn!("error reading {}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    /// Prefix for exported workbooks; blank falls back to the default
    pub fn effective_prefix(&self) -> &str {
        let prefix = self.filename_prefix.trim();
        if prefix.is_empty() {
            DEFAULT_FILENAME_PREFIX
        } else {
            prefix
        }
    }

    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("error creating config directory: {e}");
                return;
            }
        }

        let default_config = r#"{
    // Export: sheet and column language ("en" or "es")
    "export.locale": "en",

    // Export: workbook name is <prefix>_<YYYY-MM-DD>.xlsx
    "export.filenamePrefix": "commission_audit",

    // Fields: TOML profile with header synonyms and payment-type aliases
    // null = built-in tables
    "fields.profile": null
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            warn!("error writing default settings.json: {e}");
        }
    }
}
