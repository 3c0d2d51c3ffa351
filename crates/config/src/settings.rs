// Settings file: where the directory sheet lives and how to read it

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use aidir_engine::{Field, SearchFields};
use aidir_io::{ColumnLabels, PayloadFormat};

/// The published AI company directory sheet.
pub const DEFAULT_SHEET_ID: &str = "1098MT3Wgfzia7dKjxAyr7jxgH5PpdAt3AOaoII2J9xw";
pub const DEFAULT_GID: &str = "794818920";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {message}", path.display())]
    Toml { path: PathBuf, message: String },

    #[error("invalid JSON in {}: {message}", path.display())]
    Json { path: PathBuf, message: String },

    #[error("invalid setting {key}: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub sheet_id: String,
    /// Accepts `gid = 794818920` as well as `gid = "794818920"`.
    #[serde(deserialize_with = "string_or_number")]
    pub gid: String,
    pub format: PayloadFormat,
    /// Replaces `https://docs.google.com/spreadsheets/d`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            gid: DEFAULT_GID.to_string(),
            format: PayloadFormat::default(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// `"all"` or a list of field keys.
    pub fields: SearchFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sheet: SheetSettings,
    pub search: SearchSettings,
    pub http: HttpSettings,
    /// Header label overrides for the gviz format, keyed by field.
    pub columns: BTreeMap<Field, String>,
}

impl Settings {
    /// `<config dir>/aidir/settings.toml`
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aidir");
        config_dir.join("settings.toml")
    }

    /// Load the default settings file. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no settings file at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicit settings file. `.json` files are JSON with `//`
    /// comment lines; anything else is TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let settings = if is_json {
            Self::from_json_str(&contents).map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            Self::from_toml_str(&contents).map_err(|e| ConfigError::Toml {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        settings.validate()?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        // Strip comments (lines starting with //)
        let cleaned: String = s
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet.sheet_id.trim().is_empty() {
            return Err(invalid("sheet.sheet_id", "must not be empty"));
        }
        if self.sheet.gid.trim().is_empty() {
            return Err(invalid("sheet.gid", "must not be empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs", "must be at least 1"));
        }
        if let SearchFields::Only(fields) = &self.search.fields {
            if fields.is_empty() {
                return Err(invalid("search.fields", "list must not be empty (use \"all\")"));
            }
        }
        for (field, label) in &self.columns {
            if label.is_empty() {
                return Err(invalid(&format!("columns.{}", field.key()), "label must not be empty"));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn column_labels(&self) -> ColumnLabels {
        ColumnLabels::from_overrides(self.columns.clone())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a non-negative integer")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            if v < 0 {
                return Err(E::custom("gid must not be negative"));
            }
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(Visitor)
}
