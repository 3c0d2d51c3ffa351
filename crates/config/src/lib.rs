// Configuration loading

pub mod settings;

pub use settings::{
    ConfigError, HttpSettings, SearchSettings, Settings, SheetSettings, DEFAULT_GID,
    DEFAULT_SHEET_ID, DEFAULT_TIMEOUT_SECS,
};
