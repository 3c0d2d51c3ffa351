//! Settings resolution and sheet ingestion shared by every command.
//!
//! Precedence: command-line flags, then `AIDIR_*` environment variables
//! (via clap), then the settings file, then built-in defaults.

use std::path::PathBuf;

use chrono::SecondsFormat;
use clap::{Args, ValueEnum};

use aidir_config::Settings;
use aidir_engine::SearchFields;
use aidir_io::PayloadFormat;
use aidir_sheet_client::{source_for, Directory, SheetLocation, SourceOptions};

use crate::exit_codes::{ingest_exit_code, ingest_hint, EXIT_CONFIG};
use crate::CliError;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// CSV export, columns by position
    Csv,
    /// Visualization API JSON, columns by header label
    Gviz,
}

impl From<FormatArg> for PayloadFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => PayloadFormat::Csv,
            FormatArg::Gviz => PayloadFormat::Gviz,
        }
    }
}

/// Where the directory comes from. Accepted by every command.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Settings file (default: <config dir>/aidir/settings.toml)
    #[arg(long, global = true, env = "AIDIR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Spreadsheet id
    #[arg(long, global = true, env = "AIDIR_SHEET_ID")]
    pub sheet_id: Option<String>,

    /// Tab id
    #[arg(long, global = true, env = "AIDIR_GID")]
    pub gid: Option<String>,

    /// Payload format
    #[arg(long, global = true, value_enum)]
    pub format: Option<FormatArg>,

    /// Fetch this URL instead of building one from the sheet id and gid
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl SourceArgs {
    /// Settings file plus flag overrides.
    pub fn settings(&self) -> Result<Settings, CliError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        }
        .map_err(CliError::config)?;

        if let Some(id) = &self.sheet_id {
            settings.sheet.sheet_id = id.clone();
        }
        if let Some(gid) = &self.gid {
            settings.sheet.gid = gid.clone();
        }
        if let Some(format) = self.format {
            settings.sheet.format = format.into();
        }
        if let Some(secs) = self.timeout {
            settings.http.timeout_secs = secs;
        }

        settings.validate().map_err(CliError::config)?;
        Ok(settings)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Settings::config_path)
    }
}

/// Fetch the sheet once into a fresh directory.
///
/// A failed fetch is an error here: a one-shot command has no
/// last-known-good records to fall back on.
pub fn load_directory(
    settings: &Settings,
    url: Option<&str>,
    fields: SearchFields,
    quiet: bool,
) -> Result<Directory, CliError> {
    let location = SheetLocation::new(&settings.sheet.sheet_id, &settings.sheet.gid);
    let options = SourceOptions {
        base_url: settings.sheet.base_url.clone(),
        url: url.map(str::to_string),
        timeout: settings.timeout(),
        labels: settings.column_labels(),
    };

    let source = source_for(settings.sheet.format, &location, &options).map_err(|e| CliError {
        code: EXIT_CONFIG,
        message: e.to_string(),
        hint: Some("check --url, [sheet] base_url and sheet_id in the settings file".to_string()),
    })?;

    if !quiet {
        eprintln!("Fetching {}", source.describe());
    }

    let mut directory = Directory::new().with_search_fields(fields);
    let count = directory.ingest(source.as_ref()).map_err(|e| CliError {
        code: ingest_exit_code(&e),
        message: e.to_string(),
        hint: ingest_hint(&e),
    })?;

    if !quiet {
        let at = directory
            .fetched_at()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        eprintln!("Loaded {} companies at {}", count, at);
    }

    Ok(directory)
}
