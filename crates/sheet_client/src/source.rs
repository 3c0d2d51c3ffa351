//! Sheet sources: where records come from and in which wire format.
//!
//! Both adapters fetch one published tab of a Google Sheet. They differ only
//! in URL shape and payload parser:
//!
//! - CSV export: `{base}/{sheet_id}/export?format=csv&gid={gid}`
//! - Visualization API: `{base}/{sheet_id}/gviz/tq?tqx=out:json&gid={gid}`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use aidir_engine::CompanyRecord;
use aidir_io::{ColumnLabels, ParseError, PayloadFormat};

use crate::client::{FetchError, SheetClient, DEFAULT_TIMEOUT};

pub const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Why an ingestion produced no records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("ingestion cancelled")]
    Cancelled,
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancelled.
    pub fn check(&self) -> Result<(), IngestError> {
        if self.is_cancelled() {
            Err(IngestError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Which spreadsheet and tab to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub sheet_id: String,
    /// Tab id (`gid` query parameter).
    pub gid: String,
}

impl SheetLocation {
    pub fn new(sheet_id: impl Into<String>, gid: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            gid: gid.into(),
        }
    }

    pub fn csv_export_url(&self, base: &str) -> Result<Url, FetchError> {
        self.build_url(base, &["export"], &[("format", "csv"), ("gid", self.gid.as_str())])
    }

    pub fn gviz_url(&self, base: &str) -> Result<Url, FetchError> {
        self.build_url(
            base,
            &["gviz", "tq"],
            &[("tqx", "out:json"), ("gid", self.gid.as_str())],
        )
    }

    fn build_url(&self, base: &str, tail: &[&str], query: &[(&str, &str)]) -> Result<Url, FetchError> {
        if self.sheet_id.trim().is_empty() {
            return Err(FetchError::InvalidUrl("sheet id is empty".into()));
        }

        let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(format!("{}: cannot be a base URL", base)))?;
            segments.pop_if_empty().push(&self.sheet_id).extend(tail);
        }
        url.query_pairs_mut().clear().extend_pairs(query);
        Ok(url)
    }
}

/// How to reach the sheet, beyond its location.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Replaces [`GOOGLE_SHEETS_BASE`] (mirrors, tests).
    pub base_url: Option<String>,
    /// Full URL; bypasses the location entirely.
    pub url: Option<String>,
    pub timeout: Duration,
    pub labels: ColumnLabels,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            url: None,
            timeout: DEFAULT_TIMEOUT,
            labels: ColumnLabels::default(),
        }
    }
}

impl SourceOptions {
    fn base(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GOOGLE_SHEETS_BASE)
    }

    fn explicit_url(&self) -> Result<Option<Url>, FetchError> {
        self.url
            .as_deref()
            .map(|u| Url::parse(u).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", u, e))))
            .transpose()
    }
}

/// Something that yields the directory's records.
pub trait SheetSource: Send + Sync {
    /// Fetch and parse the whole sheet. Checks `cancel` before the request
    /// and again before parsing.
    fn fetch_records(&self, cancel: &CancelToken) -> Result<Vec<CompanyRecord>, IngestError>;

    /// Human-readable origin, for logs and progress lines.
    fn describe(&self) -> String;
}

fn fetch_and_parse(
    client: &SheetClient,
    url: &Url,
    format: PayloadFormat,
    labels: &ColumnLabels,
    cancel: &CancelToken,
) -> Result<Vec<CompanyRecord>, IngestError> {
    cancel.check()?;
    let body = client.get_text(url.as_str())?;
    cancel.check()?;
    let records = aidir_io::parse(format, &body, labels)?;
    log::info!("fetched {} records ({}) from {}", records.len(), format, url);
    Ok(records)
}

/// CSV export adapter. Columns map by position.
#[derive(Debug, Clone)]
pub struct CsvExportSource {
    client: SheetClient,
    url: Url,
}

impl CsvExportSource {
    pub fn new(location: &SheetLocation, options: &SourceOptions) -> Result<Self, FetchError> {
        let url = match options.explicit_url()? {
            Some(url) => url,
            None => location.csv_export_url(options.base())?,
        };
        Ok(Self {
            client: SheetClient::new(options.timeout)?,
            url,
        })
    }
}

impl SheetSource for CsvExportSource {
    fn fetch_records(&self, cancel: &CancelToken) -> Result<Vec<CompanyRecord>, IngestError> {
        fetch_and_parse(&self.client, &self.url, PayloadFormat::Csv, &ColumnLabels::default(), cancel)
    }

    fn describe(&self) -> String {
        format!("CSV export {}", self.url)
    }
}

/// Visualization API adapter. Columns map by header label.
#[derive(Debug, Clone)]
pub struct GvizSource {
    client: SheetClient,
    url: Url,
    labels: ColumnLabels,
}

impl GvizSource {
    pub fn new(location: &SheetLocation, options: &SourceOptions) -> Result<Self, FetchError> {
        let url = match options.explicit_url()? {
            Some(url) => url,
            None => location.gviz_url(options.base())?,
        };
        Ok(Self {
            client: SheetClient::new(options.timeout)?,
            url,
            labels: options.labels.clone(),
        })
    }
}

impl SheetSource for GvizSource {
    fn fetch_records(&self, cancel: &CancelToken) -> Result<Vec<CompanyRecord>, IngestError> {
        fetch_and_parse(&self.client, &self.url, PayloadFormat::Gviz, &self.labels, cancel)
    }

    fn describe(&self) -> String {
        format!("gviz query {}", self.url)
    }
}

/// Build the adapter for `format`.
pub fn source_for(
    format: PayloadFormat,
    location: &SheetLocation,
    options: &SourceOptions,
) -> Result<Box<dyn SheetSource>, FetchError> {
    let source: Box<dyn SheetSource> = match format {
        PayloadFormat::Csv => Box::new(CsvExportSource::new(location, options)?),
        PayloadFormat::Gviz => Box::new(GvizSource::new(location, options)?),
    };
    log::debug!("using {}", source.describe());
    Ok(source)
}
