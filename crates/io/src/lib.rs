// Sheet payload parsing
//
// Two wire formats carry the same sheet: the CSV export and the
// Visualization API's JSON. Both normalize to `CompanyRecord`s in row order.

pub mod csv;
pub mod gviz;
pub mod labels;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use aidir_engine::CompanyRecord;

pub use labels::ColumnLabels;

/// Which response shape the sheet endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// `export?format=csv`: positional columns, header row discarded.
    Csv,
    /// `gviz/tq?tqx=out:json`: labeled columns inside a JS envelope.
    #[default]
    Gviz,
}

impl PayloadFormat {
    pub fn name(self) -> &'static str {
        match self {
            PayloadFormat::Csv => "csv",
            PayloadFormat::Gviz => "gviz",
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PayloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(PayloadFormat::Csv),
            "gviz" | "json" => Ok(PayloadFormat::Gviz),
            other => Err(format!("unknown payload format '{}' (expected csv or gviz)", other)),
        }
    }
}

/// The payload did not have the shape its format promises.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty {0} payload")]
    Empty(PayloadFormat),

    /// Private or missing sheets answer with an HTML sign-in page.
    #[error("expected {0} payload but got an HTML page (is the sheet shared publicly?)")]
    Html(PayloadFormat),

    /// The body is some other format, e.g. a gviz response fetched as CSV.
    #[error("expected {expected} payload but got {found}")]
    WrongFormat {
        expected: PayloadFormat,
        found: String,
    },

    #[error("malformed gviz envelope: {0}")]
    Envelope(String),

    #[error("invalid gviz JSON: {0}")]
    Json(String),

    /// The Visualization API answered with `"status":"error"`.
    #[error("sheet query failed: {0}")]
    Upstream(String),
}

/// Parse a payload of the given format into records.
pub fn parse(
    format: PayloadFormat,
    text: &str,
    labels: &ColumnLabels,
) -> Result<Vec<CompanyRecord>, ParseError> {
    match format {
        PayloadFormat::Csv => csv::parse_records(text),
        PayloadFormat::Gviz => gviz::parse_records(text, labels),
    }
}

/// Shared precheck: reject blank bodies and HTML pages before format-specific
/// parsing. Strips a UTF-8 BOM.
fn precheck(text: &str, format: PayloadFormat) -> Result<&str, ParseError> {
    let text = text.trim_start_matches('\u{feff}');
    let head = text.trim_start();
    if head.is_empty() {
        return Err(ParseError::Empty(format));
    }
    if head.starts_with('<') {
        return Err(ParseError::Html(format));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<PayloadFormat>().unwrap(), PayloadFormat::Csv);
        assert_eq!("GVIZ".parse::<PayloadFormat>().unwrap(), PayloadFormat::Gviz);
        assert_eq!("json".parse::<PayloadFormat>().unwrap(), PayloadFormat::Gviz);
        assert!("xlsx".parse::<PayloadFormat>().is_err());
    }

    #[test]
    fn test_precheck() {
        assert_eq!(precheck("  \n", PayloadFormat::Csv), Err(ParseError::Empty(PayloadFormat::Csv)));
        assert_eq!(
            precheck("\n<!DOCTYPE html><html>", PayloadFormat::Gviz),
            Err(ParseError::Html(PayloadFormat::Gviz))
        );
        assert_eq!(precheck("\u{feff}a,b", PayloadFormat::Csv), Ok("a,b"));
    }

    #[test]
    fn test_parse_dispatches_on_format() {
        let csv = "Company Name,Website\nAcme,https://acme.ai\n";
        let records = parse(PayloadFormat::Csv, csv, &ColumnLabels::default()).unwrap();
        assert_eq!(records[0].name, "Acme");

        let err = parse(PayloadFormat::Gviz, csv, &ColumnLabels::default()).unwrap_err();
        assert!(matches!(err, ParseError::Envelope(_)), "{:?}", err);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::Html(PayloadFormat::Csv).to_string(),
            "expected csv payload but got an HTML page (is the sheet shared publicly?)"
        );
        assert_eq!(ParseError::Empty(PayloadFormat::Gviz).to_string(), "empty gviz payload");
    }
}
