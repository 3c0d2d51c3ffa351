//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3       | Universal        | Settings file unreadable or invalid      |
//! | 4       | Universal        | Local I/O (writing output)               |
//! | 50-59   | ingest           | Fetching or parsing the sheet            |
//! | 60-69   | query            | Lookup and search outcomes               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use aidir_io::ParseError;
use aidir_sheet_client::{FetchError, IngestError};

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Settings file cannot be read, parsed, or holds an invalid value.
/// Also an unusable sheet URL or base URL.
pub const EXIT_CONFIG: u8 = 3;

/// Cannot write output (`--out` path, stdout closed).
pub const EXIT_IO: u8 = 4;

// =============================================================================
// Ingest (50-59)
// =============================================================================

/// Transport failure: DNS, connection refused, timeout, unreadable or
/// oversized body.
pub const EXIT_FETCH_TRANSPORT: u8 = 50;

/// Sheet endpoint answered with a non-2xx status.
pub const EXIT_FETCH_STATUS: u8 = 51;

/// Payload arrived but did not have the expected shape (HTML sign-in page,
/// broken gviz envelope, upstream query error).
pub const EXIT_PARSE: u8 = 52;

// =============================================================================
// Query (60-69)
// =============================================================================

/// `show`: no company has exactly that name.
pub const EXIT_NOT_FOUND: u8 = 60;

/// `search`: the query matched nothing.
pub const EXIT_NO_RESULTS: u8 = 61;

/// Map an ingestion failure to its exit code.
pub fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::Fetch(FetchError::Status { .. }) => EXIT_FETCH_STATUS,
        IngestError::Fetch(FetchError::InvalidUrl(_)) => EXIT_CONFIG,
        IngestError::Fetch(_) => EXIT_FETCH_TRANSPORT,
        IngestError::Parse(_) => EXIT_PARSE,
        IngestError::Cancelled => EXIT_ERROR,
    }
}

/// What to tell the user to try next. Fetch and parse failures are
/// transient often enough that every one of them offers a retry.
pub fn ingest_hint(err: &IngestError) -> Option<String> {
    let hint = match err {
        IngestError::Fetch(FetchError::Status { status: 401 | 403, .. })
        | IngestError::Parse(ParseError::Html(_)) => {
            "the sheet must be shared as \"anyone with the link can view\"; fix sharing, then retry"
        }
        IngestError::Fetch(FetchError::Status { status: 404, .. }) => {
            "check --sheet-id and --gid, then retry"
        }
        IngestError::Fetch(FetchError::InvalidUrl(_)) => {
            "check --url, [sheet] base_url and sheet_id in the settings file"
        }
        IngestError::Fetch(FetchError::Timeout(_)) => "retry, or raise --timeout",
        IngestError::Parse(ParseError::WrongFormat { .. }) => {
            "check --format against what the URL serves, then retry"
        }
        IngestError::Parse(ParseError::Envelope(_) | ParseError::Json(_)) => {
            "retry; if it persists, try --format csv"
        }
        IngestError::Fetch(_) | IngestError::Parse(_) => "retry the command; add -v for request details",
        IngestError::Cancelled => return None,
    };
    Some(hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidir_io::PayloadFormat;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_CONFIG,
            EXIT_IO,
            EXIT_FETCH_TRANSPORT,
            EXIT_FETCH_STATUS,
            EXIT_PARSE,
            EXIT_NOT_FOUND,
            EXIT_NO_RESULTS,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn test_ingest_exit_codes() {
        let status = IngestError::Fetch(FetchError::Status { status: 500, url: "u".into() });
        assert_eq!(ingest_exit_code(&status), EXIT_FETCH_STATUS);
        assert_eq!(
            ingest_exit_code(&IngestError::Fetch(FetchError::Network("refused".into()))),
            EXIT_FETCH_TRANSPORT
        );
        assert_eq!(
            ingest_exit_code(&IngestError::Fetch(FetchError::TooLarge { limit: 1 })),
            EXIT_FETCH_TRANSPORT
        );
        assert_eq!(
            ingest_exit_code(&IngestError::Parse(ParseError::Upstream("x".into()))),
            EXIT_PARSE
        );
        assert_eq!(
            ingest_exit_code(&IngestError::Fetch(FetchError::InvalidUrl("x".into()))),
            EXIT_CONFIG
        );
    }

    #[test]
    fn test_every_fetch_or_parse_failure_has_a_hint() {
        let errors = [
            IngestError::Fetch(FetchError::Network("refused".into())),
            IngestError::Fetch(FetchError::Status { status: 403, url: "u".into() }),
            IngestError::Fetch(FetchError::Status { status: 404, url: "u".into() }),
            IngestError::Fetch(FetchError::Status { status: 502, url: "u".into() }),
            IngestError::Fetch(FetchError::Timeout("slow".into())),
            IngestError::Parse(ParseError::Html(PayloadFormat::Csv)),
            IngestError::Parse(ParseError::Json("x".into())),
            IngestError::Parse(ParseError::Empty(PayloadFormat::Gviz)),
            IngestError::Parse(ParseError::WrongFormat {
                expected: PayloadFormat::Csv,
                found: "JSON".into(),
            }),
        ];
        for err in &errors {
            let hint = ingest_hint(err).unwrap_or_default();
            assert!(hint.contains("retry"), "{:?} -> {:?}", err, hint);
        }
        assert_eq!(ingest_hint(&IngestError::Cancelled), None);
    }
}
