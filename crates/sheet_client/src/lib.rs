//! Sheet fetch client and directory state, shared by every front end.
//!
//! This crate owns the wire contract with Google Sheets: URL shapes, the
//! single GET, error classification, and how fetch results land in the
//! [`Directory`].
//!
//! No retries. No background threads of its own. No rendering.

mod client;
mod directory;
mod source;

pub use client::{FetchError, SheetClient, DEFAULT_TIMEOUT, MAX_BODY_BYTES, USER_AGENT};
pub use directory::{Directory, IngestTicket};
pub use source::{
    source_for, CancelToken, CsvExportSource, GvizSource, IngestError, SheetLocation,
    SheetSource, SourceOptions, GOOGLE_SHEETS_BASE,
};
