//! Directory state: the records, the loading flag, and the last error.
//!
//! The caller owns a `Directory` for as long as the view that shows it is
//! alive, and calls [`Directory::unmount`] on teardown. Every fetch is
//! registered with [`Directory::begin_ingest`] and reported back through
//! [`Directory::complete`], so several fetches may overlap:
//!
//! - results apply in the order they arrive (last writer wins)
//! - a failure keeps the last good records and records the error
//! - a cancelled ticket's result is dropped

use chrono::{DateTime, Utc};

use aidir_engine::{find_by_name, search, CompanyRecord, Lookup, SearchFields};

use crate::source::{CancelToken, IngestError, SheetSource};

/// One in-flight fetch.
#[derive(Debug)]
pub struct IngestTicket {
    seq: u64,
    cancel: CancelToken,
}

impl IngestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Pass this to [`SheetSource::fetch_records`].
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

#[derive(Debug, Default)]
pub struct Directory {
    records: Vec<CompanyRecord>,
    error: Option<IngestError>,
    search_fields: SearchFields,
    outstanding: Vec<(u64, CancelToken)>,
    next_seq: u64,
    /// Some fetch has completed, successfully or not.
    settled: bool,
    fetched_at: Option<DateTime<Utc>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_fields(mut self, fields: SearchFields) -> Self {
        self.search_fields = fields;
        self
    }

    pub fn set_search_fields(&mut self, fields: SearchFields) {
        self.search_fields = fields;
    }

    pub fn begin_ingest(&mut self) -> IngestTicket {
        self.next_seq += 1;
        let ticket = IngestTicket {
            seq: self.next_seq,
            cancel: CancelToken::new(),
        };
        self.outstanding.push((ticket.seq, ticket.cancel.clone()));
        log::debug!("ingestion #{} started", ticket.seq);
        ticket
    }

    /// Apply a fetch result. Returns whether it was applied.
    pub fn complete(
        &mut self,
        ticket: IngestTicket,
        result: Result<Vec<CompanyRecord>, IngestError>,
    ) -> bool {
        self.outstanding.retain(|(seq, _)| *seq != ticket.seq);

        if ticket.cancel.is_cancelled() || matches!(result, Err(IngestError::Cancelled)) {
            log::debug!("ingestion #{} cancelled; result dropped", ticket.seq);
            return false;
        }

        match result {
            Ok(records) => {
                log::info!("ingestion #{} loaded {} records", ticket.seq, records.len());
                self.records = records;
                self.error = None;
                self.fetched_at = Some(Utc::now());
            }
            Err(e) => {
                log::warn!(
                    "ingestion #{} failed, keeping {} records: {}",
                    ticket.seq,
                    self.records.len(),
                    e
                );
                self.error = Some(e);
            }
        }
        self.settled = true;
        true
    }

    /// Fetch from `source` and apply the result. On failure the error is
    /// both returned and kept in [`Directory::error`].
    pub fn ingest(&mut self, source: &dyn SheetSource) -> Result<usize, IngestError> {
        let ticket = self.begin_ingest();
        log::debug!("ingesting from {}", source.describe());
        let result = source.fetch_records(ticket.cancel_token());
        let outcome = match &result {
            Ok(records) => Ok(records.len()),
            Err(e) => Err(e.clone()),
        };
        self.complete(ticket, result);
        outcome
    }

    /// Cancel every outstanding fetch. Their results will not be applied.
    pub fn unmount(&mut self) {
        for (seq, cancel) in self.outstanding.drain(..) {
            log::debug!("cancelling ingestion #{}", seq);
            cancel.cancel();
        }
    }

    /// A fetch is in flight and has not been cancelled.
    pub fn is_loading(&self) -> bool {
        self.outstanding.iter().any(|(_, c)| !c.is_cancelled())
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&IngestError> {
        self.error.as_ref()
    }

    /// When records were last replaced by a successful fetch.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Filter with the configured search fields.
    pub fn search(&self, query: &str) -> Vec<&CompanyRecord> {
        search(&self.records, query, &self.search_fields)
    }

    /// `Loading` while a fetch is in flight or before any has completed.
    pub fn find_by_name(&self, name: &str) -> Lookup<'_> {
        if self.is_loading() || !self.settled {
            return Lookup::Loading;
        }
        match find_by_name(&self.records, name) {
            Some(record) => Lookup::Found(record),
            None => Lookup::NotFound,
        }
    }
}
