//! Detail-view resolution: one record by exact name.

use crate::record::CompanyRecord;

/// Outcome of resolving a company name against the directory.
///
/// `Loading` is not an error: it means ingestion has not produced a record
/// set yet, and must be shown differently from `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a CompanyRecord),
    NotFound,
    Loading,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a CompanyRecord> {
        match self {
            Lookup::Found(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Lookup::Loading)
    }
}

/// First record whose name equals `name` exactly (case-sensitive).
///
/// `name` must already be decoded from any URL transport encoding. Duplicate
/// names resolve to the earliest row. An empty name identifies nothing, so
/// unnamed rows are never returned.
pub fn find_by_name<'a>(records: &'a [CompanyRecord], name: &str) -> Option<&'a CompanyRecord> {
    if name.is_empty() {
        return None;
    }
    records.iter().find(|r| r.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, industry: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.into(),
            industry: industry.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_match() {
        let records = vec![named("Acme", "Robotics"), named("Zenith", "NLP")];
        assert_eq!(find_by_name(&records, "Zenith").unwrap().industry, "NLP");
    }

    #[test]
    fn test_case_sensitive() {
        let records = vec![named("Zenith", "NLP"), named("Acme Inc", "Robotics")];
        assert!(find_by_name(&records, "zenith").is_none());
        assert!(find_by_name(&records, "acme inc").is_none());
        assert!(find_by_name(&records, "Acme").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let records = vec![named("Acme", "first"), named("Acme", "second")];
        assert_eq!(find_by_name(&records, "Acme").unwrap().industry, "first");
    }

    #[test]
    fn test_empty_name_never_matches() {
        // Malformed rows keep an empty name; they are not addressable.
        let records = vec![named("Acme", ""), named("", "orphan")];
        assert!(find_by_name(&records, "").is_none());
        assert_eq!(find_by_name(&records, "Acme").unwrap().name, "Acme");
        assert!(find_by_name(&[named("", "orphan")], "").is_none());
    }

    #[test]
    fn test_lookup_accessors() {
        let rec = named("Acme", "");
        assert_eq!(Lookup::Found(&rec).found(), Some(&rec));
        assert_eq!(Lookup::NotFound.found(), None);
        assert!(Lookup::Loading.is_loading());
        assert!(!Lookup::NotFound.is_loading());
    }
}
