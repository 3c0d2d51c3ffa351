//! Substring search over company records.
//!
//! Search is pure: no state, no mutation of the input, output preserves input
//! order. Matching is a linear scan, which is plenty for directories of a few
//! hundred rows.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::record::{CompanyRecord, Field};

/// Which fields a query is matched against.
///
/// In settings files this is either the string `"all"` or a list of field
/// keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchFields {
    /// Every field of the record.
    #[default]
    All,
    /// An explicit subset, checked in the given order.
    Only(Vec<Field>),
}

impl SearchFields {
    /// The company list page's field set: name, industry, headquarters.
    pub fn list_page() -> Self {
        SearchFields::Only(vec![Field::Name, Field::Industry, Field::Headquarters])
    }

    /// Fields to check, in check order.
    pub fn fields(&self) -> &[Field] {
        match self {
            SearchFields::All => &Field::ALL,
            SearchFields::Only(fields) => fields,
        }
    }

    /// Parse a comma-separated list of field keys, or `all`.
    pub fn parse_list(s: &str) -> Result<Self, crate::record::UnknownField> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SearchFields::All);
        }
        let fields = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Field>, _>>()?;
        Ok(SearchFields::Only(fields))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchFieldsRepr {
    Word(String),
    List(Vec<Field>),
}

impl Serialize for SearchFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchFields::All => serializer.serialize_str("all"),
            SearchFields::Only(fields) => fields.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SearchFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match SearchFieldsRepr::deserialize(deserializer)? {
            SearchFieldsRepr::Word(w) if w.eq_ignore_ascii_case("all") => Ok(SearchFields::All),
            SearchFieldsRepr::Word(w) => Err(de::Error::custom(format!(
                "expected \"all\" or a list of fields, got {:?}",
                w
            ))),
            SearchFieldsRepr::List(fields) => Ok(SearchFields::Only(fields)),
        }
    }
}

/// A prepared query. Lowercases the needle once so each record check only
/// folds the haystack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    needle: String,
}

impl Query {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    /// The empty query matches every record.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &CompanyRecord, fields: &SearchFields) -> bool {
        if self.is_empty() {
            return true;
        }
        fields
            .fields()
            .iter()
            .any(|&f| contains_folded(record.get(f), &self.needle))
    }
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    // Skip the allocation for values that cannot contain the needle.
    if haystack.len() < folded_needle.len() && haystack.is_ascii() {
        return false;
    }
    haystack.to_lowercase().contains(folded_needle)
}

/// Records matching `query` on at least one of `fields`, in input order.
pub fn search<'a>(
    records: &'a [CompanyRecord],
    query: &str,
    fields: &SearchFields,
) -> Vec<&'a CompanyRecord> {
    let query = Query::new(query);
    records
        .iter()
        .filter(|r| query.matches(r, fields))
        .collect()
}
