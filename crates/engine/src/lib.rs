//! Company directory engine: records, search, lookup, and view models.
//!
//! Everything here is pure and synchronous. Fetching and parsing live in
//! `aidir-io` and `aidir-sheet-client`.

pub mod detail;
pub mod lookup;
pub mod record;
pub mod search;

pub use detail::{display_website, or_na, Card, DetailView};
pub use lookup::{find_by_name, Lookup};
pub use record::{CompanyRecord, Field, UnknownField};
pub use search::{search, Query, SearchFields};
