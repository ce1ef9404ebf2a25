//! Fuzzy full-text search over the catalog.
//!
//! [`SearchIndex`] is built once per dataset and never mutated. Queries
//! tolerate typos through approximate substring matching with a fixed
//! threshold; see [`index::MATCH_THRESHOLD`].

pub mod approx;
pub mod index;

pub use index::{
    FieldMatch, SearchField, SearchHit, SearchIndex, SearchOutcome, MATCH_THRESHOLD,
    MIN_QUERY_LEN,
};
