use std::collections::BTreeMap;

use serde::Serialize;

/// Placeholder used when the provider leaves a bibliographic field out.
pub const UNKNOWN: &str = "Unknown";

/// An author profile as returned by a [`ProfileSource`](crate::source::ProfileSource).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthorProfile {
    pub name: Option<String>,
    pub cited_by: u64,
    pub h_index: u64,
    pub i10_index: u64,
    pub publications: Vec<FetchedPublication>,
}

/// A single row of the provider's publication list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchedPublication {
    pub title: String,
    pub num_citations: u64,
    pub author: Option<String>,
    pub pub_year: Option<String>,
    pub venue: Option<String>,
}

/// An `(id, title)` pair recovered from the records file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistingRecord {
    pub id: String,
    pub title: String,
}

/// A fetched publication with no counterpart in the records file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPaper {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub journal: String,
    pub citations: u64,
}

impl From<&FetchedPublication> for NewPaper {
    fn from(p: &FetchedPublication) -> Self {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        NewPaper {
            title: p.title.clone(),
            authors: or_unknown(&p.author),
            year: or_unknown(&p.pub_year),
            journal: or_unknown(&p.venue),
            citations: p.num_citations,
        }
    }
}

/// The statistics document written to `scholar.json`.
///
/// Field order is the serialized key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarStats {
    pub total_citations: u64,
    pub h_index: u64,
    pub last_updated: String,
    pub citations: BTreeMap<String, u64>,
}
