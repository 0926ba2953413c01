use std::collections::{BTreeMap, HashMap};

use crate::publication::{ExistingRecord, FetchedPublication, NewPaper};

/// Lowercased title to record identifier.
///
/// NOTE: When two records share a lowercased title the later one wins. Nothing relies on that;
/// it is just what falls out of inserting in file order.
pub fn build_title_index(records: &[ExistingRecord]) -> HashMap<String, String> {
    records
        .iter()
        .map(|r| (r.title.to_lowercase(), r.id.clone()))
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Merge {
    /// Citation counts keyed by existing record identifier.
    pub citations: BTreeMap<String, u64>,
    /// Publications without a matching record, in provider order.
    pub new_papers: Vec<NewPaper>,
}

/// Attach each fetched publication to an existing record by case-insensitive title, or set it
/// aside as a new paper.
pub fn merge(publications: &[FetchedPublication], index: &HashMap<String, String>) -> Merge {
    let mut out = Merge::default();
    for publication in publications {
        match index.get(&publication.title.to_lowercase()) {
            Some(id) => {
                log::debug!("{:?} -> {id}", publication.title);
                out.citations.insert(id.clone(), publication.num_citations);
            }
            None => out.new_papers.push(NewPaper::from(publication)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> ExistingRecord {
        ExistingRecord {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    fn publication(title: &str, num_citations: u64) -> FetchedPublication {
        FetchedPublication {
            title: title.to_string(),
            num_citations,
            ..Default::default()
        }
    }

    #[test]
    fn matches_case_insensitively() {
        let index = build_title_index(&[record("paper-a", "Deep Learning")]);
        let merged = merge(&[publication("DEEP learning", 42)], &index);
        assert_eq!(merged.citations.get("paper-a"), Some(&42));
        assert!(merged.new_papers.is_empty());
    }

    #[test]
    fn unmatched_becomes_new_paper_with_defaults() {
        let index = build_title_index(&[record("paper-a", "Deep Learning")]);
        let merged = merge(&[publication("New Study", 3)], &index);
        assert!(merged.citations.is_empty());
        assert_eq!(
            merged.new_papers,
            vec![NewPaper {
                title: "New Study".to_string(),
                authors: "Unknown".to_string(),
                year: "Unknown".to_string(),
                journal: "Unknown".to_string(),
                citations: 3,
            }]
        );
    }

    #[test]
    fn duplicate_titles_resolve_to_last_record() {
        let index = build_title_index(&[record("first", "Same Title"), record("second", "same title")]);
        assert_eq!(index.get("same title").map(String::as_str), Some("second"));
        let merged = merge(&[publication("Same Title", 7)], &index);
        assert_eq!(merged.citations.keys().collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn every_mapped_id_comes_from_the_records() {
        proptest::proptest!(|(
            titles in proptest::collection::vec("[A-Za-z ]{1,12}", 0..8),
            fetched in proptest::collection::vec(("[A-Za-z ]{1,12}", 0u64..1000), 0..12),
        )| {
            let records: Vec<_> = titles
                .iter()
                .enumerate()
                .map(|(i, t)| record(&format!("r{i}"), t))
                .collect();
            let pubs: Vec<_> = fetched.iter().map(|(t, c)| publication(t, *c)).collect();
            let merged = merge(&pubs, &build_title_index(&records));
            for id in merged.citations.keys() {
                proptest::prop_assert!(records.iter().any(|r| &r.id == id));
            }
            let matched = pubs
                .iter()
                .filter(|p| records.iter().any(|r| r.title.to_lowercase() == p.title.to_lowercase()))
                .count();
            proptest::prop_assert_eq!(matched + merged.new_papers.len(), pubs.len());
        })
    }
}
