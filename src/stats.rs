use std::{collections::BTreeMap, fs, path::Path};

use anyhow::Context;

use crate::publication::{AuthorProfile, ScholarStats};

impl ScholarStats {
    /// Stats for `profile`, stamped with today's local date.
    pub fn new(profile: &AuthorProfile, citations: BTreeMap<String, u64>) -> Self {
        ScholarStats {
            total_citations: profile.cited_by,
            h_index: profile.h_index,
            last_updated: chrono::Local::now().format("%Y-%m-%d").to_string(),
            citations,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialise stats")
    }

    /// Overwrite `path` with the JSON document.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stats() -> ScholarStats {
        ScholarStats {
            total_citations: 120,
            h_index: 5,
            last_updated: "2024-05-01".to_string(),
            citations: BTreeMap::from([("paper-a".to_string(), 42), ("b".to_string(), 1)]),
        }
    }

    #[test]
    fn json_shape() {
        let json = stats().to_json().unwrap();
        assert_eq!(
            json,
            r#"{
  "totalCitations": 120,
  "hIndex": 5,
  "lastUpdated": "2024-05-01",
  "citations": {
    "b": 1,
    "paper-a": 42
  }
}"#
        );
    }

    #[test]
    fn empty_mapping_is_still_an_object() {
        let mut s = stats();
        s.citations.clear();
        let value: serde_json::Value = serde_json::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(value["citations"], serde_json::json!({}));
    }

    #[test]
    fn new_stamps_today() {
        let profile = AuthorProfile {
            cited_by: 9,
            h_index: 2,
            ..Default::default()
        };
        let s = ScholarStats::new(&profile, BTreeMap::new());
        assert_eq!(s.total_citations, 9);
        assert_eq!(s.h_index, 2);
        assert!(chrono::NaiveDate::parse_from_str(&s.last_updated, "%Y-%m-%d").is_ok());
        assert_eq!(s.last_updated.len(), 10);
    }

    #[test]
    fn write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scholar.json");
        fs::write(&path, "stale").unwrap();
        stats().write(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"totalCitations\": 120"));
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn write_reports_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("scholar.json");
        let err = stats().write(&path).unwrap_err();
        assert!(err.to_string().contains("scholar.json"));
    }
}
