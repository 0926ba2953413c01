use std::path::PathBuf;

use crate::source::scholar::DEFAULT_BASE_URL;

pub const DEFAULT_PROFILE_ID: &str = "J4rtU2kAAAAJ";
pub const DEFAULT_STATS_PATH: &str = "src/content/scholar.json";
pub const DEFAULT_RECORDS_PATH: &str = "src/content/data.ts";

/// Everything a sync run needs to know, fixed at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub scholar_profile_id: String,
    pub stats_output_path: PathBuf,
    pub records_file_path: PathBuf,
    pub scholar_base_url: String,
    /// Fetch and merge, but leave both files untouched.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scholar_profile_id: DEFAULT_PROFILE_ID.to_string(),
            stats_output_path: PathBuf::from(DEFAULT_STATS_PATH),
            records_file_path: PathBuf::from(DEFAULT_RECORDS_PATH),
            scholar_base_url: DEFAULT_BASE_URL.to_string(),
            dry_run: false,
        }
    }
}
