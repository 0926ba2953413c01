use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{Config, DEFAULT_PROFILE_ID, DEFAULT_RECORDS_PATH, DEFAULT_STATS_PATH},
    source::scholar::DEFAULT_BASE_URL,
};

/// Sync Google Scholar citation counts into the site's content files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Google Scholar profile identifier (may start with `-`)
    #[arg(
        long = "profile",
        value_name = "ID",
        default_value = DEFAULT_PROFILE_ID,
        allow_hyphen_values = true
    )]
    pub profile_id: String,

    /// JSON statistics file, overwritten on every run
    #[arg(long = "stats", value_name = "PATH", default_value = DEFAULT_STATS_PATH)]
    pub stats_path: PathBuf,

    /// TypeScript file holding the `papers` array
    #[arg(long = "records", value_name = "PATH", default_value = DEFAULT_RECORDS_PATH)]
    pub records_path: PathBuf,

    /// Scholar host or mirror to fetch the profile from
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log level (error, warn, info, debug)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Report what would change without writing either file
    #[arg(long)]
    pub dry_run: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            scholar_profile_id: cli.profile_id,
            stats_output_path: cli.stats_path,
            records_file_path: cli.records_path,
            scholar_base_url: cli.base_url,
            dry_run: cli.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_gives_the_defaults() {
        let cli = Cli::try_parse_from(["scholar-sync"]).expect("parse");
        assert_eq!(cli.log_level, "warn");
        assert_eq!(Config::from(cli), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "scholar-sync",
            "--profile",
            "abc123",
            "--stats",
            "/tmp/s.json",
            "--records",
            "/tmp/data.ts",
            "--dry-run",
        ])
        .expect("parse");
        let config = Config::from(cli);
        assert_eq!(config.scholar_profile_id, "abc123");
        assert_eq!(config.stats_output_path, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.records_file_path, PathBuf::from("/tmp/data.ts"));
        assert!(config.dry_run);
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["scholar-sync", "extra"]).is_err());
    }

    #[test]
    fn profile_id_may_start_with_a_hyphen() {
        let cli = Cli::try_parse_from(["scholar-sync", "--profile", "-Xk3AbCdEfGH", "--dry-run"])
            .expect("parse");
        let config = Config::from(cli);
        assert_eq!(config.scholar_profile_id, "-Xk3AbCdEfGH");
        assert!(config.dry_run);
    }

    #[test]
    fn any_profile_id_is_accepted() {
        proptest::proptest!(|(id in "[A-Za-z0-9_-]{1,16}")| {
            let cli = Cli::try_parse_from(["scholar-sync", "--profile", id.as_str()]).expect("parse");
            proptest::prop_assert_eq!(Config::from(cli).scholar_profile_id, id);
        })
    }
}
