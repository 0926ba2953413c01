use std::{fs, time::Duration};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::{
    config::Config,
    merge::{build_title_index, merge},
    publication::{AuthorProfile, ScholarStats},
    records::{extract_records, insert_stubs},
    source::ProfileSource,
};

/// How a run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The profile could not be fetched; nothing was written.
    FetchFailed,
    Synced(Summary),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records whose citation count was refreshed.
    pub matched: usize,
    /// Fetched publications without a matching record.
    pub new_papers: usize,
    /// Identifiers of the stubs inserted into the records file.
    pub added: Vec<String>,
}

fn fetch_with_spinner(
    source: &dyn ProfileSource,
    profile_id: &str,
) -> anyhow::Result<anyhow::Result<AuthorProfile>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("fetching {profile_id}"));
    spinner.enable_steady_tick(Duration::from_millis(120));
    let res = source.fetch(profile_id);
    spinner.finish_and_clear();
    Ok(res)
}

/// Fetch the profile, refresh the stats file and add stubs for unknown publications.
///
/// A failed fetch is reported and returns [`Outcome::FetchFailed`] before either file is read or
/// written. File system errors after that point are returned as errors.
pub fn run(config: &Config, source: &dyn ProfileSource) -> anyhow::Result<Outcome> {
    println!(
        "Fetching data for Scholar ID: {}...",
        config.scholar_profile_id
    );

    let profile = match fetch_with_spinner(source, &config.scholar_profile_id)? {
        Ok(profile) => profile,
        Err(e) => {
            log::error!("fetch failed for {}: {e:#}", config.scholar_profile_id);
            println!("{} Error fetching data: {e:#}", "✗".red());
            return Ok(Outcome::FetchFailed);
        }
    };

    if let Some(name) = &profile.name {
        println!("Author: {}", name.bold());
    }
    println!("Total Citations: {}", profile.cited_by);
    println!("H-Index: {}", profile.h_index);
    log::info!(
        "i10-index {}, {} publications",
        profile.i10_index,
        profile.publications.len()
    );

    let records_path = &config.records_file_path;
    let content = fs::read_to_string(records_path)
        .with_context(|| format!("failed to read {}", records_path.display()))?;

    let records = extract_records(&content);
    log::info!("{} existing records in {}", records.len(), records_path.display());
    let merged = merge(&profile.publications, &build_title_index(&records));

    let mut summary = Summary {
        matched: merged.citations.len(),
        new_papers: merged.new_papers.len(),
        added: Vec::new(),
    };

    let stats = ScholarStats::new(&profile, merged.citations);
    let stats_path = &config.stats_output_path;
    if config.dry_run {
        println!("Would write {}:\n{}", stats_path.display(), stats.to_json()?);
    } else {
        stats.write(stats_path)?;
        println!("{} Updated {}", "✓".green(), stats_path.display());
    }

    if merged.new_papers.is_empty() {
        return Ok(Outcome::Synced(summary));
    }
    println!(
        "Found {} potentially new papers!",
        merged.new_papers.len()
    );

    let insertion = insert_stubs(&content, &merged.new_papers);
    if insertion.changed() {
        if config.dry_run {
            for id in &insertion.added {
                println!("Would add stub {id}");
            }
        } else {
            fs::write(records_path, &insertion.content)
                .with_context(|| format!("failed to write {}", records_path.display()))?;
            println!(
                "{} Added {} new paper stubs to {}",
                "✓".green(),
                insertion.added.len(),
                records_path.display()
            );
        }
    }
    summary.added = insertion.added;

    Ok(Outcome::Synced(summary))
}
