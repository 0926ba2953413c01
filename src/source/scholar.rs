use std::time::Duration;

use anyhow::{Context, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{
    publication::{AuthorProfile, FetchedPublication},
    source::ProfileSource,
};

pub const DEFAULT_BASE_URL: &str = "https://scholar.google.com";

/// Rows per profile page; Scholar caps `pagesize` at 100.
const PAGE_SIZE: usize = 100;
const MAX_PAGES: usize = 50;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.10 Safari/605.1.1";

macro_rules! selector {
    ($name:ident, $css:literal) => {
        static $name: Lazy<Selector> = Lazy::new(|| Selector::parse($css).unwrap());
    };
}

selector!(NAME, "#gsc_prf_in");
selector!(INDEX_CELL, "td.gsc_rsb_std");
selector!(ROW, "tr.gsc_a_tr");
selector!(TITLE, "a.gsc_a_at");
selector!(GRAY, "div.gs_gray");
selector!(CITED_BY, "a.gsc_a_ac");
selector!(YEAR, "span.gsc_a_h");

/// Google Scholar author profile, scraped from the public `citations` pages.
pub struct ScholarClient {
    base: Url,
    agent: ureq::Agent,
}

impl ScholarClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid base URL {base}"))?;
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(5)))
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        Ok(ScholarClient {
            base,
            agent: ureq::Agent::new_with_config(cfg),
        })
    }

    fn page_url(&self, profile_id: &str, cstart: usize) -> anyhow::Result<Url> {
        let mut url = self.base.join("citations")?;
        url.query_pairs_mut()
            .append_pair("hl", "en")
            .append_pair("user", profile_id)
            .append_pair("cstart", &cstart.to_string())
            .append_pair("pagesize", &PAGE_SIZE.to_string());
        Ok(url)
    }

    fn get(&self, url: &Url) -> anyhow::Result<String> {
        log::debug!("GET {url}");
        self.agent
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en")
            .call()
            .with_context(|| format!("failed request for URL {url}"))?
            .body_mut()
            .read_to_string()
            .context("read body")
    }
}

impl ProfileSource for ScholarClient {
    fn fetch(&self, profile_id: &str) -> anyhow::Result<AuthorProfile> {
        fetch_pages(profile_id, |cstart| {
            self.get(&self.page_url(profile_id, cstart)?)
        })
    }
}

/// Walk the profile pages, `get_page(cstart)` returning the HTML of the page starting at row
/// `cstart`. Stops at the first page with fewer than [`PAGE_SIZE`] rows or after [`MAX_PAGES`].
pub fn fetch_pages(
    profile_id: &str,
    mut get_page: impl FnMut(usize) -> anyhow::Result<String>,
) -> anyhow::Result<AuthorProfile> {
    let mut profile = AuthorProfile::default();

    for page in 0..MAX_PAGES {
        let body = get_page(page * PAGE_SIZE)?;
        let html = Html::parse_document(&body);
        if page == 0 {
            parse_header(&html, &mut profile)
                .with_context(|| format!("unexpected profile page for {profile_id}"))?;
        }
        let rows = parse_publications(&html);
        let n = rows.len();
        log::debug!("page {page}: {n} publications");
        profile.publications.extend(rows);
        if n < PAGE_SIZE {
            return Ok(profile);
        }
    }

    log::warn!(
        "stopped after {MAX_PAGES} pages; {} publications fetched",
        profile.publications.len()
    );
    Ok(profile)
}

/// Fill in the author name and the citation indices from the first profile page.
///
/// A page without the profile name is what Scholar serves for unknown profiles and for
/// captcha interstitials, so it is an error rather than an empty profile.
pub fn parse_header(html: &Html, profile: &mut AuthorProfile) -> anyhow::Result<()> {
    let Some(name) = html.select(&NAME).next().map(text_of) else {
        bail!("no author name found (unknown profile or blocked request)");
    };
    profile.name = Some(name).filter(|n| !n.is_empty());

    // All-time and recent columns for citations, h-index and i10-index, in that order.
    let cells: Vec<u64> = html
        .select(&INDEX_CELL)
        .map(|td| parse_count(&text_of(td)))
        .collect();
    let all_time = |row: usize| cells.get(row * 2).copied().unwrap_or(0);
    profile.cited_by = all_time(0);
    profile.h_index = all_time(1);
    profile.i10_index = all_time(2);
    Ok(())
}

/// Publication rows of one profile page. Rows without a title are dropped.
pub fn parse_publications(html: &Html) -> Vec<FetchedPublication> {
    html.select(&ROW).filter_map(parse_row).collect()
}

fn parse_row(row: ElementRef<'_>) -> Option<FetchedPublication> {
    let title = row.select(&TITLE).next().map(text_of)?;
    if title.is_empty() {
        return None;
    }
    let mut gray = row.select(&GRAY).map(text_of);
    let author = gray.next().filter(|s| !s.is_empty());
    let venue = gray
        .next()
        .map(|s| strip_trailing_year(&s))
        .filter(|s| !s.is_empty());
    let num_citations = row
        .select(&CITED_BY)
        .next()
        .map(|a| parse_count(&text_of(a)))
        .unwrap_or(0);
    let pub_year = row
        .select(&YEAR)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty());

    Some(FetchedPublication {
        title,
        num_citations,
        author,
        pub_year,
        venue,
    })
}

// Venue lines carry the year as a trailing ", 2022".
fn strip_trailing_year(s: &str) -> String {
    static TRAILING_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\d{4}$").unwrap());
    TRAILING_YEAR_RE.replace(s, "").trim().to_string()
}

// Counts may carry decorations such as "42*" for merged entries.
fn parse_count(s: &str) -> u64 {
    s.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
