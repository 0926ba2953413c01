//! Best-effort text patching of the TypeScript records file.
//!
//! NOTE: None of this parses TypeScript. Records are recovered with a regex that needs the `id`
//! and `title` fields to sit next to each other, in that order, as double-quoted literals. Stubs
//! are spliced in front of the `];` that closes the first `export const papers: Paper[] = [`
//! literal, which has to start at the beginning of a line. Anything formatted differently is
//! skipped without an error, so reformatting `data.ts` (a prettier pass, single quotes, a
//! renamed export) quietly turns this into a no-op.
//!
//! The splice always puts `,\n` after the last element. On an empty array (`[` directly followed
//! by the closing `];` line) that yields `[,` and the first stub lands behind an empty slot, which
//! TypeScript reads as a leading `undefined` element.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::publication::{ExistingRecord, NewPaper};

/// Classification given to every stub.
pub const STUB_TAG: &str = "Research";

/// External link given to every stub until someone fills in the real one.
pub const STUB_LINK: &str = "https://scholar.google.com/scholar?oi=bibs&hl=en&cluster=0";

// Titles may contain backslash escapes, as written by `quote`.
static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"id:\s*"([^"]+)",\s*title:\s*"((?:[^"\\]|\\.)+)""#).unwrap()
});

static ESCAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(.)").unwrap());

// Group 1 runs from the declaration through the last element, up to the line closing the array.
static PAPERS_ARRAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(export const papers: Paper\[\] = \[.*?)\n\];").unwrap());

static NON_SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Recover every adjacent `id`/`title` pair from `content`, in file order.
pub fn extract_records(content: &str) -> Vec<ExistingRecord> {
    RECORD_RE
        .captures_iter(content)
        .map(|caps| ExistingRecord {
            id: caps[1].to_string(),
            title: unquote(&caps[2]),
        })
        .collect()
}

/// Derive a record identifier from a title.
pub fn slugify(title: &str) -> String {
    NON_SLUG_RE
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Whether a record with exactly this identifier already appears in `content`.
pub fn contains_id(content: &str, id: &str) -> bool {
    content.contains(&format!("id: \"{id}\""))
}

// Keep values inside their string literal.
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unquote(value: &str) -> String {
    ESCAPE_RE.replace_all(value, "$1").into_owned()
}

/// Render the array element for a new paper.
pub fn render_stub(slug: &str, paper: &NewPaper) -> String {
    format!(
        r#"    {{
        id: "{slug}",
        title: "{title}",
        authors: "{authors}",
        date: "{date}",
        journal: "{journal}",
        tags: ["{STUB_TAG}"],
        file: "/content/research/todo-{slug}.md",
        link: "{STUB_LINK}"
    }},
"#,
        title = quote(&paper.title),
        authors = quote(&paper.authors),
        date = quote(&paper.year),
        journal = quote(&paper.journal),
    )
}

/// Result of splicing stubs into the records file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Insertion {
    /// The patched file content.
    pub content: String,
    /// Identifiers of the stubs that were actually inserted, in insertion order.
    pub added: Vec<String>,
}

impl Insertion {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Splice a stub for each paper into the `papers` array of `content`.
///
/// A paper is skipped when its slug is empty, when a record with that identifier is already in
/// the (progressively patched) content, or when the array literal cannot be found.
pub fn insert_stubs(content: &str, papers: &[NewPaper]) -> Insertion {
    let mut content = content.to_string();
    let mut added = Vec::new();

    for paper in papers {
        let slug = slugify(&paper.title);
        if slug.is_empty() {
            log::warn!("no identifier can be derived from {:?}; skipping", paper.title);
            continue;
        }
        if contains_id(&content, &slug) {
            log::debug!("record {slug} already present; skipping");
            continue;
        }

        let Some(at) = PAPERS_ARRAY_RE
            .captures(&content)
            .and_then(|caps| caps.get(1))
            .map(|body| body.end())
        else {
            log::warn!("papers array not found; not inserting {slug}");
            continue;
        };

        let block = format!(",\n{}", render_stub(&slug, paper));
        content.insert_str(at, &block);
        log::debug!("inserted stub {slug} ({} citations)", paper.citations);
        added.push(slug);
    }

    Insertion { content, added }
}
