use crate::data_structures::{ReportDisplayItem, ReportMetaEntry};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub const REPORT_EXTENSION: &str = ".pdf";

/// List report slugs found in `dir`, sorted by slug.
///
/// A missing or unreadable directory yields an empty list.
#[instrument]
pub fn scan_report_dir(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Report directory does not exist");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = ?e, "Failed to read report directory");
            return Vec::new();
        }
    };

    let mut slugs: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| name.strip_suffix(REPORT_EXTENSION).map(str::to_string))
        .filter(|slug| !slug.is_empty())
        .collect();

    slugs.sort();
    debug!(report_count = slugs.len(), "Scanned report directory");
    slugs
}

/// Merge report slugs with their metadata into a date-descending display list.
///
/// Metadata is matched by exact slug and the first entry for a slug wins.
/// Items without a date sort last; ties keep the input order.
pub fn build_catalog<S: AsRef<str>>(slugs: &[S], metadata: &[ReportMetaEntry]) -> Vec<ReportDisplayItem> {
    let mut by_slug: HashMap<&str, &ReportMetaEntry> = HashMap::new();
    for entry in metadata {
        by_slug.entry(entry.slug.as_str()).or_insert(entry);
    }

    let mut seen = HashSet::new();
    let mut items: Vec<ReportDisplayItem> = slugs
        .iter()
        .map(|slug| slug.as_ref())
        .filter(|slug| seen.insert(*slug))
        .map(|slug| match by_slug.get(slug) {
            Some(meta) => ReportDisplayItem {
                slug: slug.to_string(),
                title: meta.title.clone(),
                ticker: meta.ticker.clone(),
                date: meta.date,
                summary: meta.summary.clone(),
                highlights: meta.highlights.clone(),
            },
            None => ReportDisplayItem {
                slug: slug.to_string(),
                title: fallback_title(slug),
                ticker: String::new(),
                date: None,
                summary: None,
                highlights: Vec::new(),
            },
        })
        .collect();

    // None < Some(_), so reversing the comparison puts undated reports last
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

/// Derive a readable title from a slug: `amat-report` becomes `Amat Report`.
pub fn fallback_title(slug: &str) -> String {
    let mut title = String::with_capacity(slug.len());
    let mut word_start = true;

    for c in slug.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if word_start && c.is_alphanumeric() {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        word_start = !c.is_alphanumeric();
    }

    title
}

/// Scan `dir` and build the display catalog from it.
pub fn build_report_catalog(dir: &Path, metadata: &[ReportMetaEntry]) -> Vec<ReportDisplayItem> {
    let slugs = scan_report_dir(dir);
    let items = build_catalog(&slugs, metadata);
    info!(report_count = items.len(), "Built report catalog");
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn meta(slug: &str, title: &str, date: Option<NaiveDate>) -> ReportMetaEntry {
        ReportMetaEntry {
            slug: slug.to_string(),
            title: title.to_string(),
            ticker: "TICK".to_string(),
            date,
            summary: None,
            highlights: Vec::new(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(fallback_title("amat-report"), "Amat Report");
        assert_eq!(fallback_title("q3_2024-update"), "Q3 2024 Update");
        assert_eq!(fallback_title("already Upper"), "Already Upper");
        assert_eq!(fallback_title(""), "");
    }

    #[test]
    fn test_orders_by_date_descending_with_undated_last() {
        let metadata = vec![
            meta("a", "A", ymd(2024, 1, 1)),
            meta("b", "B", None),
            meta("c", "C", ymd(2025, 1, 1)),
        ];
        let items = build_catalog(&["a", "b", "c"], &metadata);

        let dates: Vec<_> = items.iter().map(|i| i.date).collect();
        assert_eq!(dates, vec![ymd(2025, 1, 1), ymd(2024, 1, 1), None]);
    }

    #[test]
    fn test_missing_metadata_falls_back_and_sorts_last() {
        let metadata = vec![meta("mp-materials", "MP Materials", ymd(2024, 1, 15))];
        let items = build_catalog(&["amat-report", "mp-materials"], &metadata);

        assert_eq!(items[0].slug, "mp-materials");
        assert_eq!(items[1].title, "Amat Report");
        assert_eq!(items[1].ticker, "");
        assert_eq!(items[1].date, None);
    }

    #[test]
    fn test_metadata_title_is_used_verbatim() {
        let metadata = vec![meta("amat-report", "Applied Materials: the long view", None)];
        let items = build_catalog(&["amat-report"], &metadata);
        assert_eq!(items[0].title, "Applied Materials: the long view");
    }

    #[test]
    fn test_first_metadata_entry_wins() {
        let metadata = vec![meta("dup", "First", None), meta("dup", "Second", ymd(2025, 6, 1))];
        let items = build_catalog(&["dup"], &metadata);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
        assert_eq!(items[0].date, None);
    }

    #[test]
    fn test_duplicate_slugs_collapse() {
        let items = build_catalog(&["x", "y", "x"], &[]);
        let slugs: Vec<_> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["x", "y"]);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(scan_report_dir(&missing).is_empty());
        assert!(build_report_catalog(&missing, &[]).is_empty());
    }

    #[test]
    fn test_scan_keeps_only_report_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("amat-report.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("mp-materials.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("model.xlsx"), b"").unwrap();
        fs::write(dir.path().join("notes.PDF"), b"").unwrap();
        fs::write(dir.path().join(".pdf"), b"").unwrap();
        fs::create_dir(dir.path().join("archive.pdf")).unwrap();

        let slugs = scan_report_dir(dir.path());
        assert_eq!(slugs, vec!["amat-report".to_string(), "mp-materials".to_string()]);

        let items = build_report_catalog(dir.path(), &[]);
        assert_eq!(items.len(), 2);
    }
}
