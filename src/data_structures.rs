use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

// --- Research Reports ---

// Hand-authored metadata for a report file, keyed by slug
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportMetaEntry {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

// A report file merged with its optional metadata, ready for display
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportDisplayItem {
    pub slug: String,
    pub title: String,
    pub ticker: String,
    pub date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub highlights: Vec<String>,
}

// --- Models ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelListingEntry {
    pub name: String,
    pub ticker: String,
    pub model_link: String,
    pub report_link: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

// --- Performance Tracker ---

// One observation of cumulative percent returns
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerPoint {
    pub date: String,
    pub sp500: f64,
    pub portfolio: f64,
}

// Chart backing series, replaced whole on every successful fetch
pub type TrackerSeries = Vec<TrackerPoint>;
pub type SharedTracker = Arc<Mutex<TrackerSeries>>;

// --- Site Content ---

// Static content loaded once at startup; every field falls back to the built-in copy
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContent {
    pub site_name: String,
    pub tagline: String,
    pub about: String,
    pub contact_email: String,
    pub reports: Vec<ReportMetaEntry>,
    pub models: Vec<ModelListingEntry>,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            site_name: "Atlantic Walk Research".to_string(),
            tagline: "Independent equity research by Glenn Rentrop".to_string(),
            about: "Atlantic Walk Research is an independent equity research platform focused on deep \
                    fundamental analysis, asymmetric market opportunities, and long-term business modeling. \
                    All work is self-directed and unaffiliated with any financial institution."
                .to_string(),
            contact_email: "glenn@atlanticwalk.com".to_string(),
            reports: vec![
                ReportMetaEntry {
                    slug: "mp-materials".to_string(),
                    title: "MP Materials (NYSE: MP)".to_string(),
                    ticker: "MP".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 15),
                    summary: Some("Published Jan 2024 • Stock up ~100% since".to_string()),
                    highlights: vec![
                        "DCF + comps valuation".to_string(),
                        "Revenue driver model by production stream".to_string(),
                        "Tariff risk + geopolitical catalysts".to_string(),
                    ],
                },
                ReportMetaEntry {
                    slug: "acm-research".to_string(),
                    title: "ACM Research (NASDAQ: ACMR)".to_string(),
                    ticker: "ACMR".to_string(),
                    date: None,
                    summary: Some("Draft under review • Semiconductor capex thematic".to_string()),
                    highlights: vec![
                        "Valuation framework with rNPV scenario matrix".to_string(),
                        "Backlog, class penetration, and ASP assumptions".to_string(),
                        "IR contact + GreenBox JV notes".to_string(),
                    ],
                },
            ],
            models: vec![
                ModelListingEntry {
                    name: "MP Materials".to_string(),
                    ticker: "MP".to_string(),
                    model_link: "/models/mp-materials.xlsx".to_string(),
                    report_link: "/reports/mp-materials.pdf".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 15),
                },
                ModelListingEntry {
                    name: "ACM Research".to_string(),
                    ticker: "ACMR".to_string(),
                    model_link: "/models/acm-research.xlsx".to_string(),
                    report_link: "/reports/acm-research.pdf".to_string(),
                    date: None,
                },
            ],
        }
    }
}
