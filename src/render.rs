//! Server-side HTML for every page of the site.
//!
//! Everything here is a pure function from data to markup so pages can be
//! asserted on directly in tests.

use crate::data_structures::{ModelListingEntry, ReportDisplayItem, SiteContent, TrackerPoint};
use crate::view::View;
use chrono::NaiveDate;
use std::fmt::Write;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 360.0;
const SP500_COLOR: &str = "#8884d8";
const PORTFOLIO_COLOR: &str = "#82ca9d";

/// Wrap a rendered section in the shared page shell with navigation and footer.
///
/// `refresh_secs` asks the browser to reload the page, used while tracker data is loading.
pub fn page(site: &SiteContent, current: View, body: &str, refresh_secs: Option<u32>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">{refresh}
    <title>{title} | {site_name}</title>
    <style>{css}</style>
</head>
<body>
    {nav}
    <main>
{body}
    </main>
    <footer>
        <p>&copy; 2025 {site_name}. Independent research only. Not investment advice.</p>
    </footer>
</body>
</html>"#,
        title = current.label(),
        site_name = html_escape(&site.site_name),
        css = inline_css(),
        nav = render_nav(current),
        refresh = refresh_secs
            .map(|secs| format!("\n    <meta http-equiv=\"refresh\" content=\"{secs}\">"))
            .unwrap_or_default(),
    )
}

fn inline_css() -> &'static str {
    r#"
body { font-family: system-ui, sans-serif; color: #111827; margin: 0; padding: 2rem; }
nav { display: flex; gap: 1.5rem; margin-bottom: 3rem; }
nav form { margin: 0; }
nav button { background: none; border: none; color: #1d4ed8; font-size: 1.1rem; cursor: pointer; padding: 0; }
nav button:hover, a:hover { text-decoration: underline; }
nav button.active { font-weight: 700; }
a { color: #2563eb; text-decoration: none; }
.grid { display: grid; gap: 2rem; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); }
article { border: 1px solid #e5e7eb; border-radius: 1rem; padding: 1.5rem; }
table { border-collapse: collapse; }
th, td { text-align: left; padding: 0.5rem 1rem; border-bottom: 1px solid #e5e7eb; }
.muted { color: #6b7280; }
.center { text-align: center; }
footer { margin-top: 4rem; padding-top: 1rem; border-top: 1px solid #e5e7eb; font-size: 0.875rem; color: #6b7280; }
"#
}

fn render_nav(current: View) -> String {
    let mut nav = String::from("<nav>");
    for view in View::ALL {
        let class = if view == current { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            r#"<form method="post" action="/view/{name}"><button type="submit"{class}>{label}</button></form>"#,
            name = view.as_str(),
            label = view.label(),
        );
    }
    nav.push_str("</nav>");
    nav
}

pub fn home(site: &SiteContent) -> String {
    format!(
        r#"<section class="center">
    <h2>Welcome to {name}</h2>
    <p class="muted">{tagline}</p>
</section>"#,
        name = html_escape(&site.site_name),
        tagline = html_escape(&site.tagline),
    )
}

pub fn research(items: &[ReportDisplayItem], models: &[ModelListingEntry]) -> String {
    if items.is_empty() {
        return r#"<section><h2>Research</h2><p class="muted">No reports found.</p></section>"#.to_string();
    }

    let mut out = String::from("<section>\n<h2>Research</h2>\n<div class=\"grid\">\n");
    for item in items {
        out.push_str("<article>\n");
        let _ = writeln!(out, "<h3>{}</h3>", html_escape(&item.title));

        let mut byline = Vec::new();
        if !item.ticker.is_empty() {
            byline.push(html_escape(&item.ticker));
        }
        byline.push(format_date(item.date));
        let _ = writeln!(out, "<p class=\"muted\">{}</p>", byline.join(" • "));

        if let Some(summary) = &item.summary {
            let _ = writeln!(out, "<p>{}</p>", html_escape(summary));
        }
        if !item.highlights.is_empty() {
            out.push_str("<ul>\n");
            for highlight in &item.highlights {
                let _ = writeln!(out, "<li>{}</li>", html_escape(highlight));
            }
            out.push_str("</ul>\n");
        }
        let report_link = format!("/reports/{}.pdf", item.slug);
        out.push_str("<p class=\"links\">");
        let _ = write!(out, r#"<a href="{}">View writeup (PDF)</a>"#, html_escape(&report_link));
        if let Some(model) = models.iter().find(|m| m.report_link == report_link) {
            let _ = write!(
                out,
                r#" <a href="{}">Download model (XLSX)</a>"#,
                html_escape(&model.model_link)
            );
        }
        out.push_str("</p>\n");
        out.push_str("</article>\n");
    }
    out.push_str("</div>\n</section>");
    out
}

pub fn models(entries: &[ModelListingEntry]) -> String {
    if entries.is_empty() {
        return r#"<section><h2>Models</h2><p class="muted">No models published yet.</p></section>"#.to_string();
    }

    let mut out = String::from(
        "<section>\n<h2>Models</h2>\n<table>\n<tr><th>Company</th><th>Ticker</th><th>Date</th><th>Model</th><th>Report</th></tr>\n",
    );
    for entry in entries {
        let _ = writeln!(
            out,
            r#"<tr><td>{name}</td><td>{ticker}</td><td>{date}</td><td><a href="{model}">Download model (XLSX)</a></td><td><a href="{report}">View writeup</a></td></tr>"#,
            name = html_escape(&entry.name),
            ticker = html_escape(&entry.ticker),
            date = format_date(entry.date),
            model = html_escape(&entry.model_link),
            report = html_escape(&entry.report_link),
        );
    }
    out.push_str("</table>\n</section>");
    out
}

pub fn performance(points: &[TrackerPoint]) -> String {
    format!(
        "<section>\n<h2>Performance</h2>\n<p class=\"muted\">Cumulative return of the research portfolio against the S&amp;P 500.</p>\n{}\n</section>",
        tracker_chart(points)
    )
}

pub fn about(site: &SiteContent) -> String {
    format!(
        "<section>\n<h2>About {}</h2>\n<p>{}</p>\n</section>",
        html_escape(&site.site_name),
        html_escape(&site.about),
    )
}

pub fn contact(site: &SiteContent) -> String {
    let email = html_escape(&site.contact_email);
    format!(
        "<section>\n<h2>Contact</h2>\n<p>Reach out via email: <a href=\"mailto:{email}\">{email}</a></p>\n</section>"
    )
}

/// Line chart of both return series with a zero baseline, as inline SVG.
pub fn tracker_chart(points: &[TrackerPoint]) -> String {
    if points.is_empty() {
        return r#"<p class="muted">No performance data available yet.</p>"#.to_string();
    }

    let left = 56.0;
    let right = 24.0;
    let top = 16.0;
    let bottom = 40.0;
    let plot_w = CHART_WIDTH - left - right;
    let plot_h = CHART_HEIGHT - top - bottom;

    // y-range always includes the zero baseline
    let (mut lo, mut hi) = points
        .iter()
        .flat_map(|p| [p.sp500, p.portfolio])
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * 0.05;
    lo -= pad;
    hi += pad;

    let x_at = |i: usize| {
        if points.len() == 1 {
            left + plot_w / 2.0
        } else {
            left + plot_w * i as f64 / (points.len() - 1) as f64
        }
    };
    let y_at = |v: f64| top + plot_h * (hi - v) / (hi - lo);

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="Performance tracker">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );

    // Axes and y ticks
    let _ = writeln!(
        out,
        r##"<line x1="{left}" y1="{top}" x2="{left}" y2="{y2}" stroke="#9ca3af"/>"##,
        y2 = top + plot_h
    );
    for step in 0..=4 {
        let value = lo + (hi - lo) * step as f64 / 4.0;
        let _ = writeln!(
            out,
            r##"<text x="{x}" y="{y:.1}" font-size="11" text-anchor="end" fill="#6b7280">{value:.1}%</text>"##,
            x = left - 6.0,
            y = y_at(value) + 4.0,
        );
    }

    let zero_y = y_at(0.0);
    let _ = writeln!(
        out,
        r##"<line class="baseline" x1="{left}" y1="{zero_y:.1}" x2="{x2}" y2="{zero_y:.1}" stroke="#374151" stroke-dasharray="4 4"/>"##,
        x2 = left + plot_w
    );

    for (class, color, series) in [
        ("sp500", SP500_COLOR, points.iter().map(|p| p.sp500).collect::<Vec<_>>()),
        ("portfolio", PORTFOLIO_COLOR, points.iter().map(|p| p.portfolio).collect::<Vec<_>>()),
    ] {
        let coords: Vec<String> = series
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
            .collect();
        let _ = writeln!(
            out,
            r#"<polyline class="{class}" fill="none" stroke="{color}" stroke-width="2" points="{}"/>"#,
            coords.join(" ")
        );
    }

    // Date labels at both ends of the axis
    let first = &points[0];
    let last = &points[points.len() - 1];
    let _ = writeln!(
        out,
        r##"<text x="{left}" y="{y}" font-size="11" fill="#6b7280">{}</text>"##,
        html_escape(&first.date),
        y = CHART_HEIGHT - 12.0
    );
    if points.len() > 1 {
        let _ = writeln!(
            out,
            r##"<text x="{x}" y="{y}" font-size="11" text-anchor="end" fill="#6b7280">{}</text>"##,
            html_escape(&last.date),
            x = left + plot_w,
            y = CHART_HEIGHT - 12.0
        );
    }

    // Legend
    let _ = writeln!(
        out,
        r#"<text x="{x}" y="{y}" font-size="12" fill="{SP500_COLOR}">S&amp;P 500</text><text x="{x2}" y="{y}" font-size="12" fill="{PORTFOLIO_COLOR}">Portfolio</text>"#,
        x = left + 8.0,
        x2 = left + 88.0,
        y = top + 12.0
    );

    out.push_str("</svg>");
    out
}

fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "Undated".to_string(),
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, sp500: f64, portfolio: f64) -> TrackerPoint {
        TrackerPoint {
            date: date.to_string(),
            sp500,
            portfolio,
        }
    }

    #[test]
    fn test_empty_research_shows_none_found() {
        assert!(research(&[], &[]).contains("No reports found."));
    }

    #[test]
    fn test_research_escapes_and_formats() {
        let items = vec![ReportDisplayItem {
            slug: "amat-report".to_string(),
            title: "AMAT <draft>".to_string(),
            ticker: "AMAT".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5),
            summary: None,
            highlights: vec!["Backlog & margins".to_string()],
        }];
        let html = research(&items, &[]);

        assert!(html.contains("AMAT &lt;draft&gt;"));
        assert!(html.contains("AMAT • Mar 5, 2024"));
        assert!(html.contains("<li>Backlog &amp; margins</li>"));
        assert!(html.contains(r#"href="/reports/amat-report.pdf""#));
        assert!(!html.contains("Download model"));
    }

    #[test]
    fn test_research_links_matching_model() {
        let site = SiteContent::default();
        let items = vec![ReportDisplayItem {
            slug: "mp-materials".to_string(),
            title: "MP Materials".to_string(),
            ticker: "MP".to_string(),
            date: None,
            summary: None,
            highlights: Vec::new(),
        }];
        let html = research(&items, &site.models);

        assert!(html.contains(r#"<a href="/reports/mp-materials.pdf">View writeup (PDF)</a>"#));
        assert!(html.contains(r#"<a href="/models/mp-materials.xlsx">Download model (XLSX)</a>"#));
    }

    #[test]
    fn test_chart_has_baseline_and_both_series() {
        let svg = tracker_chart(&[point("2024-01-02", 0.0, 0.0), point("2024-06-28", 8.5, -3.0)]);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"class="baseline""#));
        assert!(svg.contains(r#"<polyline class="sp500""#));
        assert!(svg.contains(r#"<polyline class="portfolio""#));
        assert!(svg.contains("2024-01-02"));
        assert!(svg.contains("2024-06-28"));
    }

    #[test]
    fn test_chart_plots_points_as_received() {
        let svg = tracker_chart(&[point("d1", 1.0, 2.0), point("d2", 3.0, 4.0), point("d3", 5.0, 6.0)]);
        let sp500_line = svg.lines().find(|l| l.contains(r#"class="sp500""#)).unwrap();
        let points_attr = sp500_line.split("points=\"").nth(1).unwrap();
        assert_eq!(points_attr.trim_end_matches("\"/>").split(' ').count(), 3);
    }

    #[test]
    fn test_empty_chart_renders_placeholder() {
        let html = tracker_chart(&[]);
        assert!(!html.contains("<svg"));
        assert!(html.contains("No performance data"));
    }

    #[test]
    fn test_page_marks_current_view() {
        let site = SiteContent::default();
        let html = page(&site, View::Models, &models(&site.models), None);

        assert!(html.contains(r#"action="/view/models"><button type="submit" class="active">Models"#));
        assert!(html.contains("<title>Models | Atlantic Walk Research</title>"));
        assert!(html.contains("Download model (XLSX)"));
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn test_page_refresh_hint() {
        let site = SiteContent::default();
        let html = page(&site, View::Performance, &performance(&[]), Some(2));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="2">"#));
    }
}
