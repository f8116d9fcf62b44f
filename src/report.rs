//! Plain-text rendering of the dashboard sections.

use std::fmt::Write;

use crate::aggregate::{self, Bin, DescriptiveStats, NumericField, SummaryMetrics};
use crate::record::ProductRecord;
use crate::session::Snapshot;

pub const NO_DATA: &str = "No data. Run a scrape to load products.";

pub fn status_line(snap: &Snapshot) -> String {
    let mut out = format!(
        "Last scraped: {} | Products found: {}",
        snap.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        snap.records.len()
    );
    if snap.skipped > 0 {
        let _ = write!(out, " | Skipped cards: {}", snap.skipped);
    }
    out
}

pub fn metrics(m: &SummaryMetrics) -> String {
    format!(
        "## Key Metrics\n- Total products: {}\n- Average price: {}\n- Average rating: {}\n- Total reviews: {}\n",
        m.count,
        money(m.avg_price),
        m.avg_rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "n/a".into()),
        m.total_reviews
    )
}

pub fn table(rows: &[ProductRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3} | {:<32} | {:>9} | {:>6} | {:>7} | {:<40}",
        "#", "Name", "Price", "Rating", "Reviews", "Description"
    );
    let _ = writeln!(out, "{}", "-".repeat(112));
    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3} | {:<32} | {:>9.2} | {:>6} | {:>7} | {:<40}",
            i + 1,
            truncate(&r.name, 32),
            r.price,
            r.rating,
            r.review_count,
            truncate(&r.description, 40)
        );
    }
    out
}

pub fn rating_distribution(records: &[ProductRecord]) -> String {
    let mut out = String::from("## Rating Distribution\n");
    for (rating, count) in aggregate::rating_distribution(records) {
        let _ = writeln!(out, "- {} stars: {:<4} {}", rating, count, "#".repeat(count));
    }
    out
}

pub fn price_histogram(bins: &[Bin]) -> String {
    let mut out = String::from("## Price Distribution\n");
    for b in bins.iter().filter(|b| b.count > 0) {
        let _ = writeln!(out, "- ${:>8.2} - ${:>8.2}: {}", b.lo, b.hi, b.count);
    }
    out
}

pub fn top_rated(rows: &[ProductRecord]) -> String {
    let mut out = String::from("## Top Rated\n");
    for r in rows {
        let _ = writeln!(
            out,
            "- {} - {} (${:.2}, {} reviews)\n    {}",
            r.rating, r.name, r.price, r.review_count, r.description
        );
    }
    out
}

pub fn price_stats(stats: Option<&DescriptiveStats>) -> String {
    let mut out = String::from("## Price Statistics\n");
    match stats {
        None => out.push_str("- n/a\n"),
        Some(s) => {
            let _ = writeln!(out, "- Minimum: ${:.2}", s.min);
            let _ = writeln!(out, "- Maximum: ${:.2}", s.max);
            let _ = writeln!(out, "- Average: ${:.2}", s.mean);
            let _ = writeln!(out, "- Median: ${:.2}", s.median);
            let _ = writeln!(out, "- Std Dev: {}", money(s.stddev));
        }
    }
    out
}

pub fn most_expensive(rows: &[ProductRecord]) -> String {
    let mut out = String::from("## Most Expensive\n");
    for r in rows {
        let _ = writeln!(out, "- {} | ${:.2} | {}", truncate(&r.name, 32), r.price, r.rating);
    }
    out
}

pub fn best_value(rows: &[(ProductRecord, f64)]) -> String {
    let mut out = String::from("## Best Value (High Rating, Low Price)\n");
    for (r, score) in rows {
        let _ = writeln!(
            out,
            "- {} | ${:.2} | {} | {} reviews | score {:.3}",
            truncate(&r.name, 32),
            r.price,
            r.rating,
            r.review_count,
            score
        );
    }
    out
}

/// All dashboard sections for an already filtered set.
pub fn dashboard(rows: &[ProductRecord], table_rows: &[ProductRecord], top: usize) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_DATA);
    }
    let sections = [
        metrics(&aggregate::summary_metrics(rows)),
        table(table_rows),
        rating_distribution(rows),
        price_histogram(&aggregate::price_histogram(rows, 20)),
        top_rated(&aggregate::top_n_by(rows, NumericField::Rating, top)),
        price_stats(aggregate::descriptive_stats(rows, NumericField::Price).as_ref()),
        most_expensive(&aggregate::top_n_by(rows, NumericField::Price, 5)),
        best_value(&aggregate::best_value(rows, 10)),
    ];
    sections.join("\n")
}

fn money(v: Option<f64>) -> String {
    v.map(|v| format!("${:.2}", v)).unwrap_or_else(|| "n/a".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, price: f64, rating: i64) -> ProductRecord {
        ProductRecord {
            name: name.into(),
            price,
            description: "N/A".into(),
            rating,
            review_count: 3,
        }
    }

    #[test]
    fn empty_renders_no_data() {
        assert_eq!(dashboard(&[], &[], 10).trim_end(), NO_DATA);
    }

    #[test]
    fn metrics_show_undefined_averages() {
        let text = metrics(&aggregate::summary_metrics(&[]));
        assert!(text.contains("Average price: n/a"));
        assert!(text.contains("Average rating: n/a"));
    }

    #[test]
    fn dashboard_has_every_section() {
        let rows = vec![rec("Lenovo", 400.0, 4), rec("HP 250 G6", 0.0, 5)];
        let text = dashboard(&rows, &rows, 10);
        for heading in [
            "## Key Metrics",
            "## Rating Distribution",
            "## Price Distribution",
            "## Top Rated",
            "## Price Statistics",
            "## Most Expensive",
            "## Best Value",
        ] {
            assert!(text.contains(heading), "missing {}", heading);
        }
        assert!(!text.contains("inf"));
    }

    #[test]
    fn long_names_truncated() {
        assert_eq!(truncate("abcdefgh", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
