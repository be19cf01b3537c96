use chrono::{DateTime, Utc};
use console::style;

use common::LeaderboardEntry;

pub fn heading(text: &str) {
    println!("{}", style(text).bold().underlined());
}

pub fn success(text: &str) {
    println!("{} {text}", style("✓").green().bold());
}

pub fn empty(text: &str) {
    println!("  {}", style(text).dim());
}

pub fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn optional(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

/// Orders leaderboard rows by best score, earliest timestamp first on ties.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.best_score
            .cmp(&a.best_score)
            .then_with(|| match (a.best_score_timestamp, b.best_score_timestamp) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
    });
    entries
}
