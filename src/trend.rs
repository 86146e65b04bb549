//! Trend scoring, the fixed-band summary, and the monthly upload histogram.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::DateParseError;
use crate::models::VideoRecord;

/// Parse an upload date: flexible ISO-8601 datetime first, then strict
/// `YYYY-MM-DD`. Failure is a typed, per-record error, never a silent
/// default.
pub fn parse_upload_date(raw: &str) -> Result<NaiveDate, DateParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DateParseError::new(raw))
}

/// Composite 0-100 trend score over the cover corpus, rounded to one decimal.
///
/// Per record: `recency = max(0, 1 - min(days_ago/365, 1))`, linear decay to
/// zero at one year. Score blends average recency (0.4), log total views
/// (0.4), and capped cover volume (0.2). Records whose upload date is missing
/// or unparsable are skipped with a warning. Empty input is exactly 0, never
/// routed through the formula.
pub fn calculate_trend_score(videos: &[VideoRecord], today: NaiveDate) -> f64 {
    if videos.is_empty() {
        return 0.0;
    }

    let mut recency_scores: Vec<f64> = Vec::with_capacity(videos.len());
    let mut total_views: u64 = 0;

    for v in videos {
        let Some(raw) = v.upload_date.as_deref() else {
            warn!("Trend scoring skipped record with no upload date - title={:?}", v.title);
            continue;
        };
        let upload = match parse_upload_date(raw) {
            Ok(d) => d,
            Err(e) => {
                warn!("Trend scoring skipped record - {}, title={:?}", e, v.title);
                continue;
            }
        };

        let days_ago = (today - upload).num_days().max(0) as f64;
        let recency = (1.0 - (days_ago / 365.0).min(1.0)).max(0.0);
        recency_scores.push(recency);
        total_views += v.views;
    }

    if recency_scores.is_empty() {
        return 0.0;
    }

    let avg_recency = recency_scores.iter().sum::<f64>() / recency_scores.len() as f64;
    let num_covers = recency_scores.len();

    let score = avg_recency * 0.4
        + (1.0 + total_views as f64).ln() / 15.0 * 0.4
        + (num_covers.min(50) as f64) / 50.0 * 0.2;

    (score * 1000.0).round() / 10.0
}

/// Convenience wrapper anchored at the current date.
pub fn trend_score_now(videos: &[VideoRecord]) -> f64 {
    calculate_trend_score(videos, Utc::now().date_naive())
}

/// Fixed-band natural-language summary; thresholds evaluated high to low,
/// first satisfied wins.
pub fn generate_trend_summary(score: f64) -> &'static str {
    if score >= 80.0 {
        "🔥 This song is highly trending — frequent new covers with strong engagement recently."
    } else if score >= 60.0 {
        "📈 This song is moderately trending — cover activity and engagement are above average."
    } else if score >= 40.0 {
        "⚖️ This song shows steady interest — consistent covers, but not rising sharply."
    } else if score >= 20.0 {
        "📉 This song is losing traction — fewer new covers and lower engagement recently."
    } else {
        "🧊 This song has low current activity — few new covers or views recently."
    }
}

/// Two parallel sequences: sorted distinct `YYYY-MM` keys and upload counts
/// per key. Lexicographic order is chronological for zero-padded keys.
/// Records with missing or unparsable dates are skipped.
pub fn monthly_upload_data(videos: &[VideoRecord]) -> (Vec<String>, Vec<usize>) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for v in videos {
        let Some(raw) = v.upload_date.as_deref() else {
            continue;
        };
        match parse_upload_date(raw) {
            Ok(d) => {
                *counts.entry(d.format("%Y-%m").to_string()).or_insert(0) += 1;
            }
            Err(e) => {
                warn!("Monthly aggregation skipped record - {}, title={:?}", e, v.title);
            }
        }
    }

    let months: Vec<String> = counts.keys().cloned().collect();
    let upload_counts: Vec<usize> = counts.values().copied().collect();
    (months, upload_counts)
}

/// The top N most-viewed covers, descending.
pub fn top_covers(videos: &[VideoRecord], top_n: usize) -> Vec<VideoRecord> {
    videos
        .iter()
        .cloned()
        .sorted_by(|a, b| b.views.cmp(&a.views))
        .take(top_n)
        .collect()
}
