use rand::Rng;
use serde::Serialize;

use crate::models::{MetricsSnapshot, ModelUsage};
use crate::playground::ModelCatalog;
use crate::storage::UsageSummary;

/// One row of the ranked usage breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRow {
    pub model: String,
    pub count: u64,
    /// Exact share of total usage, 0..=100
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopModel {
    pub model: String,
    pub count: u64,
    /// Share of total usage rounded to a whole percent
    pub percentage: u64,
}

/// Share of total usage for `model`. Zero when the model is absent or
/// nothing has been used.
pub fn percentage(snapshot: &MetricsSnapshot, model: &str) -> f64 {
    let total = snapshot.total_model_usage();
    match snapshot.usage_of(model) {
        Some(count) if total > 0 => share(count, total),
        _ => 0.0,
    }
}

fn share(count: u64, total: u64) -> f64 {
    count as f64 / total as f64 * 100.0
}

/// Most used model. Ties go to the entry listed first; an empty or all-zero
/// usage map has no top model.
pub fn top_model(snapshot: &MetricsSnapshot) -> Option<TopModel> {
    let total = snapshot.total_model_usage();
    let mut best: Option<&ModelUsage> = None;
    for usage in &snapshot.model_usage {
        if usage.count > best.map_or(0, |b| b.count) {
            best = Some(usage);
        }
    }

    best.map(|usage| TopModel {
        model: usage.model.clone(),
        count: usage.count,
        percentage: share(usage.count, total).round() as u64,
    })
}

/// Usage rows by descending count. Equal counts keep their original order.
pub fn ranked_usage(snapshot: &MetricsSnapshot) -> Vec<UsageRow> {
    let total = snapshot.total_model_usage();
    let mut rows: Vec<UsageRow> = snapshot
        .model_usage
        .iter()
        .map(|u| UsageRow {
            model: u.model.clone(),
            count: u.count,
            percentage: if total > 0 { share(u.count, total) } else { 0.0 },
        })
        .collect();

    // sort_by is stable
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Decorative week-over-week changes shown under each counter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDeltas {
    pub requests: u32,
    pub latency_secs: f64,
    pub tokens_percent: f64,
}

impl WeeklyDeltas {
    pub fn draw<R: Rng>(rng: &mut R) -> Self {
        Self {
            requests: rng.gen_range(0..100),
            latency_secs: rng.gen_range(0.0..0.5),
            tokens_percent: rng.gen_range(0.0..10.0),
        }
    }
}

/// Everything the analytics view renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub snapshot: MetricsSnapshot,
    pub total_requests_display: String,
    pub average_latency_display: String,
    pub tokens_used_display: String,
    pub top_model: Option<TopModel>,
    pub usage: Vec<UsageRow>,
    pub deltas: WeeklyDeltas,
}

impl MetricsReport {
    pub fn build<R: Rng>(snapshot: MetricsSnapshot, rng: &mut R) -> Self {
        Self {
            total_requests_display: format_count(snapshot.total_requests),
            average_latency_display: format!("{:.2}s", snapshot.average_latency),
            tokens_used_display: format!("{:.1}k", snapshot.tokens_used as f64 / 1000.0),
            top_model: top_model(&snapshot),
            usage: ranked_usage(&snapshot),
            deltas: WeeklyDeltas::draw(rng),
            snapshot,
        }
    }
}

/// `1287` -> `"1,287"`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Build a snapshot from recorded usage, keyed by catalog label
pub fn snapshot_from_usage(summary: &UsageSummary, catalog: &ModelCatalog) -> MetricsSnapshot {
    MetricsSnapshot {
        total_requests: summary.total_requests.max(0) as u64,
        average_latency: summary.average_duration_ms / 1000.0,
        tokens_used: summary.tokens_used.max(0) as u64,
        model_usage: summary
            .by_model
            .iter()
            .map(|(id, count)| ModelUsage::new(catalog.label_of(id), (*count).max(0) as u64))
            .collect(),
    }
}
