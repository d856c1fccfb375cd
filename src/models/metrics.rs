use serde::{Deserialize, Serialize};

/// Request count for one model, keyed by display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub model: String,
    pub count: u64,
}

/// Aggregate usage counters shown on the analytics view.
///
/// `model_usage` keeps insertion order, which decides ties when ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    /// Seconds
    pub average_latency: f64,
    pub tokens_used: u64,
    pub model_usage: Vec<ModelUsage>,
}

impl MetricsSnapshot {
    /// Fixed figures displayed by the demo dashboard
    pub fn demo() -> Self {
        Self {
            total_requests: 1287,
            average_latency: 0.82,
            tokens_used: 458_795,
            model_usage: vec![
                ModelUsage::new("GPT-4o", 532),
                ModelUsage::new("Claude 3", 314),
                ModelUsage::new("Gemini Pro", 243),
                ModelUsage::new("Llama 3", 198),
            ],
        }
    }

    pub fn total_model_usage(&self) -> u64 {
        self.model_usage.iter().map(|u| u.count).sum()
    }

    pub fn usage_of(&self, model: &str) -> Option<u64> {
        self.model_usage
            .iter()
            .find(|u| u.model == model)
            .map(|u| u.count)
    }
}

impl ModelUsage {
    pub fn new(model: &str, count: u64) -> Self {
        Self {
            model: model.to_string(),
            count,
        }
    }
}
