use chrono::SecondsFormat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::templates::{RECOMMENDATION, RESPONSE_RULES};
use crate::models::{ModelResponse, ResponseMetadata, TokenCount};

pub const DEFAULT_MIN_LATENCY: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_LATENCY: Duration = Duration::from_millis(2500);

/// Source of simulated response latency
pub trait LatencySource: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Uniformly random latency in `[min, max]`
pub struct RandomLatency {
    rng: Mutex<StdRng>,
    min: Duration,
    max: Duration,
}

impl RandomLatency {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), min, max)
    }

    pub fn seeded(seed: u64, min: Duration, max: Duration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), min, max)
    }

    fn with_rng(rng: StdRng, min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            rng: Mutex::new(rng),
            min,
            max,
        }
    }
}

impl Default for RandomLatency {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LATENCY, DEFAULT_MAX_LATENCY)
    }
}

impl LatencySource for RandomLatency {
    fn next_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

/// Constant latency
#[derive(Debug, Clone, Copy)]
pub struct FixedLatency(pub Duration);

impl LatencySource for FixedLatency {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

struct ResponseRule {
    pattern: Regex,
    template: &'static str,
}

/// Synthesizes canned responses after a simulated delay
pub struct MockResponseGenerator {
    rules: Vec<ResponseRule>,
    latency: Arc<dyn LatencySource>,
}

impl MockResponseGenerator {
    pub fn new(latency: Arc<dyn LatencySource>) -> Self {
        let rules = RESPONSE_RULES
            .iter()
            .filter_map(|(keywords, template)| {
                let alternation = keywords
                    .iter()
                    .map(|k| regex::escape(k))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!("(?i){}", alternation))
                    .ok()
                    .map(|pattern| ResponseRule {
                        pattern,
                        template: *template,
                    })
            })
            .collect();

        Self { rules, latency }
    }

    /// Pick the response text for a prompt
    pub fn select_text(&self, prompt: &str) -> &'static str {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(prompt))
            .map(|rule| rule.template)
            .unwrap_or(RECOMMENDATION)
    }

    /// Produce a response for `prompt`. Callers reject empty prompts first.
    pub async fn generate(&self, prompt: &str, model_id: &str) -> ModelResponse {
        let started = tokio::time::Instant::now();
        let delay = self.latency.next_delay();

        tracing::debug!("Generating mock response: model={} delay={:?}", model_id, delay);
        tokio::time::sleep(delay).await;

        let token_count = TokenCount::estimate(prompt);
        let text = self.select_text(prompt);

        ModelResponse {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            model: model_id.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            metadata: ResponseMetadata {
                duration: started.elapsed().as_secs_f64(),
                token_count,
            },
        }
    }
}

impl Default for MockResponseGenerator {
    fn default() -> Self {
        Self::new(Arc::new(RandomLatency::default()))
    }
}
