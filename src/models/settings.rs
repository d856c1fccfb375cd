use serde::{Deserialize, Serialize};

use crate::error::{PlaygroundError, Result};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that provides accurate and concise information.";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);
pub const MAX_TOKENS_RANGE: (u32, u32) = (1, 4000);
pub const TOP_P_RANGE: (f64, f64) = (0.0, 1.0);

/// Editor-local generation settings. Never sent anywhere real.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSettings {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub system_prompt: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: 1.0,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl PromptSettings {
    pub fn validate(&self) -> Result<()> {
        let (t_min, t_max) = TEMPERATURE_RANGE;
        if !(t_min..=t_max).contains(&self.temperature) {
            return Err(PlaygroundError::InvalidSettings(format!(
                "temperature must be between {} and {}",
                t_min, t_max
            )));
        }

        let (m_min, m_max) = MAX_TOKENS_RANGE;
        if !(m_min..=m_max).contains(&self.max_tokens) {
            return Err(PlaygroundError::InvalidSettings(format!(
                "maxTokens must be between {} and {}",
                m_min, m_max
            )));
        }

        let (p_min, p_max) = TOP_P_RANGE;
        if !(p_min..=p_max).contains(&self.top_p) {
            return Err(PlaygroundError::InvalidSettings(format!(
                "topP must be between {} and {}",
                p_min, p_max
            )));
        }

        Ok(())
    }

    /// Parse a max-tokens field as typed into the editor. Anything that is
    /// not a positive integer falls back to the default.
    pub fn parse_max_tokens(input: &str) -> u32 {
        match input.trim().parse::<u32>() {
            Ok(0) | Err(_) => DEFAULT_MAX_TOKENS,
            Ok(n) => n,
        }
    }
}
