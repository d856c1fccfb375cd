use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub prompt: u64,
    pub completion: u64,
    pub total: u64,
}

impl TokenCount {
    /// Length-derived token estimate: a quarter of the prompt length for the
    /// prompt and half of it for the completion, both rounded up.
    ///
    /// Length is measured in UTF-16 code units so counts line up with what a
    /// browser front end reports for the same text.
    pub fn estimate(prompt: &str) -> Self {
        let len = prompt.encode_utf16().count() as u64;
        let prompt = len.div_ceil(4);
        let completion = len.div_ceil(2);
        Self {
            prompt,
            completion,
            total: prompt + completion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Elapsed wall-clock seconds
    pub duration: f64,
    pub token_count: TokenCount,
}

/// 생성된 응답 (제출마다 하나, 이후 불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub id: String,
    pub text: String,
    pub model: String,
    /// ISO-8601 timestamp
    pub timestamp: String,
    pub metadata: ResponseMetadata,
}

impl ModelResponse {
    pub fn prompt_tokens(&self) -> u64 {
        self.metadata.token_count.prompt
    }

    pub fn completion_tokens(&self) -> u64 {
        self.metadata.token_count.completion
    }

    pub fn total_tokens(&self) -> u64 {
        self.metadata.token_count.total
    }

    pub fn duration_ms(&self) -> i64 {
        (self.metadata.duration * 1000.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_single_char() {
        let count = TokenCount::estimate("a");
        assert_eq!(count.prompt, 1);
        assert_eq!(count.completion, 1);
        assert_eq!(count.total, 2);
    }

    #[test]
    fn test_estimate_length_divisible_by_four() {
        let count = TokenCount::estimate("abcdefgh");
        assert_eq!(count.prompt, 2);
        assert_eq!(count.completion, 4);
        assert_eq!(count.total, 6);
    }

    #[test]
    fn test_estimate_odd_length() {
        // 25 chars
        let count = TokenCount::estimate("Explain quantum computing");
        assert_eq!(count.prompt, 7);
        assert_eq!(count.completion, 13);
        assert_eq!(count.total, 20);
    }

    #[test]
    fn test_estimate_empty() {
        assert_eq!(TokenCount::estimate("").total, 0);
    }

    #[test]
    fn test_response_serializes_camel_case_metadata() {
        let response = ModelResponse {
            id: "r1".into(),
            text: "hi".into(),
            model: "gpt-4o".into(),
            timestamp: "2024-01-01T00:00:00.000Z".into(),
            metadata: ResponseMetadata {
                duration: 1.25,
                token_count: TokenCount::estimate("hello"),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["metadata"]["tokenCount"]["total"], 5);
        assert_eq!(response.duration_ms(), 1250);
    }
}
