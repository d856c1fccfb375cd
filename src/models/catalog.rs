use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Meta,
    Azure,
    Aws,
    Custom,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Meta => "meta",
            Self::Azure => "azure",
            Self::Aws => "aws",
            Self::Custom => "custom",
        }
    }
}

/// Static metadata for a selectable simulated model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub label: String,
    pub provider: Provider,
    pub description: String,
    pub tags: Vec<String>,
}

impl ModelDescriptor {
    pub fn new(id: &str, label: &str, provider: Provider, description: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            provider,
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}
