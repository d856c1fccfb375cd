use crate::models::{ModelDescriptor, Provider};

pub const DEFAULT_MODEL_ID: &str = "gpt-4o";

fn builtin_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new(
            "gpt-4o",
            "GPT-4o",
            Provider::OpenAi,
            "OpenAI's most capable model for text and vision tasks",
            &["multimodal", "premium"],
        ),
        ModelDescriptor::new(
            "claude-3-opus",
            "Claude 3 Opus",
            Provider::Anthropic,
            "Anthropic's most powerful model for complex tasks",
            &["premium"],
        ),
        ModelDescriptor::new(
            "gemini-pro",
            "Gemini Pro",
            Provider::Google,
            "Google's advanced model for generating text, code, and more",
            &["multimodal"],
        ),
        ModelDescriptor::new(
            "llama-3-70b",
            "Llama 3 70B",
            Provider::Meta,
            "Meta's open weights large language model",
            &["open"],
        ),
        ModelDescriptor::new(
            "gpt-4-azure",
            "GPT-4 (Azure)",
            Provider::Azure,
            "Azure's deployment of OpenAI's GPT-4",
            &["enterprise"],
        ),
        ModelDescriptor::new(
            "titan-express",
            "Amazon Titan Express",
            Provider::Aws,
            "AWS's foundation model for text understanding and generation",
            &["enterprise"],
        ),
        ModelDescriptor::new(
            "custom-model",
            "Custom Model",
            Provider::Custom,
            "Your own fine-tuned or self-hosted model",
            &["custom"],
        ),
    ]
}

/// Immutable list of selectable simulated models
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self { models }
    }

    pub fn all(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Display label for a model id, falling back to the id itself
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.find(id).map(|m| m.label.as_str()).unwrap_or(id)
    }

    /// Case-insensitive filter on id, label, provider and tags. A blank query
    /// returns everything.
    pub fn search(&self, query: &str) -> Vec<&ModelDescriptor> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.models.iter().collect();
        }

        self.models
            .iter()
            .filter(|m| {
                m.id.to_lowercase().contains(&query)
                    || m.label.to_lowercase().contains(&query)
                    || m.provider.as_str().contains(&query)
                    || m.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new(builtin_models())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.all().len(), 7);
        assert!(catalog.contains(DEFAULT_MODEL_ID));
        assert_eq!(catalog.find("llama-3-70b").unwrap().provider, Provider::Meta);
        assert_eq!(catalog.find("titan-express").unwrap().tags, vec!["enterprise"]);
    }

    #[test]
    fn test_label_of() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.label_of("gpt-4-azure"), "GPT-4 (Azure)");
        assert_eq!(catalog.label_of("unknown"), "unknown");
    }

    #[test]
    fn test_search_matches_label_provider_and_tags() {
        let catalog = ModelCatalog::default();

        let ids = |q: &str| -> Vec<String> {
            catalog.search(q).iter().map(|m| m.id.clone()).collect()
        };

        assert_eq!(ids("opus"), vec!["claude-3-opus"]);
        assert_eq!(ids("AWS"), vec!["titan-express"]);
        assert_eq!(ids("multimodal"), vec!["gpt-4o", "gemini-pro"]);
        assert_eq!(ids("  ").len(), 7);
        assert!(ids("mistral").is_empty());
    }
}
