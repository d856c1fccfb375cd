use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::catalog::{ModelCatalog, DEFAULT_MODEL_ID};
use super::generator::MockResponseGenerator;
use crate::error::{PlaygroundError, Result};
use crate::models::{ModelDescriptor, ModelResponse, PromptSettings};
use crate::notify::NotifierRegistry;

#[derive(Debug, Clone)]
struct WorkspaceState {
    selected_model: String,
    settings: PromptSettings,
    last_response: Option<ModelResponse>,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            selected_model: DEFAULT_MODEL_ID.to_string(),
            settings: PromptSettings::default(),
            last_response: None,
        }
    }
}

/// Resets the in-flight flag when a submission ends, including on cancel
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Dashboard view state: model selection, editor settings and the single
/// most recent response. At most one submission runs at a time.
pub struct Playground {
    catalog: ModelCatalog,
    generator: MockResponseGenerator,
    notifier: NotifierRegistry,
    state: RwLock<WorkspaceState>,
    in_flight: AtomicBool,
}

impl Playground {
    pub fn new(catalog: ModelCatalog, generator: MockResponseGenerator, notifier: NotifierRegistry) -> Self {
        Self {
            catalog,
            generator,
            notifier,
            state: RwLock::new(WorkspaceState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn selected_model(&self) -> String {
        self.state.read().await.selected_model.clone()
    }

    pub async fn select_model(&self, model_id: &str) -> Result<ModelDescriptor> {
        let descriptor = self
            .catalog
            .find(model_id)
            .cloned()
            .ok_or_else(|| PlaygroundError::UnknownModel(model_id.to_string()))?;

        self.state.write().await.selected_model = descriptor.id.clone();
        tracing::info!("Model selected: {}", descriptor.id);
        Ok(descriptor)
    }

    pub async fn settings(&self) -> PromptSettings {
        self.state.read().await.settings.clone()
    }

    pub async fn update_settings(&self, settings: PromptSettings) -> Result<PromptSettings> {
        settings.validate()?;
        self.state.write().await.settings = settings.clone();
        Ok(settings)
    }

    pub async fn last_response(&self) -> Option<ModelResponse> {
        self.state.read().await.last_response.clone()
    }

    pub async fn clear_response(&self) {
        self.state.write().await.last_response = None;
    }

    /// Drop all view state, as when the dashboard is left on logout
    pub async fn reset(&self) {
        *self.state.write().await = WorkspaceState::default();
    }

    /// Generate a response for the selected model, replacing the previous one.
    pub async fn submit(&self, prompt: &str) -> Result<ModelResponse> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(PlaygroundError::EmptyPrompt);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PlaygroundError::GenerationInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let model = self.selected_model().await;
        let response = self.generator.generate(prompt, &model).await;

        self.state.write().await.last_response = Some(response.clone());
        self.notifier.success("Response generated successfully!").await;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use crate::playground::generator::FixedLatency;
    use crate::playground::templates::{COMPARISON, EXPLANATION};
    use std::sync::Arc;
    use std::time::Duration;

    async fn playground(delay: Duration) -> (Arc<Playground>, Arc<RecordingNotifier>) {
        let registry = NotifierRegistry::new();
        let recorder = Arc::new(RecordingNotifier::default());
        registry.register(recorder.clone()).await;
        let generator = MockResponseGenerator::new(Arc::new(FixedLatency(delay)));
        let playground = Playground::new(ModelCatalog::default(), generator, registry);
        (Arc::new(playground), recorder)
    }

    #[tokio::test]
    async fn test_defaults() {
        let (playground, _) = playground(Duration::ZERO).await;
        assert_eq!(playground.selected_model().await, "gpt-4o");
        assert_eq!(playground.settings().await, PromptSettings::default());
        assert!(playground.last_response().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let (playground, recorder) = playground(Duration::ZERO).await;
        assert!(matches!(playground.submit("").await, Err(PlaygroundError::EmptyPrompt)));
        assert!(matches!(playground.submit(" \n\t ").await, Err(PlaygroundError::EmptyPrompt)));
        assert!(!playground.is_generating());
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test]
    async fn test_submit_replaces_last_response() {
        let (playground, recorder) = playground(Duration::ZERO).await;

        let first = playground.submit("Explain attention").await.unwrap();
        assert_eq!(first.text, EXPLANATION);

        playground.select_model("gemini-pro").await.unwrap();
        let second = playground.submit("compare them").await.unwrap();
        assert_eq!(second.text, COMPARISON);
        assert_eq!(second.model, "gemini-pro");

        let held = playground.last_response().await.unwrap();
        assert_eq!(held.id, second.id);
        assert_eq!(
            recorder.messages(),
            vec![(NoticeLevel::Success, "Response generated successfully!".to_string()); 2]
        );
    }

    #[tokio::test]
    async fn test_prompt_is_trimmed_before_counting() {
        let (playground, _) = playground(Duration::ZERO).await;
        let response = playground.submit("  abcd  ").await.unwrap();
        assert_eq!(response.prompt_tokens(), 1);
        assert_eq!(response.completion_tokens(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_rejected_while_in_flight() {
        let (playground, _) = playground(Duration::from_millis(1500)).await;

        let running = {
            let playground = playground.clone();
            tokio::spawn(async move { playground.submit("first").await })
        };
        tokio::task::yield_now().await;
        while !playground.is_generating() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            playground.submit("second").await,
            Err(PlaygroundError::GenerationInFlight)
        ));

        let first = running.await.unwrap().unwrap();
        assert!(!playground.is_generating());
        assert_eq!(playground.last_response().await.unwrap().id, first.id);

        // flag cleared, next submission goes through
        assert!(playground.submit("third").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_model_rejected() {
        let (playground, _) = playground(Duration::ZERO).await;
        assert!(matches!(
            playground.select_model("gpt-5").await,
            Err(PlaygroundError::UnknownModel(_))
        ));
        assert_eq!(playground.selected_model().await, "gpt-4o");
    }

    #[tokio::test]
    async fn test_invalid_settings_not_applied() {
        let (playground, _) = playground(Duration::ZERO).await;
        let mut settings = PromptSettings::default();
        settings.temperature = 3.0;
        assert!(playground.update_settings(settings).await.is_err());
        assert_eq!(playground.settings().await.temperature, 0.7);

        let mut settings = PromptSettings::default();
        settings.top_p = 0.5;
        playground.update_settings(settings).await.unwrap();
        assert_eq!(playground.settings().await.top_p, 0.5);
    }

    #[tokio::test]
    async fn test_reset_clears_view_state() {
        let (playground, _) = playground(Duration::ZERO).await;
        playground.select_model("llama-3-70b").await.unwrap();
        playground.submit("hello").await.unwrap();

        playground.reset().await;
        assert!(playground.last_response().await.is_none());
        assert_eq!(playground.selected_model().await, "gpt-4o");
    }
}
