use serde::Deserialize;

use crate::analytics::{snapshot_from_usage, MetricsReport};
use crate::error::{PlaygroundError, Result};
use crate::models::{
    MetricsSnapshot, ModelDescriptor, ModelResponse, PromptSettings, SessionDetail, User,
};
use crate::playground::suggest_variation;
use crate::storage::UsageLog;
use crate::AppState;

pub async fn get_session(state: &AppState) -> SessionDetail {
    state.session.detail().await
}

pub async fn login(email: &str, password: &str, state: &AppState) -> Result<User> {
    state.session.login(email, password).await
}

pub async fn logout(state: &AppState) {
    state.session.logout().await;
    // 대시보드 상태 초기화
    state.playground.reset().await;
}

/// Gate for dashboard operations
pub async fn require_user(state: &AppState) -> Result<User> {
    state
        .session
        .current_user()
        .await
        .ok_or(PlaygroundError::NotAuthenticated)
}

pub async fn get_available_models(
    query: Option<&str>,
    state: &AppState,
) -> Result<Vec<ModelDescriptor>> {
    require_user(state).await?;
    let catalog = state.playground.catalog();
    Ok(catalog
        .search(query.unwrap_or(""))
        .into_iter()
        .cloned()
        .collect())
}

pub async fn get_selected_model(state: &AppState) -> Result<ModelDescriptor> {
    require_user(state).await?;
    let id = state.playground.selected_model().await;
    state
        .playground
        .catalog()
        .find(&id)
        .cloned()
        .ok_or(PlaygroundError::UnknownModel(id))
}

pub async fn select_model(model: &str, state: &AppState) -> Result<ModelDescriptor> {
    require_user(state).await?;
    let descriptor = state.playground.select_model(model).await?;

    // 마지막 선택 모델 저장
    if let Err(e) = state.db.set_last_model(&descriptor.id).await {
        tracing::error!("Failed to save last model: {}", e);
    }

    Ok(descriptor)
}

pub async fn get_settings(state: &AppState) -> Result<PromptSettings> {
    require_user(state).await?;
    Ok(state.playground.settings().await)
}

pub async fn set_settings(settings: PromptSettings, state: &AppState) -> Result<PromptSettings> {
    require_user(state).await?;
    state.playground.update_settings(settings).await
}

pub async fn suggest_prompt_variation(prompt: &str, state: &AppState) -> Result<String> {
    require_user(state).await?;
    let suggestion = {
        let mut rng = rand::thread_rng();
        suggest_variation(prompt, &mut rng)
    };
    Ok(suggestion)
}

pub async fn generate(prompt: &str, state: &AppState) -> Result<ModelResponse> {
    let user = require_user(state).await?;

    let response = match state.playground.submit(prompt).await {
        Ok(response) => response,
        Err(e) if e.is_client_error() => {
            tracing::debug!("Generation rejected: {}", e);
            return Err(e);
        }
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            state.notifier.error("Failed to generate response").await;
            return Err(e);
        }
    };

    tracing::info!(
        "GENERATE: user={} model={} tokens={} duration={:.2}s",
        user.id,
        response.model,
        response.total_tokens(),
        response.metadata.duration
    );

    // 사용량 로깅
    if let Err(e) = state
        .db
        .log_usage(
            &user.id,
            &response.model,
            response.prompt_tokens() as i64,
            response.completion_tokens() as i64,
            response.duration_ms(),
        )
        .await
    {
        tracing::error!("Failed to log usage: {}", e);
    }

    Ok(response)
}

pub async fn get_last_response(state: &AppState) -> Result<Option<ModelResponse>> {
    require_user(state).await?;
    Ok(state.playground.last_response().await)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSource {
    #[default]
    Demo,
    Live,
}

pub async fn get_metrics(source: MetricsSource, state: &AppState) -> Result<MetricsReport> {
    require_user(state).await?;

    let snapshot = match source {
        MetricsSource::Demo => MetricsSnapshot::demo(),
        MetricsSource::Live => {
            let summary = state.db.get_usage_summary().await?;
            snapshot_from_usage(&summary, state.playground.catalog())
        }
    };

    let report = {
        let mut rng = rand::thread_rng();
        MetricsReport::build(snapshot, &mut rng)
    };
    Ok(report)
}

pub async fn get_recent_usage(limit: i64, state: &AppState) -> Result<Vec<UsageLog>> {
    require_user(state).await?;
    state.db.get_recent_usage(limit.clamp(1, 500)).await
}

pub async fn clear_usage(state: &AppState) -> Result<()> {
    let user = require_user(state).await?;
    state.db.clear_usage_logs().await?;
    tracing::info!("Usage logs cleared by user={}", user.id);
    Ok(())
}
