use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::commands::{self, MetricsSource};
use crate::error::PlaygroundError;
use crate::models::PromptSettings;
use crate::AppState;

/// HTTP 응답으로 변환되는 에러
pub struct ApiError(PlaygroundError);

impl From<PlaygroundError> for ApiError {
    fn from(e: PlaygroundError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            PlaygroundError::InvalidCredentials | PlaygroundError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            PlaygroundError::GenerationInFlight | PlaygroundError::LoginInFlight => {
                StatusCode::CONFLICT
            }
            PlaygroundError::EmptyPrompt
            | PlaygroundError::UnknownModel(_)
            | PlaygroundError::InvalidSettings(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::debug!("Rejected request: {}", self.0);
        } else {
            tracing::error!("API error: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub source: Option<MetricsSource>,
}

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub limit: Option<i64>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/session", get(session_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/api/models", get(models_handler))
        .route("/api/model", get(selected_model_handler).put(select_model_handler))
        .route("/api/settings", get(settings_handler).put(update_settings_handler))
        .route("/api/prompt/variation", post(variation_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/response", get(response_handler))
        .route("/api/metrics", get(metrics_handler))
        .route("/api/usage", get(usage_handler).delete(clear_usage_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct PlaygroundServer {
    state: Arc<AppState>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    local_addr: Option<SocketAddr>,
}

impl PlaygroundServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
            local_addr: None,
        }
    }

    /// Bind and serve in the background. Returns the bound address, which
    /// differs from `addr` when port 0 is requested.
    pub async fn start(&mut self, addr: SocketAddr) -> Result<SocketAddr> {
        if self.shutdown_tx.is_some() {
            anyhow::bail!("Server is already running");
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Playground server starting on {}", local_addr);

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let app = router(self.state.clone());

        tokio::spawn(async move {
            let server = axum::serve(listener, app.into_make_service()).with_graceful_shutdown(
                async move {
                    let _ = rx.await;
                    tracing::info!("Playground server shutting down");
                },
            );
            if let Err(e) = server.await {
                tracing::error!("Playground server error: {}", e);
            }
        });

        self.shutdown_tx = Some(tx);
        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.local_addr = None;
        Ok(())
    }
}

async fn session_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(commands::get_session(&state).await)
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<crate::models::User> {
    Ok(Json(commands::login(&req.email, &req.password, &state).await?))
}

async fn logout_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    commands::logout(&state).await;
    StatusCode::NO_CONTENT
}

async fn models_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModelQuery>,
) -> ApiResult<Vec<crate::models::ModelDescriptor>> {
    Ok(Json(
        commands::get_available_models(query.q.as_deref(), &state).await?,
    ))
}

async fn selected_model_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<crate::models::ModelDescriptor> {
    Ok(Json(commands::get_selected_model(&state).await?))
}

async fn select_model_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectModelRequest>,
) -> ApiResult<crate::models::ModelDescriptor> {
    Ok(Json(commands::select_model(&req.model, &state).await?))
}

async fn settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<PromptSettings> {
    Ok(Json(commands::get_settings(&state).await?))
}

async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<PromptSettings>,
) -> ApiResult<PromptSettings> {
    Ok(Json(commands::set_settings(settings, &state).await?))
}

async fn variation_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromptRequest>,
) -> ApiResult<serde_json::Value> {
    let prompt = commands::suggest_prompt_variation(&req.prompt, &state).await?;
    Ok(Json(serde_json::json!({ "prompt": prompt })))
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PromptRequest>,
) -> ApiResult<crate::models::ModelResponse> {
    Ok(Json(commands::generate(&req.prompt, &state).await?))
}

async fn response_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Option<crate::models::ModelResponse>> {
    Ok(Json(commands::get_last_response(&state).await?))
}

async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MetricsQuery>,
) -> ApiResult<crate::analytics::MetricsReport> {
    let source = query.source.unwrap_or_default();
    Ok(Json(commands::get_metrics(source, &state).await?))
}

async fn usage_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsageQuery>,
) -> ApiResult<Vec<crate::storage::UsageLog>> {
    let limit = query.limit.unwrap_or(50);
    Ok(Json(commands::get_recent_usage(limit, &state).await?))
}

async fn clear_usage_handler(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    commands::clear_usage(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}
