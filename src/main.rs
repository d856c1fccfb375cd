mod analytics;
mod api;
mod auth;
mod commands;
mod config;
mod error;
mod models;
mod notify;
mod playground;
mod storage;

use api::PlaygroundServer;
use auth::{CredentialStore, SessionStore};
use config::PlaygroundConfig;
use notify::{LogNotifier, NotifierRegistry, WebhookNotifier};
use playground::{MockResponseGenerator, ModelCatalog, Playground, RandomLatency};
use std::sync::Arc;
use storage::{Database, JsonFileStore, KeyValueStore};

pub struct AppState {
    pub db: Arc<Database>,
    pub session: Arc<SessionStore>,
    pub playground: Arc<Playground>,
    pub notifier: NotifierRegistry,
}

impl AppState {
    /// Wire the session store, playground and notifiers, and restore any
    /// persisted session.
    pub async fn build(
        config: &PlaygroundConfig,
        db: Arc<Database>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let notifier = NotifierRegistry::new();
        notifier.register(Arc::new(LogNotifier::new())).await;
        if let Some(url) = config.active_webhook() {
            notifier.register(Arc::new(WebhookNotifier::new(url))).await;
        }

        let session = SessionStore::new(CredentialStore::default(), storage, notifier.clone())
            .with_login_delay(config.login_delay());
        let restored = session.restore().await;
        tracing::info!("Session state on start: {:?}", restored);

        let (min_latency, max_latency) = config.latency_range();
        let generator = MockResponseGenerator::new(Arc::new(RandomLatency::new(
            min_latency,
            max_latency,
        )));
        let playground = Playground::new(ModelCatalog::default(), generator, notifier.clone());

        // 마지막으로 선택한 모델 복원
        match db.get_last_model().await {
            Ok(Some(model)) => {
                if let Err(e) = playground.select_model(&model).await {
                    tracing::warn!("Ignoring saved model: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to read last model: {}", e),
        }

        Self {
            db,
            session: Arc::new(session),
            playground: Arc::new(playground),
            notifier,
        }
    }
}

#[tokio::main]
async fn main() {
    let config = match PlaygroundConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // 로그 디렉토리 생성
    let log_dir = config.log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // 파일 로거 설정 (일별 회전)
    let file_appender = tracing_appender::rolling::daily(&log_dir, "playground.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // 콘솔 + 파일 로깅
    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false)
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(non_blocking)
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        )
        .init();

    tracing::info!("LLM Playground starting... Log file: {:?}", log_dir.join("playground.log"));

    if PlaygroundConfig::is_dev_mode() {
        tracing::warn!(
            "Running in DEV MODE (port: {}, db: {:?})",
            config.port,
            config.database_path()
        );
    }

    // 데이터베이스 초기화
    let db = match Database::init(&config.database_path()).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let storage = Arc::new(JsonFileStore::new(config.storage_path()));
    let state = Arc::new(AppState::build(&config, db, storage).await);

    let mut server = PlaygroundServer::new(state);
    match server.start(config.socket_addr()).await {
        Ok(addr) => tracing::info!("Playground listening on http://{}", addr),
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    if let Err(e) = server.stop().await {
        tracing::error!("Failed to stop server: {}", e);
    }
    tracing::info!("LLM Playground stopped");
}
