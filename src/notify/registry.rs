use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{Notice, NoticeLevel, Notifier};

/// Fans notices out to every registered notifier
#[derive(Clone)]
pub struct NotifierRegistry {
    notifiers: Arc<RwLock<Vec<Arc<dyn Notifier>>>>,
    enabled: Arc<RwLock<bool>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self {
            notifiers: Arc::new(RwLock::new(Vec::new())),
            enabled: Arc::new(RwLock::new(true)),
        }
    }

    /// Register a new notifier
    pub async fn register(&self, notifier: Arc<dyn Notifier>) {
        let mut notifiers = self.notifiers.write().await;
        tracing::info!("Registering notifier: {}", notifier.name());
        notifiers.push(notifier);
    }

    /// Enable or disable all notifiers
    pub async fn set_enabled(&self, enabled: bool) {
        *self.enabled.write().await = enabled;
        tracing::info!("Notifications enabled: {}", enabled);
    }

    pub async fn is_enabled(&self) -> bool {
        *self.enabled.read().await
    }

    pub async fn notifier_count(&self) -> usize {
        self.notifiers.read().await.len()
    }

    pub async fn notify(&self, notice: Notice) {
        if !self.is_enabled().await {
            return;
        }

        let notifiers = self.notifiers.read().await;
        futures::future::join_all(notifiers.iter().map(|n| n.notify(&notice))).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Success, message)).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Error, message)).await;
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.notify(Notice::new(NoticeLevel::Info, message)).await;
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Captures notices in memory, for tests
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: std::sync::Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NoticeLevel, String)> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| (n.level, n.message.clone()))
            .collect()
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
