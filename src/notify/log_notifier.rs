use async_trait::async_trait;

use super::traits::{Notice, NoticeLevel, Notifier};

/// Writes notices to the tracing log
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!("NOTICE [{}]: {}", notice.level.as_str(), notice.message),
            _ => tracing::info!("NOTICE [{}]: {}", notice.level.as_str(), notice.message),
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
