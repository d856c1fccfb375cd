pub mod log_notifier;
pub mod registry;
pub mod traits;
pub mod webhook;

pub use log_notifier::LogNotifier;
pub use registry::NotifierRegistry;
pub use traits::{Notice, NoticeLevel, Notifier};
pub use webhook::WebhookNotifier;

#[cfg(test)]
pub use registry::RecordingNotifier;
