pub mod account;
pub mod catalog;
pub mod metrics;
pub mod response;
pub mod session;
pub mod settings;

pub use account::{User, UserAccount, UserRole};
pub use catalog::{ModelDescriptor, Provider};
pub use metrics::{MetricsSnapshot, ModelUsage};
pub use response::{ModelResponse, ResponseMetadata, TokenCount};
pub use session::{SessionDetail, SessionState};
pub use settings::PromptSettings;
