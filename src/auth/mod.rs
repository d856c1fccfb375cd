pub mod credentials;
pub mod session_store;

pub use credentials::{seed_accounts, CredentialStore};
pub use session_store::{SessionStore, SESSION_KEY};
