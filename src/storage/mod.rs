pub mod database;
pub mod kv;

pub use database::{Database, UsageLog, UsageSummary};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
