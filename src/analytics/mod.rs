pub mod presenter;

pub use presenter::{snapshot_from_usage, MetricsReport};
