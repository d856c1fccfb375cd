pub mod catalog;
pub mod generator;
pub mod templates;
pub mod variations;
pub mod workspace;

pub use catalog::ModelCatalog;
pub use generator::{MockResponseGenerator, RandomLatency};
pub use variations::suggest_variation;
pub use workspace::Playground;
