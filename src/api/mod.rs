pub mod server;

pub use server::PlaygroundServer;
