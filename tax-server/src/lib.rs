//! HTTP and command-line front end for the tax engine.

pub mod config;
pub mod display;
pub mod logging;
pub mod routes;

pub use config::RegistryConfig;
pub use routes::{AppState, router};
