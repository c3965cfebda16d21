//! Configuration module for PodAI.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the gateway and
//! upload policy, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, GatewayConfig, UploadConfig};
