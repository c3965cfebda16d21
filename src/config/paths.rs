//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir, settings + history):
//!   Windows: %APPDATA%\podai\
//!   macOS:   ~/Library/Application Support/podai/
//!   Linux:   ~/.config/podai/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `history.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `history.json`.
    pub history_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "podai";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let history_file = config_dir.join("history.json");

        Self {
            config_dir,
            settings_file,
            history_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
