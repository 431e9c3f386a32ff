//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\hindi-learn\
//!   macOS:   ~/Library/Application Support/hindi-learn/
//!   Linux:   ~/.config/hindi-learn/
//!
//! Data dir (structured content + transcripts):
//!   Windows: %LOCALAPPDATA%\hindi-learn\
//!   macOS:   ~/Library/Application Support/hindi-learn/
//!   Linux:   ~/.local/share/hindi-learn/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the persisted `structured_data.json` document.
    pub structured_data_file: PathBuf,
    /// Directory searched for transcript files given by bare name.
    pub transcripts_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "hindi-learn";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let structured_data_file = data_dir.join("structured_data.json");
        let transcripts_dir = data_dir.join("transcripts");

        Self {
            config_dir,
            settings_file,
            structured_data_file,
            transcripts_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.transcripts_dir.ends_with("transcripts"));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .structured_data_file
            .file_name()
            .is_some_and(|n| n == "structured_data.json"));
    }
}
