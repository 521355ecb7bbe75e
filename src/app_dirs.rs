use directories::ProjectDirs;
use std::path::PathBuf;

/// Where quizr keeps its files
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "quizr")
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("quizr_config.json"))
    }

    /// The TUI owns the terminal, so logs go to a file under $HOME/.local/state/quizr.
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("quizr")
                .join("quizr.log")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join("quizr.log"))
                .unwrap_or_else(|| PathBuf::from("quizr.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_have_expected_file_names() {
        assert!(AppDirs::config_path().ends_with("config.json"));
        assert!(AppDirs::log_path().ends_with("quizr.log"));
    }
}
