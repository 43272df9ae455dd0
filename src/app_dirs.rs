use directories::ProjectDirs;
use std::path::PathBuf;

/// Where the game looks for user maps and writes its log.
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "hitcircle")
    }

    /// `~/.local/share/hitcircle/maps` on Linux.
    pub fn maps_dir() -> Option<PathBuf> {
        Self::project().map(|pd| pd.data_dir().join("maps"))
    }

    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("hitcircle")
                .join("hitcircle.log")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join("hitcircle.log"))
                .unwrap_or_else(|| PathBuf::from("hitcircle.log"))
        }
    }
}
