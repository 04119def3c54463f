use std::fs;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "edifice";

#[derive(Debug, Clone)]
pub struct AppPaths {
    profiles_dir: PathBuf,
    sessions_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        Self::at(config_root.join(APP_DIR), data_root.join(APP_DIR))
    }

    /// Lays the profile and session directories out under explicit roots.
    pub fn at(config_dir: PathBuf, data_dir: PathBuf) -> AppResult<Self> {
        let profiles_dir = config_dir.join("profiles");
        let sessions_dir = data_dir.join("sessions");

        fs::create_dir_all(&profiles_dir)?;
        fs::create_dir_all(&sessions_dir)?;

        Ok(Self {
            profiles_dir,
            sessions_dir,
        })
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile}.json"))
    }

    pub fn session_file(&self, profile: &str) -> PathBuf {
        self.sessions_dir.join(format!("{profile}.json"))
    }
}
