use std::fs;

use serde::{Deserialize, Serialize};

use crate::config::AppPaths;
use crate::error::AppResult;

use super::{TokenPair, UserInfo};

/// What a caller persists between runs to resume a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub tokens: TokenPair,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

pub trait TokenStore {
    fn load(&self, profile: &str) -> AppResult<Option<StoredSession>>;
    fn save(&self, profile: &str, session: &StoredSession) -> AppResult<()>;
    fn clear(&self, profile: &str) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    paths: AppPaths,
}

impl FileTokenStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, profile: &str) -> AppResult<Option<StoredSession>> {
        let path = self.paths.session_file(profile);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    fn save(&self, profile: &str, session: &StoredSession) -> AppResult<()> {
        let path = self.paths.session_file(profile);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::to_string_pretty(session)?;
        fs::write(&path, payload)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    fn clear(&self, profile: &str) -> AppResult<()> {
        let path = self.paths.session_file(profile);
        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }
}
