use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::ClientConfig;

const DEFAULT_SCOPE: [&str; 2] = ["userinfo", "conversation"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub instance_url: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scope: Option<Vec<String>>,
    #[serde(default)]
    pub debug: bool,
}

impl Settings {
    pub fn instance_url(&self) -> AppResult<&str> {
        required(self.instance_url.as_deref(), "instance_url")
    }

    pub fn client_id(&self) -> AppResult<&str> {
        required(self.client_id.as_deref(), "client_id")
    }

    pub fn client_secret(&self) -> AppResult<&str> {
        required(self.client_secret.as_deref(), "client_secret")
    }

    pub fn scope(&self) -> Vec<String> {
        match &self.scope {
            Some(scope) if !scope.is_empty() => scope.clone(),
            _ => DEFAULT_SCOPE.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn client_config(&self) -> AppResult<ClientConfig> {
        Ok(
            ClientConfig::new(self.instance_url()?, self.client_id()?, self.client_secret()?)
                .with_debug(self.debug),
        )
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::Config(format!(
                "missing {field} in profile settings. add it to your profile json"
            ))
        })
}

pub fn load(path: PathBuf) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}

pub fn save(path: PathBuf, settings: &Settings) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = serde_json::to_string_pretty(settings)?;
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
