use crate::error::{AppError, AppResult};

const DEFAULT_PROFILE: &str = "default";

/// Normalizes a profile name; it becomes a file stem, so separators are refused.
pub fn resolve_profile(requested: &str) -> AppResult<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_PROFILE.to_string());
    }

    if trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
        return Err(AppError::InvalidInput(format!(
            "invalid profile name `{trimmed}`"
        )));
    }

    Ok(trimmed.to_string())
}
