use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Profile snapshot returned by `GET /auth/oauth2/userinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    /// Profile kind, e.g. `Student`, `Teacher`, `Relative`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub force_change_password: Option<bool>,
    #[serde(default)]
    pub need_revalidate_terms: bool,
    #[serde(default)]
    pub delete_pending: bool,
    #[serde(default)]
    pub has_pw: bool,
    #[serde(rename = "federatedIDP", default)]
    pub federated_idp: Option<String>,
    #[serde(default)]
    pub option_enabled: Vec<String>,
    #[serde(default)]
    pub uai: Vec<String>,
    #[serde(default)]
    pub has_app: bool,
    #[serde(rename = "ignoreMFA", default)]
    pub ignore_mfa: bool,
    #[serde(default)]
    pub widgets: Vec<UserInfoWidget>,
}

impl UserInfo {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// `birthDate` as sent by the service (`YYYY-MM-DD`).
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let raw = self.birth_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfoWidget {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub i18n: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub js: Option<String>,
}
