use std::fmt;

/// OAuth2 client credentials, fixed for the lifetime of a client.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Proof of identity exchanged at the token endpoint.
#[derive(Clone)]
pub enum Grant {
    Password {
        username: String,
        password: String,
        scope: Vec<String>,
    },
    Saml {
        assertion: String,
        scope: Vec<String>,
    },
    RefreshToken {
        refresh_token: String,
    },
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::Saml { .. } => "saml2",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Form fields for `POST /auth/oauth2/token`.
    pub fn form(&self, credentials: &Credentials) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("client_id", credentials.client_id.clone()),
            ("client_secret", credentials.client_secret.clone()),
            ("grant_type", self.grant_type().to_string()),
        ];

        match self {
            Self::Password {
                username,
                password,
                scope,
            } => {
                form.push(("username", username.clone()));
                form.push(("password", password.clone()));
                form.push(("scope", scope.join(" ")));
            }
            Self::Saml { assertion, scope } => {
                form.push(("assertion", assertion.clone()));
                form.push(("scope", scope.join(" ")));
            }
            Self::RefreshToken { refresh_token } => {
                form.push(("refresh_token", refresh_token.clone()));
            }
        }

        form
    }
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password {
                username, scope, ..
            } => f
                .debug_struct("Password")
                .field("username", username)
                .field("scope", scope)
                .finish_non_exhaustive(),
            Self::Saml { scope, .. } => f
                .debug_struct("Saml")
                .field("scope", scope)
                .finish_non_exhaustive(),
            Self::RefreshToken { .. } => f.debug_struct("RefreshToken").finish_non_exhaustive(),
        }
    }
}

pub(crate) fn scope_list<S: AsRef<str>>(scope: &[S]) -> Vec<String> {
    scope.iter().map(|value| value.as_ref().to_string()).collect()
}
