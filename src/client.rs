//! The `EdificeClient` facade.
//!
//! Every request goes through [`EdificeClient::send`]: it resolves the
//! endpoint template, attaches the session's bearer token and, when the
//! service signals a stale token, refreshes once through the session's
//! single-flight guard and replays the request with the new token.

use std::time::SystemTime;

use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::oauth2;
use crate::api::resources::{Access, Endpoint, Params};
use crate::api::transport::{Payload, Transport, is_stale_token_signal};
use crate::auth::grant::scope_list;
use crate::auth::token::TokenResponse;
use crate::auth::{Credentials, Grant, Session, TokenPair, UserInfo};
use crate::config::ClientConfig;
use crate::conversation::ConversationManager;
use crate::error::AppResult;

#[derive(Debug)]
pub struct EdificeClient {
    credentials: Credentials,
    transport: Transport,
    session: Session,
}

impl EdificeClient {
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            credentials: config.credentials,
            transport,
            session: Session::new(),
        })
    }

    pub fn instance_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn conversations(&self) -> ConversationManager<'_> {
        ConversationManager::new(self)
    }

    /// Exchanges a SAML assertion (`grant_type=saml2`) for a token pair.
    pub async fn authenticate_by_saml<S: AsRef<str>>(
        &self,
        assertion: &str,
        scope: &[S],
    ) -> AppResult<TokenPair> {
        self.authenticate(Grant::Saml {
            assertion: assertion.to_string(),
            scope: scope_list(scope),
        })
        .await
    }

    pub async fn authenticate_by_password<S: AsRef<str>>(
        &self,
        username: &str,
        password: &str,
        scope: &[S],
    ) -> AppResult<TokenPair> {
        self.authenticate(Grant::Password {
            username: username.to_string(),
            password: password.to_string(),
            scope: scope_list(scope),
        })
        .await
    }

    pub async fn authenticate_by_refresh_token(&self, refresh_token: &str) -> AppResult<TokenPair> {
        self.authenticate(Grant::RefreshToken {
            refresh_token: refresh_token.to_string(),
        })
        .await
    }

    /// Installs tokens obtained elsewhere, then checks them by fetching the
    /// user profile.
    pub async fn login(&self, access_token: &str, refresh_token: &str) -> AppResult<UserInfo> {
        self.session
            .install(TokenPair::from_existing(access_token, refresh_token))
            .await;
        self.fetch_user_info().await
    }

    /// Resumes a session saved by the caller. No request is made.
    pub async fn restore_session(&self, tokens: TokenPair, user_info: Option<UserInfo>) {
        self.session.restore(tokens, user_info).await;
    }

    pub async fn fetch_user_info(&self) -> AppResult<UserInfo> {
        let user_info: UserInfo = self
            .call_json(&oauth2::FETCH_USER_INFO, Params::new(), Payload::Empty)
            .await?;
        self.session.set_user_info(user_info.clone()).await;
        Ok(user_info)
    }

    pub async fn user_info(&self) -> Option<UserInfo> {
        self.session.user_info().await
    }

    pub async fn tokens(&self) -> Option<TokenPair> {
        self.session.tokens().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    async fn authenticate(&self, grant: Grant) -> AppResult<TokenPair> {
        log::debug!("requesting tokens with grant_type={}", grant.grant_type());
        let tokens = self
            .session
            .exchange(|| self.request_tokens(&grant))
            .await?;
        self.fetch_user_info().await?;
        Ok(tokens)
    }

    async fn request_tokens(&self, grant: &Grant) -> AppResult<TokenPair> {
        let route = oauth2::TOKEN_GRANT.resolve(&Params::new())?;
        let payload = Payload::Form(grant.form(&self.credentials));
        let response = self.transport.execute(&route, &payload, None).await?;
        let body: TokenResponse = self.transport.read_json(response).await?;
        Ok(body.into_pair(SystemTime::now()))
    }

    pub(crate) async fn send(
        &self,
        endpoint: &Endpoint,
        params: Params,
        payload: Payload,
    ) -> AppResult<Response> {
        let route = endpoint.resolve(&params)?;
        if route.access == Access::Public {
            return self.transport.execute(&route, &payload, None).await;
        }

        let bearer = self.session.bearer().await?;
        let response = self
            .transport
            .execute(&route, &payload, Some(&bearer.access_token))
            .await?;
        if !is_stale_token_signal(response.status()) {
            return Ok(response);
        }

        log::debug!(
            "{} answered {}, refreshing token before retry",
            route.path(),
            response.status()
        );
        let fresh = self
            .session
            .refresh_stale(&bearer, |refresh_token| async move {
                self.request_tokens(&Grant::RefreshToken { refresh_token })
                    .await
            })
            .await?;

        self.transport
            .execute(&route, &payload, Some(&fresh))
            .await
    }

    pub(crate) async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        params: Params,
        payload: Payload,
    ) -> AppResult<T> {
        let response = self.send(endpoint, params, payload).await?;
        self.transport.read_json(response).await
    }

    pub(crate) async fn call_bytes(
        &self,
        endpoint: &Endpoint,
        params: Params,
        payload: Payload,
    ) -> AppResult<Vec<u8>> {
        let response = self.send(endpoint, params, payload).await?;
        self.transport.read_bytes(response).await
    }

    pub(crate) async fn call_empty(
        &self,
        endpoint: &Endpoint,
        params: Params,
        payload: Payload,
    ) -> AppResult<()> {
        let response = self.send(endpoint, params, payload).await?;
        self.transport.read_empty(response).await
    }
}
