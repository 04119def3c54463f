//! In-memory session state: the current token pair and the user profile.
//!
//! All token mutation goes through `refresh_lock`, so concurrent callers
//! that see the same stale token share one refresh instead of racing each
//! other with a refresh token the first refresh already consumed. A failed
//! refresh is shared the same way: callers that took their bearer before it
//! finished get its error instead of sending the rejected refresh token again.
//! Tokens are only written after a grant completes; dropping a refresh future
//! part way leaves the previous pair in place.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, AppResult};

use super::token::TokenPair;
use super::user_info::UserInfo;

/// An access token together with the refresh attempt count seen when it was
/// read.
#[derive(Debug, Clone)]
pub struct Bearer {
    pub access_token: String,
    attempts_seen: u64,
}

#[derive(Debug)]
struct FailedRefresh {
    stale_access_token: String,
    error: AppError,
}

#[derive(Debug, Default)]
pub struct Session {
    tokens: RwLock<Option<TokenPair>>,
    user_info: RwLock<Option<UserInfo>>,
    refresh_lock: Mutex<Option<FailedRefresh>>,
    refresh_attempts: AtomicU64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    pub async fn access_token(&self) -> AppResult<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|tokens| tokens.access_token.clone())
            .ok_or_else(not_authenticated)
    }

    /// Reads the attempt counter before the token so a refresh that finishes
    /// in between is never missed.
    pub async fn bearer(&self) -> AppResult<Bearer> {
        let attempts_seen = self.refresh_attempts.load(Ordering::Acquire);
        let access_token = self.access_token().await?;
        Ok(Bearer {
            access_token,
            attempts_seen,
        })
    }

    pub async fn user_info(&self) -> Option<UserInfo> {
        self.user_info.read().await.clone()
    }

    pub async fn set_user_info(&self, user_info: UserInfo) {
        *self.user_info.write().await = Some(user_info);
    }

    /// Installs a pair from a fresh sign-in. The previous profile belongs to
    /// the previous tokens and is dropped.
    pub async fn install(&self, tokens: TokenPair) {
        let mut failed = self.refresh_lock.lock().await;
        *failed = None;
        self.replace(tokens, None).await;
    }

    pub async fn restore(&self, tokens: TokenPair, user_info: Option<UserInfo>) {
        let mut failed = self.refresh_lock.lock().await;
        *failed = None;
        self.replace(tokens, user_info).await;
    }

    /// Runs an explicit grant under the refresh lock and installs its result.
    pub async fn exchange<F, Fut>(&self, grant: F) -> AppResult<TokenPair>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<TokenPair>>,
    {
        let mut failed = self.refresh_lock.lock().await;
        let tokens = grant().await?;
        *failed = None;
        self.replace(tokens.clone(), None).await;
        Ok(tokens)
    }

    /// Replaces the stale bearer with a refreshed token. Returns the current
    /// token if another caller already refreshed it, or that caller's error
    /// if its refresh of the same token failed after `stale` was read.
    pub async fn refresh_stale<F, Fut>(&self, stale: &Bearer, refresh: F) -> AppResult<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = AppResult<TokenPair>>,
    {
        let mut failed = self.refresh_lock.lock().await;

        let current = self.tokens().await.ok_or_else(not_authenticated)?;
        if current.access_token != stale.access_token {
            log::debug!("access token already refreshed by a concurrent request");
            return Ok(current.access_token);
        }

        let attempted_since = self.refresh_attempts.load(Ordering::Acquire) != stale.attempts_seen;
        let shared_failure = failed.as_ref().filter(|previous| {
            attempted_since && previous.stale_access_token == stale.access_token
        });
        if let Some(previous) = shared_failure {
            log::debug!("concurrent session refresh failed, not retrying it");
            return Err(previous.error.replay());
        }

        log::info!("access token rejected, refreshing session");
        let outcome = refresh(current.refresh_token).await;
        self.refresh_attempts.fetch_add(1, Ordering::AcqRel);

        match outcome {
            Ok(refreshed) => {
                *failed = None;
                let access_token = refreshed.access_token.clone();
                *self.tokens.write().await = Some(refreshed);
                Ok(access_token)
            }
            Err(err) => {
                log::warn!("session refresh failed: {err}");
                *failed = Some(FailedRefresh {
                    stale_access_token: stale.access_token.clone(),
                    error: err.replay(),
                });
                Err(err)
            }
        }
    }

    async fn replace(&self, tokens: TokenPair, user_info: Option<UserInfo>) {
        *self.tokens.write().await = Some(tokens);
        *self.user_info.write().await = user_info;
    }
}

fn not_authenticated() -> AppError {
    AppError::LocalState(
        "client is not authenticated; authenticate or log in first".to_string(),
    )
}
