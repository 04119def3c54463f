use tokio::sync::OnceCell;

use crate::auth::token_store::{StoredSession, TokenStore};
use crate::auth::FileTokenStore;
use crate::client::EdificeClient;
use crate::config::{self, AppPaths, Settings};
use crate::error::{AppError, AppResult};
use crate::output::Output;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub token_store: FileTokenStore,
    pub output: Output,
    debug: bool,
    client: OnceCell<EdificeClient>,
}

impl AppContext {
    pub fn bootstrap(profile: &str, json: bool, debug: bool) -> AppResult<Self> {
        let profile = config::resolve_profile(profile)?;
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        let token_store = FileTokenStore::new(paths.clone());
        let output = Output::new(json);

        Ok(Self {
            profile,
            paths,
            settings,
            token_store,
            output,
            debug,
            client: OnceCell::new(),
        })
    }

    /// The profile's client, with its stored session resumed when one exists.
    pub async fn client(&self) -> AppResult<&EdificeClient> {
        self.client_with(&self.settings).await
    }

    /// Builds the client from `settings` unless one was already built.
    pub async fn client_with(&self, settings: &Settings) -> AppResult<&EdificeClient> {
        self.client
            .get_or_try_init(|| async {
                let config = settings.client_config()?;
                let debug = config.debug || self.debug;
                let client = EdificeClient::new(config.with_debug(debug))?;
                if let Some(stored) = self.token_store.load(&self.profile)? {
                    client
                        .restore_session(stored.tokens, stored.user_info)
                        .await;
                }
                Ok::<_, AppError>(client)
            })
            .await
    }

    /// Like [`AppContext::client`], but requires a stored session.
    pub async fn connect(&self) -> AppResult<&EdificeClient> {
        let client = self.client().await?;
        if !client.is_authenticated().await {
            return Err(AppError::InvalidInput(format!(
                "profile `{}` is not logged in. run `edifice auth login`",
                self.profile
            )));
        }

        Ok(client)
    }

    /// Writes the client's current session back to the token store.
    pub async fn persist(&self) -> AppResult<()> {
        let Some(client) = self.client.get() else {
            return Ok(());
        };
        let Some(tokens) = client.tokens().await else {
            return Ok(());
        };

        let session = StoredSession {
            tokens,
            user_info: client.user_info().await,
        };
        log::debug!("saving session for profile `{}`", self.profile);
        self.token_store.save(&self.profile, &session)
    }
}
