//! Typed client for the conversation (messaging) service of Edifice school
//! platform instances, plus the `edifice` command line tool built on it.

pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod conversation;
pub mod error;
pub mod mail;
pub mod output;

pub use auth::{StoredSession, TokenPair, UserInfo};
pub use client::EdificeClient;
pub use config::ClientConfig;
pub use conversation::ConversationManager;
pub use error::{AppError, AppResult};

use cli::Cli;

pub async fn run(cli: Cli) -> AppResult<()> {
    app::run(cli).await
}
