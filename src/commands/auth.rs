use std::fs;
use std::io::{self, IsTerminal, Write};

use serde::Serialize;

use crate::auth::token_store::TokenStore;
use crate::auth::UserInfo;
use crate::cli::AuthCommand;
use crate::config::{self, Settings};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub profile: String,
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

pub async fn run(ctx: &AppContext, command: AuthCommand) -> AppResult<()> {
    match command {
        AuthCommand::Login { username, password } => {
            let settings = ensure_login_settings(ctx)?;
            let password = match password {
                Some(password) => password,
                None => prompt_required("Password: ")?,
            };
            let client = ctx.client_with(&settings).await?;
            client
                .authenticate_by_password(&username, &password, &settings.scope())
                .await?;
            emit_signed_in(ctx, client.user_info().await)
        }
        AuthCommand::Saml { assertion_file } => {
            let settings = ensure_login_settings(ctx)?;
            let assertion = fs::read_to_string(&assertion_file)?;
            let assertion = assertion.trim();
            if assertion.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "assertion file {} is empty",
                    assertion_file.display()
                )));
            }
            let client = ctx.client_with(&settings).await?;
            client
                .authenticate_by_saml(assertion, &settings.scope())
                .await?;
            emit_signed_in(ctx, client.user_info().await)
        }
        AuthCommand::Token { access, refresh } => {
            let client = ctx.client().await?;
            let user = client.login(&access, &refresh).await?;
            emit_signed_in(ctx, Some(user))
        }
        AuthCommand::Refresh => {
            let client = ctx.connect().await?;
            let refresh_token = client
                .tokens()
                .await
                .map(|tokens| tokens.refresh_token)
                .ok_or_else(|| AppError::LocalState("no refresh token stored".to_string()))?;
            client.authenticate_by_refresh_token(&refresh_token).await?;
            emit_signed_in(ctx, client.user_info().await)
        }
        AuthCommand::Status => {
            let status = status(ctx)?;
            let text = if status.logged_in {
                format!(
                    "{}: logged in{}",
                    status.profile,
                    status
                        .user
                        .as_ref()
                        .map(|user| format!(" as {user}"))
                        .unwrap_or_default(),
                )
            } else {
                format!("{}: logged out", status.profile)
            };

            ctx.output.emit(&text, &status)
        }
        AuthCommand::Logout => {
            ctx.token_store.clear(&ctx.profile)?;
            let status = AuthStatus {
                profile: ctx.profile.clone(),
                logged_in: false,
                user: None,
                login: None,
                expires_in_seconds: None,
            };
            let text = format!("{}: logged out", status.profile);
            ctx.output.emit(&text, &status)
        }
    }
}

fn status(ctx: &AppContext) -> AppResult<AuthStatus> {
    let stored = ctx.token_store.load(&ctx.profile)?;
    let Some(stored) = stored else {
        return Ok(AuthStatus {
            profile: ctx.profile.clone(),
            logged_in: false,
            user: None,
            login: None,
            expires_in_seconds: None,
        });
    };

    Ok(AuthStatus {
        profile: ctx.profile.clone(),
        logged_in: true,
        user: stored.user_info.as_ref().map(UserInfo::display_name),
        login: stored.user_info.map(|info| info.login),
        expires_in_seconds: stored
            .tokens
            .expires_in_seconds(std::time::SystemTime::now()),
    })
}

fn emit_signed_in(ctx: &AppContext, user: Option<UserInfo>) -> AppResult<()> {
    let status = AuthStatus {
        profile: ctx.profile.clone(),
        logged_in: true,
        user: user.as_ref().map(UserInfo::display_name),
        login: user.map(|info| info.login),
        expires_in_seconds: None,
    };
    let text = match &status.user {
        Some(user) => format!("{}: logged in as {user}", status.profile),
        None => format!("{}: logged in", status.profile),
    };
    ctx.output.emit(&text, &status)
}

/// Prompts for and saves missing instance settings when running in a terminal.
fn ensure_login_settings(ctx: &AppContext) -> AppResult<Settings> {
    let mut settings = ctx.settings.clone();
    let missing_instance = settings.instance_url().is_err();
    let missing_client_id = settings.client_id().is_err();
    let missing_client_secret = settings.client_secret().is_err();

    if !missing_instance && !missing_client_id && !missing_client_secret {
        return Ok(settings);
    }

    let settings_path = ctx.paths.settings_file(&ctx.profile);
    if !io::stdin().is_terminal() {
        let missing = format_missing_fields(missing_instance, missing_client_id, missing_client_secret);
        return Err(AppError::Config(format!(
            "missing {missing} in {}. run `edifice auth login` in an interactive terminal to be prompted, or add the values manually",
            settings_path.display(),
        )));
    }

    println!("Instance settings are missing for profile `{}`.", ctx.profile);
    println!("Settings will be saved to {}.", settings_path.display());

    if missing_instance {
        settings.instance_url = Some(prompt_required("Instance url (https://...): ")?);
    }
    if missing_client_id {
        settings.client_id = Some(prompt_required("OAuth client_id: ")?);
    }
    if missing_client_secret {
        settings.client_secret = Some(prompt_required("OAuth client_secret: ")?);
    }

    config::save_settings(&ctx.paths, &ctx.profile, &settings)?;
    println!("Saved profile settings to {}.", settings_path.display());
    Ok(settings)
}

fn format_missing_fields(instance: bool, client_id: bool, client_secret: bool) -> String {
    let fields = [
        (instance, "instance_url"),
        (client_id, "client_id"),
        (client_secret, "client_secret"),
    ]
    .into_iter()
    .filter_map(|(missing, name)| missing.then_some(name))
    .collect::<Vec<_>>();

    match fields.as_slice() {
        [] => "configuration".to_string(),
        [single] => single.to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn prompt_required(prompt: &str) -> AppResult<String> {
    loop {
        let value = prompt_line(prompt)?;
        if !value.is_empty() {
            return Ok(value);
        }
        eprintln!("value is required");
    }
}

fn prompt_line(prompt: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}
