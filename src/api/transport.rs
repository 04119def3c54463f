use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{AppError, AppResult};

use super::models::RequestError;
use super::resources::Route;

/// Request body, kept in a re-buildable form so a request can be sent again
/// after a token refresh.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(&'static str, String)>),
    Upload(FilePart),
}

#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn json<T: serde::Serialize>(value: &T) -> AppResult<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    base_url: Url,
    debug: bool,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.instance_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "instance url `{}` cannot be used as a base url",
                config.instance_url
            )));
        }

        // 302 is one of the upstream's expiry signals, so redirects must surface.
        let http = Client::builder()
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            debug: config.debug,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends one request and returns the raw response without checking its
    /// status. Only failures to obtain a response are reported here.
    pub async fn execute(
        &self,
        route: &Route,
        payload: &Payload,
        bearer: Option<&str>,
    ) -> AppResult<Response> {
        let url = self.endpoint_url(route)?;
        if self.debug {
            log::debug!(
                "-> {} {} (authorization: {})",
                route.method.as_method(),
                url,
                if bearer.is_some() { "bearer <redacted>" } else { "none" }
            );
        }

        let mut request = self.http.request(route.method.as_method(), url.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let request = attach_payload(request, payload)?;

        let response = request.send().await?;
        if self.debug {
            log::debug!("<- {} {} {:?}", response.status(), url, response.headers());
        }

        Ok(response)
    }

    pub async fn read_json<T: DeserializeOwned>(&self, response: Response) -> AppResult<T> {
        let bytes = self.read_bytes(response).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn read_bytes(&self, response: Response) -> AppResult<Vec<u8>> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.bytes().await?.to_vec());
        }

        let body = response.text().await?;
        if self.debug {
            log::debug!("error body ({status}): {body}");
        }
        Err(map_api_error(status, &body))
    }

    pub async fn read_empty(&self, response: Response) -> AppResult<()> {
        self.read_bytes(response).await.map(|_| ())
    }

    fn endpoint_url(&self, route: &Route) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| AppError::Config("instance url cannot hold a path".to_string()))?;
            segments.pop_if_empty();
            segments.extend(&route.segments);
        }

        if !route.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&route.query);
        }

        Ok(url)
    }
}

fn attach_payload(request: RequestBuilder, payload: &Payload) -> AppResult<RequestBuilder> {
    let request = match payload {
        Payload::Empty => request,
        Payload::Json(value) => request.json(value),
        Payload::Form(fields) => request.form(fields),
        Payload::Upload(file) => {
            let part = Part::bytes(file.data.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)
                .map_err(|err| {
                    AppError::InvalidInput(format!("invalid mime type `{}`: {err}", file.mime_type))
                })?;
            request.multipart(Form::new().part(file.field, part))
        }
    };

    Ok(request)
}

/// A 401, or the 302 the upstream service uses for expired sessions.
pub fn is_stale_token_signal(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FOUND
}

pub fn map_api_error(status: StatusCode, body: &str) -> AppError {
    match serde_json::from_str::<RequestError>(body) {
        Ok(error) => AppError::AuthService {
            code: error.error,
            description: error.description,
        },
        Err(_) => {
            let body = body.trim();
            AppError::Transport {
                status,
                body: if body.is_empty() {
                    "no error details in response body".to_string()
                } else {
                    body.to_string()
                },
            }
        }
    }
}
