use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::refresh::RefreshCoordinator;

/// A request is retried after at most this many refreshes before the
/// caller is told to sign in again.
pub const MAX_REFRESH_ATTEMPTS: u32 = 2;

const REFRESH_PATH: &str = "/api/auth/refresh";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session expired, please sign in again")]
    SignInRequired,

    #[error("Refresh failed: {0}")]
    Refresh(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Outcome of a refresh call, shared between all waiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    Rejected(u16),
    Transport(String),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Cookie-carrying client for the JSON API that renews the session once
/// per burst of expired requests.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    refresh: RefreshCoordinator<(), RefreshError>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh: RefreshCoordinator::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Calls the refresh endpoint, joining a refresh already in flight.
    pub async fn refresh_session(&self) -> Result<(), RefreshError> {
        let http = self.http.clone();
        let url = self.url(REFRESH_PATH);

        self.refresh
            .run(move || async move {
                let response = http
                    .post(url)
                    .send()
                    .await
                    .map_err(|e| RefreshError::Transport(e.to_string()))?;

                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(RefreshError::Rejected(response.status().as_u16()))
                }
            })
            .await
    }

    /// Sends a request, refreshing the session and retrying on 401.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut refreshes = 0;

        loop {
            let mut request = self.http.request(method.clone(), self.url(path));
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            if refreshes >= MAX_REFRESH_ATTEMPTS {
                tracing::debug!(path, "refresh attempts exhausted");
                return Err(ClientError::SignInRequired);
            }
            refreshes += 1;

            match self.refresh_session().await {
                Ok(()) => continue,
                Err(RefreshError::Rejected(status)) => {
                    tracing::debug!(path, status, "refresh rejected");
                    return Err(ClientError::SignInRequired);
                }
                Err(RefreshError::Transport(e)) => return Err(ClientError::Refresh(e)),
            }
        }
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.send::<()>(Method::GET, path, None).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        decode(response).await
    }
}

/// Unwraps the `data` of a success envelope, or turns an error envelope
/// into `ClientError::Api`.
async fn decode<T>(response: reqwest::Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let envelope: Envelope<T> = response.json().await?;

    let api_error = |message: String| ClientError::Api {
        status: status.as_u16(),
        message,
    };

    if !status.is_success() {
        return Err(api_error(envelope.message));
    }
    match envelope.data {
        Some(data) => Ok(data),
        // Message-only envelopes decode into `()`.
        None => serde_json::from_value(serde_json::Value::Null)
            .map_err(|_| api_error(envelope.message)),
    }
}
