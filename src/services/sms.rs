use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Provider rejected message: {0}")]
    Rejected(String),
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError>;
}

/// Logs messages instead of sending them (development)
#[derive(Debug, Default)]
pub struct ConsoleSmsSender;

#[async_trait]
impl SmsSender for ConsoleSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        tracing::info!(to = %to, body = %body, "sms (console)");
        Ok(())
    }
}

/// Posts `{to, message}` as JSON to an SMS gateway endpoint
pub struct HttpSmsSender {
    client: Client,
    url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    message: &'a str,
}

impl HttpSmsSender {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            url,
            api_key,
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&SmsPayload { to, message: body })
            .send()
            .await
            .map_err(|e| SmsError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SmsError::Rejected(format!("status {}", response.status())));
        }

        Ok(())
    }
}
