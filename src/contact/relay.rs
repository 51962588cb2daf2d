use crate::{
    config::RelaySettings,
    contact::form::Submission,
    foundation::error::{KloudyError, KloudyResult},
};

/// JSON body accepted by the Web3Forms submit endpoint.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RelayRequest {
    pub access_key: String,
    pub email: String,
    pub message: String,
    pub from_name: String,
    pub subject: String,
}

impl RelayRequest {
    pub fn new(access_key: &str, from_name: &str, submission: &Submission) -> Self {
        Self {
            access_key: access_key.to_string(),
            email: submission.email.clone(),
            message: submission.message.clone(),
            from_name: from_name.to_string(),
            subject: format!("New message from {}", submission.email),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Delivers a validated submission. `Ok` only when the relay reports success.
#[async_trait::async_trait]
pub trait Relay: Send + Sync {
    async fn send(&self, submission: &Submission) -> KloudyResult<()>;
}

pub struct Web3FormsRelay {
    client: reqwest::Client,
    endpoint: String,
    access_key: String,
    from_name: String,
}

impl Web3FormsRelay {
    pub fn new(settings: &RelaySettings) -> KloudyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| KloudyError::relay(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            access_key: settings.resolved_access_key(),
            from_name: settings.from_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Relay for Web3FormsRelay {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn send(&self, submission: &Submission) -> KloudyResult<()> {
        let body = RelayRequest::new(&self.access_key, &self.from_name, submission);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| KloudyError::relay(format!("request failed: {e}")))?;

        // The body's `success` flag decides the outcome, whatever the HTTP status.
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| KloudyError::relay(format!("failed to read response body: {e}")))?;
        let parsed: RelayResponse = serde_json::from_str(&text).map_err(|e| {
            KloudyError::relay(format!("unparsable response (HTTP {status}): {e}"))
        })?;

        if parsed.success {
            tracing::debug!(%status, "relay accepted submission");
            Ok(())
        } else {
            Err(KloudyError::relay(format!(
                "relay rejected submission (HTTP {status}): {}",
                parsed.message.as_deref().unwrap_or("no message")
            )))
        }
    }
}
