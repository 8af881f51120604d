//! HTTP implementation of the generation service boundary

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::model::Config;

use super::{GenerationService, GenerationServiceError};

const USER_AGENT: &str = "claims-agent/1.0";

/// Generation service reached over HTTP
///
/// Posts the family-encoded request body to
/// `{base_url}/model/{model_id}/invoke` and returns the decoded response
/// body. All failures map to typed [`GenerationServiceError`]s; the invoker
/// above decides what to do with them.
pub struct HttpGenerationService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpGenerationService {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.model_endpoint.clone(),
            config.model_api_key.clone(),
            config.request_timeout_secs,
        )
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{}/invoke",
            self.base_url.trim_end_matches('/'),
            model_id
        )
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn invoke(&self, model_id: &str, body: Value) -> Result<Value, GenerationServiceError> {
        let url = self.invoke_url(model_id);
        tracing::debug!(model_id = %model_id, url = %url, "Invoking generation service");

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref api_key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationServiceError::Transport(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!(model_id = %model_id, "Generation service rate limited");
                Err(GenerationServiceError::Throttled(
                    response.text().await.unwrap_or_default(),
                ))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(GenerationServiceError::AccessDenied(
                    response.text().await.unwrap_or_default(),
                ))
            }
            StatusCode::NOT_FOUND => {
                Err(GenerationServiceError::ModelNotFound(model_id.to_string()))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(GenerationServiceError::InvalidRequest(
                    response.text().await.unwrap_or_default(),
                ))
            }
            s if !s.is_success() => Err(GenerationServiceError::Transport(format!(
                "HTTP {}: {}",
                s,
                response.text().await.unwrap_or_default()
            ))),
            _ => response
                .json()
                .await
                .map_err(|e| GenerationServiceError::MalformedResponse(e.to_string())),
        }
    }
}
