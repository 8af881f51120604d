//! Text-generation client for the claims pipeline
//!
//! The invoker wraps a generation service behind a trait, encodes requests
//! per the model's family, and converts every remote failure into a
//! [`GenerationOutcome`] instead of unwinding, so a flaky model never aborts
//! a pipeline run.

mod family;
mod http;

pub use family::ModelFamily;
pub use http::HttpGenerationService;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Typed failures from the generation service boundary
#[derive(Debug, thiserror::Error)]
pub enum GenerationServiceError {
    #[error("Throttled: {0}")]
    Throttled(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GenerationServiceError {
    /// Stable service error code, used in sentinel error text
    pub fn code(&self) -> &'static str {
        match self {
            GenerationServiceError::Throttled(_) => "ThrottlingException",
            GenerationServiceError::AccessDenied(_) => "AccessDeniedException",
            GenerationServiceError::InvalidRequest(_) => "ValidationException",
            GenerationServiceError::ModelNotFound(_) => "ResourceNotFoundException",
            GenerationServiceError::Transport(_) => "ServiceUnavailableException",
            GenerationServiceError::MalformedResponse(_) => "InternalServerException",
        }
    }

    /// The underlying failure message, without the code prefix
    pub fn message(&self) -> &str {
        match self {
            GenerationServiceError::Throttled(msg)
            | GenerationServiceError::AccessDenied(msg)
            | GenerationServiceError::InvalidRequest(msg)
            | GenerationServiceError::ModelNotFound(msg)
            | GenerationServiceError::Transport(msg)
            | GenerationServiceError::MalformedResponse(msg) => msg,
        }
    }
}

/// Network boundary to the text-generation capability
///
/// Accepts a model identifier and an encoded request body; returns the
/// encoded response body or a typed service error.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Value) -> Result<Value, GenerationServiceError>;
}

/// Outcome of one generation call
///
/// Service failures are data, not control flow: a failed call carries the
/// error identity explicitly, and [`GenerationOutcome::into_text`] renders
/// the same sentinel string the persisted results have always used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Text produced by the model (possibly empty)
    Generated(String),
    /// The service call failed; no model output exists
    ServiceError {
        model_id: String,
        code: &'static str,
        message: String,
    },
}

impl GenerationOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, GenerationOutcome::ServiceError { .. })
    }

    /// Resolve to text: generated output as-is, or the sentinel error string
    pub fn into_text(self) -> String {
        match self {
            GenerationOutcome::Generated(text) => text,
            GenerationOutcome::ServiceError {
                model_id,
                code,
                message,
            } => format!("Error invoking model {model_id}: {code} - {message}"),
        }
    }
}

/// Client for invoking one generative model
///
/// The request encoding family is resolved once at construction. Safe to
/// share read-only across concurrent pipeline runs.
pub struct ModelInvoker {
    service: Arc<dyn GenerationService>,
    model_id: String,
    family: ModelFamily,
}

impl ModelInvoker {
    pub fn new(service: Arc<dyn GenerationService>, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        let family = ModelFamily::for_model_id(&model_id);

        Self {
            service,
            model_id,
            family,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Invoke the model with the given prompt and sampling parameters
    ///
    /// Never returns an error: remote failures become
    /// [`GenerationOutcome::ServiceError`].
    pub async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> GenerationOutcome {
        let temperature = temperature.clamp(0.0, 1.0);
        let max_tokens = max_tokens.max(1);

        let body = self.family.build_request(prompt, temperature, max_tokens);

        match self.service.invoke(&self.model_id, body).await {
            Ok(response) => GenerationOutcome::Generated(self.family.extract_text(&response)),
            Err(e) => {
                tracing::warn!(
                    model_id = %self.model_id,
                    error = %e,
                    "Generation service call failed"
                );
                GenerationOutcome::ServiceError {
                    model_id: self.model_id.clone(),
                    code: e.code(),
                    message: e.message().to_string(),
                }
            }
        }
    }
}
