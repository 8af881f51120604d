//! Claim processing pipeline
//!
//! Sequences one document through extraction, validation, retrieval, and
//! summary generation, then persists the assembled result. Model failures
//! degrade the output but never abort a run; only a missing document, a
//! template error, or a failed persist does.

use std::sync::Arc;

use crate::generation::{GenerationService, ModelInvoker};
use crate::model::{Config, PipelineResult, CLAIMS_PREFIX, OUTPUTS_PREFIX, POLICIES_PREFIX};
use crate::prompt::{PromptError, PromptTemplateRegistry, TEMPLATE_EXTRACT_INFO, TEMPLATE_GENERATE_SUMMARY};
use crate::service::retrieval::{fallback_policy_snippets, SnippetRetriever, NO_MATCH_PLACEHOLDER};
use crate::service::validation::validate_extracted_info;
use crate::store::{ClaimStore, StoreError};

const EXTRACT_TEMPERATURE: f64 = 0.0;
const EXTRACT_MAX_TOKENS: u32 = 800;
const SUMMARY_TEMPERATURE: f64 = 0.3;
const SUMMARY_MAX_TOKENS: u32 = 600;

const TOP_K_SNIPPETS: usize = 3;
const SNIPPET_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Claim document not found: {0}")]
    DocumentNotFound(String),

    #[error("Prompt template error: {0}")]
    Template(#[from] PromptError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => PipelineError::DocumentNotFound(key),
            other => PipelineError::Store(other),
        }
    }
}

/// One-document-at-a-time claims pipeline
///
/// Holds no state across runs; safe to share across concurrent runs.
pub struct ClaimPipeline {
    store: Arc<dyn ClaimStore>,
    prompts: PromptTemplateRegistry,
    extract_invoker: ModelInvoker,
    summary_invoker: ModelInvoker,
    retriever: SnippetRetriever,
}

impl ClaimPipeline {
    pub fn new(
        store: Arc<dyn ClaimStore>,
        service: Arc<dyn GenerationService>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            prompts: PromptTemplateRegistry::new(),
            extract_invoker: ModelInvoker::new(Arc::clone(&service), &config.extract_model_id),
            summary_invoker: ModelInvoker::new(service, &config.summary_model_id),
            retriever: SnippetRetriever::new(&config.retrieval),
        }
    }

    /// Process one claim document end to end
    ///
    /// 1) Load claim text from the store
    /// 2) Extract structured info with the generation service
    /// 3) Retrieve relevant policy snippets
    /// 4) Generate a concise grounded summary
    /// 5) Persist the result record under `outputs/` and return it
    pub async fn process_claim_document(
        &self,
        key: &str,
    ) -> Result<PipelineResult, PipelineError> {
        tracing::info!(key = %key, "Processing claim document");
        let document_text = self.store.read(key).await?;

        let extract_prompt = self
            .prompts
            .render(TEMPLATE_EXTRACT_INFO, &[("document_text", document_text.as_str())])?;

        tracing::debug!(model_id = %self.extract_invoker.model_id(), "Invoking extraction model");
        let raw_extracted = self
            .extract_invoker
            .generate(&extract_prompt, EXTRACT_TEMPERATURE, EXTRACT_MAX_TOKENS)
            .await
            .into_text();

        let extracted_info = validate_extracted_info(&raw_extracted).into_claim_info();
        if extracted_info.raw_model_output.is_some() {
            tracing::warn!(key = %key, "Extraction output could not be parsed, continuing degraded");
        }

        let corpus = self.load_policy_snippets().await;
        let query = extracted_info.retrieval_query();
        let relevant_snippets = self.retriever.retrieve(&corpus, &query, TOP_K_SNIPPETS);
        tracing::debug!(
            key = %key,
            corpus_size = corpus.len(),
            retrieved = relevant_snippets.len(),
            "Policy snippet retrieval complete"
        );

        let policy_text = if relevant_snippets.is_empty() {
            NO_MATCH_PLACEHOLDER.to_string()
        } else {
            relevant_snippets.join(SNIPPET_SEPARATOR)
        };

        let extracted_json =
            serde_json::to_string_pretty(&extracted_info).unwrap_or_default();
        let summary_prompt = self.prompts.render(
            TEMPLATE_GENERATE_SUMMARY,
            &[
                ("extracted_info", extracted_json.as_str()),
                ("policy_text", policy_text.as_str()),
            ],
        )?;

        tracing::debug!(model_id = %self.summary_invoker.model_id(), "Invoking summary model");
        let summary = self
            .summary_invoker
            .generate(&summary_prompt, SUMMARY_TEMPERATURE, SUMMARY_MAX_TOKENS)
            .await
            .into_text();

        let result = PipelineResult {
            claim_key: key.to_string(),
            extracted_info,
            summary,
            policy_snippets: relevant_snippets,
            extract_model_id: self.extract_invoker.model_id().to_string(),
            summary_model_id: self.summary_invoker.model_id().to_string(),
        };

        self.persist_result(&result).await?;
        tracing::info!(key = %key, "Claim processing complete");
        Ok(result)
    }

    /// Load the policy snippet corpus from the store's `policies/` prefix
    ///
    /// Unreadable or empty objects are skipped; an empty corpus falls back to
    /// the built-in reference snippets so retrieval always has candidates.
    async fn load_policy_snippets(&self) -> Vec<String> {
        let keys = match self.store.list(POLICIES_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list policy snippets");
                Vec::new()
            }
        };

        let mut snippets = Vec::new();
        for key in keys {
            match self.store.read(&key).await {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        snippets.push(text.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "Skipping unreadable policy snippet");
                }
            }
        }

        if snippets.is_empty() {
            tracing::debug!("Policy corpus empty, using built-in fallback snippets");
            return fallback_policy_snippets();
        }
        snippets
    }

    /// Persist the result record under `outputs/{basename}_result.json`
    async fn persist_result(&self, result: &PipelineResult) -> Result<(), PipelineError> {
        let base_name = result
            .claim_key
            .strip_prefix(CLAIMS_PREFIX)
            .unwrap_or(&result.claim_key);
        let base_name = base_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(base_name);
        let out_key = format!("{OUTPUTS_PREFIX}{base_name}_result.json");

        let body = serde_json::to_vec_pretty(result).map_err(|e| {
            PipelineError::Store(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            )))
        })?;

        tracing::info!(key = %out_key, "Writing pipeline result");
        self.store
            .write(&out_key, &body, "application/json")
            .await
            .map_err(PipelineError::Store)?;

        Ok(())
    }
}
