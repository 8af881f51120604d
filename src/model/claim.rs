//! Structured claim records produced and persisted by the pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five fields every validated extraction record carries
pub const REQUIRED_FIELDS: &[&str] = &[
    "claimant_name",
    "policy_number",
    "incident_date",
    "claim_amount",
    "incident_description",
];

/// Structured information extracted from a claim document
///
/// All five recognized fields are always present after validation. Values are
/// kept exactly as the model produced them (string, null, or anything else);
/// no type coercion is performed. When parsing failed entirely,
/// `raw_model_output` holds the unmodified model output for human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedClaimInfo {
    #[serde(default)]
    pub claimant_name: Value,
    #[serde(default)]
    pub policy_number: Value,
    #[serde(default)]
    pub incident_date: Value,
    #[serde(default)]
    pub claim_amount: Value,
    #[serde(default)]
    pub incident_description: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_model_output: Option<String>,
}

impl ExtractedClaimInfo {
    /// Record with all five fields null and no raw output attached
    pub fn empty() -> Self {
        Self {
            claimant_name: Value::Null,
            policy_number: Value::Null,
            incident_date: Value::Null,
            claim_amount: Value::Null,
            incident_description: Value::Null,
            raw_model_output: None,
        }
    }

    /// Fallback record for model output that could not be parsed: all five
    /// fields null, with the original output preserved verbatim
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self {
            raw_model_output: Some(raw.into()),
            ..Self::empty()
        }
    }

    /// Query string for snippet retrieval: policy number and incident
    /// description concatenated, null fields treated as empty
    pub fn retrieval_query(&self) -> String {
        format!(
            "{} {}",
            value_text(&self.policy_number),
            value_text(&self.incident_description)
        )
    }
}

/// Render a field value as query text. Strings pass through, null becomes
/// empty, anything else keeps its JSON rendering.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Final record of one pipeline run, persisted for downstream readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub claim_key: String,
    pub extracted_info: ExtractedClaimInfo,
    pub summary: String,
    pub policy_snippets: Vec<String>,
    pub extract_model_id: String,
    pub summary_model_id: String,
}
