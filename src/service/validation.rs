//! Validation and repair of model extraction output
//!
//! Generative models return JSON wrapped in prose, truncated, or not at all.
//! This module resolves every raw output to the fixed record shape: parsed
//! fields where possible, an all-null fallback carrying the verbatim output
//! where not. It never fails.

use serde_json::{Map, Value};

use crate::model::ExtractedClaimInfo;

/// Result of validating raw model output
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// A JSON object was recovered; all five required fields are present
    Parsed(ExtractedClaimInfo),
    /// No JSON object could be recovered; the raw output is preserved
    Unparsed { raw: String },
}

impl ValidationOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ValidationOutcome::Parsed(_))
    }

    /// Resolve either arm to the guaranteed record shape
    pub fn into_claim_info(self) -> ExtractedClaimInfo {
        match self {
            ValidationOutcome::Parsed(info) => info,
            ValidationOutcome::Unparsed { raw } => ExtractedClaimInfo::unparsed(raw),
        }
    }
}

/// Parse raw model output into the fixed extraction record shape
///
/// Tries the text as JSON directly, then the greedy first-`{`-to-last-`}`
/// substring. A recovered object keeps its values as-is, with missing
/// required fields set to null and unrecognized keys dropped. Anything else
/// becomes [`ValidationOutcome::Unparsed`].
pub fn validate_extracted_info(raw_text: &str) -> ValidationOutcome {
    let parsed = serde_json::from_str::<Value>(raw_text)
        .ok()
        .or_else(|| isolate_json_object(raw_text));

    match parsed {
        Some(Value::Object(map)) => ValidationOutcome::Parsed(claim_info_from_object(map)),
        _ => {
            tracing::debug!(
                output_preview = raw_text.chars().take(100).collect::<String>(),
                "Model output is not a JSON object, keeping raw text"
            );
            ValidationOutcome::Unparsed {
                raw: raw_text.to_string(),
            }
        }
    }
}

/// Greedy match from the first `{` to the last `}`
fn isolate_json_object(raw_text: &str) -> Option<Value> {
    let start = raw_text.find('{')?;
    let end = raw_text.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&raw_text[start..=end]).ok()
}

fn claim_info_from_object(mut map: Map<String, Value>) -> ExtractedClaimInfo {
    let mut take = |field: &str| map.remove(field).unwrap_or(Value::Null);

    ExtractedClaimInfo {
        claimant_name: take("claimant_name"),
        policy_number: take("policy_number"),
        incident_date: take("incident_date"),
        claim_amount: take("claim_amount"),
        incident_description: take("incident_description"),
        raw_model_output: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_json_object() {
        let raw = r#"{"claimant_name": "Jane Doe", "policy_number": "P-100",
                      "incident_date": "2024-03-01", "claim_amount": "$2,400",
                      "incident_description": "Burst pipe flooded the kitchen."}"#;

        let outcome = validate_extracted_info(raw);
        assert!(outcome.is_parsed());

        let info = outcome.into_claim_info();
        assert_eq!(info.claimant_name, json!("Jane Doe"));
        assert_eq!(info.incident_description, json!("Burst pipe flooded the kitchen."));
        assert_eq!(info.raw_model_output, None);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = r#"Sure, here is the data: {"claimant_name": "Jane Doe", "policy_number": "P-100"}"#;

        let info = validate_extracted_info(raw).into_claim_info();

        assert_eq!(info.claimant_name, json!("Jane Doe"));
        assert_eq!(info.policy_number, json!("P-100"));
        assert_eq!(info.incident_date, Value::Null);
        assert_eq!(info.claim_amount, Value::Null);
        assert_eq!(info.incident_description, Value::Null);
        assert_eq!(info.raw_model_output, None);
    }

    #[test]
    fn test_refusal_text_becomes_fallback() {
        let raw = "I cannot process this request.";

        let outcome = validate_extracted_info(raw);
        assert!(!outcome.is_parsed());

        let info = outcome.into_claim_info();
        assert_eq!(info.claimant_name, Value::Null);
        assert_eq!(info.raw_model_output, Some(raw.to_string()));
    }

    #[test]
    fn test_non_object_json_becomes_fallback() {
        let info = validate_extracted_info("[1, 2, 3]").into_claim_info();
        assert_eq!(info.raw_model_output, Some("[1, 2, 3]".to_string()));

        let info = validate_extracted_info("null").into_claim_info();
        assert_eq!(info.raw_model_output, Some("null".to_string()));
    }

    #[test]
    fn test_unbalanced_braces_become_fallback() {
        let raw = r#"partial output {"claimant_name": "Jane"#;

        let outcome = validate_extracted_info(raw);
        assert!(!outcome.is_parsed());
    }

    #[test]
    fn test_nested_objects_survive_greedy_match() {
        let raw = r#"Result: {"claimant_name": {"first": "Jane", "last": "Doe"}, "claim_amount": 2400}"#;

        let info = validate_extracted_info(raw).into_claim_info();

        // Values are kept as-is, no type coercion
        assert_eq!(info.claimant_name, json!({"first": "Jane", "last": "Doe"}));
        assert_eq!(info.claim_amount, json!(2400));
    }

    #[test]
    fn test_unrecognized_keys_dropped() {
        let raw = r#"{"claimant_name": "Jane Doe", "adjuster_notes": "escalate"}"#;

        let info = validate_extracted_info(raw).into_claim_info();
        let serialized = serde_json::to_value(&info).unwrap();

        assert!(serialized.get("adjuster_notes").is_none());
    }

    #[test]
    fn test_revalidating_raw_output_is_deterministic() {
        let raw = "I cannot process this request.";
        let first = validate_extracted_info(raw).into_claim_info();

        let again = validate_extracted_info(first.raw_model_output.as_deref().unwrap())
            .into_claim_info();

        assert_eq!(first, again);
    }

    #[test]
    fn test_sentinel_error_text_fails_safely() {
        let raw = "Error invoking model anthropic.claude-3-haiku-20240307-v1:0: \
                   ThrottlingException - Too many requests";

        let info = validate_extracted_info(raw).into_claim_info();

        assert_eq!(info.claimant_name, Value::Null);
        assert_eq!(info.raw_model_output, Some(raw.to_string()));
    }
}
