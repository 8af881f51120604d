//! Prompt templates for the claims processing pipeline
//!
//! A fixed set of named, `{slot}`-parameterized templates. Rendering fails
//! fast on unknown names or missing substitutions; no partial output is ever
//! returned.

use std::collections::HashMap;

use regex::Regex;

/// Template name for structured extraction from a claim document
pub const TEMPLATE_EXTRACT_INFO: &str = "extract_info";
/// Template name for grounded summary generation
pub const TEMPLATE_GENERATE_SUMMARY: &str = "generate_summary";

const EXTRACT_INFO_TEMPLATE: &str = r#"You are an insurance claims processor. Extract the following information from the claim document:
- claimant_name: Full name of the person making the claim
- policy_number: Insurance policy number
- incident_date: Date when the incident occurred
- claim_amount: Amount being claimed
- incident_description: Detailed description of what happened

Document text:
{document_text}

Return the information in JSON format with the exact field names specified above.
"#;

const GENERATE_SUMMARY_TEMPLATE: &str = r#"You are an insurance claims processor. Based on the extracted claim information and relevant policy snippets, generate a concise summary of the claim.

Extracted Information:
{extracted_info}

Policy Information:
{policy_text}

Provide a summary that includes:
1. Brief description of the incident
2. Coverage assessment based on policy
3. Next steps for processing

Keep the summary professional and concise.
"#;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Missing required parameter for template '{template}': {slot}")]
    MissingSubstitution { template: String, slot: String },
}

/// Registry of prompt templates for the pipeline tasks
///
/// The template set is fixed at construction; rendering is a pure function
/// over the table.
pub struct PromptTemplateRegistry {
    templates: HashMap<&'static str, &'static str>,
    slot_pattern: Regex,
}

impl PromptTemplateRegistry {
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(TEMPLATE_EXTRACT_INFO, EXTRACT_INFO_TEMPLATE);
        templates.insert(TEMPLATE_GENERATE_SUMMARY, GENERATE_SUMMARY_TEMPLATE);

        Self {
            templates,
            // Matches: {slot_name}
            slot_pattern: Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap(),
        }
    }

    /// Render a template by name with the provided substitutions
    ///
    /// Every `{slot}` in the template must have a matching substitution key;
    /// the first missing slot aborts the render.
    pub fn render(
        &self,
        name: &str,
        substitutions: &[(&str, &str)],
    ) -> Result<String, PromptError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| PromptError::UnknownTemplate(name.to_string()))?;

        for caps in self.slot_pattern.captures_iter(template) {
            let slot = &caps[1];
            if !substitutions.iter().any(|(key, _)| *key == slot) {
                return Err(PromptError::MissingSubstitution {
                    template: name.to_string(),
                    slot: slot.to_string(),
                });
            }
        }

        let rendered = self
            .slot_pattern
            .replace_all(template, |caps: &regex::Captures<'_>| {
                let slot = &caps[1];
                substitutions
                    .iter()
                    .find(|(key, _)| *key == slot)
                    .map(|(_, value)| (*value).to_string())
                    .unwrap_or_default()
            });

        Ok(rendered.into_owned())
    }
}

impl Default for PromptTemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
