//! Request-encoding families for supported model identifiers
//!
//! Each family pairs a request body shape with the response field the
//! generated text is read from. The family is resolved once from the model
//! id when the invoker is constructed.

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Chat-message request shape, text under `content[0].text`
    ChatMessages,
    /// Single-turn completion request shape, text under `completion`
    LegacyCompletion,
    /// Generic text-generation shape, text under `results[0].outputText`
    TextGeneration,
}

impl ModelFamily {
    /// Resolve the family for a model identifier by naming convention
    pub fn for_model_id(model_id: &str) -> Self {
        let id = model_id.to_lowercase();
        if id.contains("claude-3") || id.contains("claude-4") {
            ModelFamily::ChatMessages
        } else if id.contains("claude") {
            ModelFamily::LegacyCompletion
        } else {
            ModelFamily::TextGeneration
        }
    }

    /// Build the request body for this family
    pub fn build_request(&self, prompt: &str, temperature: f64, max_tokens: u32) -> Value {
        match self {
            ModelFamily::ChatMessages => json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": max_tokens,
                "temperature": temperature,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    }
                ],
            }),
            ModelFamily::LegacyCompletion => json!({
                "prompt": format!("\n\nHuman: {prompt}\n\nAssistant:"),
                "temperature": temperature,
                "max_tokens_to_sample": max_tokens,
            }),
            ModelFamily::TextGeneration => json!({
                "inputText": prompt,
                "textGenerationConfig": {
                    "temperature": temperature,
                    "maxTokenCount": max_tokens,
                },
            }),
        }
    }

    /// Extract the generated text from a response body for this family
    ///
    /// Missing or mis-shaped fields yield an empty string; the validator
    /// downstream treats that like any other unparseable output.
    pub fn extract_text(&self, response: &Value) -> String {
        let text = match self {
            ModelFamily::ChatMessages => response["content"][0]["text"].as_str(),
            ModelFamily::LegacyCompletion => response["completion"].as_str(),
            ModelFamily::TextGeneration => response["results"][0]["outputText"].as_str(),
        };
        text.unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_resolution() {
        assert_eq!(
            ModelFamily::for_model_id("anthropic.claude-3-haiku-20240307-v1:0"),
            ModelFamily::ChatMessages
        );
        assert_eq!(
            ModelFamily::for_model_id("anthropic.claude-4-sonnet-v1:0"),
            ModelFamily::ChatMessages
        );
        assert_eq!(
            ModelFamily::for_model_id("anthropic.claude-v2:1"),
            ModelFamily::LegacyCompletion
        );
        assert_eq!(
            ModelFamily::for_model_id("amazon.titan-text-express-v1"),
            ModelFamily::TextGeneration
        );
    }

    #[test]
    fn test_chat_messages_request_shape() {
        let body = ModelFamily::ChatMessages.build_request("hello", 0.0, 800);

        assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_legacy_completion_request_shape() {
        let body = ModelFamily::LegacyCompletion.build_request("hello", 0.5, 600);

        assert_eq!(body["prompt"], "\n\nHuman: hello\n\nAssistant:");
        assert_eq!(body["max_tokens_to_sample"], 600);
    }

    #[test]
    fn test_text_generation_request_shape() {
        let body = ModelFamily::TextGeneration.build_request("hello", 0.3, 100);

        assert_eq!(body["inputText"], "hello");
        assert_eq!(body["textGenerationConfig"]["maxTokenCount"], 100);
    }

    #[test]
    fn test_extract_text_per_family() {
        let chat = serde_json::json!({"content": [{"text": "chat reply"}]});
        assert_eq!(ModelFamily::ChatMessages.extract_text(&chat), "chat reply");

        let legacy = serde_json::json!({"completion": "completion reply"});
        assert_eq!(
            ModelFamily::LegacyCompletion.extract_text(&legacy),
            "completion reply"
        );

        let generic = serde_json::json!({"results": [{"outputText": "generic reply"}]});
        assert_eq!(
            ModelFamily::TextGeneration.extract_text(&generic),
            "generic reply"
        );
    }

    #[test]
    fn test_extract_text_tolerates_missing_fields() {
        let empty = serde_json::json!({});
        assert_eq!(ModelFamily::ChatMessages.extract_text(&empty), "");
        assert_eq!(ModelFamily::LegacyCompletion.extract_text(&empty), "");
        assert_eq!(ModelFamily::TextGeneration.extract_text(&empty), "");
    }
}
