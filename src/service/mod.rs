pub mod pipeline;
pub mod retrieval;
pub mod validation;

pub use pipeline::{ClaimPipeline, PipelineError};
pub use retrieval::{fallback_policy_snippets, SnippetRetriever, NO_MATCH_PLACEHOLDER};
pub use validation::{validate_extracted_info, ValidationOutcome};
