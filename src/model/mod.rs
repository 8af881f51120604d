pub mod claim;
pub mod config;

pub use claim::{ExtractedClaimInfo, PipelineResult, REQUIRED_FIELDS};
pub use config::{Config, RetrievalConfig, CLAIMS_PREFIX, OUTPUTS_PREFIX, POLICIES_PREFIX};
