use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use claims_agent::generation::HttpGenerationService;
use claims_agent::model::{Config, CLAIMS_PREFIX};
use claims_agent::service::ClaimPipeline;
use claims_agent::store::{ClaimStore, FsClaimStore};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let store: Arc<dyn ClaimStore> = Arc::new(FsClaimStore::new(config.data_dir.clone()));
    let service = Arc::new(HttpGenerationService::from_config(&config));
    let pipeline = ClaimPipeline::new(Arc::clone(&store), service, &config);

    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(command) if command == "upload" => {
            let (Some(local_path), Some(key)) = (args.next(), args.next()) else {
                eprintln!("usage: claims-agent upload <local-path> <key>");
                return ExitCode::FAILURE;
            };
            upload_document(store.as_ref(), &local_path, &key).await
        }
        key => {
            let claim_key =
                key.unwrap_or_else(|| format!("{CLAIMS_PREFIX}sample_claim1.txt"));
            process_claim(&pipeline, &claim_key).await
        }
    }
}

/// Run the pipeline for one claim key and print the result record
async fn process_claim(pipeline: &ClaimPipeline, claim_key: &str) -> ExitCode {
    tracing::info!(key = %claim_key, "Running claim processor");

    match pipeline.process_claim_document(claim_key).await {
        Ok(result) => {
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!(error = %e, "Failed to render result"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, key = %claim_key, "Claim processing aborted");
            ExitCode::FAILURE
        }
    }
}

/// Stage a local file into the store at the given key
async fn upload_document(store: &dyn ClaimStore, local_path: &str, key: &str) -> ExitCode {
    let body = match tokio::fs::read(local_path).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, path = %local_path, "Failed to read local file");
            return ExitCode::FAILURE;
        }
    };

    match store.write(key, &body, "text/plain").await {
        Ok(()) => {
            tracing::info!(path = %local_path, key = %key, "Uploaded document");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Upload failed");
            ExitCode::FAILURE
        }
    }
}
