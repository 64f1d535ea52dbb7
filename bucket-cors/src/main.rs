use bucket_cors::{
    apply_cors, upload_cors_policy, CredentialFileConnector, DEFAULT_CANDIDATES,
    DEFAULT_CREDENTIALS_PATH,
};
use clap::Parser;
use service_core::observability::init_cli_tracing;
use std::path::PathBuf;

/// Apply the upload CORS policy to the project's storage bucket.
#[derive(Debug, Parser)]
#[command(name = "bucket-cors", version)]
struct Args {
    /// Service-account key used to authenticate.
    #[arg(long, env = "FIREBASE_LOCAL_CREDENTIALS_PATH", default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Candidate bucket name, tried in the order given. Defaults to the
    /// project's known bucket names.
    #[arg(long = "bucket", value_name = "NAME")]
    buckets: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_cli_tracing("info");

    let args = Args::parse();
    let candidates = if args.buckets.is_empty() {
        DEFAULT_CANDIDATES.iter().map(|b| b.to_string()).collect()
    } else {
        args.buckets
    };

    let connector = CredentialFileConnector::new(args.credentials);
    let report = apply_cors(&candidates, &upload_cors_policy(), &connector).await;

    // Leaves the exit status untouched; the log is the only record of a miss.
    match report.updated_bucket() {
        Some(bucket) => tracing::info!(bucket = %bucket, "CORS policy applied"),
        None => tracing::warn!(
            attempted = report.attempts.len(),
            "No candidate bucket was updated"
        ),
    }

    Ok(())
}
