use cms_service::bootstrap;
use cms_service::config::CmsConfig;
use cms_service::pages::{check_pages, check_storage_bucket, PageStatus, KNOWN_PAGES};
use service_core::observability::init_cli_tracing;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_cli_tracing("info");

    let config = CmsConfig::load()?;
    let Some(app) = bootstrap::initialize(
        &config.firebase.credential_paths(),
        config.firebase.options(),
    )
    .into_handle() else {
        tracing::error!("Firebase is not configured; cannot check pages");
        return Ok(ExitCode::FAILURE);
    };

    println!("Checking pages for project: {}", app.project_id());

    for check in check_pages(app.firestore(), &KNOWN_PAGES).await {
        match check.status {
            PageStatus::Found(document) => {
                println!("--- {} ---", check.id);
                println!("{}", serde_json::to_string_pretty(&document.fields)?);
            }
            PageStatus::Missing => println!("--- {} NOT FOUND ---", check.id),
            PageStatus::Error(e) => println!("--- {} ERROR: {} ---", check.id, e),
        }
    }

    match check_storage_bucket(&app).await {
        Ok(true) => println!("Storage bucket {} exists", app.storage_bucket()),
        Ok(false) => println!("Storage bucket {} NOT FOUND", app.storage_bucket()),
        Err(e) => println!("Storage bucket {} ERROR: {}", app.storage_bucket(), e),
    }

    Ok(ExitCode::SUCCESS)
}
