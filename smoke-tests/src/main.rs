use clap::Parser;
use service_core::observability::init_cli_tracing;
use smoke_tests::{run_smoke_tests, SmokeTester, DEFAULT_BASE_URL};
use std::process::ExitCode;

/// Smoke-test a deployed CMS API.
#[derive(Debug, Parser)]
#[command(name = "smoke-tests", version)]
struct Args {
    /// Base URL of the deployment under test.
    #[arg(long, env = "SMOKE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_cli_tracing("warn");

    let args = Args::parse();
    let mut tester = SmokeTester::new(args.base_url)?;
    let summary = run_smoke_tests(&mut tester).await;

    Ok(ExitCode::from(summary.exit_code()))
}
