use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use seolens::{
    analysis::Analyzer, config::Config, fetcher::Fetcher, llm::OpenAiClient, telemetry,
};

/// Analyze one page and print the report as JSON.
#[derive(Parser, Debug)]
#[command(name = "analyze", version, about)]
struct Args {
    /// Page to analyze (http or https).
    url: String,

    /// Also scrape same-site "about" pages linked from the page.
    #[arg(long)]
    about_pages: bool,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    let config = Config::from_env()?;
    let follow = args.about_pages || config.follow_about_pages();
    let config = config.with_follow_about_pages(follow);
    let fetcher = Fetcher::new(&config.fetch_settings()).context("Failed to build page fetcher")?;
    let llm = OpenAiClient::new(config.llm_settings()).context("Failed to build LLM client")?;
    let analyzer = Analyzer::new(fetcher, Arc::new(llm), config.analyzer_options());

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, cancelling analysis...");
            ctrl_c_token.cancel();
        }
    });

    let report = analyzer
        .analyze(&args.url, &cancel)
        .await
        .with_context(|| format!("Analysis of {} failed", args.url))?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");
    Ok(())
}
