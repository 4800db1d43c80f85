//! Game trends collector: binary entrypoint.
//! Runs one collection cycle and exits; schedule it externally (cron, timer).

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use game_trends_bot::cli::Cli;
use game_trends_bot::config::{load_weights_default, load_weights_from, AppConfig};
use game_trends_bot::metrics::Metrics;
use game_trends_bot::{logging, pipeline, PipelineContext, ScoringConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut cfg = AppConfig::from_env().context("loading configuration")?;
    cli.apply(&mut cfg);
    logging::init(cfg.log_format);

    let metrics = cfg
        .metrics_textfile
        .as_ref()
        .map(|p| Metrics::init(p.clone()))
        .transpose()?;

    let weights = match &cli.weights {
        Some(p) => load_weights_from(p)?,
        None => load_weights_default()?,
    };
    tracing::info!(metrics = weights.len(), total = weights.total(), "scoring weights loaded");

    let ctx = PipelineContext::from_config(&cfg, ScoringConfig::new(weights))?;
    let result = pipeline::run(cli.mode, &ctx, chrono::Utc::now()).await;

    if let Some(m) = &metrics {
        if let Err(e) = m.flush() {
            tracing::warn!(
                error = ?e,
                path = %m.textfile().display(),
                "metrics textfile not written"
            );
        }
    }
    let summary = result?;
    tracing::info!(
        probes_ok = summary.probes.iter().filter(|(_, s)| s.is_ok()).count(),
        probes = summary.probes.len(),
        files = summary.written.len(),
        "done"
    );
    Ok(())
}
