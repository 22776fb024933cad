use anyhow::Context;
use lead_enrichment_pipeline::config::{Config, RuntimeSettings};
use lead_enrichment_pipeline::core::pipeline;
use lead_enrichment_pipeline::integrations::gemini::GeminiOracle;
use lead_enrichment_pipeline::integrations::oracle::CachedOracle;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reads the leads file. The top level must be a JSON array; individual
/// records are validated later by the pipeline.
fn load_lead_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Lead data could not be loaded from {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Lead data in {} is not valid JSON", path.display()))?;

    match parsed {
        Value::Array(records) => Ok(records),
        other => anyhow::bail!(
            "Lead data must be a JSON array, found {}",
            match other {
                Value::Object(_) => "an object",
                Value::String(_) => "a string",
                Value::Number(_) => "a number",
                Value::Bool(_) => "a boolean",
                _ => "null",
            }
        ),
    }
}

/// Main entry point.
///
/// Loads settings and the scoring config, runs every lead through the
/// pipeline against Gemini and writes the JSON report to `REPORT_PATH`
/// or stdout. Only configuration or input-file problems fail the run.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_enrichment_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = RuntimeSettings::from_env()?;
    let config = Config::load(&settings.config_path)?;
    let records = load_lead_records(&settings.leads_path)?;
    tracing::info!("Loaded {} lead records", records.len());

    let mut gemini = GeminiOracle::new(
        settings.gemini_api_key.clone(),
        Duration::from_secs(settings.oracle_timeout_secs),
    )?;
    if let Some(ref url) = settings.gemini_base_url {
        gemini = gemini.with_base_url(url.clone());
    }

    let report = if settings.oracle_cache_ttl_secs > 0 {
        let oracle = CachedOracle::new(
            gemini,
            Duration::from_secs(settings.oracle_cache_ttl_secs),
            10_000,
        );
        pipeline::run(&oracle, records, &config, settings.concurrency).await
    } else {
        pipeline::run(&gemini, records, &config, settings.concurrency).await
    };

    tracing::info!(
        "Enriched leads: {} of {}",
        report.counts.enriched,
        report.counts.ingested - report.counts.invalid
    );
    tracing::info!("Leads needing manual review: {}", report.counts.needs_review);
    tracing::info!("Invalid leads for manual review: {}", report.counts.invalid);

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match settings.report_path {
        Some(ref path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("✓ Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
