/// Enrichment step: raw note in, extracted attributes out.
///
/// The prompt is the configured preamble, the lead's note verbatim, then the
/// configured assumptions, concatenated with no separators added.
use crate::config::Config;
use crate::errors::OracleError;
use crate::models::{EnrichedData, RawLead};
use crate::oracle::{extract, Oracle};

pub fn build_enrichment_prompt(lead: &RawLead, config: &Config) -> String {
    let mut prompt = String::with_capacity(
        config.enrichment_prompt.len() + lead.raw_note.len() + config.enrichment_assumptions.len(),
    );
    prompt.push_str(&config.enrichment_prompt);
    prompt.push_str(&lead.raw_note);
    prompt.push_str(&config.enrichment_assumptions);
    prompt
}

/// Extracts industry, size and intent for one lead. Oracle errors are
/// returned as-is to the caller.
pub async fn enrich_data(
    oracle: &dyn Oracle,
    lead: &RawLead,
    config: &Config,
) -> Result<EnrichedData, OracleError> {
    let prompt = build_enrichment_prompt(lead, config);
    tracing::debug!(lead_id = %lead.id, "Requesting enrichment");

    let data: EnrichedData = extract(oracle, &config.model, &prompt).await?;

    tracing::info!(
        lead_id = %lead.id,
        industry = ?data.industry,
        size = ?data.size,
        has_intent = data.intent.is_some(),
        "✓ Lead enriched"
    );
    Ok(data)
}
