use crate::config::Config;
use crate::errors::OracleError;
use crate::models::{EnrichedLead, MeaningfulIntent};
use crate::oracle::{extract, Oracle};

/// Asks the oracle whether the lead's extracted intent is meaningful and, if
/// so, adds `meaningful_intent_score`.
///
/// Leads with no enrichment or no intent text are left alone without an
/// oracle call. Oracle errors propagate with the score untouched.
pub async fn eval_meaningful_intent(
    oracle: &dyn Oracle,
    lead: &mut EnrichedLead,
    config: &Config,
) -> Result<(), OracleError> {
    let Some(intent) = lead.enriched_data().and_then(|d| d.intent.as_deref()) else {
        tracing::debug!(lead_id = lead.id(), "No intent extracted, skipping evaluation");
        return Ok(());
    };

    let prompt = format!("{}{}", config.meaningful_intent_prompt, intent);
    let verdict: MeaningfulIntent = extract(oracle, &config.model, &prompt).await?;

    tracing::debug!(
        lead_id = lead.id(),
        reasoning = verdict.reasoning.as_deref().unwrap_or(""),
        "Intent verdict reasoning"
    );

    if verdict.is_meaningful {
        lead.add_points(config.meaningful_intent_score);
        tracing::info!(
            lead_id = lead.id(),
            bonus = config.meaningful_intent_score,
            score = lead.score(),
            "✓ Meaningful intent"
        );
    } else {
        tracing::info!(lead_id = lead.id(), "Intent not meaningful");
    }

    Ok(())
}
