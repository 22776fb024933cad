/// Per-lead orchestration and the batch driver.
///
/// Per lead: enrich → score → route → evaluate intent (routing moves after
/// intent evaluation when `routing_stage = after_intent`). Failures are
/// captured into the lead's outcome and never leave `process`.
use crate::config::{Config, RoutingStage};
use crate::enrichment::enrich_data;
use crate::intent::eval_meaningful_intent;
use crate::models::{
    BatchCounts, EnrichedLead, LeadOutcome, PipelineReport, RawLead, ReviewEntry,
};
use crate::oracle::Oracle;
use crate::routing::determine_crm_action;
use crate::scoring::calculate_score;
use crate::validation::partition_raw_leads;
use futures::stream::{self, StreamExt};
use serde_json::Value;

/// Runs one lead through the pipeline.
///
/// Returns the lead in whatever state it reached and the first error, if any.
/// An enrichment failure leaves the lead unscored on the default route.
pub async fn process(oracle: &dyn Oracle, raw_lead: &RawLead, config: &Config) -> LeadOutcome {
    let mut lead = EnrichedLead::new(raw_lead, config);

    match enrich_data(oracle, raw_lead, config).await {
        Ok(data) => {
            lead.attach_enrichment(data);
        }
        Err(e) => {
            tracing::warn!(
                lead_id = %raw_lead.id,
                error_kind = e.kind(),
                error = %e,
                "Enrichment failed, lead needs review"
            );
            return LeadOutcome {
                lead,
                error: Some(e),
            };
        }
    }

    calculate_score(&mut lead, config);
    if config.routing_stage == RoutingStage::BeforeIntent {
        determine_crm_action(&mut lead, config);
    }

    let intent_error = eval_meaningful_intent(oracle, &mut lead, config)
        .await
        .err();
    if let Some(ref e) = intent_error {
        tracing::warn!(
            lead_id = %raw_lead.id,
            error_kind = e.kind(),
            error = %e,
            "Intent evaluation failed, keeping score and route"
        );
    }

    if config.routing_stage == RoutingStage::AfterIntent {
        determine_crm_action(&mut lead, config);
    }

    LeadOutcome {
        lead,
        error: intent_error,
    }
}

/// Leads from one batch, split by whether they finished cleanly.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// No error, in input order.
    pub enriched: Vec<EnrichedLead>,
    /// Error attached, in input order.
    pub needs_review: Vec<ReviewEntry>,
}

/// Processes every lead independently with at most `concurrency` in flight.
///
/// Results come back in input order regardless of completion order.
pub async fn process_batch(
    oracle: &dyn Oracle,
    leads: &[RawLead],
    config: &Config,
    concurrency: usize,
) -> BatchOutcome {
    let outcomes: Vec<LeadOutcome> = stream::iter(leads)
        .map(|lead| process(oracle, lead, config))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut batch = BatchOutcome::default();
    for outcome in outcomes {
        match outcome.error {
            None => batch.enriched.push(outcome.lead),
            Some(e) => batch.needs_review.push(ReviewEntry::from((outcome.lead, e))),
        }
    }
    batch
}

/// Validates raw records, processes the valid ones and assembles the report.
pub async fn run(
    oracle: &dyn Oracle,
    records: Vec<Value>,
    config: &Config,
    concurrency: usize,
) -> PipelineReport {
    let ingested = records.len();
    let validated = partition_raw_leads(records);

    tracing::info!(
        leads = validated.valid.len(),
        concurrency,
        oracle = oracle.name(),
        "Starting enrichment"
    );
    let batch = process_batch(oracle, &validated.valid, config, concurrency).await;

    let counts = BatchCounts {
        ingested,
        invalid: validated.invalid.len(),
        enriched: batch.enriched.len(),
        needs_review: batch.needs_review.len(),
    };
    tracing::info!(
        ingested = counts.ingested,
        invalid = counts.invalid,
        enriched = counts.enriched,
        needs_review = counts.needs_review,
        "Pipeline run complete"
    );

    PipelineReport {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        counts,
        enriched: batch.enriched,
        needs_review: batch.needs_review,
        invalid: validated.invalid,
    }
}
