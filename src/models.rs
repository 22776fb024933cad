use crate::config::Config;
use crate::errors::OracleError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU64;
use uuid::Uuid;

// ============ Input Models ============

/// A web-form submission that passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLead {
    pub id: String,
    pub email: String,
    /// Free-form text the lead typed into the form.
    pub raw_note: String,
}

// ============ Oracle Shapes ============

/// Attributes the language model extracted from a raw note.
///
/// Every field is optional: the model may be unable to extract any of them.
/// A missing key and an explicit `null` mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnrichedData {
    #[serde(default)]
    pub industry: Option<String>,
    /// Company headcount. Zero or negative values are rejected at deserialization.
    #[serde(default)]
    pub size: Option<NonZeroU64>,
    #[serde(default)]
    pub intent: Option<String>,
}

/// Verdict on whether extracted intent text signals real buying intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningfulIntent {
    pub is_meaningful: bool,
    #[serde(default)]
    pub reasoning: Option<String>,
}

// ============ Pipeline Models ============

/// A lead as it moves through enrichment, scoring and routing.
///
/// Fields are private so the lifecycle rules hold: enrichment is attached at
/// most once and the score only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedLead {
    id: String,
    email: String,
    enriched_data: Option<EnrichedData>,
    score: i64,
    crm_action: String,
}

impl EnrichedLead {
    /// Skeleton lead: no enrichment, score 0, default route.
    pub fn new(raw: &RawLead, config: &Config) -> Self {
        Self {
            id: raw.id.clone(),
            email: raw.email.clone(),
            enriched_data: None,
            score: 0,
            crm_action: config.default_route.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn enriched_data(&self) -> Option<&EnrichedData> {
        self.enriched_data.as_ref()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn crm_action(&self) -> &str {
        &self.crm_action
    }

    /// Attaches extracted data. Returns `false` and leaves the lead untouched
    /// if data was already attached.
    pub fn attach_enrichment(&mut self, data: EnrichedData) -> bool {
        if self.enriched_data.is_some() {
            tracing::warn!(lead_id = %self.id, "Enrichment already attached, ignoring replacement");
            return false;
        }
        self.enriched_data = Some(data);
        true
    }

    /// Adds non-negative points to the score. Negative values are ignored.
    pub fn add_points(&mut self, points: i64) {
        if points > 0 {
            self.score = self.score.saturating_add(points);
        }
    }

    pub(crate) fn set_crm_action(&mut self, action: &str) {
        if self.crm_action != action {
            self.crm_action = action.to_string();
        }
    }
}

/// Result of running one lead through the pipeline: the lead in whatever
/// state it reached, plus the first error recorded along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadOutcome {
    pub lead: EnrichedLead,
    pub error: Option<OracleError>,
}

/// A lead that needs a human to look at it, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
    pub lead: EnrichedLead,
    pub error: String,
    pub error_kind: String,
}

impl From<(EnrichedLead, OracleError)> for ReviewEntry {
    fn from((lead, error): (EnrichedLead, OracleError)) -> Self {
        Self {
            lead,
            error_kind: error.kind().to_string(),
            error: error.to_string(),
        }
    }
}

/// Per-run tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub ingested: usize,
    pub invalid: usize,
    pub enriched: usize,
    pub needs_review: usize,
}

/// Everything a run produces, ready to be serialized and handed off.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub counts: BatchCounts,
    /// Leads ready for CRM hand-off, in input order.
    pub enriched: Vec<EnrichedLead>,
    /// Leads that hit an oracle failure, in input order.
    pub needs_review: Vec<ReviewEntry>,
    /// Records that never became a `RawLead`, exactly as received.
    pub invalid: Vec<Value>,
}
