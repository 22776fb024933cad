//! Schema validation for incoming lead records.
//!
//! Untrusted records either become a [`RawLead`] or are quarantined untouched
//! for manual review. Nothing here ever fails the batch.
use crate::errors::PipelineError;
use crate::models::RawLead;
use serde_json::Value;

/// Output of [`partition_raw_leads`]: a partition of the input, order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedBatch {
    pub valid: Vec<RawLead>,
    pub invalid: Vec<Value>,
}

/// Tries to build a `RawLead` from one untyped record.
///
/// `id`, `email` and `raw_note` must all be present, be strings, and be
/// non-empty. Whitespace is content, not emptiness.
pub fn validate_record(record: &Value) -> Result<RawLead, PipelineError> {
    if !record.is_object() {
        return Err(PipelineError::SchemaValidation(
            "record is not a JSON object".to_string(),
        ));
    }

    let lead: RawLead = serde_json::from_value(record.clone())
        .map_err(|e| PipelineError::SchemaValidation(e.to_string()))?;

    for (field, value) in [
        ("id", &lead.id),
        ("email", &lead.email),
        ("raw_note", &lead.raw_note),
    ] {
        if value.is_empty() {
            return Err(PipelineError::SchemaValidation(format!(
                "field '{}' cannot be empty",
                field
            )));
        }
    }

    Ok(lead)
}

/// Splits raw records into valid leads and rejected originals.
pub fn partition_raw_leads(records: Vec<Value>) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();

    for (idx, record) in records.into_iter().enumerate() {
        match validate_record(&record) {
            Ok(lead) => batch.valid.push(lead),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "Quarantining invalid lead record");
                batch.invalid.push(record);
            }
        }
    }

    tracing::info!(
        valid = batch.valid.len(),
        invalid = batch.invalid.len(),
        "Schema validation complete"
    );
    batch
}
