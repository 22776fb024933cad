//! Lead Enrichment Pipeline Library
//!
//! Turns unvalidated web-form lead submissions into scored, routed lead
//! records. A language model extracts attributes from each lead's free-form
//! note; a deterministic rubric scores the lead and picks its CRM action.
//! Failures are kept per lead and reported, never dropped.
//!
//! # Modules
//!
//! - `core`: Pipeline stages grouped as a namespace.
//! - `integrations`: Language-model providers.
//! - `config`: Scoring rubric and runtime settings.
//! - `enrichment`: Attribute extraction from raw notes.
//! - `errors`: Error types.
//! - `gemini`: Gemini structured-output client.
//! - `intent`: Meaningful-intent evaluation.
//! - `models`: Lead, report and oracle response types.
//! - `oracle`: The oracle trait, shape checking and response cache.
//! - `pipeline`: Per-lead orchestration and the batch driver.
//! - `routing`: Score threshold to CRM action.
//! - `scoring`: Industry and size rules.
//! - `validation`: Schema validation of raw records.

pub mod core;
pub mod integrations;

pub mod config;
pub mod enrichment;
pub mod errors;
pub mod gemini;
pub mod intent;
pub mod models;
pub mod oracle;
pub mod pipeline;
pub mod routing;
pub mod scoring;
pub mod validation;
