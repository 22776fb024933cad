//! The extraction oracle boundary.
//!
//! An [`Oracle`] turns a prompt plus a JSON schema into response text. It is
//! treated as untrusted: [`extract`] does the parsing and shape checking, so
//! every implementation gets the same malformed/non-conforming handling.
use crate::errors::OracleError;
use crate::models::{EnrichedData, MeaningfulIntent};
use async_trait::async_trait;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// A language model that can answer under a response schema.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Sends one prompt and returns the raw response text.
    ///
    /// Implementations must not retry on behalf of the pipeline unless that
    /// is their documented policy.
    async fn generate(&self, model: &str, prompt: &str, schema: &Value)
        -> Result<String, OracleError>;

    /// Called when a response from `generate` was rejected as malformed or
    /// non-conforming. Implementations holding on to responses drop it here.
    async fn discard(&self, _model: &str, _prompt: &str, _schema: &Value) {}

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// A type the oracle can be asked to produce.
pub trait ResponseShape: DeserializeOwned {
    /// JSON schema sent to the provider to constrain its output.
    fn response_schema() -> Value;
}

impl ResponseShape for EnrichedData {
    fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "industry": {
                    "type": ["string", "null"],
                    "description": "Industry or sector the company operates in"
                },
                "size": {
                    "type": ["integer", "null"],
                    "minimum": 1,
                    "description": "Number of employees"
                },
                "intent": {
                    "type": ["string", "null"],
                    "description": "What the lead is trying to achieve, in their own words"
                }
            },
            "required": ["industry", "size", "intent"]
        })
    }
}

impl ResponseShape for MeaningfulIntent {
    fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "is_meaningful": { "type": "boolean" },
                "reasoning": { "type": ["string", "null"] }
            },
            "required": ["is_meaningful"]
        })
    }
}

/// Asks the oracle for a `T` and checks the answer against it.
pub async fn extract<T: ResponseShape>(
    oracle: &dyn Oracle,
    model: &str,
    prompt: &str,
) -> Result<T, OracleError> {
    let schema = T::response_schema();
    let text = oracle.generate(model, prompt, &schema).await?;

    let parsed = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => serde_json::from_value(value).map_err(|e| {
            tracing::warn!(oracle = oracle.name(), error = %e, "Oracle response does not match schema");
            OracleError::SchemaMismatch(e.to_string())
        }),
        Err(e) => {
            tracing::warn!(oracle = oracle.name(), error = %e, "Oracle returned malformed JSON");
            Err(OracleError::MalformedJson(e.to_string()))
        }
    };

    if parsed.is_err() {
        oracle.discard(model, prompt, &schema).await;
    }
    parsed
}

/// Memoizes successful responses of another oracle.
///
/// Identical form submissions in one run produce identical prompts; this
/// keeps them to a single provider call. Transport failures are never
/// cached, and a response [`extract`] rejects is evicted through
/// [`Oracle::discard`], so only conforming answers are ever replayed.
pub struct CachedOracle<O> {
    inner: O,
    cache: Cache<String, String>,
}

impl<O: Oracle> CachedOracle<O> {
    pub fn new(inner: O, ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();
        Self { inner, cache }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// SHA-256 over model, prompt and schema, hex encoded.
    fn cache_key(model: &str, prompt: &str, schema: &Value) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update([0u8]);
        hasher.update(prompt.as_bytes());
        hasher.update([0u8]);
        hasher.update(schema.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl<O: Oracle> Oracle for CachedOracle<O> {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<String, OracleError> {
        let key = Self::cache_key(model, prompt, schema);

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(oracle = self.inner.name(), "Oracle cache hit");
            return Ok(cached);
        }

        let response = self.inner.generate(model, prompt, schema).await?;
        self.cache.insert(key, response.clone()).await;
        Ok(response)
    }

    async fn discard(&self, model: &str, prompt: &str, schema: &Value) {
        let key = Self::cache_key(model, prompt, schema);
        self.cache.invalidate(&key).await;
        tracing::debug!(oracle = self.inner.name(), "Evicted rejected oracle response");
        self.inner.discard(model, prompt, schema).await;
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
