use crate::errors::PipelineError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where the Router sits relative to the intent evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStage {
    /// Route on the industry/size score only; the intent bonus never changes the route.
    #[default]
    BeforeIntent,
    /// Route once every scoring step, including the intent bonus, has run.
    AfterIntent,
}

/// Scoring rubric and prompts shared read-only by every lead in a run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub enrichment_prompt: String,
    /// Appended after the raw note. May be empty but must be present.
    pub enrichment_assumptions: String,
    pub meaningful_intent_prompt: String,
    /// Industry name to bonus. May be empty but must be present.
    pub industry_score: HashMap<String, i64>,
    pub meaningful_intent_score: i64,
    pub default_route: String,
    pub priority_route: String,
    pub priority_threshold: i64,
    #[serde(alias = "model_id")]
    pub model: String,
    #[serde(default)]
    pub routing_stage: RoutingStage,
}

impl Config {
    /// Parses and validates a config from its JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, PipelineError> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|e| PipelineError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            model = %config.model,
            industries = config.industry_score.len(),
            threshold = config.priority_threshold,
            "Pipeline config loaded"
        );
        Ok(config)
    }

    /// Rejects configs that would break the run for every lead alike.
    ///
    /// Bonuses must be non-negative so a lead's score only ever grows.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let required = [
            ("model", &self.model),
            ("enrichment_prompt", &self.enrichment_prompt),
            ("meaningful_intent_prompt", &self.meaningful_intent_prompt),
            ("default_route", &self.default_route),
            ("priority_route", &self.priority_route),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PipelineError::Config(format!("{} cannot be empty", name)));
            }
        }

        if self.meaningful_intent_score < 0 {
            return Err(PipelineError::Config(format!(
                "meaningful_intent_score must be non-negative, got {}",
                self.meaningful_intent_score
            )));
        }

        if let Some((industry, bonus)) = self.industry_score.iter().find(|(_, v)| **v < 0) {
            return Err(PipelineError::Config(format!(
                "industry_score for '{}' must be non-negative, got {}",
                industry, bonus
            )));
        }

        Ok(())
    }
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub gemini_api_key: String,
    pub gemini_base_url: Option<String>,
    pub leads_path: PathBuf,
    pub config_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub concurrency: usize,
    pub oracle_timeout_secs: u64,
    pub oracle_cache_ttl_secs: u64,
}

impl RuntimeSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .map_err(|_| {
                    anyhow::anyhow!("GEMINI_API_KEY or GOOGLE_API_KEY environment variable required")
                })
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("GEMINI_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("GEMINI_BASE_URL must start with http:// or https://");
                    }
                    Ok(url)
                })
                .transpose()?,
            leads_path: std::env::var("LEADS_PATH")
                .unwrap_or_else(|_| "leads.json".to_string())
                .into(),
            config_path: std::env::var("PIPELINE_CONFIG_PATH")
                .unwrap_or_else(|_| "config.json".to_string())
                .into(),
            report_path: std::env::var("REPORT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            concurrency: std::env::var("PIPELINE_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("PIPELINE_CONCURRENCY must be a positive number"))?,
            oracle_timeout_secs: std::env::var("ORACLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ORACLE_TIMEOUT_SECS must be a number of seconds"))?,
            oracle_cache_ttl_secs: std::env::var("ORACLE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ORACLE_CACHE_TTL_SECS must be a number of seconds"))?,
        };

        // Never log the API key
        tracing::debug!("Leads path: {}", settings.leads_path.display());
        tracing::debug!("Config path: {}", settings.config_path.display());
        tracing::debug!("Concurrency: {}", settings.concurrency);
        if let Some(ref url) = settings.gemini_base_url {
            tracing::info!("Gemini base URL override: {}", url);
        }

        Ok(settings)
    }
}
