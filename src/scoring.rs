//! Deterministic scoring rules.
//!
//! Two additive rules, applied industry first, then size. Each rule is a pure
//! function of the extracted data and the config; [`calculate_score`] only
//! ever adds their results to the lead.
use crate::config::Config;
use crate::models::{EnrichedData, EnrichedLead};

/// Points for a company headcount above `LARGE_COMPANY_SIZE`.
pub const LARGE_COMPANY_POINTS: i64 = 25;
/// Points for a headcount of at least `MID_COMPANY_SIZE`.
pub const MID_COMPANY_POINTS: i64 = 10;
pub const LARGE_COMPANY_SIZE: u64 = 100;
pub const MID_COMPANY_SIZE: u64 = 10;

/// Bonus mapped to the extracted industry. Unknown or missing industry is 0.
pub fn industry_points(data: &EnrichedData, config: &Config) -> i64 {
    data.industry
        .as_deref()
        .and_then(|industry| config.industry_score.get(industry))
        .copied()
        .unwrap_or(0)
}

/// `size > 100` → 25, `size >= 10` → 10, otherwise 0.
pub fn size_points(data: &EnrichedData) -> i64 {
    match data.size.map(|s| s.get()) {
        Some(size) if size > LARGE_COMPANY_SIZE => LARGE_COMPANY_POINTS,
        Some(size) if size >= MID_COMPANY_SIZE => MID_COMPANY_POINTS,
        _ => 0,
    }
}

/// Applies the industry and size rules. Does nothing for an unenriched lead.
pub fn calculate_score(lead: &mut EnrichedLead, config: &Config) {
    let Some(data) = lead.enriched_data() else {
        tracing::debug!(lead_id = lead.id(), "No enriched data, skipping scoring");
        return;
    };

    let industry = industry_points(data, config);
    let size = size_points(data);

    lead.add_points(industry);
    lead.add_points(size);

    tracing::info!(
        lead_id = lead.id(),
        industry_points = industry,
        size_points = size,
        score = lead.score(),
        "Lead scored"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawLead;
    use serde_json::json;
    use std::num::NonZeroU64;

    fn config() -> Config {
        serde_json::from_value(json!({
            "enrichment_prompt": "p",
            "enrichment_assumptions": "",
            "meaningful_intent_prompt": "q",
            "industry_score": {"Cybersecurity": 50, "AI": 50, "Fintech": 25},
            "meaningful_intent_score": 10,
            "default_route": "marketing_route",
            "priority_route": "PRIORITY_sales_route",
            "priority_threshold": 70,
            "model": "m"
        }))
        .unwrap()
    }

    fn data(industry: Option<&str>, size: Option<u64>) -> EnrichedData {
        EnrichedData {
            industry: industry.map(str::to_string),
            size: size.and_then(NonZeroU64::new),
            intent: None,
        }
    }

    fn lead() -> EnrichedLead {
        let raw = RawLead {
            id: "L1".into(),
            email: "a@b.com".into(),
            raw_note: "n".into(),
        };
        EnrichedLead::new(&raw, &config())
    }

    #[test]
    fn test_industry_rule() {
        let config = config();
        assert_eq!(industry_points(&data(Some("Cybersecurity"), None), &config), 50);
        assert_eq!(industry_points(&data(Some("Fintech"), None), &config), 25);
        assert_eq!(industry_points(&data(Some("Retail"), None), &config), 0);
        assert_eq!(industry_points(&data(None, None), &config), 0);
    }

    #[test]
    fn test_industry_match_is_exact() {
        assert_eq!(industry_points(&data(Some("ai"), None), &config()), 0);
    }

    #[test]
    fn test_size_rule_boundaries() {
        assert_eq!(size_points(&data(None, Some(150))), 25);
        assert_eq!(size_points(&data(None, Some(101))), 25);
        assert_eq!(size_points(&data(None, Some(100))), 10);
        assert_eq!(size_points(&data(None, Some(50))), 10);
        assert_eq!(size_points(&data(None, Some(10))), 10);
        assert_eq!(size_points(&data(None, Some(9))), 0);
        assert_eq!(size_points(&data(None, Some(5))), 0);
        assert_eq!(size_points(&data(None, None)), 0);
    }

    #[test]
    fn test_calculate_score_without_data_is_noop() {
        let mut lead = lead();
        calculate_score(&mut lead, &config());
        assert_eq!(lead.score(), 0);
    }

    #[test]
    fn test_calculate_score_sums_rules() {
        let mut lead = lead();
        lead.attach_enrichment(data(Some("AI"), Some(200)));
        calculate_score(&mut lead, &config());
        assert_eq!(lead.score(), 75);
    }
}
