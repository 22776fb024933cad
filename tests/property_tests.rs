/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use lead_enrichment_pipeline::config::Config;
use lead_enrichment_pipeline::models::{EnrichedData, EnrichedLead, RawLead};
use lead_enrichment_pipeline::routing::determine_crm_action;
use lead_enrichment_pipeline::scoring::{calculate_score, size_points};
use lead_enrichment_pipeline::validation::partition_raw_leads;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::num::NonZeroU64;

fn config() -> Config {
    serde_json::from_value(json!({
        "enrichment_prompt": "p",
        "enrichment_assumptions": "",
        "meaningful_intent_prompt": "q",
        "industry_score": {"AI": 50, "Fintech": 25},
        "meaningful_intent_score": 10,
        "default_route": "marketing_route",
        "priority_route": "PRIORITY_sales_route",
        "priority_threshold": 70,
        "model": "m"
    }))
    .unwrap()
}

fn skeleton() -> EnrichedLead {
    let raw = RawLead {
        id: "L1".into(),
        email: "a@b.com".into(),
        raw_note: "n".into(),
    };
    EnrichedLead::new(&raw, &config())
}

/// Records that are sometimes valid leads and sometimes not.
fn arb_record() -> impl Strategy<Value = Value> {
    let field = prop_oneof![
        Just(Value::Null),
        "[a-z@.]{0,6}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ];
    prop_oneof![
        (field.clone(), field.clone(), field).prop_map(|(id, email, note)| {
            json!({"id": id, "email": email, "raw_note": note})
        }),
        ("[a-z0-9]{1,6}", "[a-z]{1,5}@[a-z]{1,5}\\.com", "[ -~]{1,40}")
            .prop_map(|(id, email, note)| json!({"id": id, "email": email, "raw_note": note})),
        Just(json!([1, 2, 3])),
        Just(json!({})),
    ]
}

// Property: validation partitions the input without loss or duplication
proptest! {
    #[test]
    fn validator_partitions_input(records in prop::collection::vec(arb_record(), 0..30)) {
        let batch = partition_raw_leads(records.clone());
        prop_assert_eq!(batch.valid.len() + batch.invalid.len(), records.len());

        // Invalid records come back unmodified and in order
        let mut remaining = records.iter();
        for rejected in &batch.invalid {
            prop_assert!(remaining.any(|r| r == rejected));
        }

        for lead in &batch.valid {
            prop_assert!(!lead.id.is_empty());
            prop_assert!(!lead.email.is_empty());
            prop_assert!(!lead.raw_note.is_empty());
        }
    }
}

// Property: size buckets
proptest! {
    #[test]
    fn size_points_follow_buckets(size in 1u64..1_000_000) {
        let data = EnrichedData { industry: None, size: NonZeroU64::new(size), intent: None };
        let expected = if size > 100 { 25 } else if size >= 10 { 10 } else { 0 };
        prop_assert_eq!(size_points(&data), expected);
    }
}

// Property: no data means no score and the default route
proptest! {
    #[test]
    fn unenriched_lead_stays_at_zero(threshold in -100i64..100) {
        let mut config = config();
        config.priority_threshold = threshold;
        let mut lead = skeleton();
        calculate_score(&mut lead, &config);
        prop_assert_eq!(lead.score(), 0);
        prop_assert_eq!(lead.crm_action(), "marketing_route");
    }
}

// Property: routing is a strict threshold and idempotent
proptest! {
    #[test]
    fn routing_is_strict_and_idempotent(score in 0i64..500, threshold in 0i64..500) {
        let mut config = config();
        config.priority_threshold = threshold;
        let mut lead = skeleton();
        lead.add_points(score);

        determine_crm_action(&mut lead, &config);
        let first = lead.crm_action().to_string();
        determine_crm_action(&mut lead, &config);

        prop_assert_eq!(lead.crm_action(), first.as_str());
        let expected = if score > threshold { "PRIORITY_sales_route" } else { "marketing_route" };
        prop_assert_eq!(first.as_str(), expected);
    }
}
