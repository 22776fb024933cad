use crate::config::Config;
use crate::models::EnrichedLead;

/// Picks the CRM action for a lead from its current score.
///
/// Strictly above `priority_threshold` goes to the priority route; anything
/// else, including a score exactly at the threshold, stays on the default
/// route. Calling it again without a score change yields the same action.
pub fn determine_crm_action(lead: &mut EnrichedLead, config: &Config) {
    let action = if lead.score() > config.priority_threshold {
        &config.priority_route
    } else {
        &config.default_route
    };
    lead.set_crm_action(action);

    tracing::info!(
        lead_id = lead.id(),
        score = lead.score(),
        threshold = config.priority_threshold,
        crm_action = lead.crm_action(),
        "Lead routed"
    );
}
