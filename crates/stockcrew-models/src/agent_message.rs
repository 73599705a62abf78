use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::market::MarketContext;

/// Output of an earlier task, as handed to later tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriorOutput {
    pub task: String,
    pub agent: String,
    pub output: String,
}

/// Request sent to an agent for one task invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRequest {
    pub request_id: Uuid,
    pub run_id: Uuid,
    pub task: String,
    pub ticker: String,
    /// Task description with run values substituted.
    pub description: String,
    pub expected_output: String,
    pub market_context: Option<MarketContext>,
    /// Output of the declared dependency, if the task has one.
    pub dependency_output: Option<PriorOutput>,
    /// Every earlier task's output in execution order, dependency included.
    pub prior_outputs: Vec<PriorOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::InstrumentQuote;
    use rust_decimal_macros::dec;

    #[test]
    fn roundtrip_agent_request() {
        let research = PriorOutput {
            task: "research_task".to_string(),
            agent: "researcher".to_string(),
            output: "WEGE3 reported record revenue".to_string(),
        };
        let request = AgentRequest {
            request_id: Uuid::new_v4(),
            run_id: Uuid::new_v4(),
            task: "reporting_task".to_string(),
            ticker: "WEGE3".to_string(),
            description: "Write a report on WEGE3".to_string(),
            expected_output: "Markdown report".to_string(),
            market_context: Some(MarketContext {
                current_date: Some("15/10/2026".to_string()),
                dollar: InstrumentQuote::from_values(Some(dec!(5.40)), Some(dec!(5.00))),
                bitcoin: InstrumentQuote::default(),
            }),
            dependency_output: Some(research.clone()),
            prior_outputs: vec![research],
        };

        let json = serde_json::to_string(&request).unwrap();
        let deserialized: AgentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, deserialized);
    }
}
