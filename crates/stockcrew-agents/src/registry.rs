use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::ReasoningAgent;
use crate::error::PipelineError;

/// Immutable lookup of the agents configured for this process.
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn ReasoningAgent>>,
    order: Vec<String>,
}

impl AgentRegistry {
    /// Fails with `InvalidGraph` if two agents share a name.
    pub fn new(agents: Vec<Arc<dyn ReasoningAgent>>) -> Result<Self, PipelineError> {
        let mut map = HashMap::with_capacity(agents.len());
        let mut order = Vec::with_capacity(agents.len());

        for agent in agents {
            let name = agent.name().to_string();
            if map.insert(name.clone(), agent).is_some() {
                return Err(PipelineError::InvalidGraph(format!(
                    "duplicate agent name: {name}"
                )));
            }
            order.push(name);
        }

        Ok(Self { agents: map, order })
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ReasoningAgent>, PipelineError> {
        self.agents
            .get(name)
            .cloned()
            .ok_or_else(|| PipelineError::NotFound(format!("agent {name}")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Agent names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedAgent;

    #[test]
    fn get_registered_agent() {
        let registry = AgentRegistry::new(vec![
            Arc::new(ScriptedAgent::new("researcher", "findings")) as Arc<dyn ReasoningAgent>,
            Arc::new(ScriptedAgent::new("reporting_analyst", "report")),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("researcher").unwrap().name(), "researcher");
        assert_eq!(registry.names(), ["researcher", "reporting_analyst"]);
    }

    #[test]
    fn missing_agent_is_not_found() {
        let registry = AgentRegistry::new(vec![]).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get("ghost"),
            Err(PipelineError::NotFound(_))
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = AgentRegistry::new(vec![
            Arc::new(ScriptedAgent::new("researcher", "a")) as Arc<dyn ReasoningAgent>,
            Arc::new(ScriptedAgent::new("researcher", "b")),
        ]);
        assert!(matches!(result, Err(PipelineError::InvalidGraph(_))));
    }
}
