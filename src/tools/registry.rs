//! Tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::Tool;
use crate::types::ToolDefinition;

/// Tools by name, remembering registration order for stable definitions.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any tool already registered under the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.definition())
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

impl FromIterator<Arc<dyn Tool>> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Tool>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for tool in iter {
            registry.register(tool);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetTracker;
    use crate::tools::ToolOutput;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn input_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn call(
            &self,
            input: serde_json::Value,
            _budget: Option<&mut BudgetTracker>,
        ) -> crate::Result<ToolOutput> {
            Ok(ToolOutput {
                content: input.to_string(),
                model: "none".into(),
                usage: None,
                cost_tracker: None,
            })
        }
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let registry: ToolRegistry = [
            Arc::new(Echo("zeta")) as Arc<dyn Tool>,
            Arc::new(Echo("alpha")),
            Arc::new(Echo("mid")),
        ]
        .into_iter()
        .collect();

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_replace_keeps_single_entry() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("a")));
        registry.register(Arc::new(Echo("a")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["a"]);
        assert!(registry.get("b").is_none());
    }
}
