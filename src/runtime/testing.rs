//! Mock implementations for testing
//!
//! These mocks let the turn runtime be exercised without network I/O.

use super::traits::*;
use crate::tools::ToolError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

// ============================================================================
// Mock Tool Executor
// ============================================================================

/// Mock tool executor with predefined outcomes
pub struct MockToolExecutor {
    outcomes: HashMap<String, Result<String, ToolError>>,
    /// Record of tool executions
    pub executions: Mutex<Vec<(String, Value)>>,
}

impl MockToolExecutor {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            executions: Mutex::new(Vec::new()),
        }
    }

    /// Register a tool name with the outcome every call returns
    pub fn with_result(
        mut self,
        name: impl Into<String>,
        outcome: Result<String, ToolError>,
    ) -> Self {
        self.outcomes.insert(name.into(), outcome);
        self
    }

    /// Get recorded executions
    pub fn recorded_executions(&self) -> Vec<(String, Value)> {
        self.executions.lock().unwrap().clone()
    }
}

impl Default for MockToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for MockToolExecutor {
    async fn invoke(&self, name: &str, input: Value) -> Result<String, ToolError> {
        self.executions
            .lock()
            .unwrap()
            .push((name.to_string(), input));
        self.outcomes
            .get(name)
            .cloned()
            .unwrap_or_else(|| Err(ToolError::NotFound(name.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_tool_executor() {
        let executor = MockToolExecutor::new()
            .with_result("roll_dice", Ok("Roll 1: 1d6 -> [3] = 3".to_string()));

        let result = executor
            .invoke("roll_dice", json!({ "notation": "1d6" }))
            .await;
        assert_eq!(result.unwrap(), "Roll 1: 1d6 -> [3] = 3");

        let result = executor.invoke("unknown", json!({})).await;
        assert_eq!(result, Err(ToolError::NotFound("unknown".to_string())));

        assert_eq!(executor.recorded_executions().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_replays_errors() {
        let executor = MockToolExecutor::default()
            .with_result("web_search", Err(ToolError::failed("Request timed out")));
        for _ in 0..2 {
            let err = executor.invoke("web_search", json!({})).await.unwrap_err();
            assert_eq!(err.to_string(), "Request timed out");
        }
    }
}
