//! Tool registry and backend capabilities
//!
//! Tools are stateless singletons behind a uniform contract: named JSON
//! arguments in, text out, or a `ToolError`. The registry performs no
//! retries, timeouts or caching; those belong to the tools themselves.

mod dice;
mod password;
mod scryfall;
mod web_search;

pub use dice::{DiceNotation, DiceRoll, RollDiceTool};
pub use password::{GeneratePasswordTool, MAX_PASSWORD_LENGTH};
pub use scryfall::{GetRandomCardTool, GetSetInfoTool, ScryfallClient, SearchCardByNameTool};
pub use web_search::WebSearchTool;

use crate::config::AppConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Failure reported by a tool or by the registry.
///
/// The display text is what the user sees after "Sorry, I encountered an
/// error: ".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No tool registered under this name
    #[error("Tool {0} not found")]
    NotFound(String),
    /// Arguments did not match the tool's input schema or were out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A collaborator answered with an error status
    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
    /// Any other handler failure (connection, timeout, malformed response)
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Classify a transport-level HTTP failure
    pub(crate) fn from_request(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::failed(format!("Request timeout: {err}"))
        } else if err.is_connect() {
            Self::failed(format!("Connection failed: {err}"))
        } else {
            Self::failed(format!("Request failed: {err}"))
        }
    }
}

/// Deserialize a tool's typed input from its JSON arguments
pub(crate) fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::invalid_input(e.to_string()))
}

/// Description of a registered tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A backend capability the dispatcher can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> String;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn run(&self, input: Value) -> Result<String, ToolError>;
}

/// Logging wrapper for tools
pub struct LoggingTool {
    inner: Arc<dyn Tool>,
}

impl LoggingTool {
    pub fn new(inner: Arc<dyn Tool>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Tool for LoggingTool {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> String {
        self.inner.description()
    }

    fn input_schema(&self) -> Value {
        self.inner.input_schema()
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let start = Instant::now();
        let result = self.inner.run(input).await;
        let duration = start.elapsed();

        match &result {
            Ok(output) => {
                tracing::info!(
                    tool = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    output_len = output.len(),
                    "Tool call completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    tool = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Tool call failed"
                );
            }
        }

        result
    }
}

/// Name-to-handler mapping, built once and read-only afterwards
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(String, Arc<dyn Tool>)>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the production registry with every backend capability.
    ///
    /// Web search needs an API key and is left out without one.
    pub fn standard(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = config.http_client()?;
        let scryfall = Arc::new(ScryfallClient::new(
            client.clone(),
            &config.scryfall_api_url,
        ));

        let mut tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(RollDiceTool),
            Arc::new(SearchCardByNameTool::new(scryfall.clone())),
            Arc::new(GetRandomCardTool::new(scryfall.clone())),
            Arc::new(GetSetInfoTool::new(scryfall)),
            Arc::new(GeneratePasswordTool),
        ];

        match &config.tavily_api_key {
            Some(api_key) => tools.insert(
                0,
                Arc::new(WebSearchTool::new(
                    client,
                    api_key.clone(),
                    &config.tavily_api_url,
                )),
            ),
            None => tracing::warn!("TAVILY_API_KEY not set, web search is unavailable"),
        }

        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool.name().to_string(), Arc::new(LoggingTool::new(tool)));
        }
        Ok(registry)
    }

    /// Register `handler` under `name`, replacing any previous handler
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn Tool>) {
        let name = name.into();
        match self.tools.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                tracing::debug!(tool = %name, "Replacing registered tool");
                slot.1 = handler;
            }
            None => self.tools.push((name, handler)),
        }
    }

    /// Builder-style registration under the tool's own name
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool.name().to_string(), tool);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|(name, tool)| ToolDefinition {
                name: name.clone(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Execute a tool by name
    pub async fn invoke(&self, name: &str, input: Value) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.run(input).await
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, tool)| tool)
    }
}
