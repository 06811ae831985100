//! Web search through the Tavily search API

use super::{parse_input, Tool, ToolError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const MAX_RESULTS: u32 = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct WebSearchInput {
    query: String,
}

/// Web search tool returning source snippets as JSON context
pub struct WebSearchTool {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl WebSearchTool {
    pub fn new(client: Client, api_key: String, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            endpoint: format!("{}/search", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> String {
        "Search the web for information about the given query".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for"
                }
            }
        })
    }

    async fn run(&self, input: Value) -> Result<String, ToolError> {
        let input: WebSearchInput = parse_input(input)?;

        let request = TavilyRequest {
            api_key: &self.api_key,
            query: &input.query,
            search_depth: "advanced",
            max_results: MAX_RESULTS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ToolError::from_request(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::failed(format!("Failed to read response: {e}")))?;

        search_context(status.as_u16(), &body)
    }
}

/// Turn a Tavily response into a JSON list of `{url, content}` sources
fn search_context(status: u16, body: &str) -> Result<String, ToolError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<TavilyError>(body)
            .ok()
            .and_then(TavilyError::message)
            .unwrap_or_else(|| body.to_string());
        return Err(ToolError::Upstream { status, message });
    }

    let response: TavilyResponse = serde_json::from_str(body)
        .map_err(|e| ToolError::failed(format!("Failed to parse search response: {e}")))?;

    serde_json::to_string(&response.results)
        .map_err(|e| ToolError::failed(format!("Failed to encode search context: {e}")))
}

// Tavily API types

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchSource>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchSource {
    url: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct TavilyError {
    detail: Option<Value>,
}

impl TavilyError {
    /// `detail` is either a string or `{"error": "..."}`
    fn message(self) -> Option<String> {
        match self.detail? {
            Value::String(message) => Some(message),
            Value::Object(map) => map
                .get("error")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            _ => None,
        }
    }
}
