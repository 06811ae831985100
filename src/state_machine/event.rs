//! Events that drive a turn forward

use crate::tools::ToolError;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Move on from a phase that needs no outside input
    Advance,

    /// The tool call requested by `Effect::InvokeTool` finished
    ToolComplete { result: Result<String, ToolError> },
}

impl Event {
    pub fn tool_complete(result: Result<String, ToolError>) -> Self {
        Event::ToolComplete { result }
    }
}
