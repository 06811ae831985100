//! Effects produced by state transitions

use crate::dispatch::{Intent, ToolInvocationRequest};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Remember the classified intent on the conversation
    SetIntent(Intent),

    /// Invoke a tool; the runtime answers with `Event::ToolComplete`
    InvokeTool { request: ToolInvocationRequest },

    /// Store a successful tool output under its intent
    RecordResult { intent: Intent, output: String },

    /// Append an assistant turn to the transcript
    AppendAssistant { text: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::AppendAssistant { text: text.into() }
    }

    pub fn invoke_tool(request: ToolInvocationRequest) -> Self {
        Effect::InvokeTool { request }
    }
}
