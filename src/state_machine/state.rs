//! Conversation and turn state types

use crate::dispatch::{Intent, ToolInvocationRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Transcript
// ============================================================================

/// One entry of the transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "text", rename_all = "snake_case")]
pub enum Turn {
    User(String),
    Assistant(String),
}

impl Turn {
    pub fn text(&self) -> &str {
        match self {
            Turn::User(text) | Turn::Assistant(text) => text,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Turn::User(_))
    }
}

/// Conversation state carried across turns.
///
/// The caller owns it for the whole session and appends user turns; only
/// the pipeline appends assistant turns, sets the intent and records tool
/// results. Nothing is ever removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    turns: Vec<Turn>,
    current_intent: Option<Intent>,
    /// Last successful tool output per intent
    tool_results: BTreeMap<Intent, String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user utterance; the next pipeline run answers it
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::User(text.into()));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Text of the newest turn, if that turn is a user turn
    pub fn pending_utterance(&self) -> Option<&str> {
        self.turns
            .last()
            .filter(|turn| turn.is_user())
            .map(Turn::text)
    }

    pub fn current_intent(&self) -> Option<Intent> {
        self.current_intent
    }

    pub fn tool_result(&self, intent: Intent) -> Option<&str> {
        self.tool_results.get(&intent).map(String::as_str)
    }

    pub fn tool_results(&self) -> &BTreeMap<Intent, String> {
        &self.tool_results
    }

    pub(crate) fn push_assistant(&mut self, text: String) {
        self.turns.push(Turn::Assistant(text));
    }

    pub(crate) fn set_intent(&mut self, intent: Intent) {
        self.current_intent = Some(intent);
    }

    pub(crate) fn record_result(&mut self, intent: Intent, output: String) {
        self.tool_results.insert(intent, output);
    }
}

// ============================================================================
// Turn Phase
// ============================================================================

/// Where the pipeline is within one turn
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnPhase {
    /// Newest user turn appended, nothing decided yet
    #[default]
    Start,

    /// Intent chosen, arguments not yet extracted
    Classified { intent: Intent },

    /// Tool call in flight
    Invoked { request: ToolInvocationRequest },

    /// Exactly one assistant turn appended; terminal for this turn
    Done,
}

impl TurnPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Done)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TurnPhase::Start => "start",
            TurnPhase::Classified { .. } => "classified",
            TurnPhase::Invoked { .. } => "invoked",
            TurnPhase::Done => "done",
        }
    }
}
