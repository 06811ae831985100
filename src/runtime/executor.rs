//! Turn runtime executor

use super::traits::ToolExecutor;
use crate::state_machine::{
    transition, ConversationState, Effect, Event, TransitionError, TurnContext, TurnPhase,
};
use std::sync::Arc;
use thiserror::Error;

/// Errors that stop a turn before it starts
#[derive(Debug, Error, PartialEq)]
pub enum TurnError {
    #[error("The newest transcript entry must be a user turn")]
    MissingUserTurn,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Runs one pipeline turn at a time against any tool executor
pub struct TurnRuntime<T>
where
    T: ToolExecutor + 'static,
{
    tools: Arc<T>,
}

impl<T> TurnRuntime<T>
where
    T: ToolExecutor + 'static,
{
    pub fn new(tools: T) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }

    /// Share an executor that is already behind an `Arc`
    pub fn from_shared(tools: Arc<T>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Answer the newest user turn.
    ///
    /// Appends exactly one assistant turn. Tool failures are folded into
    /// that turn and never surface as errors here.
    pub async fn run_turn(&self, state: &mut ConversationState) -> Result<(), TurnError> {
        let utterance = state
            .pending_utterance()
            .ok_or(TurnError::MissingUserTurn)?
            .to_string();
        let context = TurnContext::new(&utterance);

        let mut phase = TurnPhase::Start;
        let mut next_event = Some(Event::Advance);

        // Process events in a loop - no recursion
        while let Some(event) = next_event.take() {
            let result = transition(&phase, &context, event)?;
            tracing::debug!(
                from = phase.name(),
                to = result.new_state.name(),
                "Turn transition"
            );
            phase = result.new_state;

            for effect in result.effects {
                if let Some(generated) = self.execute_effect(state, effect).await {
                    next_event = Some(generated);
                }
            }

            if next_event.is_none() && !phase.is_terminal() {
                next_event = Some(Event::Advance);
            }
        }

        Ok(())
    }

    async fn execute_effect(&self, state: &mut ConversationState, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SetIntent(intent) => {
                tracing::info!(intent = %intent, "Classified user turn");
                state.set_intent(intent);
                None
            }

            Effect::InvokeTool { request } => {
                let name = request.tool_name();
                tracing::debug!(tool = %name, arguments = ?request.arguments, "Invoking tool");
                let result = self.tools.invoke(name, request.input()).await;
                if let Err(e) = &result {
                    tracing::warn!(tool = %name, error = %e, "Tool invocation failed");
                }
                Some(Event::tool_complete(result))
            }

            Effect::RecordResult { intent, output } => {
                state.record_result(intent, output);
                None
            }

            Effect::AppendAssistant { text } => {
                state.push_assistant(text);
                None
            }
        }
    }
}
