//! Pure state transition function
//!
//! Given the same phase, utterance and event it always produces the same
//! next phase and effects, with no I/O.

use super::{Effect, Event, TurnPhase};
use crate::dispatch::{classify, extract, Extraction, Intent};
use crate::tools::ToolError;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnPhase,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnPhase) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Immutable inputs for one turn
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// The newest user utterance; earlier turns are never consulted
    pub utterance: &'a str,
}

impl<'a> TurnContext<'a> {
    pub fn new(utterance: &'a str) -> Self {
        Self { utterance }
    }
}

/// Pure transition function
pub fn transition(
    state: &TurnPhase,
    context: &TurnContext<'_>,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Start -> Classified
        (TurnPhase::Start, Event::Advance) => {
            let intent = classify(context.utterance);
            Ok(TransitionResult::new(TurnPhase::Classified { intent })
                .with_effect(Effect::SetIntent(intent)))
        }

        // Classified -> Invoked, or straight to Done when an argument is missing
        (TurnPhase::Classified { intent }, Event::Advance) => {
            match extract(*intent, context.utterance) {
                Extraction::Invoke(request) => Ok(TransitionResult::new(TurnPhase::Invoked {
                    request: request.clone(),
                })
                .with_effect(Effect::invoke_tool(request))),
                Extraction::ShortCircuit(instruction) => {
                    Ok(TransitionResult::new(TurnPhase::Done)
                        .with_effect(Effect::reply(instruction)))
                }
            }
        }

        // Invoked + success -> Done
        (TurnPhase::Invoked { request }, Event::ToolComplete { result: Ok(output) }) => {
            let reply = success_reply(request.intent, &output);
            Ok(TransitionResult::new(TurnPhase::Done)
                .with_effect(Effect::RecordResult {
                    intent: request.intent,
                    output,
                })
                .with_effect(Effect::reply(reply)))
        }

        // Invoked + failure -> Done; the failure stays inside this turn
        (TurnPhase::Invoked { .. }, Event::ToolComplete { result: Err(error) }) => {
            Ok(TransitionResult::new(TurnPhase::Done).with_effect(Effect::reply(error_reply(&error))))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {event:?}",
            state.name()
        ))),
    }
}

/// Assistant reply wrapping a successful tool output
pub fn success_reply(intent: Intent, output: &str) -> String {
    format!("I used the {intent} tool to help you:\n\n{output}")
}

/// Assistant reply for any tool or registry failure
pub fn error_reply(error: &ToolError) -> String {
    format!("Sorry, I encountered an error: {error}")
}
