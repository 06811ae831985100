//! Per-turn pipeline state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `Start -> Classified -> Invoked -> Done`. The runtime applies the
//! returned effects and performs the single tool invocation.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConversationState, Turn, TurnPhase};
pub use transition::{
    error_reply, success_reply, transition, TransitionError, TransitionResult, TurnContext,
};
