//! Runtime for executing conversation turns
//!
//! Applies the effects of the pure state machine to a borrowed
//! `ConversationState` and performs the single tool invocation per turn.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{TurnError, TurnRuntime};
pub use traits::*;
