//! Intent classification and argument extraction
//!
//! Both stages are pure functions of the newest user utterance. Prior
//! turns never influence routing.

mod classify;
mod extract;
mod intent;

#[cfg(test)]
mod proptests;

pub use classify::{classify, classify_card, DEFAULT_INTENT};
pub use extract::{
    extract, Extraction, ToolInvocationRequest, DEFAULT_PASSWORD_LENGTH, DICE_NOTATION_HINT,
    SET_CODE_HINT,
};
pub use intent::Intent;
