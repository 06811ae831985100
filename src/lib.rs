//! MCP Assistant - keyword-routed tool dispatcher
//!
//! Routes a free-text user query to exactly one backend capability,
//! extracts that capability's arguments from the text, invokes it, and
//! folds the result back into the conversation transcript.

pub mod config;
pub mod dispatch;
pub mod runtime;
pub mod state_machine;
pub mod tools;
