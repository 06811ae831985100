//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime with mock implementations.

use crate::tools::{ToolError, ToolRegistry};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Executor for tools
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Invoke the tool registered under `name`
    async fn invoke(&self, name: &str, input: Value) -> Result<String, ToolError>;
}

#[async_trait]
impl<T: ToolExecutor + ?Sized> ToolExecutor for Arc<T> {
    async fn invoke(&self, name: &str, input: Value) -> Result<String, ToolError> {
        (**self).invoke(name, input).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn invoke(&self, name: &str, input: Value) -> Result<String, ToolError> {
        ToolRegistry::invoke(self, name, input).await
    }
}
