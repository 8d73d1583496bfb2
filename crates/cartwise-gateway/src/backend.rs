//! The external call primitive the gateway wraps.

use std::future::Future;

use cartwise_core::Location;

use crate::error::BackendFailure;

/// Shape the caller expects the response text to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Text,
    Json,
}

/// Grounding capability a call asks the backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    WebSearch,
    Maps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub shape: OutputShape,
    pub tool: Option<Tool>,
    /// Position hint for map-grounded calls.
    pub near: Option<Location>,
}

impl GenerateRequest {
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            shape: OutputShape::Text,
            tool: None,
            near: None,
        }
    }

    #[must_use]
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            shape: OutputShape::Json,
            ..Self::text(prompt)
        }
    }

    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = Some(tool);
        self
    }

    #[must_use]
    pub fn near(mut self, location: &Location) -> Self {
        self.near = Some(location.clone());
        self
    }
}

/// A model backend: takes a prompt, returns the raw response text.
///
/// Implementations report transport and API failures as [`BackendFailure`]
/// and leave retrying to the gateway.
pub trait ModelBackend: Send + Sync {
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<String, BackendFailure>> + Send;
}
