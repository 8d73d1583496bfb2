//! Quota gateway for the AI backend.
//!
//! Every outbound model call passes through [`QuotaGateway::invoke`], which
//! admits calls one at a time onto a single FIFO lane with a minimum spacing
//! between admissions, classifies failures, and retries the transient ones.
//! [`GeminiClient`] is the HTTP implementation of the [`ModelBackend`] call
//! primitive.

pub mod backend;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod policy;

mod lane;
mod retry;

pub use backend::{GenerateRequest, ModelBackend, OutputShape, Tool};
pub use error::{BackendFailure, BackendSetupError, GatewayError};
pub use gateway::QuotaGateway;
pub use gemini::GeminiClient;
pub use policy::{CallClass, ClassPolicy, GatewayConfig};
