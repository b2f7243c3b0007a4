//! Agent Runtime - LLM-backed order desk for the parlor
//!
//! This crate turns a customer's or employee's free-text message into one
//! reply string:
//! - Classifies the text into a structured [`Intent`](parlor_core::Intent)
//! - Enforces guardrails on stock-changing requests
//! - Calls the data service through the [`gateway::DataGateway`] seam
//! - Renders the outcome as a human-readable message
//!
//! # Architecture
//!
//! 1. **Classification** (`classifier`) - model output parsed as strict JSON
//! 2. **Guardrails** (`guardrails`) - deny malformed orders and restocks
//! 3. **Dispatch** (`dispatcher`) - at most two gateway calls per intent
//! 4. **Runtime** (`runtime`) - fail-quiet boundary around the whole turn
//!
//! # Safety Principle
//!
//! The model only translates. Whether an order is admitted is decided by the
//! data service's conditional decrement, never by the model.

pub mod classifier;
pub mod dispatcher;
pub mod gateway;
pub mod guardrails;
pub mod llm;
pub mod messages;
pub mod runtime;

pub use classifier::{parse_intent, IntentClassifier};
pub use dispatcher::IntentDispatcher;
pub use gateway::{DataGateway, GatewayError, HttpDataGateway, InMemoryDataGateway};
pub use llm::{CompletionRequest, LlmClient, OpenAiCompatibleClient, ScriptedLlmClient};
pub use runtime::AgentRuntime;
