use std::sync::Arc;

use anyhow::Result;
use parlor_core::config::AppConfig;

use crate::classifier::IntentClassifier;
use crate::dispatcher::IntentDispatcher;
use crate::gateway::{DataGateway, HttpDataGateway};
use crate::guardrails::GuardrailPolicy;
use crate::llm::{LlmClient, OpenAiCompatibleClient};
use crate::messages;

pub struct AgentRuntime {
    classifier: IntentClassifier,
    dispatcher: IntentDispatcher,
}

impl AgentRuntime {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        gateway: Arc<dyn DataGateway>,
        guardrails: GuardrailPolicy,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(llm),
            dispatcher: IntentDispatcher::new(gateway, guardrails),
        }
    }

    /// Wires the OpenAI-compatible model client and the HTTP data gateway.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm = OpenAiCompatibleClient::from_config(&config.llm)?;
        let gateway = HttpDataGateway::from_config(&config.gateway, &config.auth)?;
        Ok(Self::new(Arc::new(llm), Arc::new(gateway), GuardrailPolicy::default()))
    }

    /// Always returns a reply. Failures are logged and answered with a generic message.
    pub async fn handle_message(&self, text: &str) -> String {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        let text = text.trim();
        if text.is_empty() {
            return messages::UNRECOGNIZED.to_string();
        }

        let intent = match self.classifier.classify(text).await {
            Ok(intent) => intent,
            Err(error) => {
                tracing::error!(
                    event_name = "agent.classify.failed",
                    correlation_id = %correlation_id,
                    error = %format!("{error:#}"),
                    "model call failed"
                );
                return messages::GENERIC_FAILURE.to_string();
            }
        };

        tracing::info!(
            event_name = "agent.intent.classified",
            correlation_id = %correlation_id,
            intent = intent.request_kind(),
            mutates_state = intent.mutates_state(),
            "request classified"
        );

        match self.dispatcher.dispatch(&intent).await {
            Ok(reply) if !reply.is_empty() => reply,
            Ok(_) => messages::UNRECOGNIZED.to_string(),
            Err(error) => {
                tracing::error!(
                    event_name = "agent.dispatch.failed",
                    correlation_id = %correlation_id,
                    intent = intent.request_kind(),
                    error = %error,
                    "data service call failed"
                );
                messages::GENERIC_FAILURE.to_string()
            }
        }
    }
}
