use std::sync::Arc;

use anyhow::Result;
use parlor_core::domain::flavor::Flavor;
use parlor_core::Intent;
use serde_json::{Map, Value};

use crate::llm::{CompletionRequest, LlmClient};

pub const SYSTEM_PROMPT: &str = r#"You are the order desk assistant of an ice cream parlor.
You help customers and employees with the menu, orders, customer feedback,
restocking, employee satisfaction reports and general questions about the parlor.

Classify the user's message as exactly one request and reply with a single JSON object:
- menu retrieval: {"request": "menu_retrieval"}
- inventory retrieval: {"request": "inventory_retrieval"}
- order placement (extract the flavor and the number of scoops):
  {"request": "order_placement", "payload": {"item": "vanilla", "quantity": 2}}
- restocking (extract the flavor and the quantity added):
  {"request": "restocking", "payload": {"item": "vanilla", "quantity": 50}}
- customer feedback submission (comment defaults to "" and rating to 0):
  {"request": "feedback_submission", "payload": {"comment": "Great service!", "rating": 5}}
- customer feedback retrieval: {"request": "feedback_retrieval"}
- employee satisfaction report submission (summary defaults to "" and rating to 0):
  {"request": "report_submission", "payload": {"feedback_summary": "Overall positive feedback", "average_rating": 4}}
- employee satisfaction report retrieval: {"request": "report_retrieval"}
- general question about the parlor:
  {"request": "inquiry", "payload": "What are you selling?", "answer": "<your answer to the question>"}
- anything else: {"request": "unrecognized"}

Quantities and ratings are whole numbers. Reply with JSON only."#;

/// Turns free text into an [`Intent`] through the language model.
pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Fails only when the model call itself fails. Unusable output is
    /// classified as [`Intent::Unrecognized`].
    pub async fn classify(&self, query: &str) -> Result<Intent> {
        let raw = self.llm.complete(CompletionRequest::new(SYSTEM_PROMPT, query)).await?;
        let intent = parse_intent(&raw);

        tracing::debug!(
            event_name = "agent.classifier.parsed",
            intent = intent.request_kind(),
            raw_len = raw.len(),
            "model output classified"
        );

        Ok(intent)
    }
}

/// Strict JSON reading of the model output. Never evaluates the text.
pub fn parse_intent(raw: &str) -> Intent {
    let body = strip_code_fence(raw.trim());
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Intent::Unrecognized;
    };
    let Some(object) = value.as_object() else {
        return Intent::Unrecognized;
    };
    let Some(kind) = object.get("request").and_then(Value::as_str) else {
        return Intent::Unrecognized;
    };
    let payload = object.get("payload").unwrap_or(&Value::Null);

    match kind.trim().to_ascii_lowercase().as_str() {
        "menu_retrieval" => Intent::MenuRetrieval,
        "inventory_retrieval" => Intent::InventoryRetrieval,
        "order_placement" => Intent::OrderPlacement {
            item: Flavor::new(text_field(payload, object, "item")),
            quantity: integer_field(payload, object, "quantity"),
        },
        "restocking" => Intent::Restocking {
            item: Flavor::new(text_field(payload, object, "item")),
            quantity: integer_field(payload, object, "quantity"),
        },
        "feedback_submission" => Intent::FeedbackSubmission {
            comment: text_field(payload, object, "comment"),
            rating: integer_field(payload, object, "rating"),
        },
        "feedback_retrieval" => Intent::FeedbackRetrieval,
        "report_submission" => Intent::ReportSubmission {
            feedback_summary: text_field(payload, object, "feedback_summary"),
            average_rating: integer_field(payload, object, "average_rating"),
        },
        "report_retrieval" => Intent::ReportRetrieval,
        "inquiry" => {
            let question = match payload {
                Value::String(question) => question.clone(),
                _ => text_field(payload, object, "question"),
            };
            let answer = object
                .get("answer")
                .and_then(Value::as_str)
                .or_else(|| payload.get("answer").and_then(Value::as_str))
                .unwrap_or_default()
                .to_string();
            Intent::Inquiry { question, answer }
        }
        _ => Intent::Unrecognized,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn lookup<'a>(payload: &'a Value, object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    payload.get(key).or_else(|| object.get(key))
}

fn text_field(payload: &Value, object: &Map<String, Value>, key: &str) -> String {
    lookup(payload, object, key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn integer_field(payload: &Value, object: &Map<String, Value>, key: &str) -> i64 {
    lookup(payload, object, key).and_then(Value::as_i64).unwrap_or(0)
}
