use std::sync::Arc;

use parlor_core::domain::flavor::Flavor;
use parlor_core::domain::inventory::{FeedbackEntry, ReportEntry, StockChange};
use parlor_core::Intent;

use crate::gateway::{DataGateway, GatewayError};
use crate::guardrails::{GuardrailDecision, GuardrailPolicy};
use crate::messages;

/// Routes a classified intent to the data service and renders the reply.
pub struct IntentDispatcher {
    gateway: Arc<dyn DataGateway>,
    guardrails: GuardrailPolicy,
}

impl IntentDispatcher {
    pub fn new(gateway: Arc<dyn DataGateway>, guardrails: GuardrailPolicy) -> Self {
        Self { gateway, guardrails }
    }

    /// Precondition failures become user messages. Only gateway failures are errors.
    pub async fn dispatch(&self, intent: &Intent) -> Result<String, GatewayError> {
        if let GuardrailDecision::Deny { reason_code, user_message, fallback_path } =
            self.guardrails.evaluate(intent)
        {
            tracing::info!(
                event_name = "agent.guardrail.denied",
                intent = intent.request_kind(),
                reason_code,
                fallback_path,
                "guardrail denied request"
            );
            return Ok(user_message);
        }

        match intent {
            Intent::MenuRetrieval => Ok(messages::menu(&self.gateway.menu().await?)),
            Intent::InventoryRetrieval => {
                Ok(messages::inventory(&self.gateway.inventory().await?))
            }
            Intent::OrderPlacement { item, quantity } => self.place_order(item, *quantity).await,
            Intent::Restocking { item, quantity } => {
                let restocked = self.gateway.restock(&StockChange::new(item.clone(), *quantity)).await?;
                tracing::info!(
                    event_name = "agent.restock.applied",
                    flavor = item.as_str(),
                    added = quantity,
                    total = restocked.quantity,
                    "restock applied"
                );
                Ok(messages::restocked(item, *quantity))
            }
            Intent::FeedbackSubmission { comment, rating } => {
                let entry = FeedbackEntry { comment: comment.clone(), rating: *rating };
                self.gateway.submit_feedback(&entry).await?;
                Ok(messages::FEEDBACK_SUBMITTED.to_string())
            }
            Intent::FeedbackRetrieval => {
                Ok(messages::feedback_list(&self.gateway.feedback().await?))
            }
            Intent::ReportSubmission { feedback_summary, average_rating } => {
                let entry = ReportEntry {
                    feedback_summary: feedback_summary.clone(),
                    average_rating: *average_rating,
                };
                self.gateway.submit_report(&entry).await?;
                Ok(messages::REPORT_SUBMITTED.to_string())
            }
            Intent::ReportRetrieval => Ok(messages::report_list(&self.gateway.reports().await?)),
            Intent::Inquiry { answer, .. } if !answer.trim().is_empty() => Ok(answer.clone()),
            Intent::Inquiry { .. } | Intent::Unrecognized => Ok(messages::UNRECOGNIZED.to_string()),
        }
    }

    async fn place_order(&self, item: &Flavor, quantity: i64) -> Result<String, GatewayError> {
        let inventory = self.gateway.inventory().await?;
        if !inventory.iter().any(|entry| entry.covers(item, quantity)) {
            tracing::info!(
                event_name = "agent.order.insufficient_stock",
                flavor = item.as_str(),
                requested = quantity,
                "order refused before write"
            );
            return Ok(messages::insufficient_stock(item));
        }

        let placed = self.gateway.place_order(&StockChange::new(item.clone(), quantity)).await?;
        if !placed.admitted {
            tracing::info!(
                event_name = "agent.order.not_admitted",
                flavor = item.as_str(),
                requested = quantity,
                "store refused conditional decrement"
            );
            return Ok(messages::insufficient_stock(item));
        }

        Ok(messages::order_placed(item, quantity))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use parlor_core::domain::flavor::Flavor;
    use parlor_core::domain::inventory::{
        FeedbackEntry, InventoryEntry, ReportEntry, StockChange,
    };
    use parlor_core::wire::{OrderResponse, RestockResponse};
    use parlor_core::Intent;

    use super::IntentDispatcher;
    use crate::gateway::{DataGateway, GatewayError, InMemoryDataGateway};
    use crate::guardrails::GuardrailPolicy;
    use crate::messages;

    fn dispatcher(gateway: &Arc<InMemoryDataGateway>) -> IntentDispatcher {
        IntentDispatcher::new(gateway.clone(), GuardrailPolicy::default())
    }

    fn order(item: &str, quantity: i64) -> Intent {
        Intent::OrderPlacement { item: Flavor::new(item), quantity }
    }

    /// Reports plenty of stock but refuses every conditional decrement, as the
    /// store does when another order took the last scoops in between.
    #[derive(Default)]
    struct LostRaceGateway {
        order_attempts: AtomicUsize,
    }

    #[async_trait]
    impl DataGateway for LostRaceGateway {
        async fn menu(&self) -> Result<Vec<Flavor>, GatewayError> {
            Ok(vec![Flavor::new("vanilla")])
        }

        async fn inventory(&self) -> Result<Vec<InventoryEntry>, GatewayError> {
            Ok(vec![InventoryEntry { flavor: Flavor::new("vanilla"), quantity: 10 }])
        }

        async fn place_order(&self, order: &StockChange) -> Result<OrderResponse, GatewayError> {
            self.order_attempts.fetch_add(1, Ordering::SeqCst);
            Ok(OrderResponse { item: order.item.clone(), quantity: order.quantity, admitted: false })
        }

        async fn restock(&self, stock: &StockChange) -> Result<RestockResponse, GatewayError> {
            Ok(RestockResponse { item: stock.item.clone(), quantity: stock.quantity })
        }

        async fn feedback(&self) -> Result<Vec<FeedbackEntry>, GatewayError> {
            Ok(Vec::new())
        }

        async fn submit_feedback(&self, _entry: &FeedbackEntry) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn reports(&self) -> Result<Vec<ReportEntry>, GatewayError> {
            Ok(Vec::new())
        }

        async fn submit_report(&self, _entry: &ReportEntry) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn restock_then_order_shows_remaining_stock() {
        let gateway = Arc::new(InMemoryDataGateway::new());
        let dispatcher = dispatcher(&gateway);

        let restocked = dispatcher
            .dispatch(&Intent::Restocking { item: Flavor::new("vanilla"), quantity: 50 })
            .await
            .expect("restock");
        let ordered = dispatcher.dispatch(&order("vanilla", 2)).await.expect("order");
        let inventory = dispatcher.dispatch(&Intent::InventoryRetrieval).await.expect("inventory");

        assert_eq!(restocked, "Successfully restocked the Vanilla flavor of quantity 50.");
        assert_eq!(
            ordered,
            "Successfully placed order for 2 scoop/s of the Vanilla flavor. Thank you!"
        );
        assert_eq!(inventory, "Inventory\n\nVanilla: 48");
    }

    #[tokio::test]
    async fn order_for_missing_flavor_never_writes() {
        let gateway = Arc::new(InMemoryDataGateway::new());

        let reply = dispatcher(&gateway).dispatch(&order("mint", 5)).await.expect("order");

        assert_eq!(reply, "Sorry. There is not enough stock for the Mint flavor.");
        assert_eq!(gateway.write_count(), 0);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn ordering_exact_stock_then_one_more() {
        let gateway = Arc::new(InMemoryDataGateway::with_stock([("chocolate", 3)]));
        let dispatcher = dispatcher(&gateway);

        let first = dispatcher.dispatch(&order("chocolate", 3)).await.expect("first");
        let second = dispatcher.dispatch(&order("chocolate", 1)).await.expect("second");

        assert!(first.starts_with("Successfully placed order for 3 scoop/s"));
        assert_eq!(second, messages::insufficient_stock(&Flavor::new("chocolate")));
        assert_eq!(gateway.quantity_of(&Flavor::new("chocolate")).await, Some(0));
    }

    #[tokio::test]
    async fn refused_decrement_after_passing_precheck_reports_insufficient_stock() {
        let gateway = Arc::new(LostRaceGateway::default());
        let dispatcher = IntentDispatcher::new(gateway.clone(), GuardrailPolicy::default());

        let reply = dispatcher.dispatch(&order("vanilla", 2)).await.expect("order");

        assert_eq!(reply, messages::insufficient_stock(&Flavor::new("vanilla")));
        assert_eq!(gateway.order_attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn menu_lists_only_positive_stock() {
        let gateway =
            Arc::new(InMemoryDataGateway::with_stock([("vanilla", 4), ("mint", 0), ("rocky road", 1)]));

        let reply = dispatcher(&gateway).dispatch(&Intent::MenuRetrieval).await.expect("menu");

        assert_eq!(reply, "Here are our available flavors: Rocky Road, Vanilla");
    }

    #[tokio::test]
    async fn invalid_quantity_is_denied_without_gateway_calls() {
        let gateway = Arc::new(InMemoryDataGateway::new());

        let reply = dispatcher(&gateway).dispatch(&order("vanilla", 0)).await.expect("order");

        assert_eq!(reply, messages::UNRECOGNIZED);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn feedback_and_reports_are_listed_after_submission() {
        let gateway = Arc::new(InMemoryDataGateway::new());
        let dispatcher = dispatcher(&gateway);

        let submitted = dispatcher
            .dispatch(&Intent::FeedbackSubmission { comment: "Great service!".to_string(), rating: 5 })
            .await
            .expect("feedback");
        let report = dispatcher
            .dispatch(&Intent::ReportSubmission {
                feedback_summary: "Overall positive feedback".to_string(),
                average_rating: 4,
            })
            .await
            .expect("report");

        assert_eq!(submitted, messages::FEEDBACK_SUBMITTED);
        assert_eq!(report, messages::REPORT_SUBMITTED);
        assert_eq!(
            dispatcher.dispatch(&Intent::FeedbackRetrieval).await.expect("list feedback"),
            "Customer Feedbacks\n\nComment: 'Great service!'\nRating: 5\n"
        );
        assert_eq!(
            dispatcher.dispatch(&Intent::ReportRetrieval).await.expect("list reports"),
            "Employee Satisfaction Reports\n\nFeedback Summary: 'Overall positive feedback'\nAverage Rating: 4\n"
        );
    }

    #[tokio::test]
    async fn report_write_failure_is_an_error() {
        let gateway = Arc::new(InMemoryDataGateway::new());
        gateway.set_unavailable(true);

        let result = dispatcher(&gateway)
            .dispatch(&Intent::ReportSubmission {
                feedback_summary: "Short staffed".to_string(),
                average_rating: 2,
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn inquiry_and_unrecognized_skip_the_gateway() {
        let gateway = Arc::new(InMemoryDataGateway::new());
        let dispatcher = dispatcher(&gateway);

        let answered = dispatcher
            .dispatch(&Intent::Inquiry {
                question: "When do you open?".to_string(),
                answer: "We open at 10am every day.".to_string(),
            })
            .await
            .expect("inquiry");
        let blank = dispatcher
            .dispatch(&Intent::Inquiry { question: "?".to_string(), answer: "  ".to_string() })
            .await
            .expect("blank inquiry");
        let unknown = dispatcher.dispatch(&Intent::Unrecognized).await.expect("unrecognized");

        assert_eq!(answered, "We open at 10am every day.");
        assert_eq!(blank, messages::UNRECOGNIZED);
        assert_eq!(unknown, messages::UNRECOGNIZED);
        assert_eq!(gateway.call_count(), 0);
    }
}
