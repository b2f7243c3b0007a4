use std::sync::Arc;
use std::time::Duration;

use parlor_agent::guardrails::GuardrailPolicy;
use parlor_agent::{AgentRuntime, HttpDataGateway, ScriptedLlmClient};
use parlor_db::{connect_with_settings, migrations};

const SECRET: &str = "scoop-secret";

async fn spawn_service() -> String {
    let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");
    let router = parlor_server::app(pool, SECRET.to_string().into());
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    format!("http://{address}")
}

fn runtime(base_url: &str, token: &str, replies: Vec<&str>) -> AgentRuntime {
    let gateway = HttpDataGateway::new(base_url, token.to_string().into(), Duration::from_secs(5))
        .expect("gateway");
    AgentRuntime::new(
        Arc::new(ScriptedLlmClient::new(replies)),
        Arc::new(gateway),
        GuardrailPolicy::default(),
    )
}

#[tokio::test]
async fn restock_order_and_inventory_through_the_real_service() {
    let base_url = spawn_service().await;
    let runtime = runtime(
        &base_url,
        SECRET,
        vec![
            r#"{"request": "restocking", "payload": {"item": "vanilla", "quantity": 50}}"#,
            r#"{"request": "order_placement", "payload": {"item": "Vanilla", "quantity": 2}}"#,
            r#"{"request": "inventory_retrieval"}"#,
            r#"{"request": "order_placement", "payload": {"item": "mint", "quantity": 5}}"#,
            r#"{"request": "menu_retrieval"}"#,
        ],
    );

    assert_eq!(
        runtime.handle_message("restock 50 vanilla").await,
        "Successfully restocked the Vanilla flavor of quantity 50."
    );
    assert_eq!(
        runtime.handle_message("two scoops of vanilla please").await,
        "Successfully placed order for 2 scoop/s of the Vanilla flavor. Thank you!"
    );
    assert_eq!(runtime.handle_message("show inventory").await, "Inventory\n\nVanilla: 48");
    assert_eq!(
        runtime.handle_message("five mint").await,
        "Sorry. There is not enough stock for the Mint flavor."
    );
    assert_eq!(
        runtime.handle_message("What flavors do you have?").await,
        "Here are our available flavors: Vanilla"
    );
}

#[tokio::test]
async fn feedback_and_reports_through_the_real_service() {
    let base_url = spawn_service().await;
    let runtime = runtime(
        &base_url,
        SECRET,
        vec![
            r#"{"request": "feedback_submission", "payload": {"comment": "Great service!", "rating": 5}}"#,
            r#"{"request": "feedback_retrieval"}"#,
            r#"{"request": "report_submission", "payload": {"feedback_summary": "Team morale is high", "average_rating": 4}}"#,
            r#"{"request": "report_retrieval"}"#,
        ],
    );

    assert_eq!(
        runtime.handle_message("great service, 5 stars").await,
        "Successfully submitted feedback. Thank you!"
    );
    assert_eq!(
        runtime.handle_message("show feedback").await,
        "Customer Feedbacks\n\nComment: 'Great service!'\nRating: 5\n"
    );
    assert_eq!(
        runtime.handle_message("file report").await,
        "Successfully submitted report."
    );
    assert_eq!(
        runtime.handle_message("show reports").await,
        "Employee Satisfaction Reports\n\nFeedback Summary: 'Team morale is high'\nAverage Rating: 4\n"
    );
}

#[tokio::test]
async fn wrong_credential_surfaces_generic_failure() {
    let base_url = spawn_service().await;
    let runtime = runtime(
        &base_url,
        "not-the-secret",
        vec![r#"{"request": "report_submission", "payload": {"feedback_summary": "x", "average_rating": 1}}"#],
    );

    assert_eq!(
        runtime.handle_message("file report").await,
        "Something went wrong when processing your request. Please try again."
    );
}
