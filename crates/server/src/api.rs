//! JSON endpoints of the data service.
//!
//! All routes below require `Authorization: Bearer <secret>`:
//! - `GET  /menu`       flavors with positive stock
//! - `GET  /inventory`  every flavor with its quantity
//! - `POST /order`      conditional decrement, reports `admitted`
//! - `POST /restock`    upsert-add, reports the new total
//! - `GET  /feedback`   customer feedback in submission order
//! - `POST /feedback`   append customer feedback
//! - `GET  /report`     satisfaction reports in submission order
//! - `POST /report`     append a satisfaction report
//!
//! `GET /health` is served without authentication.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parlor_core::domain::inventory::{FeedbackEntry, ReportEntry, StockChange};
use parlor_core::wire::{
    ErrorResponse, FeedbackListResponse, InventoryResponse, MenuResponse, OrderResponse,
    ReportListResponse, RestockResponse,
};
use parlor_core::{ApplicationError, DomainError, InterfaceError};
use parlor_db::repositories::{
    FeedbackRepository, InventoryRepository, ReportRepository, RepositoryError,
};
use parlor_db::{DbPool, SqlFeedbackRepository, SqlInventoryRepository, SqlReportRepository};
use secrecy::SecretString;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{require_bearer, AuthState};
use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn InventoryRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl AppState {
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            inventory: Arc::new(SqlInventoryRepository::new(pool.clone())),
            feedback: Arc::new(SqlFeedbackRepository::new(pool.clone())),
            reports: Arc::new(SqlReportRepository::new(pool)),
        }
    }
}

/// Full data service router: authenticated API plus the open health probe.
pub fn app(pool: DbPool, bearer_token: SecretString) -> Router {
    let protected = router(AppState::from_pool(pool.clone()))
        .layer(axum::middleware::from_fn_with_state(AuthState::new(bearer_token), require_bearer));

    Router::new().merge(health::router(pool)).merge(protected)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/menu", get(fetch_menu))
        .route("/inventory", get(fetch_inventory))
        .route("/order", post(place_order))
        .route("/restock", post(restock))
        .route("/feedback", get(fetch_feedback).post(submit_feedback))
        .route("/report", get(fetch_reports).post(submit_report))
        .with_state(state)
}

/// Interface error rendered as `{ "error", "correlation_id" }` with the matching status.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error.into_interface(Uuid::new_v4().to_string()))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        Self::from(ApplicationError::from(error))
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::from(ApplicationError::from(error))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(InterfaceError::BadRequest {
            message: rejection.body_text(),
            correlation_id: Uuid::new_v4().to_string(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status.is_server_error() {
            tracing::error!(
                event_name = "api.request.failed",
                correlation_id = %self.0.correlation_id(),
                error = %self.0,
                "request failed"
            );
        } else {
            tracing::info!(
                event_name = "api.request.rejected",
                correlation_id = %self.0.correlation_id(),
                error = %self.0,
                "request rejected"
            );
        }

        let body = ErrorResponse {
            error: self.0.user_message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn fetch_menu(State(state): State<AppState>) -> Result<Json<MenuResponse>, ApiError> {
    let flavors = state.inventory.available_flavors().await?;
    Ok(Json(MenuResponse { flavors }))
}

async fn fetch_inventory(
    State(state): State<AppState>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let items = state.inventory.list().await?;
    Ok(Json(InventoryResponse { items }))
}

async fn place_order(
    State(state): State<AppState>,
    body: Result<Json<StockChange>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(order) = body?;
    order.validate()?;

    let admitted = state.inventory.decrement_if_available(&order.item, order.quantity).await?;
    tracing::info!(
        event_name = "api.order.evaluated",
        flavor = order.item.as_str(),
        quantity = order.quantity,
        admitted,
        "order evaluated"
    );

    Ok(Json(OrderResponse { item: order.item, quantity: order.quantity, admitted }))
}

async fn restock(
    State(state): State<AppState>,
    body: Result<Json<StockChange>, JsonRejection>,
) -> Result<Json<RestockResponse>, ApiError> {
    let Json(stock) = body?;
    stock.validate()?;

    let total = state.inventory.restock(&stock.item, stock.quantity).await?.ok_or_else(|| {
        DomainError::StockLimitExceeded {
            flavor: stock.item.as_str().to_string(),
            quantity: stock.quantity,
        }
    })?;
    tracing::info!(
        event_name = "api.restock.applied",
        flavor = stock.item.as_str(),
        added = stock.quantity,
        total,
        "restock applied"
    );

    Ok(Json(RestockResponse { item: stock.item, quantity: total }))
}

async fn fetch_feedback(
    State(state): State<AppState>,
) -> Result<Json<FeedbackListResponse>, ApiError> {
    let feedback = state.feedback.list().await?;
    Ok(Json(FeedbackListResponse { feedback }))
}

async fn submit_feedback(
    State(state): State<AppState>,
    body: Result<Json<FeedbackEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(entry) = body?;
    state.feedback.append(entry).await?;
    Ok((StatusCode::CREATED, Json(json!({}))))
}

async fn fetch_reports(
    State(state): State<AppState>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let report = state.reports.list().await?;
    Ok(Json(ReportListResponse { report }))
}

async fn submit_report(
    State(state): State<AppState>,
    body: Result<Json<ReportEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(entry) = body?;
    state.reports.append(entry).await?;
    Ok((StatusCode::CREATED, Json(json!({}))))
}
