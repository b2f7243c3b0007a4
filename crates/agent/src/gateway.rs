use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parlor_core::config::{AuthConfig, GatewayConfig};
use parlor_core::domain::flavor::Flavor;
use parlor_core::domain::inventory::{FeedbackEntry, InventoryEntry, ReportEntry, StockChange};
use parlor_core::wire::{
    FeedbackListResponse, InventoryResponse, MenuResponse, OrderResponse, ReportListResponse,
    RestockResponse,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("data service request to {path} failed: {message}")]
    Transport { path: &'static str, message: String },
    #[error("data service returned status {status} for {path}")]
    Status { path: &'static str, status: u16 },
    #[error("data service response for {path} could not be decoded: {message}")]
    Decode { path: &'static str, message: String },
}

/// One call per data service operation. Every call is independent.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn menu(&self) -> Result<Vec<Flavor>, GatewayError>;
    async fn inventory(&self) -> Result<Vec<InventoryEntry>, GatewayError>;
    async fn place_order(&self, order: &StockChange) -> Result<OrderResponse, GatewayError>;
    async fn restock(&self, stock: &StockChange) -> Result<RestockResponse, GatewayError>;
    async fn feedback(&self) -> Result<Vec<FeedbackEntry>, GatewayError>;
    async fn submit_feedback(&self, entry: &FeedbackEntry) -> Result<(), GatewayError>;
    async fn reports(&self) -> Result<Vec<ReportEntry>, GatewayError>;
    async fn submit_report(&self, entry: &ReportEntry) -> Result<(), GatewayError>;
}

pub struct HttpDataGateway {
    http: reqwest::Client,
    base_url: String,
    bearer_token: SecretString,
}

impl HttpDataGateway {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(timeout).build().map_err(|error| {
            GatewayError::Transport { path: "client", message: error.to_string() }
        })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { http, base_url, bearer_token })
    }

    pub fn from_config(gateway: &GatewayConfig, auth: &AuthConfig) -> Result<Self, GatewayError> {
        Self::new(
            gateway.base_url.clone(),
            auth.bearer_token.clone(),
            Duration::from_secs(gateway.timeout_secs),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, GatewayError> {
        let request = self.http.get(format!("{}{path}", self.base_url));
        let response = self.send(path, request).await?;
        response.json::<T>().await.map_err(|error| GatewayError::Decode {
            path,
            message: error.to_string(),
        })
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &'static str,
        body: &B,
    ) -> Result<reqwest::Response, GatewayError> {
        let request = self.http.post(format!("{}{path}", self.base_url)).json(body);
        self.send(path, request).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &'static str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let response = self.post(path, body).await?;
        response.json::<T>().await.map_err(|error| GatewayError::Decode {
            path,
            message: error.to_string(),
        })
    }

    async fn send(
        &self,
        path: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = request
            .bearer_auth(self.bearer_token.expose_secret())
            .send()
            .await
            .map_err(|error| GatewayError::Transport { path, message: error.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { path, status: status.as_u16() });
        }
        Ok(response)
    }
}

#[async_trait]
impl DataGateway for HttpDataGateway {
    async fn menu(&self) -> Result<Vec<Flavor>, GatewayError> {
        Ok(self.get_json::<MenuResponse>("/menu").await?.flavors)
    }

    async fn inventory(&self) -> Result<Vec<InventoryEntry>, GatewayError> {
        Ok(self.get_json::<InventoryResponse>("/inventory").await?.items)
    }

    async fn place_order(&self, order: &StockChange) -> Result<OrderResponse, GatewayError> {
        self.post_json("/order", order).await
    }

    async fn restock(&self, stock: &StockChange) -> Result<RestockResponse, GatewayError> {
        self.post_json("/restock", stock).await
    }

    async fn feedback(&self) -> Result<Vec<FeedbackEntry>, GatewayError> {
        Ok(self.get_json::<FeedbackListResponse>("/feedback").await?.feedback)
    }

    async fn submit_feedback(&self, entry: &FeedbackEntry) -> Result<(), GatewayError> {
        self.post("/feedback", entry).await.map(|_| ())
    }

    async fn reports(&self) -> Result<Vec<ReportEntry>, GatewayError> {
        Ok(self.get_json::<ReportListResponse>("/report").await?.report)
    }

    async fn submit_report(&self, entry: &ReportEntry) -> Result<(), GatewayError> {
        self.post("/report", entry).await.map(|_| ())
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    inventory: BTreeMap<Flavor, i64>,
    feedback: Vec<FeedbackEntry>,
    reports: Vec<ReportEntry>,
}

/// Gateway over process memory with the data service's semantics. Counts calls.
#[derive(Debug, Default)]
pub struct InMemoryDataGateway {
    state: Mutex<InMemoryState>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryDataGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock<I, F>(stock: I) -> Self
    where
        I: IntoIterator<Item = (F, i64)>,
        F: Into<Flavor>,
    {
        let state = InMemoryState {
            inventory: stock.into_iter().map(|(flavor, quantity)| (flavor.into(), quantity)).collect(),
            ..InMemoryState::default()
        };
        Self { state: Mutex::new(state), ..Self::default() }
    }

    /// Every call fails with a transport error while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn quantity_of(&self, flavor: &Flavor) -> Option<i64> {
        self.state.lock().await.inventory.get(flavor).copied()
    }

    fn record_call(&self, path: &'static str, write: bool) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if write {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport {
                path,
                message: "data service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataGateway for InMemoryDataGateway {
    async fn menu(&self) -> Result<Vec<Flavor>, GatewayError> {
        self.record_call("/menu", false)?;
        let state = self.state.lock().await;
        Ok(state
            .inventory
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(flavor, _)| flavor.clone())
            .collect())
    }

    async fn inventory(&self) -> Result<Vec<InventoryEntry>, GatewayError> {
        self.record_call("/inventory", false)?;
        let state = self.state.lock().await;
        Ok(state
            .inventory
            .iter()
            .map(|(flavor, quantity)| InventoryEntry { flavor: flavor.clone(), quantity: *quantity })
            .collect())
    }

    async fn place_order(&self, order: &StockChange) -> Result<OrderResponse, GatewayError> {
        self.record_call("/order", true)?;
        let mut state = self.state.lock().await;
        let admitted = match state.inventory.get_mut(&order.item) {
            Some(quantity) if *quantity >= order.quantity => {
                *quantity -= order.quantity;
                true
            }
            _ => false,
        };
        Ok(OrderResponse { item: order.item.clone(), quantity: order.quantity, admitted })
    }

    async fn restock(&self, stock: &StockChange) -> Result<RestockResponse, GatewayError> {
        self.record_call("/restock", true)?;
        let mut state = self.state.lock().await;
        let total = state.inventory.entry(stock.item.clone()).or_insert(0);
        let Some(sum) = total.checked_add(stock.quantity) else {
            return Err(GatewayError::Status { path: "/restock", status: 400 });
        };
        *total = sum;
        Ok(RestockResponse { item: stock.item.clone(), quantity: sum })
    }

    async fn feedback(&self) -> Result<Vec<FeedbackEntry>, GatewayError> {
        self.record_call("/feedback", false)?;
        Ok(self.state.lock().await.feedback.clone())
    }

    async fn submit_feedback(&self, entry: &FeedbackEntry) -> Result<(), GatewayError> {
        self.record_call("/feedback", true)?;
        self.state.lock().await.feedback.push(entry.clone());
        Ok(())
    }

    async fn reports(&self) -> Result<Vec<ReportEntry>, GatewayError> {
        self.record_call("/report", false)?;
        Ok(self.state.lock().await.reports.clone())
    }

    async fn submit_report(&self, entry: &ReportEntry) -> Result<(), GatewayError> {
        self.record_call("/report", true)?;
        self.state.lock().await.reports.push(entry.clone());
        Ok(())
    }
}
