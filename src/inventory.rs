//! Tour-inventory platform feed
//!
//! Read-only client for the upstream platform's departure/rate catalog.
//! Departures are keyed by the platform's own identifiers; what the platform
//! reports (dates, durations, rates) is authoritative once synced.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Departure as reported by the platform feed
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamDeparture {
    pub id: String,
    pub date: NaiveDate,
    pub nights: i32,
    pub rates: Vec<UpstreamRate>,
}

/// Bookable rate within an upstream departure
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamRate {
    pub title: String,
    pub room: String,
    #[serde(default)]
    pub hotel_category: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
struct DeparturesResponse {
    departures: Vec<UpstreamDeparture>,
}

/// Client for the platform's product catalog endpoint
pub struct InventoryFeedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl InventoryFeedClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Current departure/rate catalog for one upstream product
    pub async fn departures(&self, product_code: &str) -> Result<Vec<UpstreamDeparture>> {
        let url = format!("{}/v1/products/{}/departures", self.base_url, product_code);
        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "platform feed returned {} for product {}",
                response.status(),
                product_code
            )));
        }

        let parsed: DeparturesResponse = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamFetch(e.to_string()))?;

        info!(
            "platform feed returned {} departures for product {}",
            parsed.departures.len(),
            product_code
        );
        Ok(parsed.departures)
    }
}
