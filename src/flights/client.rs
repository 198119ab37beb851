//! HTTP clients for the external fare sources
//!
//! Both sources speak the same search contract, so a single reqwest-backed
//! client covers them; which base URL a package's quotes go to is a
//! configuration field on the package, not a code branch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::QuoteSource;

use super::{
    fold_lowest, DestinationSpec, FlightQuote, FlightQuoteProvider, QuoteError, QuoteRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search body sent to a fare source
#[derive(Debug, Serialize)]
struct FareSearch<'a> {
    origins: &'a [String],
    arrive: Vec<String>,
    depart: Vec<String>,
    date_from: NaiveDate,
    date_to: NaiveDate,
    nights: i32,
    trip: &'static str,
}

#[derive(Debug, Deserialize)]
struct FareSearchResponse {
    fares: Vec<WireFare>,
}

#[derive(Debug, Deserialize)]
struct WireFare {
    origin: String,
    date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    currency: String,
}

impl From<WireFare> for FlightQuote {
    fn from(fare: WireFare) -> Self {
        FlightQuote {
            origin: fare.origin,
            date: fare.date,
            price: fare.price,
            currency: fare.currency,
        }
    }
}

/// Client for one fare source's search endpoint
pub struct FareApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FareApiClient {
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

    async fn search(&self, body: &FareSearch<'_>) -> Result<Vec<FlightQuote>, QuoteError> {
        let url = format!("{}/v1/fares/search", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(QuoteError::Rejected(
                    "fare source rejected the API key".to_string(),
                ));
            }
            status => {
                return Err(QuoteError::Transport(format!(
                    "fare source returned {}",
                    status
                )));
            }
        }

        let parsed: FareSearchResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        debug!("fare search returned {} fares", parsed.fares.len());
        Ok(parsed.fares.into_iter().map(FlightQuote::from).collect())
    }
}

#[async_trait]
impl FlightQuoteProvider for FareApiClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<FlightQuote>, QuoteError> {
        request.validate().map_err(QuoteError::Rejected)?;

        let (arrive, depart, trip) = match &request.destination {
            DestinationSpec::RoundTrip { airport } => {
                (vec![airport.clone()], vec![airport.clone()], "return")
            }
            DestinationSpec::OpenJaw { arrive, depart } => {
                (arrive.clone(), depart.clone(), "open_jaw")
            }
        };

        let fares = self
            .search(&FareSearch {
                origins: &request.origins,
                arrive,
                depart,
                date_from: request.window.from,
                date_to: request.window.to,
                nights: request.nights,
                trip,
            })
            .await?;

        // Candidate-set destinations can quote several fares per origin/date;
        // only the cheapest qualifying one is sellable.
        let mut quotes = fold_lowest(fares);

        if let Some(leg) = &request.internal_leg {
            // The domestic hop is origin-independent: one fare per flying
            // date, keyed back to the arrival date it belongs to.
            let leg_origin = vec![leg.from.clone()];
            let hop_fares = self
                .search(&FareSearch {
                    origins: &leg_origin,
                    arrive: vec![leg.to.clone()],
                    depart: vec![leg.to.clone()],
                    date_from: request.window.from + chrono::Duration::days(leg.day_offset),
                    date_to: request.window.to + chrono::Duration::days(leg.day_offset),
                    nights: 0,
                    trip: "one_way",
                })
                .await?;

            let by_date: HashMap<NaiveDate, Decimal> = fold_lowest(hop_fares)
                .into_iter()
                .map(|fare| (fare.date, fare.price))
                .collect();

            // A date without a priced hop cannot be sold as a full itinerary.
            quotes.retain_mut(|quote| {
                match by_date.get(&(quote.date + chrono::Duration::days(leg.day_offset))) {
                    Some(hop) => {
                        quote.price += *hop;
                        true
                    }
                    None => false,
                }
            });
        }

        Ok(quotes)
    }
}

/// The configured fare sources, selected per package
pub struct QuoteSources {
    searchwing: Arc<FareApiClient>,
    faredeck: Arc<FareApiClient>,
}

impl QuoteSources {
    pub fn new(searchwing: FareApiClient, faredeck: FareApiClient) -> Self {
        Self {
            searchwing: Arc::new(searchwing),
            faredeck: Arc::new(faredeck),
        }
    }

    pub fn provider(&self, source: QuoteSource) -> Arc<dyn FlightQuoteProvider> {
        match source {
            QuoteSource::Searchwing => self.searchwing.clone(),
            QuoteSource::Faredeck => self.faredeck.clone(),
        }
    }
}
