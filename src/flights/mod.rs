//! Flight quote sourcing
//!
//! Abstraction over the external fare sources. Callers build a
//! [`QuoteRequest`], validate it, then hand it to whichever
//! [`FlightQuoteProvider`] the package is configured for. A missing fare for
//! one origin/date is a normal empty result and is simply absent from the
//! returned list; only transport-level failures surface as errors.

pub mod client;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use client::{FareApiClient, QuoteSources};

/// Inclusive travel-date window to quote
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Destination side of a quote request
///
/// Open-jaw trips land at one airport and fly home from another; either side
/// may list a small set of candidate airports, in which case the lowest
/// qualifying fare per origin/date wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "flight_type", rename_all = "snake_case")]
pub enum DestinationSpec {
    RoundTrip { airport: String },
    OpenJaw { arrive: Vec<String>, depart: Vec<String> },
}

impl DestinationSpec {
    pub fn is_open_jaw(&self) -> bool {
        matches!(self, DestinationSpec::OpenJaw { .. })
    }
}

/// Optional domestic hop within the destination country, priced and folded
/// into the open-jaw total. `day_offset` counts from the arrival date
/// (0 = day of arrival).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalLeg {
    pub from: String,
    pub to: String,
    pub day_offset: i64,
}

/// One batch of fares to fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub origins: Vec<String>,
    pub destination: DestinationSpec,
    pub window: DateWindow,
    pub nights: i32,
    #[serde(default)]
    pub internal_leg: Option<InternalLeg>,
}

impl QuoteRequest {
    /// Reject illegal top-level arguments before any network call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.origins.is_empty() {
            return Err("at least one origin airport is required".to_string());
        }
        if self.window.from > self.window.to {
            return Err("date window start is after its end".to_string());
        }
        match &self.destination {
            DestinationSpec::RoundTrip { airport } => {
                if airport.trim().is_empty() {
                    return Err("destination airport is required".to_string());
                }
                if self.internal_leg.is_some() {
                    return Err("internal legs are only valid for open-jaw trips".to_string());
                }
            }
            DestinationSpec::OpenJaw { arrive, depart } => {
                if arrive.is_empty() || depart.is_empty() {
                    return Err(
                        "open-jaw trips need both an arrival and a departure airport spec"
                            .to_string(),
                    );
                }
                if arrive == depart {
                    return Err(
                        "open-jaw trips need two distinct airport specs".to_string()
                    );
                }
            }
        }
        Ok(())
    }
}

/// One fare returned by a source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightQuote {
    pub origin: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub currency: String,
}

/// Transport-level failure talking to a fare source. Fatal to the batch.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("fare source rejected the request: {0}")]
    Rejected(String),
}

/// External fare source boundary
#[async_trait]
pub trait FlightQuoteProvider: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<FlightQuote>, QuoteError>;
}

/// Keep only the lowest fare per `(origin, date)`.
///
/// Sources quoting candidate-airport sets return one fare per candidate; the
/// caller only ever sells the cheapest qualifying one.
pub fn fold_lowest(mut quotes: Vec<FlightQuote>) -> Vec<FlightQuote> {
    quotes.sort_by(|a, b| {
        (a.origin.as_str(), a.date, a.price).cmp(&(b.origin.as_str(), b.date, b.price))
    });
    quotes.dedup_by(|next, kept| next.origin == kept.origin && next.date == kept.date);
    quotes
}
