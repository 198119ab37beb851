//! Package models
//!
//! The authoring UI owns most of a package; the pricing engine only reads
//! the fields that drive pricing: currency, duration, the selected pricing
//! module and the fare source used for flight quotes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How the sell-price ledger for a package is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModule {
    /// Entries typed in by the operator
    Manual,
    /// Seasonal land costs plus open-jaw flight quotes
    SeasonalOpenJaw,
    /// Departure/rate catalog synced from the tour platform
    UpstreamDepartures,
}

impl PricingModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModule::Manual => "manual",
            PricingModule::SeasonalOpenJaw => "seasonal_open_jaw",
            PricingModule::UpstreamDepartures => "upstream_departures",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(PricingModule::Manual),
            "seasonal_open_jaw" => Some(PricingModule::SeasonalOpenJaw),
            "upstream_departures" => Some(PricingModule::UpstreamDepartures),
            _ => None,
        }
    }
}

/// Which external fare source quotes flights for a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Searchwing,
    Faredeck,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::Searchwing => "searchwing",
            QuoteSource::Faredeck => "faredeck",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "searchwing" => Some(QuoteSource::Searchwing),
            "faredeck" => Some(QuoteSource::Faredeck),
            _ => None,
        }
    }
}

/// Package row as the pricing engine sees it
#[derive(Debug, Clone, FromRow)]
pub struct Package {
    pub id: Uuid,
    pub title: String,
    pub currency: String,
    pub duration_nights: i32,
    pub pricing_module: String,
    pub quote_source: String,
    /// Product code on the upstream tour platform, when linked
    pub upstream_product_code: Option<String>,
}

impl Package {
    pub fn module(&self) -> Option<PricingModule> {
        PricingModule::parse(&self.pricing_module)
    }

    pub fn source(&self) -> Option<QuoteSource> {
        QuoteSource::parse(&self.quote_source)
    }
}
