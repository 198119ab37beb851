//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::flights::{DestinationSpec, InternalLeg};
use crate::models::PricingModule;

/// Season fields shared by create and edit
#[derive(Debug, Deserialize)]
pub struct SeasonForm {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub land_cost: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub hotel_cost: Option<Decimal>,
    #[serde(default)]
    pub notes: String,
}

/// Request to switch a package's pricing module
#[derive(Debug, Deserialize)]
pub struct SetModuleRequest {
    pub module: PricingModule,
}

/// Manual ledger entry from the admin pricing table
#[derive(Debug, Deserialize)]
pub struct ManualEntryRequest {
    pub airport_code: String,
    pub travel_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Request to run seasonal open-jaw pricing over a date window
#[derive(Debug, Deserialize)]
pub struct SeasonalQuoteRequest {
    pub origins: Vec<String>,
    pub destination: DestinationSpec,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub markup_percent: Decimal,
    #[serde(default)]
    pub internal_leg: Option<InternalLeg>,
}

/// Request to attach flight prices to the synced departure catalog
#[derive(Debug, Deserialize)]
pub struct AttachFlightsRequest {
    pub origins: Vec<String>,
    pub destination: DestinationSpec,
    #[serde(with = "rust_decimal::serde::str")]
    pub markup_percent: Decimal,
    #[serde(default)]
    pub internal_leg: Option<InternalLeg>,
}
