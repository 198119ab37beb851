//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::csv::RowError;
use super::models::{Departure, PricingEntry, Rate, Season};

/// Ledger row for the admin pricing table
#[derive(Debug, Serialize)]
pub struct PricingEntryResponse {
    pub id: Uuid,
    pub airport_code: String,
    pub airport_name: String,
    pub travel_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

impl From<PricingEntry> for PricingEntryResponse {
    fn from(entry: PricingEntry) -> Self {
        Self {
            id: entry.id,
            airport_code: entry.airport_code,
            airport_name: entry.airport_name,
            travel_date: entry.travel_date,
            price: entry.price,
            currency: entry.currency,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonResponse {
    pub id: Uuid,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub land_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub hotel_cost: Option<Decimal>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<Season> for SeasonResponse {
    fn from(season: Season) -> Self {
        Self {
            id: season.id,
            label: season.label,
            start_date: season.start_date,
            end_date: season.end_date,
            land_cost: season.land_cost,
            hotel_cost: season.hotel_cost,
            notes: season.notes,
            created_at: season.created_at,
        }
    }
}

/// Departure with its rates and any attached flight augmentations
#[derive(Debug, Serialize)]
pub struct DepartureResponse {
    pub id: Uuid,
    pub external_id: String,
    pub departure_date: NaiveDate,
    pub nights: i32,
    pub synced_at: DateTime<Utc>,
    pub rates: Vec<Rate>,
}

impl From<Departure> for DepartureResponse {
    fn from(departure: Departure) -> Self {
        Self {
            id: departure.id,
            external_id: departure.external_id,
            departure_date: departure.departure_date,
            nights: departure.nights,
            synced_at: departure.synced_at,
            rates: departure.rates,
        }
    }
}

/// Summary of one departure sync
#[derive(Debug, Serialize)]
pub struct SyncSummary {
    pub departures: usize,
    pub rates: usize,
}

/// Summary of one seasonal pricing run
#[derive(Debug, Serialize)]
pub struct SeasonalRunSummary {
    pub fares_found: usize,
    pub entries_saved: usize,
    pub skipped_no_season: usize,
}

/// Summary of one attach-flights run
#[derive(Debug, Serialize)]
pub struct AttachSummary {
    pub updated: usize,
    pub fares_found: usize,
    pub entries_saved: usize,
}

/// Summary of one CSV import
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<RowError>,
}

/// Summary of a pricing-module switch
#[derive(Debug, Serialize)]
pub struct ModuleSwitchSummary {
    pub module: String,
    pub entries_deleted: u64,
}
