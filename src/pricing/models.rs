//! Database models for the pricing engine.
//!
//! Row types use sqlx's FromRow derive for direct deserialization. Departure
//! rate lists live in a JSONB column and are parsed into typed records, so a
//! "has this airport been priced yet" check is a presence check on a list,
//! never a property-existence check.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Seasonal land-cost band for a package. Date range is inclusive.
#[derive(Debug, Clone, FromRow)]
pub struct Season {
    pub id: Uuid,
    pub package_id: Uuid,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub land_cost: Decimal,
    pub hotel_cost: Option<Decimal>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Season {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Ground cost per person: land plus the optional hotel component
    pub fn base_cost(&self) -> Decimal {
        self.land_cost + self.hotel_cost.unwrap_or_default()
    }
}

/// Per-origin flight pricing attached to a rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightAugmentation {
    pub airport_code: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub flight_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub combined_price: Decimal,
}

/// One bookable combination within a departure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub title: String,
    pub room: String,
    #[serde(default)]
    pub hotel_category: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub land_price: Decimal,
    #[serde(default)]
    pub flights: Vec<FlightAugmentation>,
}

impl Rate {
    /// Stable identity used to match rates across syncs
    pub fn key(&self) -> (&str, &str, Option<&str>) {
        (&self.title, &self.room, self.hotel_category.as_deref())
    }

    pub fn flight_for(&self, airport_code: &str) -> Option<&FlightAugmentation> {
        self.flights.iter().find(|f| f.airport_code == airport_code)
    }

    /// Insert or replace the augmentation for one origin airport
    pub fn set_flight(&mut self, augmentation: FlightAugmentation) {
        match self
            .flights
            .iter_mut()
            .find(|f| f.airport_code == augmentation.airport_code)
        {
            Some(existing) => *existing = augmentation,
            None => self.flights.push(augmentation),
        }
    }
}

/// Departure row from the database; `rates` is the raw JSONB document
#[derive(Debug, Clone, FromRow)]
pub struct DepartureRow {
    pub id: Uuid,
    pub package_id: Uuid,
    pub external_id: String,
    pub departure_date: NaiveDate,
    pub nights: i32,
    pub synced_at: DateTime<Utc>,
    pub rates: serde_json::Value,
}

impl DepartureRow {
    /// Parse the rate document into a typed departure
    pub fn parse(self) -> Departure {
        let rates = serde_json::from_value(self.rates).unwrap_or_default();
        Departure {
            id: self.id,
            package_id: self.package_id,
            external_id: self.external_id,
            departure_date: self.departure_date,
            nights: self.nights,
            synced_at: self.synced_at,
            rates,
        }
    }
}

/// Departure with its parsed rate list
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub id: Uuid,
    pub package_id: Uuid,
    pub external_id: String,
    pub departure_date: NaiveDate,
    pub nights: i32,
    pub synced_at: DateTime<Utc>,
    pub rates: Vec<Rate>,
}

/// Canonical sell-price entry, unique per (package, airport, travel date)
#[derive(Debug, Clone, FromRow)]
pub struct PricingEntry {
    pub id: Uuid,
    pub package_id: Uuid,
    pub airport_code: String,
    pub airport_name: String,
    pub travel_date: NaiveDate,
    pub price: Decimal,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

/// Entry about to be written to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewPricingEntry {
    pub airport_code: String,
    pub airport_name: String,
    pub travel_date: NaiveDate,
    pub price: Decimal,
}
