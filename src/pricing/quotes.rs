//! Quote batch orchestration.
//!
//! Turns flight quotes into ledger entries and rate augmentations. The
//! seasonal run is one windowed quote per batch; attaching flights to a
//! synced departure catalog fans out one quote request per departure date,
//! bounded by a semaphore so upstream rate limits are respected. Origin/date
//! combinations with no fare are omitted, never zero-filled; a
//! transport-level failure aborts the whole batch.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::error::{AppError, Result};
use crate::flights::{
    DateWindow, DestinationSpec, FlightQuoteProvider, InternalLeg, QuoteError, QuoteRequest,
};
use crate::models::airport;

use super::calculators::{compose, find_season};
use super::models::{Departure, FlightAugmentation, NewPricingEntry, Season};

/// Outcome of a seasonal pricing run
#[derive(Debug)]
pub struct SeasonalBatch {
    pub entries: Vec<NewPricingEntry>,
    pub fares_found: usize,
    pub skipped_no_season: usize,
}

/// Outcome of attaching flights to a departure catalog
#[derive(Debug)]
pub struct AttachOutcome {
    pub departures: Vec<Departure>,
    pub updated: usize,
    pub fares_found: usize,
    pub entries: Vec<NewPricingEntry>,
}

fn quote_error(error: QuoteError) -> AppError {
    AppError::UpstreamFetch(error.to_string())
}

fn display_name(code: &str) -> String {
    airport::airport_name(code).unwrap_or(code).to_string()
}

/// Price a date window from seasonal land costs plus quoted fares.
///
/// Dates no season covers are skipped, not priced with a fallback value.
pub async fn seasonal_entries(
    provider: &dyn FlightQuoteProvider,
    seasons: &[Season],
    request: &QuoteRequest,
    markup_percent: Decimal,
) -> Result<SeasonalBatch> {
    request.validate().map_err(AppError::Validation)?;

    let quotes = provider.quote(request).await.map_err(quote_error)?;

    let mut entries = Vec::new();
    let mut skipped_no_season = 0;
    let fares_found = quotes.len();

    for quote in quotes {
        let Some(season) = find_season(seasons, quote.date) else {
            skipped_no_season += 1;
            continue;
        };
        entries.push(NewPricingEntry {
            airport_name: display_name(&quote.origin),
            airport_code: quote.origin,
            travel_date: quote.date,
            price: compose(season.base_cost(), quote.price, markup_percent),
        });
    }

    info!(
        "seasonal pricing: {} fares, {} entries, {} dates without season cover",
        fares_found,
        entries.len(),
        skipped_no_season
    );

    Ok(SeasonalBatch {
        entries,
        fares_found,
        skipped_no_season,
    })
}

/// Fetch a fare per origin for every departure date and fold the results
/// into rate augmentations plus lead-in ledger entries.
pub async fn attach_flights(
    provider: Arc<dyn FlightQuoteProvider>,
    mut departures: Vec<Departure>,
    origins: Vec<String>,
    destination: DestinationSpec,
    markup_percent: Decimal,
    internal_leg: Option<InternalLeg>,
    concurrency: usize,
) -> Result<AttachOutcome> {
    // Validate the shared arguments before any network call; the window is
    // per-departure and always a single day.
    let probe_date = departures
        .first()
        .map(|departure| departure.departure_date)
        .unwrap_or(NaiveDate::MIN);
    QuoteRequest {
        origins: origins.clone(),
        destination: destination.clone(),
        window: DateWindow {
            from: probe_date,
            to: probe_date,
        },
        nights: 0,
        internal_leg: internal_leg.clone(),
    }
    .validate()
    .map_err(AppError::Validation)?;

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, departure) in departures.iter().enumerate() {
        let request = QuoteRequest {
            origins: origins.clone(),
            destination: destination.clone(),
            window: DateWindow {
                from: departure.departure_date,
                to: departure.departure_date,
            },
            nights: departure.nights,
            internal_leg: internal_leg.clone(),
        };
        let provider = provider.clone();
        let semaphore = semaphore.clone();

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore open");
            (index, provider.quote(&request).await)
        });
    }

    let mut quotes_by_departure: Vec<Vec<crate::flights::FlightQuote>> =
        vec![Vec::new(); departures.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| AppError::Internal(e.to_string()))?;
        quotes_by_departure[index] = result.map_err(quote_error)?;
    }

    let mut updated = 0;
    let mut fares_found = 0;
    let mut lead_in: BTreeMap<(String, NaiveDate), Decimal> = BTreeMap::new();

    for (departure, quotes) in departures.iter_mut().zip(quotes_by_departure) {
        if quotes.is_empty() {
            continue;
        }
        fares_found += quotes.len();
        updated += departure.rates.len();

        for quote in &quotes {
            for rate in &mut departure.rates {
                let combined = compose(rate.land_price, quote.price, markup_percent);
                rate.set_flight(FlightAugmentation {
                    airport_code: quote.origin.clone(),
                    flight_price: quote.price,
                    combined_price: combined,
                });

                let key = (quote.origin.clone(), departure.departure_date);
                lead_in
                    .entry(key)
                    .and_modify(|price| *price = (*price).min(combined))
                    .or_insert(combined);
            }
        }
    }

    let entries = lead_in
        .into_iter()
        .map(|((code, date), price)| NewPricingEntry {
            airport_name: display_name(&code),
            airport_code: code,
            travel_date: date,
            price,
        })
        .collect::<Vec<_>>();

    info!(
        "attach flights: {} fares across {} departures, {} rates updated",
        fares_found,
        departures.len(),
        updated
    );

    Ok(AttachOutcome {
        departures,
        updated,
        fares_found,
        entries,
    })
}
