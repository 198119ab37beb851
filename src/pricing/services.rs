//! Pricing service functions with database access.
//!
//! Orchestration layer between the HTTP handlers and the pure pricing logic:
//! loads packages and seasons through the cache, runs the quote batches and
//! the departure merge, and persists the results. Every bulk operation
//! reports a summary the operator can act on instead of failing silently.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::flights::{DateWindow, QuoteRequest};
use crate::models::{airport, Package, PricingModule, QuoteSource};
use crate::AppState;

use super::calculators::validate_season;
use super::csv as csv_codec;
use super::models::{Departure, NewPricingEntry, PricingEntry, Season};
use super::queries;
use super::quotes;
use super::reconcile::merge_departures;
use super::requests::{
    AttachFlightsRequest, ManualEntryRequest, SeasonForm, SeasonalQuoteRequest,
};
use super::responses::{AttachSummary, ImportSummary, SeasonalRunSummary, SyncSummary};

/// Package record, via the cache
pub async fn get_package(state: &AppState, package_id: Uuid) -> Result<Arc<Package>> {
    if let Some(package) = state.cache.packages.get(&package_id).await {
        return Ok(package);
    }
    let package = Arc::new(crate::db::get_package(&state.db, package_id).await?);
    state
        .cache
        .packages
        .insert(package_id, package.clone())
        .await;
    Ok(package)
}

/// Season list for a package, via the cache (newest first)
pub async fn get_seasons(state: &AppState, package_id: Uuid) -> Result<Arc<Vec<Season>>> {
    if let Some(seasons) = state.cache.seasons.get(&package_id).await {
        return Ok(seasons);
    }
    let seasons = Arc::new(queries::list_seasons(&state.db, package_id).await?);
    state
        .cache
        .seasons
        .insert(package_id, seasons.clone())
        .await;
    Ok(seasons)
}

fn quote_source(package: &Package) -> Result<QuoteSource> {
    package.source().ok_or_else(|| {
        AppError::Validation(format!(
            "package has an unknown quote source '{}'",
            package.quote_source
        ))
    })
}

fn require_module(package: &Package, expected: PricingModule) -> Result<()> {
    if package.module() != Some(expected) {
        return Err(AppError::Validation(format!(
            "package is not on the {} pricing module",
            expected.as_str()
        )));
    }
    Ok(())
}

// ==================== seasons ====================

pub async fn create_season(
    state: &AppState,
    package_id: Uuid,
    form: SeasonForm,
) -> Result<Season> {
    get_package(state, package_id).await?;
    validate_season(&form.label, form.start_date, form.end_date, form.land_cost)
        .map_err(AppError::Validation)?;

    let season = Season {
        id: Uuid::new_v4(),
        package_id,
        label: form.label,
        start_date: form.start_date,
        end_date: form.end_date,
        land_cost: form.land_cost,
        hotel_cost: form.hotel_cost,
        notes: form.notes,
        created_at: Utc::now(),
    };
    queries::insert_season(&state.db, &season).await?;
    state.cache.seasons.invalidate(&package_id).await;
    Ok(season)
}

pub async fn edit_season(
    state: &AppState,
    package_id: Uuid,
    season_id: Uuid,
    form: SeasonForm,
) -> Result<Season> {
    validate_season(&form.label, form.start_date, form.end_date, form.land_cost)
        .map_err(AppError::Validation)?;

    let existing = queries::get_season(&state.db, package_id, season_id).await?;
    let season = Season {
        label: form.label,
        start_date: form.start_date,
        end_date: form.end_date,
        land_cost: form.land_cost,
        hotel_cost: form.hotel_cost,
        notes: form.notes,
        ..existing
    };
    queries::update_season(&state.db, &season).await?;
    state.cache.seasons.invalidate(&package_id).await;
    Ok(season)
}

pub async fn delete_season(state: &AppState, package_id: Uuid, season_id: Uuid) -> Result<()> {
    queries::delete_season(&state.db, package_id, season_id).await?;
    state.cache.seasons.invalidate(&package_id).await;
    Ok(())
}

// ==================== ledger ====================

pub async fn list_ledger(state: &AppState, package_id: Uuid) -> Result<Vec<PricingEntry>> {
    get_package(state, package_id).await?;
    queries::list_entries(&state.db, package_id).await
}

pub async fn upsert_manual_entry(
    state: &AppState,
    package_id: Uuid,
    request: ManualEntryRequest,
) -> Result<()> {
    let package = get_package(state, package_id).await?;

    let Some(airport_name) = airport::airport_name(&request.airport_code) else {
        return Err(AppError::Validation(format!(
            "unknown airport code '{}'",
            request.airport_code
        )));
    };
    if request.price < Decimal::ZERO {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }

    let entry = NewPricingEntry {
        airport_code: request.airport_code,
        airport_name: airport_name.to_string(),
        travel_date: request.travel_date,
        price: request.price,
    };
    queries::upsert_entry(&state.db, package_id, &package.currency, &entry).await
}

pub async fn delete_entry(state: &AppState, package_id: Uuid, entry_id: Uuid) -> Result<()> {
    queries::delete_entry(&state.db, package_id, entry_id).await
}

/// Switch the package's pricing module and wipe the ledger it no longer owns
pub async fn switch_module(
    state: &AppState,
    package_id: Uuid,
    module: PricingModule,
) -> Result<u64> {
    crate::db::set_pricing_module(&state.db, package_id, module).await?;
    let deleted = queries::delete_entries_for_package(&state.db, package_id).await?;
    state.cache.invalidate_package(package_id).await;
    info!(
        "package {} switched to {}, {} ledger entries cleared",
        package_id,
        module.as_str(),
        deleted
    );
    Ok(deleted)
}

// ==================== seasonal pricing ====================

pub async fn run_seasonal_pricing(
    state: &AppState,
    package_id: Uuid,
    request: SeasonalQuoteRequest,
) -> Result<SeasonalRunSummary> {
    let package = get_package(state, package_id).await?;
    require_module(&package, PricingModule::SeasonalOpenJaw)?;
    let seasons = get_seasons(state, package_id).await?;
    let provider = state.quotes.provider(quote_source(&package)?);

    let quote_request = QuoteRequest {
        origins: request.origins,
        destination: request.destination,
        window: DateWindow {
            from: request.date_from,
            to: request.date_to,
        },
        nights: package.duration_nights,
        internal_leg: request.internal_leg,
    };

    let batch = quotes::seasonal_entries(
        provider.as_ref(),
        &seasons,
        &quote_request,
        request.markup_percent,
    )
    .await?;

    for entry in &batch.entries {
        queries::upsert_entry(&state.db, package_id, &package.currency, entry).await?;
    }

    Ok(SeasonalRunSummary {
        fares_found: batch.fares_found,
        entries_saved: batch.entries.len(),
        skipped_no_season: batch.skipped_no_season,
    })
}

// ==================== departures ====================

pub async fn list_departures(state: &AppState, package_id: Uuid) -> Result<Vec<Departure>> {
    get_package(state, package_id).await?;
    queries::list_departures(&state.db, package_id).await
}

/// Refresh the departure catalog from the tour platform feed.
///
/// Idempotent: an unchanged upstream catalog produces the same counts and
/// leaves attached flight augmentations untouched.
pub async fn sync_departures(state: &AppState, package_id: Uuid) -> Result<SyncSummary> {
    let package = get_package(state, package_id).await?;
    require_module(&package, PricingModule::UpstreamDepartures)?;
    let Some(product_code) = package.upstream_product_code.as_deref() else {
        return Err(AppError::Validation(
            "package is not linked to an upstream product".to_string(),
        ));
    };

    let upstream = state.inventory.departures(product_code).await?;
    let local = queries::list_departures(&state.db, package_id).await?;
    let outcome = merge_departures(local, &upstream, package_id, Utc::now());
    queries::replace_departures(&state.db, package_id, &outcome.departures).await?;

    info!(
        "package {} synced: {} departures, {} rates",
        package_id, outcome.departures_count, outcome.rates_count
    );
    Ok(SyncSummary {
        departures: outcome.departures_count,
        rates: outcome.rates_count,
    })
}

/// Quote flights for every stored departure and fold them into rate
/// augmentations plus lead-in ledger entries.
pub async fn attach_departure_flights(
    state: &AppState,
    package_id: Uuid,
    request: AttachFlightsRequest,
) -> Result<AttachSummary> {
    let package = get_package(state, package_id).await?;
    require_module(&package, PricingModule::UpstreamDepartures)?;
    let provider = state.quotes.provider(quote_source(&package)?);
    let departures = queries::list_departures(&state.db, package_id).await?;

    let outcome = quotes::attach_flights(
        provider,
        departures,
        request.origins,
        request.destination,
        request.markup_percent,
        request.internal_leg,
        state.quote_concurrency,
    )
    .await?;

    queries::replace_departures(&state.db, package_id, &outcome.departures).await?;
    for entry in &outcome.entries {
        queries::upsert_entry(&state.db, package_id, &package.currency, entry).await?;
    }

    Ok(AttachSummary {
        updated: outcome.updated,
        fares_found: outcome.fares_found,
        entries_saved: outcome.entries.len(),
    })
}

// ==================== CSV round trip ====================

pub async fn export_ledger(state: &AppState, package_id: Uuid) -> Result<String> {
    let entries = list_ledger(state, package_id).await?;
    Ok(csv_codec::export_entries(&entries))
}

/// Import a ledger spreadsheet. Bad rows are reported, good rows land;
/// a later row for the same (airport, date) key replaces an earlier one.
pub async fn import_ledger(
    state: &AppState,
    package_id: Uuid,
    text: &str,
) -> Result<ImportSummary> {
    let package = get_package(state, package_id).await?;
    let parsed = csv_codec::parse_import(text);

    let mut present = queries::existing_entry_keys(&state.db, package_id).await?;
    let mut created = 0;
    let mut updated = 0;

    for row in &parsed.rows {
        let entry = NewPricingEntry {
            airport_code: row.airport_code.clone(),
            airport_name: row.airport_name.clone(),
            travel_date: row.travel_date,
            price: row.price,
        };
        queries::upsert_entry(&state.db, package_id, &package.currency, &entry).await?;

        let key = (row.airport_code.clone(), row.travel_date);
        if present.insert(key) {
            created += 1;
        } else {
            updated += 1;
        }
    }

    info!(
        "package {} import: {} created, {} updated, {} bad rows",
        package_id,
        created,
        updated,
        parsed.errors.len()
    );
    Ok(ImportSummary {
        created,
        updated,
        errors: parsed.errors,
    })
}
