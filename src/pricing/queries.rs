//! Database queries for the pricing engine.
//!
//! All queries are runtime-checked sqlx with bound parameters. The ledger's
//! uniqueness invariant lives in the database: one row per
//! (package, airport, travel date), enforced by a unique index and upserted
//! with ON CONFLICT so concurrent writers serialize on the key.

use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::models::{Departure, DepartureRow, NewPricingEntry, PricingEntry, Season};

// ==================== seasons ====================

/// Seasons for a package, newest first so overlap precedence reads naturally
pub async fn list_seasons(pool: &PgPool, package_id: Uuid) -> Result<Vec<Season>> {
    let seasons = sqlx::query_as::<_, Season>(
        r#"
        SELECT id, package_id, label, start_date, end_date,
               land_cost, hotel_cost, notes, created_at
        FROM pricing_seasons
        WHERE package_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(seasons)
}

pub async fn get_season(pool: &PgPool, package_id: Uuid, season_id: Uuid) -> Result<Season> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT id, package_id, label, start_date, end_date,
               land_cost, hotel_cost, notes, created_at
        FROM pricing_seasons
        WHERE id = $1 AND package_id = $2
        "#,
    )
    .bind(season_id)
    .bind(package_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn insert_season(pool: &PgPool, season: &Season) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO pricing_seasons
            (id, package_id, label, start_date, end_date, land_cost, hotel_cost, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(season.id)
    .bind(season.package_id)
    .bind(&season.label)
    .bind(season.start_date)
    .bind(season.end_date)
    .bind(season.land_cost)
    .bind(season.hotel_cost)
    .bind(&season.notes)
    .bind(season.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_season(pool: &PgPool, season: &Season) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE pricing_seasons
        SET label = $3, start_date = $4, end_date = $5,
            land_cost = $6, hotel_cost = $7, notes = $8
        WHERE id = $1 AND package_id = $2
        "#,
    )
    .bind(season.id)
    .bind(season.package_id)
    .bind(&season.label)
    .bind(season.start_date)
    .bind(season.end_date)
    .bind(season.land_cost)
    .bind(season.hotel_cost)
    .bind(&season.notes)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn delete_season(pool: &PgPool, package_id: Uuid, season_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM pricing_seasons WHERE id = $1 AND package_id = $2")
        .bind(season_id)
        .bind(package_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ==================== departures ====================

/// Stored departure catalog for a package, in date order
pub async fn list_departures(pool: &PgPool, package_id: Uuid) -> Result<Vec<Departure>> {
    let rows = sqlx::query_as::<_, DepartureRow>(
        r#"
        SELECT id, package_id, external_id, departure_date, nights, synced_at, rates
        FROM pricing_departures
        WHERE package_id = $1
        ORDER BY departure_date, external_id
        "#,
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(DepartureRow::parse).collect())
}

/// Replace a package's departure catalog with the post-merge set.
///
/// Runs in one transaction so a half-written catalog is never observable.
pub async fn replace_departures(
    pool: &PgPool,
    package_id: Uuid,
    departures: &[Departure],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM pricing_departures WHERE package_id = $1")
        .bind(package_id)
        .execute(&mut *tx)
        .await?;

    for departure in departures {
        let rates = serde_json::to_value(&departure.rates)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO pricing_departures
                (id, package_id, external_id, departure_date, nights, synced_at, rates)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(departure.id)
        .bind(departure.package_id)
        .bind(&departure.external_id)
        .bind(departure.departure_date)
        .bind(departure.nights)
        .bind(departure.synced_at)
        .bind(rates)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

// ==================== ledger ====================

/// Ledger for a package, grouped by airport then chronological
pub async fn list_entries(pool: &PgPool, package_id: Uuid) -> Result<Vec<PricingEntry>> {
    let entries = sqlx::query_as::<_, PricingEntry>(
        r#"
        SELECT id, package_id, airport_code, airport_name, travel_date,
               price, currency, updated_at
        FROM pricing_entries
        WHERE package_id = $1
        ORDER BY airport_code, travel_date
        "#,
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Keys already present in a package's ledger (for created/updated counting)
pub async fn existing_entry_keys(
    pool: &PgPool,
    package_id: Uuid,
) -> Result<HashSet<(String, NaiveDate)>> {
    let keys: Vec<(String, NaiveDate)> = sqlx::query_as(
        "SELECT airport_code, travel_date FROM pricing_entries WHERE package_id = $1",
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(keys.into_iter().collect())
}

/// Upsert one ledger entry. Later writes for the same key replace the row
/// wholesale; the write is atomic.
pub async fn upsert_entry(
    pool: &PgPool,
    package_id: Uuid,
    currency: &str,
    entry: &NewPricingEntry,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO pricing_entries
            (id, package_id, airport_code, airport_name, travel_date, price, currency, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        ON CONFLICT (package_id, airport_code, travel_date)
        DO UPDATE SET airport_name = EXCLUDED.airport_name,
                      price = EXCLUDED.price,
                      currency = EXCLUDED.currency,
                      updated_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(package_id)
    .bind(&entry.airport_code)
    .bind(&entry.airport_name)
    .bind(entry.travel_date)
    .bind(entry.price)
    .bind(currency)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_entry(pool: &PgPool, package_id: Uuid, entry_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM pricing_entries WHERE id = $1 AND package_id = $2")
        .bind(entry_id)
        .bind(package_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Wholesale ledger wipe, used when a package's pricing module is switched
pub async fn delete_entries_for_package(pool: &PgPool, package_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM pricing_entries WHERE package_id = $1")
        .bind(package_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
