//! Pricing route handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::requests::{
    AttachFlightsRequest, ManualEntryRequest, SeasonForm, SeasonalQuoteRequest, SetModuleRequest,
};
use super::responses::{
    DepartureResponse, ModuleSwitchSummary, PricingEntryResponse, SeasonResponse,
};
use super::services;

/// Ledger table for the admin pricing screen
async fn list_pricing(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> Result<Json<Vec<PricingEntryResponse>>> {
    let entries = services::list_ledger(&state, package_id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Manual entry upsert
async fn create_entry(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    Json(request): Json<ManualEntryRequest>,
) -> Result<Json<Vec<PricingEntryResponse>>> {
    services::upsert_manual_entry(&state, package_id, request).await?;
    let entries = services::list_ledger(&state, package_id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path((package_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    services::delete_entry(&state, package_id, entry_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn set_module(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    Json(request): Json<SetModuleRequest>,
) -> Result<Json<ModuleSwitchSummary>> {
    let deleted = services::switch_module(&state, package_id, request.module).await?;
    Ok(Json(ModuleSwitchSummary {
        module: request.module.as_str().to_string(),
        entries_deleted: deleted,
    }))
}

// ==================== seasons ====================

async fn list_seasons(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> Result<Json<Vec<SeasonResponse>>> {
    let seasons = services::get_seasons(&state, package_id).await?;
    Ok(Json(seasons.iter().cloned().map(Into::into).collect()))
}

async fn create_season(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    Json(form): Json<SeasonForm>,
) -> Result<Json<SeasonResponse>> {
    let season = services::create_season(&state, package_id, form).await?;
    Ok(Json(season.into()))
}

async fn update_season(
    State(state): State<AppState>,
    Path((package_id, season_id)): Path<(Uuid, Uuid)>,
    Json(form): Json<SeasonForm>,
) -> Result<Json<SeasonResponse>> {
    let season = services::edit_season(&state, package_id, season_id, form).await?;
    Ok(Json(season.into()))
}

async fn delete_season(
    State(state): State<AppState>,
    Path((package_id, season_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    services::delete_season(&state, package_id, season_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Seasonal open-jaw pricing run over a date window
async fn quote_flights(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    Json(request): Json<SeasonalQuoteRequest>,
) -> Result<impl IntoResponse> {
    let summary = services::run_seasonal_pricing(&state, package_id, request).await?;
    Ok(Json(summary))
}

// ==================== departures ====================

async fn list_departures(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> Result<Json<Vec<DepartureResponse>>> {
    let departures = services::list_departures(&state, package_id).await?;
    Ok(Json(departures.into_iter().map(Into::into).collect()))
}

async fn sync_departures(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let summary = services::sync_departures(&state, package_id).await?;
    Ok(Json(summary))
}

async fn attach_flights(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    Json(request): Json<AttachFlightsRequest>,
) -> Result<impl IntoResponse> {
    let summary = services::attach_departure_flights(&state, package_id, request).await?;
    Ok(Json(summary))
}

// ==================== CSV ====================

async fn export_csv(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let body = services::export_ledger(&state, package_id).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

async fn import_csv(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    body: String,
) -> Result<impl IntoResponse> {
    let summary = services::import_ledger(&state, package_id, &body).await?;
    Ok(Json(summary))
}

// ==================== monitoring ====================

async fn cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.cache.stats())
}

/// Pricing engine router, mounted at the application root
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/packages/:id/pricing", get(list_pricing).post(create_entry))
        .route("/packages/:id/pricing/export", get(export_csv))
        .route("/packages/:id/pricing/import", post(import_csv))
        .route("/packages/:id/pricing/:entry_id", axum::routing::delete(delete_entry))
        .route("/packages/:id/pricing-module", put(set_module))
        .route("/packages/:id/seasons", get(list_seasons).post(create_season))
        .route("/packages/:id/seasons/quote-flights", post(quote_flights))
        .route(
            "/packages/:id/seasons/:season_id",
            put(update_season).delete(delete_season),
        )
        .route("/packages/:id/departures", get(list_departures))
        .route("/packages/:id/departures/sync", post(sync_departures))
        .route("/packages/:id/departures/attach-flights", post(attach_flights))
        .route("/cache/stats", get(cache_stats))
}
