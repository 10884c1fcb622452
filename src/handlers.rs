use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    Competitor, Lead, LeadSubmission, MarketTrend, NewCompetitor, NewTrend,
};
use crate::pipeline::IngestionPipeline;
use crate::store::Store;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Page cap applied to `GET /leads` when the caller does not ask for one.
const DEFAULT_LEAD_PAGE_SIZE: i64 = 100;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Persistence backend (Postgres or in-memory, per configuration).
    pub store: Arc<dyn Store>,
    /// The lead ingestion pipeline.
    pub pipeline: IngestionPipeline,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "leadflow-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /leads
///
/// Runs the submission through the ingestion pipeline. Responds 200 with
/// the lead (persisted or best-effort) on every completed flow; 400 only
/// when a required field is missing or empty.
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<LeadSubmission>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("POST /leads - source: {:?}", submission.source);

    let lead = state.pipeline.ingest(submission).await?;
    Ok(Json(lead))
}

#[derive(Debug, Deserialize)]
pub struct ListLeadsParams {
    pub limit: Option<i64>,
}

/// GET /leads
///
/// Leads newest-first by creation timestamp. Display surfaces are
/// non-fatal: an unreachable store yields an empty list, not an error.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListLeadsParams>,
) -> Json<Vec<Lead>> {
    // Clamp here so both store backends see the same non-negative cap.
    let limit = params.limit.unwrap_or(DEFAULT_LEAD_PAGE_SIZE).max(0);

    match state.store.list_leads(limit).await {
        Ok(leads) => Json(leads),
        Err(e) => {
            tracing::warn!("Lead listing unavailable, returning empty set: {}", e);
            Json(Vec::new())
        }
    }
}

/// GET /market/competitors
///
/// Non-fatal like the leads reader: a store outage yields an empty list.
pub async fn list_competitors(State(state): State<Arc<AppState>>) -> Json<Vec<Competitor>> {
    match state.store.list_competitors().await {
        Ok(competitors) => Json(competitors),
        Err(e) => {
            tracing::warn!("Competitor listing unavailable, returning empty set: {}", e);
            Json(Vec::new())
        }
    }
}

/// POST /market/competitors
pub async fn create_competitor(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewCompetitor>,
) -> Result<Json<Competitor>, AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required field: name".to_string(),
        ));
    }

    let competitor = state.store.insert_competitor(&new).await?;
    Ok(Json(competitor))
}

/// GET /market/trends
///
/// Non-fatal like the leads reader: a store outage yields an empty list.
pub async fn list_trends(State(state): State<Arc<AppState>>) -> Json<Vec<MarketTrend>> {
    match state.store.list_trends().await {
        Ok(trends) => Json(trends),
        Err(e) => {
            tracing::warn!("Trend listing unavailable, returning empty set: {}", e);
            Json(Vec::new())
        }
    }
}

/// POST /market/trends
pub async fn create_trend(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewTrend>,
) -> Result<Json<MarketTrend>, AppError> {
    if new.trend.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required field: trend".to_string(),
        ));
    }

    let trend = state.store.insert_trend(&new).await?;
    Ok(Json(trend))
}
