//! Handlers for `/historical_performance` endpoints. Snapshots are immutable,
//! so only reads are exposed.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;
use vendorperf_core::{
  PerformanceTracker, history::HistoricalPerformance, store::PerformanceStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub vendor_id: Option<Uuid>,
}

/// `GET /historical_performance[?vendor_id=<id>]`, ordered by date.
pub async fn list<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<HistoricalPerformance>>, ApiError>
where
  S: PerformanceStore,
{
  let records = tracker
    .store()
    .list_history(params.vendor_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /historical_performance/:id`
pub async fn get_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<HistoricalPerformance>, ApiError>
where
  S: PerformanceStore,
{
  let record = tracker
    .store()
    .get_history(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("historical performance {id} not found")))?;
  Ok(Json(record))
}
