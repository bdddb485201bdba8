//! Handlers for `/purchase_orders` endpoints.
//!
//! Every successful create or update is handed to
//! [`PerformanceTracker::on_purchase_order_written`] before the response is
//! sent, so the owning vendor's metrics are current when the caller sees the
//! result.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/purchase_orders` | Optional `?vendor_id=` |
//! | `POST`   | `/purchase_orders` | Body: [`NewPurchaseOrder`]; returns 201 |
//! | `GET`    | `/purchase_orders/:id` | 404 if not found |
//! | `PUT`    | `/purchase_orders/:id` | Body: [`OrderUpdate`] |
//! | `DELETE` | `/purchase_orders/:id` | Metrics are not recomputed |
//! | `POST`   | `/purchase_orders/:id/acknowledge` | Stamps the acknowledgment date |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use vendorperf_core::{
  PerformanceTracker,
  order::{NewPurchaseOrder, OrderUpdate, PurchaseOrder},
  store::{PerformanceStore, StoreError as _},
};

use crate::error::ApiError;

const MAX_QUALITY_RATING: f64 = 5.0;

fn check_rating(rating: Option<f64>) -> Result<(), ApiError> {
  match rating {
    Some(r) if !(0.0..=MAX_QUALITY_RATING).contains(&r) => Err(ApiError::BadRequest(
      format!("quality_rating must be between 0 and {MAX_QUALITY_RATING}, got {r}"),
    )),
    _ => Ok(()),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub vendor_id: Option<Uuid>,
}

/// `GET /purchase_orders[?vendor_id=<id>]`
pub async fn list<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PurchaseOrder>>, ApiError>
where
  S: PerformanceStore,
{
  let orders = tracker
    .store()
    .list_all_orders(params.vendor_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(orders))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /purchase_orders`
pub async fn create<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Json(body): Json<NewPurchaseOrder>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PerformanceStore,
{
  check_rating(body.quality_rating)?;

  let order = tracker.store().add_order(body).await.map_err(|e| {
    // An order must reference an existing vendor.
    if e.is_not_found() {
      ApiError::BadRequest(e.to_string())
    } else {
      ApiError::store(e)
    }
  })?;

  tracker.on_purchase_order_written(&order, true).await?;
  Ok((StatusCode::CREATED, Json(order)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /purchase_orders/:id`
pub async fn get_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PurchaseOrder>, ApiError>
where
  S: PerformanceStore,
{
  let order = tracker
    .store()
    .get_order(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("purchase order {id} not found")))?;
  Ok(Json(order))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /purchase_orders/:id`
pub async fn update_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<OrderUpdate>,
) -> Result<Json<PurchaseOrder>, ApiError>
where
  S: PerformanceStore,
{
  check_rating(body.quality_rating)?;

  let order = tracker
    .store()
    .update_order(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("purchase order {id} not found")))?;

  tracker.on_purchase_order_written(&order, false).await?;
  Ok(Json(order))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /purchase_orders/:id`
pub async fn delete_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PerformanceStore,
{
  let deleted = tracker
    .store()
    .delete_order(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("purchase order {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Acknowledge ──────────────────────────────────────────────────────────────

/// `POST /purchase_orders/:id/acknowledge`
pub async fn acknowledge_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PurchaseOrder>, ApiError>
where
  S: PerformanceStore,
{
  let order = tracker.acknowledge(id).await?;
  Ok(Json(order))
}
