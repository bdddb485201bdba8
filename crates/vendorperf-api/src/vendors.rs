//! Handlers for `/vendors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/vendors` | All vendors with their cached metrics |
//! | `POST`   | `/vendors` | Body: [`NewVendor`]; metrics start at zero |
//! | `GET`    | `/vendors/:id` | 404 if not found |
//! | `PUT`    | `/vendors/:id` | Body: [`VendorUpdate`]; identity fields only |
//! | `DELETE` | `/vendors/:id` | Also removes the vendor's orders and history |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;
use vendorperf_core::{
  PerformanceTracker,
  store::PerformanceStore,
  vendor::{NewVendor, Vendor, VendorUpdate},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /vendors`
pub async fn list<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
) -> Result<Json<Vec<Vendor>>, ApiError>
where
  S: PerformanceStore,
{
  let vendors = tracker
    .store()
    .list_vendors()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(vendors))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /vendors`
pub async fn create<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Json(body): Json<NewVendor>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PerformanceStore,
{
  if body.vendor_code.trim().is_empty() || body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("vendor_code and name are required".into()));
  }
  let vendor = tracker
    .store()
    .add_vendor(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(vendor)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /vendors/:id`
pub async fn get_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vendor>, ApiError>
where
  S: PerformanceStore,
{
  let vendor = tracker
    .store()
    .get_vendor(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("vendor {id} not found")))?;
  Ok(Json(vendor))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /vendors/:id`
pub async fn update_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<VendorUpdate>,
) -> Result<Json<Vendor>, ApiError>
where
  S: PerformanceStore,
{
  let vendor = tracker
    .store()
    .update_vendor(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("vendor {id} not found")))?;
  Ok(Json(vendor))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /vendors/:id`
pub async fn delete_one<S>(
  State(tracker): State<Arc<PerformanceTracker<S>>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PerformanceStore,
{
  let deleted = tracker
    .store()
    .delete_vendor(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("vendor {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
