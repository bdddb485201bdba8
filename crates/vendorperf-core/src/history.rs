//! Historical performance snapshots.
//!
//! A snapshot copies a vendor's metrics at the moment one of its orders is
//! completed. Snapshots are append-only: nothing updates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vendor::VendorMetrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPerformance {
  pub record_id: Uuid,
  pub vendor_id: Uuid,
  /// The delivery date of the order whose completion produced this record.
  pub date:      DateTime<Utc>,
  #[serde(flatten)]
  pub metrics:   VendorMetrics,
}

/// Input to [`crate::store::PerformanceStore::insert_history`].
#[derive(Debug, Clone)]
pub struct NewHistoricalPerformance {
  pub vendor_id: Uuid,
  pub date:      DateTime<Utc>,
  pub metrics:   VendorMetrics,
}
