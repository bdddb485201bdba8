//! Vendor identity plus the cached performance metrics.
//!
//! The four metric fields are a projection over the vendor's purchase-order
//! history. Neither [`NewVendor`] nor [`VendorUpdate`] carries them: the only
//! write path is [`crate::store::PerformanceStore::write_metrics`], driven by
//! the lifecycle coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Metrics ─────────────────────────────────────────────────────────────────

/// The four derived statistics kept on every vendor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorMetrics {
  /// Percentage of completed orders whose delivery date has passed.
  pub on_time_delivery_rate: f64,
  /// Mean quality rating (0–5) over rated completed orders.
  pub quality_rating_avg:    f64,
  /// Mean acknowledgment latency, in hours.
  pub average_response_time: f64,
  /// Percentage of completed orders that were issued and acknowledged.
  pub fulfillment_rate:      f64,
}

impl VendorMetrics {
  /// Copy of `self` with only the response time replaced.
  pub fn with_average_response_time(self, hours: f64) -> Self {
    Self { average_response_time: hours, ..self }
  }
}

// ─── Vendor ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
  pub vendor_id:       Uuid,
  /// Unique business identifier, e.g. `"V001"`.
  pub vendor_code:     String,
  pub name:            String,
  pub contact_details: String,
  pub address:         String,
  pub created_at:      DateTime<Utc>,
  #[serde(flatten)]
  pub metrics:         VendorMetrics,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PerformanceStore::add_vendor`]. Metrics start at
/// zero and are never accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVendor {
  pub vendor_code:     String,
  pub name:            String,
  #[serde(default)]
  pub contact_details: String,
  #[serde(default)]
  pub address:         String,
}

/// Identity edits. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorUpdate {
  pub vendor_code:     Option<String>,
  pub name:            Option<String>,
  pub contact_details: Option<String>,
  pub address:         Option<String>,
}

impl Vendor {
  pub fn apply(&mut self, update: VendorUpdate) {
    if let Some(code) = update.vendor_code {
      self.vendor_code = code;
    }
    if let Some(name) = update.name {
      self.name = name;
    }
    if let Some(contact) = update.contact_details {
      self.contact_details = contact;
    }
    if let Some(address) = update.address {
      self.address = address;
    }
  }
}
