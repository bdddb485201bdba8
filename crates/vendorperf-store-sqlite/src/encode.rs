//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with nanosecond precision,
//! so lexical order matches chronological order. UUIDs are hyphenated
//! lowercase strings and the order item payload is compact JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;
use vendorperf_core::{
  history::HistoricalPerformance,
  order::{OrderStatus, PurchaseOrder},
  vendor::{Vendor, VendorMetrics},
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── OrderStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(s: OrderStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<OrderStatus> { Ok(s.parse()?) }

// ─── Column lists ────────────────────────────────────────────────────────────

pub const VENDOR_COLUMNS: &str = "vendor_id, vendor_code, name, contact_details, \
  address, created_at, on_time_delivery_rate, quality_rating_avg, \
  average_response_time, fulfillment_rate";

pub const ORDER_COLUMNS: &str = "order_id, po_number, vendor_id, order_date, \
  delivery_date, items, quantity, status, quality_rating, issue_date, \
  acknowledgment_date";

pub const HISTORY_COLUMNS: &str = "record_id, vendor_id, date, \
  on_time_delivery_rate, quality_rating_avg, average_response_time, \
  fulfillment_rate";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `vendors` row.
pub struct RawVendor {
  pub vendor_id:       String,
  pub vendor_code:     String,
  pub name:            String,
  pub contact_details: String,
  pub address:         String,
  pub created_at:      String,
  pub metrics:         VendorMetrics,
}

impl RawVendor {
  /// Map a row selected with [`VENDOR_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      vendor_id:       row.get(0)?,
      vendor_code:     row.get(1)?,
      name:            row.get(2)?,
      contact_details: row.get(3)?,
      address:         row.get(4)?,
      created_at:      row.get(5)?,
      metrics:         metrics_at(row, 6)?,
    })
  }

  pub fn into_vendor(self) -> Result<Vendor> {
    Ok(Vendor {
      vendor_id:       decode_uuid(&self.vendor_id)?,
      vendor_code:     self.vendor_code,
      name:            self.name,
      contact_details: self.contact_details,
      address:         self.address,
      created_at:      decode_dt(&self.created_at)?,
      metrics:         self.metrics,
    })
  }
}

/// Raw values read directly from a `purchase_orders` row.
pub struct RawOrder {
  pub order_id:            String,
  pub po_number:           String,
  pub vendor_id:           String,
  pub order_date:          String,
  pub delivery_date:       String,
  pub items:               String,
  pub quantity:            u32,
  pub status:              String,
  pub quality_rating:      Option<f64>,
  pub issue_date:          Option<String>,
  pub acknowledgment_date: Option<String>,
}

impl RawOrder {
  /// Map a row selected with [`ORDER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      order_id:            row.get(0)?,
      po_number:           row.get(1)?,
      vendor_id:           row.get(2)?,
      order_date:          row.get(3)?,
      delivery_date:       row.get(4)?,
      items:               row.get(5)?,
      quantity:            row.get(6)?,
      status:              row.get(7)?,
      quality_rating:      row.get(8)?,
      issue_date:          row.get(9)?,
      acknowledgment_date: row.get(10)?,
    })
  }

  pub fn into_order(self) -> Result<PurchaseOrder> {
    Ok(PurchaseOrder {
      order_id:            decode_uuid(&self.order_id)?,
      po_number:           self.po_number,
      vendor_id:           decode_uuid(&self.vendor_id)?,
      order_date:          decode_dt(&self.order_date)?,
      delivery_date:       decode_dt(&self.delivery_date)?,
      items:               serde_json::from_str(&self.items)?,
      quantity:            self.quantity,
      status:              decode_status(&self.status)?,
      quality_rating:      self.quality_rating,
      issue_date:          decode_opt_dt(self.issue_date)?,
      acknowledgment_date: decode_opt_dt(self.acknowledgment_date)?,
    })
  }
}

/// Raw values read directly from a `historical_performance` row.
pub struct RawHistory {
  pub record_id: String,
  pub vendor_id: String,
  pub date:      String,
  pub metrics:   VendorMetrics,
}

impl RawHistory {
  /// Map a row selected with [`HISTORY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id: row.get(0)?,
      vendor_id: row.get(1)?,
      date:      row.get(2)?,
      metrics:   metrics_at(row, 3)?,
    })
  }

  pub fn into_history(self) -> Result<HistoricalPerformance> {
    Ok(HistoricalPerformance {
      record_id: decode_uuid(&self.record_id)?,
      vendor_id: decode_uuid(&self.vendor_id)?,
      date:      decode_dt(&self.date)?,
      metrics:   self.metrics,
    })
  }
}

/// The four metric columns, starting at index `first`.
fn metrics_at(row: &rusqlite::Row<'_>, first: usize) -> rusqlite::Result<VendorMetrics> {
  Ok(VendorMetrics {
    on_time_delivery_rate: row.get(first)?,
    quality_rating_avg:    row.get(first + 1)?,
    average_response_time: row.get(first + 2)?,
    fulfillment_rate:      row.get(first + 3)?,
  })
}
