//! Purchase orders and their status.
//!
//! An order belongs to exactly one vendor. Callers create and edit orders;
//! the acknowledgment date is written only by
//! [`crate::PerformanceTracker::acknowledge`] and is never cleared.

use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  /// The only status that drives historicization.
  Completed,
  Canceled,
}

impl OrderStatus {
  /// The string stored in the `status` column. Must match the serde tags.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Completed => "completed",
      Self::Canceled => "canceled",
    }
  }
}

impl FromStr for OrderStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(Self::Pending),
      "completed" => Ok(Self::Completed),
      "canceled" => Ok(Self::Canceled),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

// ─── PurchaseOrder ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
  pub order_id:            Uuid,
  /// Unique business identifier, e.g. `"PO001"`.
  pub po_number:           String,
  pub vendor_id:           Uuid,
  pub order_date:          DateTime<Utc>,
  pub delivery_date:       DateTime<Utc>,
  /// Free-form item payload; opaque to the metrics engine.
  pub items:               serde_json::Value,
  pub quantity:            u32,
  pub status:              OrderStatus,
  /// 0–5 rating given on completion, if any.
  pub quality_rating:      Option<f64>,
  pub issue_date:          Option<DateTime<Utc>>,
  pub acknowledgment_date: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
  pub fn is_completed(&self) -> bool { self.status == OrderStatus::Completed }

  pub fn is_acknowledged(&self) -> bool { self.acknowledgment_date.is_some() }

  /// Time between issue and acknowledgment. `None` unless both are set.
  pub fn response_interval(&self) -> Option<TimeDelta> {
    Some(self.acknowledgment_date? - self.issue_date?)
  }

  /// Apply caller edits. The owning vendor and the acknowledgment date are
  /// not editable.
  pub fn apply(&mut self, update: OrderUpdate) {
    if let Some(po_number) = update.po_number {
      self.po_number = po_number;
    }
    if let Some(order_date) = update.order_date {
      self.order_date = order_date;
    }
    if let Some(delivery_date) = update.delivery_date {
      self.delivery_date = delivery_date;
    }
    if let Some(items) = update.items {
      self.items = items;
    }
    if let Some(quantity) = update.quantity {
      self.quantity = quantity;
    }
    if let Some(status) = update.status {
      self.status = status;
    }
    if update.quality_rating.is_some() {
      self.quality_rating = update.quality_rating;
    }
    if update.issue_date.is_some() {
      self.issue_date = update.issue_date;
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::PerformanceStore::add_order`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchaseOrder {
  pub po_number:      String,
  pub vendor_id:      Uuid,
  pub order_date:     DateTime<Utc>,
  pub delivery_date:  DateTime<Utc>,
  #[serde(default)]
  pub items:          serde_json::Value,
  pub quantity:       u32,
  #[serde(default)]
  pub status:         OrderStatus,
  #[serde(default)]
  pub quality_rating: Option<f64>,
  /// Defaults to the time of the write when omitted.
  #[serde(default)]
  pub issue_date:     Option<DateTime<Utc>>,
}

impl NewPurchaseOrder {
  /// Convenience constructor for a pending order with no items.
  pub fn new(
    po_number: impl Into<String>,
    vendor_id: Uuid,
    order_date: DateTime<Utc>,
    delivery_date: DateTime<Utc>,
    quantity: u32,
  ) -> Self {
    Self {
      po_number: po_number.into(),
      vendor_id,
      order_date,
      delivery_date,
      items: serde_json::Value::Null,
      quantity,
      status: OrderStatus::default(),
      quality_rating: None,
      issue_date: None,
    }
  }

  pub fn with_status(mut self, status: OrderStatus) -> Self {
    self.status = status;
    self
  }

  pub fn with_quality_rating(mut self, rating: f64) -> Self {
    self.quality_rating = Some(rating);
    self
  }

  pub fn with_issue_date(mut self, at: DateTime<Utc>) -> Self {
    self.issue_date = Some(at);
    self
  }
}

/// Caller edits to an existing order. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
  pub po_number:      Option<String>,
  pub order_date:     Option<DateTime<Utc>>,
  pub delivery_date:  Option<DateTime<Utc>>,
  pub items:          Option<serde_json::Value>,
  pub quantity:       Option<u32>,
  pub status:         Option<OrderStatus>,
  pub quality_rating: Option<f64>,
  pub issue_date:     Option<DateTime<Utc>>,
}

impl OrderUpdate {
  pub fn status(status: OrderStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }
}
