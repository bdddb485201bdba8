//! The `PerformanceStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `vendorperf-store-sqlite`). The lifecycle coordinator and the API layer
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  history::{HistoricalPerformance, NewHistoricalPerformance},
  order::{NewPurchaseOrder, OrderStatus, OrderUpdate, PurchaseOrder},
  vendor::{NewVendor, Vendor, VendorMetrics, VendorUpdate},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Predicates for [`PerformanceStore::list_orders`]. The default query
/// matches every order of the vendor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderQuery {
  pub status:       Option<OrderStatus>,
  /// `Some(true)` keeps orders with an acknowledgment date, `Some(false)`
  /// keeps those without one.
  pub acknowledged: Option<bool>,
}

impl OrderQuery {
  pub fn all() -> Self { Self::default() }

  pub fn with_status(status: OrderStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  pub fn acknowledged() -> Self {
    Self { acknowledged: Some(true), ..Self::default() }
  }

  pub fn matches(&self, order: &PurchaseOrder) -> bool {
    self.status.is_none_or(|s| s == order.status)
      && self.acknowledged.is_none_or(|a| a == order.is_acknowledged())
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Classification a backend error exposes to callers that cannot name its
/// concrete type (e.g. the HTTP layer).
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// A uniqueness or integrity constraint rejected the write.
  fn is_conflict(&self) -> bool { false }

  /// A record referenced by the write does not exist.
  fn is_not_found(&self) -> bool { false }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the vendor, order and history collections.
///
/// Every read observes all previously committed writes. `write_metrics`
/// replaces all four metric fields in one atomic statement.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PerformanceStore: Send + Sync {
  type Error: StoreError;

  // ── Vendors ───────────────────────────────────────────────────────────

  /// Create a vendor with zeroed metrics.
  fn add_vendor(
    &self,
    input: NewVendor,
  ) -> impl Future<Output = Result<Vendor, Self::Error>> + Send + '_;

  /// Retrieve a vendor by UUID. Returns `None` if not found.
  fn get_vendor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Vendor>, Self::Error>> + Send + '_;

  fn list_vendors(
    &self,
  ) -> impl Future<Output = Result<Vec<Vendor>, Self::Error>> + Send + '_;

  /// Apply identity edits. Returns `None` if the vendor does not exist.
  fn update_vendor(
    &self,
    id: Uuid,
    update: VendorUpdate,
  ) -> impl Future<Output = Result<Option<Vendor>, Self::Error>> + Send + '_;

  /// Delete a vendor together with its orders and history. Returns `false`
  /// if the vendor did not exist.
  fn delete_vendor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite the four cached metrics. Returns `false` if the vendor does
  /// not exist.
  fn write_metrics(
    &self,
    vendor_id: Uuid,
    metrics: VendorMetrics,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Purchase orders ───────────────────────────────────────────────────

  /// Persist a new order. `issue_date` defaults to now when unset; the
  /// acknowledgment date always starts empty.
  fn add_order(
    &self,
    input: NewPurchaseOrder,
  ) -> impl Future<Output = Result<PurchaseOrder, Self::Error>> + Send + '_;

  fn get_order(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PurchaseOrder>, Self::Error>> + Send + '_;

  /// The orders of one vendor matching `query`, as a point-in-time set.
  fn list_orders(
    &self,
    vendor_id: Uuid,
    query: OrderQuery,
  ) -> impl Future<Output = Result<Vec<PurchaseOrder>, Self::Error>> + Send + '_;

  /// All orders, optionally restricted to one vendor.
  fn list_all_orders(
    &self,
    vendor_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<PurchaseOrder>, Self::Error>> + Send + '_;

  /// Apply caller edits. Returns `None` if the order does not exist.
  fn update_order(
    &self,
    id: Uuid,
    update: OrderUpdate,
  ) -> impl Future<Output = Result<Option<PurchaseOrder>, Self::Error>> + Send + '_;

  /// Returns `false` if the order did not exist.
  fn delete_order(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Stamp the acknowledgment date if it is still empty and return the
  /// order as stored afterwards. An existing date is left untouched.
  /// Returns `None` if the order does not exist.
  fn acknowledge_order(
    &self,
    id: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<PurchaseOrder>, Self::Error>> + Send + '_;

  // ── Historical performance ────────────────────────────────────────────

  /// Append a snapshot. Snapshots are never updated or deleted.
  fn insert_history(
    &self,
    input: NewHistoricalPerformance,
  ) -> impl Future<Output = Result<HistoricalPerformance, Self::Error>> + Send + '_;

  fn get_history(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<HistoricalPerformance>, Self::Error>>
  + Send
  + '_;

  /// Snapshots ordered by date, optionally restricted to one vendor.
  fn list_history(
    &self,
    vendor_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<HistoricalPerformance>, Self::Error>>
  + Send
  + '_;
}
