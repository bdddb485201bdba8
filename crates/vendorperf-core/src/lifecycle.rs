//! The lifecycle coordinator: decides when vendor metrics are recomputed and
//! performs the acknowledgment transition.
//!
//! Callers write an order to the store first and then call
//! [`PerformanceTracker::on_purchase_order_written`], so the recomputation
//! always observes the order that triggered it.

use chrono::Utc;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::{
  Error, Result,
  history::NewHistoricalPerformance,
  locks::VendorLocks,
  metrics,
  order::PurchaseOrder,
  store::{OrderQuery, PerformanceStore},
  vendor::VendorMetrics,
};

/// Keeps each vendor's cached metrics consistent with its order history.
///
/// Every cascade runs while holding the owning vendor's lock, so concurrent
/// writes to orders of one vendor cannot overwrite each other's metrics.
pub struct PerformanceTracker<S> {
  store: S,
  locks: VendorLocks,
}

impl<S> PerformanceTracker<S>
where
  S: PerformanceStore,
{
  pub fn new(store: S) -> Self { Self { store, locks: VendorLocks::new() } }

  /// The underlying store, for plain reads and CRUD writes.
  pub fn store(&self) -> &S { &self.store }

  /// Run after every durable order write (create or update).
  ///
  /// Metrics are recomputed when the order was just created or its status is
  /// completed. A completed order additionally produces one historical
  /// snapshot, dated at its delivery date and holding the fresh metrics.
  /// Other edits, such as pending to canceled, change nothing.
  pub async fn on_purchase_order_written(
    &self,
    order: &PurchaseOrder,
    was_created: bool,
  ) -> Result<()> {
    if !was_created && !order.is_completed() {
      trace!(
        order_id = %order.order_id,
        status = order.status.as_str(),
        "order write does not affect vendor metrics"
      );
      return Ok(());
    }

    let _guard = self.locks.lock(order.vendor_id).await;
    let metrics = self.refresh_all(order.vendor_id).await?;

    if order.is_completed() {
      let record = self
        .store
        .insert_history(NewHistoricalPerformance {
          vendor_id: order.vendor_id,
          date: order.delivery_date,
          metrics,
        })
        .await
        .map_err(Error::store)?;
      info!(
        vendor_id = %order.vendor_id,
        order_id = %order.order_id,
        record_id = %record.record_id,
        "recorded historical performance"
      );
    }

    Ok(())
  }

  /// Recompute and persist all four metrics for `vendor_id`.
  pub async fn recompute_metrics(&self, vendor_id: Uuid) -> Result<VendorMetrics> {
    let _guard = self.locks.lock(vendor_id).await;
    self.refresh_all(vendor_id).await
  }

  /// Stamp `order_id` as acknowledged now and refresh the owning vendor's
  /// average response time. The other three metrics are left as they are.
  ///
  /// The first acknowledgment wins: calling this again returns the order
  /// with its original date and leaves the vendor untouched.
  pub async fn acknowledge(&self, order_id: Uuid) -> Result<PurchaseOrder> {
    let order = self
      .store
      .get_order(order_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::OrderNotFound(order_id))?;

    if order.is_acknowledged() {
      debug!(%order_id, "order already acknowledged");
      return Ok(order);
    }

    let _guard = self.locks.lock(order.vendor_id).await;

    let now = Utc::now();
    let order = self
      .store
      .acknowledge_order(order_id, now)
      .await
      .map_err(Error::store)?
      .ok_or(Error::OrderNotFound(order_id))?;

    // Lost a race with another acknowledgment of the same order.
    if order.acknowledgment_date != Some(now) {
      return Ok(order);
    }

    let vendor = self
      .store
      .get_vendor(order.vendor_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::VendorNotFound(order.vendor_id))?;

    let acknowledged = self
      .store
      .list_orders(order.vendor_id, OrderQuery::acknowledged())
      .await
      .map_err(Error::store)?;
    let hours = metrics::average_response_time(&acknowledged);

    self
      .write_back(order.vendor_id, vendor.metrics.with_average_response_time(hours))
      .await?;
    info!(
      %order_id,
      vendor_id = %order.vendor_id,
      average_response_time = hours,
      "order acknowledged"
    );

    Ok(order)
  }

  // ─── Internals ─────────────────────────────────────────────────────────────

  /// Full recompute. The caller holds the vendor lock.
  async fn refresh_all(&self, vendor_id: Uuid) -> Result<VendorMetrics> {
    let orders = self
      .store
      .list_orders(vendor_id, OrderQuery::all())
      .await
      .map_err(Error::store)?;

    let metrics = metrics::compute(&orders, Utc::now());
    self.write_back(vendor_id, metrics).await?;
    debug!(
      %vendor_id,
      orders = orders.len(),
      on_time_delivery_rate = metrics.on_time_delivery_rate,
      quality_rating_avg = metrics.quality_rating_avg,
      average_response_time = metrics.average_response_time,
      fulfillment_rate = metrics.fulfillment_rate,
      "vendor metrics recomputed"
    );

    Ok(metrics)
  }

  async fn write_back(&self, vendor_id: Uuid, metrics: VendorMetrics) -> Result<()> {
    let found = self
      .store
      .write_metrics(vendor_id, metrics)
      .await
      .map_err(Error::store)?;
    if found { Ok(()) } else { Err(Error::VendorNotFound(vendor_id)) }
  }
}
