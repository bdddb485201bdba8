//! The metrics engine: pure functions from a vendor's order set to its four
//! performance statistics.
//!
//! Every function takes the full set of orders belonging to one vendor at
//! evaluation time and returns `0.0` when its denominator would be zero.

use chrono::{DateTime, Utc};

use crate::{order::PurchaseOrder, vendor::VendorMetrics};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Compute all four metrics against a single evaluation time.
pub fn compute(orders: &[PurchaseOrder], now: DateTime<Utc>) -> VendorMetrics {
  VendorMetrics {
    on_time_delivery_rate: on_time_delivery_rate(orders, now),
    quality_rating_avg:    quality_rating_avg(orders),
    average_response_time: average_response_time(orders),
    fulfillment_rate:      fulfillment_rate(orders),
  }
}

/// Percentage of completed orders whose delivery date is at or before `now`.
///
/// This counts deliveries whose scheduled date has passed; it does not
/// compare an actual delivery against a promised one.
pub fn on_time_delivery_rate(orders: &[PurchaseOrder], now: DateTime<Utc>) -> f64 {
  let completed = completed(orders);
  let on_time = completed
    .clone()
    .filter(|o| o.delivery_date <= now)
    .count();
  percentage(on_time, completed.count())
}

/// Mean quality rating over completed orders that carry a rating.
pub fn quality_rating_avg(orders: &[PurchaseOrder]) -> f64 {
  mean(completed(orders).filter_map(|o| o.quality_rating))
}

/// Mean issue-to-acknowledgment latency in hours.
///
/// Each interval is truncated to whole seconds before conversion. Orders
/// without an issue date have no interval and are skipped.
pub fn average_response_time(orders: &[PurchaseOrder]) -> f64 {
  mean(
    orders
      .iter()
      .filter_map(PurchaseOrder::response_interval)
      .map(|d| d.num_seconds() as f64 / SECONDS_PER_HOUR),
  )
}

/// Percentage of completed orders that have both an issue and an
/// acknowledgment date.
pub fn fulfillment_rate(orders: &[PurchaseOrder]) -> f64 {
  let completed = completed(orders);
  let fulfilled = completed
    .clone()
    .filter(|o| o.issue_date.is_some() && o.acknowledgment_date.is_some())
    .count();
  percentage(fulfilled, completed.count())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn completed(
  orders: &[PurchaseOrder],
) -> impl Iterator<Item = &PurchaseOrder> + Clone {
  orders.iter().filter(|o| o.is_completed())
}

fn percentage(part: usize, whole: usize) -> f64 {
  if whole == 0 {
    return 0.0;
  }
  part as f64 / whole as f64 * 100.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
  let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
  if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeDelta, TimeZone};
  use uuid::Uuid;

  use super::*;
  use crate::order::OrderStatus;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() }

  fn order(status: OrderStatus) -> PurchaseOrder {
    PurchaseOrder {
      order_id:            Uuid::new_v4(),
      po_number:           "PO".into(),
      vendor_id:           Uuid::nil(),
      order_date:          now() - TimeDelta::days(20),
      delivery_date:       now() - TimeDelta::days(1),
      items:               serde_json::json!({ "widget": 1 }),
      quantity:            10,
      status,
      quality_rating:      None,
      issue_date:          Some(now() - TimeDelta::days(19)),
      acknowledgment_date: None,
    }
  }

  fn completed_order() -> PurchaseOrder { order(OrderStatus::Completed) }

  fn assert_close(actual: f64, expected: f64) {
    assert!(
      (actual - expected).abs() < 1e-9,
      "expected {expected}, got {actual}"
    );
  }

  // ─── Degenerate denominators ───────────────────────────────────────────────

  #[test]
  fn no_completed_orders_yields_zero_rates() {
    let orders = vec![order(OrderStatus::Pending), order(OrderStatus::Canceled)];
    assert_eq!(on_time_delivery_rate(&orders, now()), 0.0);
    assert_eq!(quality_rating_avg(&orders), 0.0);
    assert_eq!(fulfillment_rate(&orders), 0.0);
  }

  #[test]
  fn empty_order_set_yields_default_metrics() {
    assert_eq!(compute(&[], now()), VendorMetrics::default());
  }

  #[test]
  fn no_acknowledged_orders_yields_zero_response_time() {
    let orders = vec![completed_order(), order(OrderStatus::Pending)];
    assert_eq!(average_response_time(&orders), 0.0);
  }

  // ─── On-time delivery ──────────────────────────────────────────────────────

  #[test]
  fn on_time_rate_counts_past_delivery_dates() {
    let mut future = completed_order();
    future.delivery_date = now() + TimeDelta::days(3);
    let orders = vec![completed_order(), completed_order(), future];

    assert_close(on_time_delivery_rate(&orders, now()), 200.0 / 3.0);
  }

  #[test]
  fn on_time_rate_includes_delivery_exactly_at_now() {
    let mut due_now = completed_order();
    due_now.delivery_date = now();
    assert_eq!(on_time_delivery_rate(&[due_now], now()), 100.0);
  }

  #[test]
  fn on_time_rate_ignores_pending_orders() {
    let mut pending = order(OrderStatus::Pending);
    pending.delivery_date = now() + TimeDelta::days(5);
    let orders = vec![completed_order(), pending];
    assert_eq!(on_time_delivery_rate(&orders, now()), 100.0);
  }

  // ─── Quality ───────────────────────────────────────────────────────────────

  #[test]
  fn quality_average_excludes_unrated_orders() {
    let mut a = completed_order();
    a.quality_rating = Some(4.0);
    let mut b = completed_order();
    b.quality_rating = Some(5.0);
    let unrated = completed_order();

    assert_close(quality_rating_avg(&[a, b, unrated]), 4.5);
  }

  #[test]
  fn quality_average_ignores_ratings_on_open_orders() {
    let mut rated_pending = order(OrderStatus::Pending);
    rated_pending.quality_rating = Some(1.0);
    let mut rated = completed_order();
    rated.quality_rating = Some(3.0);

    assert_close(quality_rating_avg(&[rated_pending, rated]), 3.0);
  }

  // ─── Response time ─────────────────────────────────────────────────────────

  #[test]
  fn response_time_truncates_to_whole_seconds() {
    let issued = now() - TimeDelta::days(2);
    let mut o = order(OrderStatus::Pending);
    o.issue_date = Some(issued);
    o.acknowledgment_date = Some(
      issued
        + TimeDelta::hours(2)
        + TimeDelta::minutes(10)
        + TimeDelta::seconds(5)
        + TimeDelta::milliseconds(750),
    );

    assert_close(average_response_time(&[o]), 7805.0 / 3600.0);
  }

  #[test]
  fn response_time_averages_over_all_statuses() {
    let issued = now() - TimeDelta::days(2);
    let mut pending = order(OrderStatus::Pending);
    pending.issue_date = Some(issued);
    pending.acknowledgment_date = Some(issued + TimeDelta::hours(1));
    let mut done = completed_order();
    done.issue_date = Some(issued);
    done.acknowledgment_date = Some(issued + TimeDelta::hours(3));

    assert_close(average_response_time(&[pending, done]), 2.0);
  }

  #[test]
  fn response_time_skips_orders_without_issue_date() {
    let mut no_issue = order(OrderStatus::Pending);
    no_issue.issue_date = None;
    no_issue.acknowledgment_date = Some(now());

    assert_eq!(average_response_time(&[no_issue]), 0.0);
  }

  // ─── Fulfillment ───────────────────────────────────────────────────────────

  #[test]
  fn fulfillment_counts_acknowledged_completions() {
    let mut acked = completed_order();
    acked.acknowledgment_date = Some(now());
    let mut never_issued = completed_order();
    never_issued.issue_date = None;
    never_issued.acknowledgment_date = Some(now());
    let orders = vec![acked, never_issued, completed_order(), completed_order()];

    assert_eq!(fulfillment_rate(&orders), 25.0);
  }

  #[test]
  fn compute_is_idempotent() {
    let mut a = completed_order();
    a.quality_rating = Some(2.5);
    a.acknowledgment_date = Some(now() - TimeDelta::days(18));
    let orders = vec![a, order(OrderStatus::Pending)];

    assert_eq!(compute(&orders, now()), compute(&orders, now()));
  }
}
