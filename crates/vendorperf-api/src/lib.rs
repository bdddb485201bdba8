//! JSON REST API for the vendor performance tracker.
//!
//! Exposes an axum [`Router`] backed by a [`PerformanceTracker`] over any
//! [`vendorperf_core::store::PerformanceStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vendorperf_api::api_router(tracker.clone()))
//! ```

pub mod error;
pub mod history;
pub mod orders;
pub mod vendors;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use vendorperf_core::{PerformanceTracker, store::PerformanceStore};

pub use error::ApiError;

/// Build the API router for `tracker`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(tracker: Arc<PerformanceTracker<S>>) -> Router<()>
where
  S: PerformanceStore + 'static,
{
  Router::new()
    // Vendors
    .route("/vendors", get(vendors::list::<S>).post(vendors::create::<S>))
    .route(
      "/vendors/{id}",
      get(vendors::get_one::<S>)
        .put(vendors::update_one::<S>)
        .delete(vendors::delete_one::<S>),
    )
    // Purchase orders
    .route(
      "/purchase_orders",
      get(orders::list::<S>).post(orders::create::<S>),
    )
    .route(
      "/purchase_orders/{id}",
      get(orders::get_one::<S>)
        .put(orders::update_one::<S>)
        .delete(orders::delete_one::<S>),
    )
    .route(
      "/purchase_orders/{id}/acknowledge",
      post(orders::acknowledge_one::<S>).patch(orders::acknowledge_one::<S>),
    )
    // Historical performance
    .route("/historical_performance", get(history::list::<S>))
    .route("/historical_performance/{id}", get(history::get_one::<S>))
    .with_state(tracker)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use vendorperf_store_sqlite::SqliteStore;

  async fn make_router() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(PerformanceTracker::new(store)))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  async fn create_vendor(app: &Router, code: &str) -> String {
    let (status, body) = send(
      app,
      "POST",
      "/vendors",
      Some(json!({
        "vendor_code": code,
        "name": "Test Vendor",
        "contact_details": "Contact Info",
        "address": "Vendor Address",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["vendor_id"].as_str().unwrap().to_string()
  }

  fn order_body(vendor_id: &str, po: &str, status: &str) -> Value {
    json!({
      "po_number": po,
      "vendor_id": vendor_id,
      "order_date": "2023-01-01T00:00:00Z",
      "delivery_date": "2023-01-10T00:00:00Z",
      "items": { "item1": "Description1" },
      "quantity": 10,
      "status": status,
      "issue_date": "2023-01-02T00:00:00Z",
    })
  }

  // ── Vendors ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_list_vendors() {
    let app = make_router().await;
    create_vendor(&app, "V001").await;
    create_vendor(&app, "V002").await;

    let (status, body) = send(&app, "GET", "/vendors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["on_time_delivery_rate"], 0.0);
  }

  #[tokio::test]
  async fn vendor_metrics_are_not_assignable() {
    let app = make_router().await;
    let id = create_vendor(&app, "V001").await;

    let (status, body) = send(
      &app,
      "PUT",
      &format!("/vendors/{id}"),
      Some(json!({ "name": "Updated Vendor", "fulfillment_rate": 99.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Updated Vendor");
    assert_eq!(body["fulfillment_rate"], 0.0);
  }

  #[tokio::test]
  async fn duplicate_vendor_code_returns_409() {
    let app = make_router().await;
    create_vendor(&app, "V001").await;
    let (status, _) = send(
      &app,
      "POST",
      "/vendors",
      Some(json!({ "vendor_code": "V001", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn delete_vendor_then_get_returns_404() {
    let app = make_router().await;
    let id = create_vendor(&app, "V001").await;

    let (status, _) = send(&app, "DELETE", &format!("/vendors/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/vendors/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  // ── Purchase orders ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn completing_an_order_updates_vendor_and_history() {
    let app = make_router().await;
    let vid = create_vendor(&app, "V001").await;

    let (status, order) = send(
      &app,
      "POST",
      "/purchase_orders",
      Some(order_body(&vid, "PO003", "pending")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let oid = order["order_id"].as_str().unwrap().to_string();

    let (status, body) = send(
      &app,
      "PUT",
      &format!("/purchase_orders/{oid}"),
      Some(json!({
        "delivery_date": "2023-01-20T00:00:00Z",
        "status": "completed",
        "quality_rating": 4.0,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivery_date"], "2023-01-20T00:00:00Z");

    let (_, vendor) = send(&app, "GET", &format!("/vendors/{vid}"), None).await;
    assert_eq!(vendor["on_time_delivery_rate"], 100.0);
    assert_eq!(vendor["quality_rating_avg"], 4.0);

    let (status, history) = send(
      &app,
      "GET",
      &format!("/historical_performance?vendor_id={vid}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["date"], "2023-01-20T00:00:00Z");
    assert_eq!(history[0]["quality_rating_avg"], 4.0);

    let rid = history[0]["record_id"].as_str().unwrap();
    let (status, _) = send(&app, "GET", &format!("/historical_performance/{rid}"), None).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn list_orders_filters_by_vendor() {
    let app = make_router().await;
    let a = create_vendor(&app, "V001").await;
    let b = create_vendor(&app, "V002").await;
    send(&app, "POST", "/purchase_orders", Some(order_body(&a, "PO001", "completed"))).await;
    send(&app, "POST", "/purchase_orders", Some(order_body(&b, "PO002", "pending"))).await;

    let (_, all) = send(&app, "GET", "/purchase_orders", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, only_a) = send(&app, "GET", &format!("/purchase_orders?vendor_id={a}"), None).await;
    let only_a = only_a.as_array().unwrap();
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0]["po_number"], "PO001");
  }

  #[tokio::test]
  async fn order_for_unknown_vendor_returns_400() {
    let app = make_router().await;
    let missing = Uuid::new_v4().to_string();
    let (status, _) = send(
      &app,
      "POST",
      "/purchase_orders",
      Some(order_body(&missing, "PO001", "pending")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn out_of_range_rating_returns_400() {
    let app = make_router().await;
    let vid = create_vendor(&app, "V001").await;
    let mut body = order_body(&vid, "PO001", "completed");
    body["quality_rating"] = json!(7.5);

    let (status, _) = send(&app, "POST", "/purchase_orders", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn delete_order_returns_204() {
    let app = make_router().await;
    let vid = create_vendor(&app, "V001").await;
    let (_, order) = send(
      &app,
      "POST",
      "/purchase_orders",
      Some(order_body(&vid, "PO004", "pending")),
    )
    .await;
    let oid = order["order_id"].as_str().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/purchase_orders/{oid}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/purchase_orders/{oid}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Acknowledge ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn acknowledge_sets_date_and_response_time() {
    let app = make_router().await;
    let vid = create_vendor(&app, "V001").await;
    let (_, order) = send(
      &app,
      "POST",
      "/purchase_orders",
      Some(order_body(&vid, "PO001", "pending")),
    )
    .await;
    let oid = order["order_id"].as_str().unwrap();
    assert!(order["acknowledgment_date"].is_null());

    let (status, acked) = send(
      &app,
      "POST",
      &format!("/purchase_orders/{oid}/acknowledge"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(acked["acknowledgment_date"].is_string());

    let (_, vendor) = send(&app, "GET", &format!("/vendors/{vid}"), None).await;
    assert!(vendor["average_response_time"].as_f64().unwrap() > 0.0);

    let (_, history) = send(&app, "GET", "/historical_performance", None).await;
    assert!(history.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn acknowledge_unknown_order_returns_404() {
    let app = make_router().await;
    let (status, _) = send(
      &app,
      "PATCH",
      &format!("/purchase_orders/{}/acknowledge", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
