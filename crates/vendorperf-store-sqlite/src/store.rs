//! [`SqliteStore`], the SQLite implementation of [`PerformanceStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vendorperf_core::{
  history::{HistoricalPerformance, NewHistoricalPerformance},
  order::{NewPurchaseOrder, OrderUpdate, PurchaseOrder},
  store::{OrderQuery, PerformanceStore},
  vendor::{NewVendor, Vendor, VendorMetrics, VendorUpdate},
};

use crate::{
  encode::{
    HISTORY_COLUMNS, ORDER_COLUMNS, RawHistory, RawOrder, RawVendor, VENDOR_COLUMNS,
    encode_dt, encode_status, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vendor performance store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }

  /// Write every caller-editable column of `order` back to its row.
  async fn write_order(&self, order: &PurchaseOrder) -> Result<()> {
    let id_str        = encode_uuid(order.order_id);
    let po_number     = order.po_number.clone();
    let order_date    = encode_dt(order.order_date);
    let delivery_date = encode_dt(order.delivery_date);
    let items         = serde_json::to_string(&order.items)?;
    let quantity      = order.quantity;
    let status        = encode_status(order.status);
    let rating        = order.quality_rating;
    let issue_date    = order.issue_date.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE purchase_orders
           SET po_number = ?2, order_date = ?3, delivery_date = ?4, items = ?5,
               quantity = ?6, status = ?7, quality_rating = ?8, issue_date = ?9
           WHERE order_id = ?1",
          rusqlite::params![
            id_str,
            po_number,
            order_date,
            delivery_date,
            items,
            quantity,
            status,
            rating,
            issue_date,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)
  }
}

// ─── PerformanceStore impl ───────────────────────────────────────────────────

impl PerformanceStore for SqliteStore {
  type Error = Error;

  // ── Vendors ───────────────────────────────────────────────────────────────

  async fn add_vendor(&self, input: NewVendor) -> Result<Vendor> {
    let vendor = Vendor {
      vendor_id:       Uuid::new_v4(),
      vendor_code:     input.vendor_code,
      name:            input.name,
      contact_details: input.contact_details,
      address:         input.address,
      created_at:      Utc::now(),
      metrics:         VendorMetrics::default(),
    };

    let id_str  = encode_uuid(vendor.vendor_id);
    let code    = vendor.vendor_code.clone();
    let name    = vendor.name.clone();
    let contact = vendor.contact_details.clone();
    let address = vendor.address.clone();
    let at_str  = encode_dt(vendor.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vendors (vendor_id, vendor_code, name, contact_details, address, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, code, name, contact, address, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)?;

    Ok(vendor)
  }

  async fn get_vendor(&self, id: Uuid) -> Result<Option<Vendor>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawVendor> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE vendor_id = ?1"),
            rusqlite::params![id_str],
            RawVendor::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawVendor::into_vendor).transpose()
  }

  async fn list_vendors(&self) -> Result<Vec<Vendor>> {
    let raws: Vec<RawVendor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY vendor_code"
        ))?;
        let rows = stmt
          .query_map([], RawVendor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVendor::into_vendor).collect()
  }

  async fn update_vendor(&self, id: Uuid, update: VendorUpdate) -> Result<Option<Vendor>> {
    let mut vendor = match self.get_vendor(id).await? {
      Some(v) => v,
      None    => return Ok(None),
    };
    vendor.apply(update);

    let id_str  = encode_uuid(id);
    let code    = vendor.vendor_code.clone();
    let name    = vendor.name.clone();
    let contact = vendor.contact_details.clone();
    let address = vendor.address.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE vendors
           SET vendor_code = ?2, name = ?3, contact_details = ?4, address = ?5
           WHERE vendor_id = ?1",
          rusqlite::params![id_str, code, name, contact, address],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)?;

    Ok(Some(vendor))
  }

  async fn delete_vendor(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM vendors WHERE vendor_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn write_metrics(&self, vendor_id: Uuid, metrics: VendorMetrics) -> Result<bool> {
    let id_str = encode_uuid(vendor_id);

    // One statement, so the four columns change together or not at all.
    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE vendors
           SET on_time_delivery_rate = ?2, quality_rating_avg = ?3,
               average_response_time = ?4, fulfillment_rate = ?5
           WHERE vendor_id = ?1",
          rusqlite::params![
            id_str,
            metrics.on_time_delivery_rate,
            metrics.quality_rating_avg,
            metrics.average_response_time,
            metrics.fulfillment_rate,
          ],
        )?)
      })
      .await?;
    Ok(updated > 0)
  }

  // ── Purchase orders ───────────────────────────────────────────────────────

  async fn add_order(&self, input: NewPurchaseOrder) -> Result<PurchaseOrder> {
    if self.get_vendor(input.vendor_id).await?.is_none() {
      return Err(Error::VendorNotFound(input.vendor_id));
    }

    let order = PurchaseOrder {
      order_id:            Uuid::new_v4(),
      po_number:           input.po_number,
      vendor_id:           input.vendor_id,
      order_date:          input.order_date,
      delivery_date:       input.delivery_date,
      items:               input.items,
      quantity:            input.quantity,
      status:              input.status,
      quality_rating:      input.quality_rating,
      issue_date:          Some(input.issue_date.unwrap_or_else(Utc::now)),
      acknowledgment_date: None,
    };

    let id_str        = encode_uuid(order.order_id);
    let po_number     = order.po_number.clone();
    let vendor_str    = encode_uuid(order.vendor_id);
    let order_date    = encode_dt(order.order_date);
    let delivery_date = encode_dt(order.delivery_date);
    let items         = serde_json::to_string(&order.items)?;
    let quantity      = order.quantity;
    let status        = encode_status(order.status);
    let rating        = order.quality_rating;
    let issue_date    = order.issue_date.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO purchase_orders (
             order_id, po_number, vendor_id, order_date, delivery_date,
             items, quantity, status, quality_rating, issue_date
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            po_number,
            vendor_str,
            order_date,
            delivery_date,
            items,
            quantity,
            status,
            rating,
            issue_date,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)?;

    Ok(order)
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<PurchaseOrder>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawOrder> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE order_id = ?1"),
            rusqlite::params![id_str],
            RawOrder::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawOrder::into_order).transpose()
  }

  async fn list_orders(&self, vendor_id: Uuid, query: OrderQuery) -> Result<Vec<PurchaseOrder>> {
    let vendor_str   = encode_uuid(vendor_id);
    let status       = query.status.map(encode_status);
    let acknowledged = query.acknowledged;

    let raws: Vec<RawOrder> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ORDER_COLUMNS} FROM purchase_orders
           WHERE vendor_id = ?1
             AND (?2 IS NULL OR status = ?2)
             AND (?3 IS NULL OR (acknowledgment_date IS NOT NULL) = ?3)
           ORDER BY order_date, po_number"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![vendor_str, status, acknowledged],
            RawOrder::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOrder::into_order).collect()
  }

  async fn list_all_orders(&self, vendor_id: Option<Uuid>) -> Result<Vec<PurchaseOrder>> {
    let vendor_str = vendor_id.map(encode_uuid);

    let raws: Vec<RawOrder> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ORDER_COLUMNS} FROM purchase_orders
           WHERE (?1 IS NULL OR vendor_id = ?1)
           ORDER BY order_date, po_number"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![vendor_str], RawOrder::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOrder::into_order).collect()
  }

  async fn update_order(&self, id: Uuid, update: OrderUpdate) -> Result<Option<PurchaseOrder>> {
    let mut order = match self.get_order(id).await? {
      Some(o) => o,
      None    => return Ok(None),
    };
    order.apply(update);
    self.write_order(&order).await?;
    Ok(Some(order))
  }

  async fn delete_order(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM purchase_orders WHERE order_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn acknowledge_order(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<PurchaseOrder>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(at);

    let raw: Option<RawOrder> = self
      .conn
      .call(move |conn| {
        // Conditional stamp: an existing acknowledgment is never replaced.
        conn.execute(
          "UPDATE purchase_orders SET acknowledgment_date = ?2
           WHERE order_id = ?1 AND acknowledgment_date IS NULL",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(conn
          .query_row(
            &format!("SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE order_id = ?1"),
            rusqlite::params![id_str],
            RawOrder::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawOrder::into_order).transpose()
  }

  // ── Historical performance ────────────────────────────────────────────────

  async fn insert_history(&self, input: NewHistoricalPerformance) -> Result<HistoricalPerformance> {
    let record = HistoricalPerformance {
      record_id: Uuid::new_v4(),
      vendor_id: input.vendor_id,
      date:      input.date,
      metrics:   input.metrics,
    };

    let id_str     = encode_uuid(record.record_id);
    let vendor_str = encode_uuid(record.vendor_id);
    let date_str   = encode_dt(record.date);
    let m          = record.metrics;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO historical_performance (
             record_id, vendor_id, date, on_time_delivery_rate,
             quality_rating_avg, average_response_time, fulfillment_rate
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            vendor_str,
            date_str,
            m.on_time_delivery_rate,
            m.quality_rating_avg,
            m.average_response_time,
            m.fulfillment_rate,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)?;

    Ok(record)
  }

  async fn get_history(&self, id: Uuid) -> Result<Option<HistoricalPerformance>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawHistory> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {HISTORY_COLUMNS} FROM historical_performance WHERE record_id = ?1"
            ),
            rusqlite::params![id_str],
            RawHistory::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawHistory::into_history).transpose()
  }

  async fn list_history(&self, vendor_id: Option<Uuid>) -> Result<Vec<HistoricalPerformance>> {
    let vendor_str = vendor_id.map(encode_uuid);

    let raws: Vec<RawHistory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HISTORY_COLUMNS} FROM historical_performance
           WHERE (?1 IS NULL OR vendor_id = ?1)
           ORDER BY date, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![vendor_str], RawHistory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistory::into_history).collect()
  }
}
