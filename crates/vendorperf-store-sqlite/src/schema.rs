//! SQL schema for the vendor performance SQLite store.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The four metric columns are written only by the recompute path.
CREATE TABLE IF NOT EXISTS vendors (
    vendor_id             TEXT PRIMARY KEY,
    vendor_code           TEXT NOT NULL UNIQUE,
    name                  TEXT NOT NULL,
    contact_details       TEXT NOT NULL,
    address               TEXT NOT NULL,
    created_at            TEXT NOT NULL,
    on_time_delivery_rate REAL NOT NULL DEFAULT 0.0,
    quality_rating_avg    REAL NOT NULL DEFAULT 0.0,
    average_response_time REAL NOT NULL DEFAULT 0.0,
    fulfillment_rate      REAL NOT NULL DEFAULT 0.0
);

CREATE TABLE IF NOT EXISTS purchase_orders (
    order_id            TEXT PRIMARY KEY,
    po_number           TEXT NOT NULL UNIQUE,
    vendor_id           TEXT NOT NULL REFERENCES vendors(vendor_id) ON DELETE CASCADE,
    order_date          TEXT NOT NULL,
    delivery_date       TEXT NOT NULL,
    items               TEXT NOT NULL,   -- compact JSON
    quantity            INTEGER NOT NULL CHECK (quantity >= 0),
    status              TEXT NOT NULL,   -- 'pending' | 'completed' | 'canceled'
    quality_rating      REAL,
    issue_date          TEXT,
    acknowledgment_date TEXT             -- set once, never cleared
);

-- Append-only. No UPDATE is ever issued against this table.
CREATE TABLE IF NOT EXISTS historical_performance (
    record_id             TEXT PRIMARY KEY,
    vendor_id             TEXT NOT NULL REFERENCES vendors(vendor_id) ON DELETE CASCADE,
    date                  TEXT NOT NULL,
    on_time_delivery_rate REAL NOT NULL,
    quality_rating_avg    REAL NOT NULL,
    average_response_time REAL NOT NULL,
    fulfillment_rate      REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS orders_vendor_status_idx ON purchase_orders(vendor_id, status);
CREATE INDEX IF NOT EXISTS history_vendor_date_idx  ON historical_performance(vendor_id, date);

PRAGMA user_version = 1;
";
