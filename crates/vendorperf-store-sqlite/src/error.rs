//! Error type for `vendorperf-store-sqlite`.

use thiserror::Error;
use vendorperf_core::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] vendorperf_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A uniqueness or check constraint rejected the write (e.g. a duplicate
  /// `po_number`).
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("vendor not found: {0}")]
  VendorNotFound(uuid::Uuid),
}

impl Error {
  /// Route constraint violations to [`Error::Conflict`]; everything else is a
  /// plain database error.
  pub(crate) fn from_write(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      message,
    )) = &err
      && failure.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Self::Conflict(
        message.clone().unwrap_or_else(|| failure.to_string()),
      );
    }
    Self::Database(err)
  }
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Self::Conflict(_)) }

  fn is_not_found(&self) -> bool {
    match self {
      Self::VendorNotFound(_) => true,
      Self::Core(e) => e.is_not_found(),
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
