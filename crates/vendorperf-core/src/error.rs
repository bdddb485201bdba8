//! Error types for `vendorperf-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("vendor not found: {0}")]
  VendorNotFound(Uuid),

  #[error("purchase order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("historical performance record not found: {0}")]
  HistoryNotFound(Uuid),

  #[error("unknown order status: {0:?}")]
  UnknownStatus(String),

  /// The backing store failed; the vendor's metrics keep their last
  /// committed values.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::VendorNotFound(_) | Self::OrderNotFound(_) | Self::HistoryNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
