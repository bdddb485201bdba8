//! Per-vendor async locks.
//!
//! Metric recomputation is a read-aggregate-write over one vendor's orders.
//! Two cascades for the same vendor must not interleave; cascades for
//! different vendors never wait on each other.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// A registry handing out one async mutex per vendor.
#[derive(Debug, Default)]
pub struct VendorLocks {
  inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl VendorLocks {
  pub fn new() -> Self { Self::default() }

  /// Wait for exclusive access to `vendor_id`. Access is released when the
  /// guard is dropped.
  pub async fn lock(&self, vendor_id: Uuid) -> OwnedMutexGuard<()> {
    let slot = {
      let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
      // Entries nobody holds or waits on only keep the map growing.
      map.retain(|_, m| Arc::strong_count(m) > 1);
      map.entry(vendor_id).or_default().clone()
    };
    slot.lock_owned().await
  }

  /// Number of vendors with a live lock entry.
  pub fn len(&self) -> usize {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[tokio::test]
  async fn same_vendor_is_exclusive() {
    let locks = Arc::new(VendorLocks::new());
    let vendor = Uuid::new_v4();

    let guard = locks.lock(vendor).await;
    let contender = {
      let locks = locks.clone();
      tokio::spawn(async move { locks.lock(vendor).await; })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!contender.is_finished());

    drop(guard);
    tokio::time::timeout(Duration::from_secs(1), contender)
      .await
      .expect("contender acquires after release")
      .unwrap();
  }

  #[tokio::test]
  async fn different_vendors_do_not_block() {
    let locks = VendorLocks::new();
    let _a = locks.lock(Uuid::new_v4()).await;

    tokio::time::timeout(Duration::from_secs(1), locks.lock(Uuid::new_v4()))
      .await
      .expect("second vendor is not blocked");
  }

  #[tokio::test]
  async fn released_entries_are_pruned() {
    let locks = VendorLocks::new();
    for _ in 0..5 {
      drop(locks.lock(Uuid::new_v4()).await);
    }
    let _held = locks.lock(Uuid::new_v4()).await;
    assert_eq!(locks.len(), 1);
  }
}
