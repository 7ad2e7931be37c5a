//! Per-fingerprint single-flight guard.
//!
//! Concurrent cache misses for the same fingerprint queue on one async
//! mutex; the first holder fetches and stores, the rest re-check the cache
//! once they get the lock and find the fresh entry. Locks are dropped from
//! the map as soon as nobody holds or waits on them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
pub(crate) struct SingleFlight {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SingleFlight {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive ownership of `key`.
    pub(crate) async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.to_owned()).or_default())
        };
        let permit = Arc::clone(&lock).lock_owned().await;
        FlightGuard {
            flights: self,
            key: key.to_owned(),
            lock,
            permit: Some(permit),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub(crate) struct FlightGuard<'a> {
    flights: &'a SingleFlight,
    key: String,
    lock: Arc<AsyncMutex<()>>,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // release before inspecting the refcount, the permit holds a clone
        self.permit.take();
        let mut locks = self
            .flights
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one here: no waiters left
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}
