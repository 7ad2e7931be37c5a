//! Batch fan-out.
//!
//! [`execute_many`] runs one operation per key concurrently and collects
//! every outcome, success or failure, into a [`BatchResults`] that keeps
//! the input order. A failing key never cancels its siblings.

use std::borrow::Borrow;
use std::future::Future;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::debug;

use crate::{BrregError, Result};

/// Per-key outcomes of a batch, in input order.
///
/// Duplicate input keys produce duplicate entries, so `len()` always
/// equals the number of keys passed in.
#[derive(Debug)]
pub struct BatchResults<K, T> {
    entries: Vec<(K, Result<T>)>,
}

impl<K, T> Default for BatchResults<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, T> BatchResults<K, T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcome for `key`; the first one if the key was given more than once.
    pub fn get<Q>(&self, key: &Q) -> Option<&Result<T>>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Result<T>)> {
        self.entries.iter().map(|(k, result)| (k, result))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn successes(&self) -> impl Iterator<Item = (&K, &T)> {
        self.entries
            .iter()
            .filter_map(|(k, result)| result.as_ref().ok().map(|value| (k, value)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&K, &BrregError)> {
        self.entries
            .iter()
            .filter_map(|(k, result)| result.as_ref().err().map(|err| (k, err)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn into_vec(self) -> Vec<(K, Result<T>)> {
        self.entries
    }
}

impl<K, T> IntoIterator for BatchResults<K, T> {
    type Item = (K, Result<T>);
    type IntoIter = std::vec::IntoIter<(K, Result<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, T> FromIterator<(K, Result<T>)> for BatchResults<K, T> {
    fn from_iter<I: IntoIterator<Item = (K, Result<T>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Run `operation` once per key and gather every outcome.
///
/// At most `concurrency` operations are in flight at a time; `None` (or
/// zero) starts all of them at once and leaves throttling to the rate
/// limiter. Results are reassembled in input order regardless of
/// completion order.
pub async fn execute_many<K, T, F, Fut>(
    keys: impl IntoIterator<Item = K>,
    concurrency: Option<usize>,
    operation: F,
) -> BatchResults<K, T>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let keys: Vec<K> = keys.into_iter().collect();
    if keys.is_empty() {
        return BatchResults::default();
    }

    let total = keys.len();
    let limit = concurrency.filter(|n| *n > 0).unwrap_or(total);
    debug!(total, limit, "starting batch");

    let entries: Vec<(K, Result<T>)> = stream::iter(keys)
        .map(|key| {
            let pending = operation(key.clone());
            async move { (key, pending.await) }
        })
        .buffered(limit)
        .collect()
        .await;

    let results = BatchResults { entries };
    debug!(
        total,
        succeeded = results.success_count(),
        failed = results.failure_count(),
        "batch finished"
    );
    results
}
