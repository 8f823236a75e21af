// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Async mutex per file name. Entries are dropped once no guard or waiter
/// holds them, so the map only grows with concurrent activity.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    entries: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Holds every lock taken by one call; released on drop.
pub struct KeyedGuard {
    guards: Vec<OwnedMutexGuard<()>>,
    locks: KeyedLocks,
    keys: Vec<String>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> KeyedGuard {
        self.lock_many(&[key]).await
    }

    /// Locks all `keys` in sorted order, skipping duplicates, so two callers
    /// touching the same pair of names cannot deadlock.
    pub async fn lock_many(&self, keys: &[&str]) -> KeyedGuard {
        let mut sorted: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        sorted.sort();
        sorted.dedup();

        let mut guards = Vec::with_capacity(sorted.len());
        for key in &sorted {
            let mutex = self.entry(key);
            guards.push(mutex.lock_owned().await);
        }

        KeyedGuard {
            guards,
            locks: self.clone(),
            keys: sorted,
        }
    }

    fn entry(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn prune(&self, keys: &[String]) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        for key in keys {
            if entries
                .get(key)
                .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
            {
                entries.remove(key);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

impl Drop for KeyedGuard {
    fn drop(&mut self) {
        self.guards.clear();
        self.locks.prune(&self.keys);
    }
}
