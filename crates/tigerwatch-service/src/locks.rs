//! Keyed async mutual exclusion.

use std::{
  collections::HashMap,
  hash::Hash,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap<K> = Arc<Mutex<HashMap<K, Entry>>>;

struct Entry {
  mutex: Arc<AsyncMutex<()>>,
  /// Holders plus waiters.
  users: usize,
}

/// One async lock per key, created on demand and removed when the last
/// holder or waiter lets go. Only serialises callers within this process.
pub struct KeyedLocks<K> {
  map: LockMap<K>,
}

impl<K> Default for KeyedLocks<K> {
  fn default() -> Self { Self { map: Arc::default() } }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
  pub fn new() -> Self { Self::default() }

  pub async fn lock(&self, key: K) -> KeyedGuard<K> {
    let mutex = {
      let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
      let entry = map
        .entry(key.clone())
        .or_insert_with(|| Entry { mutex: Arc::default(), users: 0 });
      entry.users += 1;
      Arc::clone(&entry.mutex)
    };
    // Registered before the wait so a cancelled waiter still deregisters.
    let user = User { key, map: Arc::clone(&self.map) };
    let guard = mutex.lock_owned().await;
    KeyedGuard { _guard: guard, _user: user }
  }

  /// Number of keys currently locked or waited on.
  pub fn len(&self) -> usize {
    self.map.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Field order matters: the mutex is released before the user count drops.
pub struct KeyedGuard<K: Eq + Hash> {
  _guard: OwnedMutexGuard<()>,
  _user:  User<K>,
}

struct User<K: Eq + Hash> {
  key: K,
  map: LockMap<K>,
}

impl<K: Eq + Hash> Drop for User<K> {
  fn drop(&mut self) {
    let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(entry) = map.get_mut(&self.key) {
      entry.users -= 1;
      if entry.users == 0 {
        map.remove(&self.key);
      }
    }
  }
}
