// core/src/session_cache.rs

//! The per-session quick-cache behind the cart badge.
//!
//! Entries are display state only: keyed by product id, overwritten on every
//! add with that add's quantity, and never read when computing cart totals.
//! It is handed to the cart service as a capability rather than living in a
//! process-wide static.
//!
//! A session's entries live as long as the session is in use. Sessions left
//! idle past the configured TTL are dropped on the next write.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::models::{ProductId, QuickCacheEntry};

/// Matches a typical server-side session lifetime.
pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(120 * 60);

pub trait SessionCache: Send + Sync {
  /// Last write wins per product id.
  fn put(&self, session_id: &str, entry: QuickCacheEntry);
  fn forget_item(&self, session_id: &str, product_id: ProductId);
  /// Ordered by product id.
  fn entries(&self, session_id: &str) -> Vec<QuickCacheEntry>;
}

#[derive(Debug)]
struct SessionEntries {
  items: BTreeMap<ProductId, QuickCacheEntry>,
  last_seen: Instant,
}

impl SessionEntries {
  fn new() -> Self {
    Self {
      items: BTreeMap::new(),
      last_seen: Instant::now(),
    }
  }
}

#[derive(Debug)]
pub struct MemorySessionCache {
  sessions: RwLock<HashMap<String, SessionEntries>>,
  idle_ttl: Duration,
}

impl Default for MemorySessionCache {
  fn default() -> Self {
    Self::with_idle_ttl(DEFAULT_SESSION_IDLE_TTL)
  }
}

impl MemorySessionCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
    Self {
      sessions: RwLock::new(HashMap::new()),
      idle_ttl,
    }
  }

  fn is_live(&self, entries: &SessionEntries) -> bool {
    entries.last_seen.elapsed() < self.idle_ttl
  }
}

impl SessionCache for MemorySessionCache {
  fn put(&self, session_id: &str, entry: QuickCacheEntry) {
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|id, entries| id == session_id || self.is_live(entries));
    if sessions.len() < before {
      debug!(dropped = before - sessions.len(), "Dropped idle quick-cache sessions.");
    }

    let entries = sessions.entry(session_id.to_string()).or_insert_with(SessionEntries::new);
    if !self.is_live(entries) {
      entries.items.clear();
    }
    entries.last_seen = Instant::now();
    entries.items.insert(entry.id, entry);
  }

  fn forget_item(&self, session_id: &str, product_id: ProductId) {
    let mut sessions = self.sessions.write();
    if let Some(entries) = sessions.get_mut(session_id) {
      entries.items.remove(&product_id);
      entries.last_seen = Instant::now();
    }
  }

  fn entries(&self, session_id: &str) -> Vec<QuickCacheEntry> {
    let mut sessions = self.sessions.write();
    let live = match sessions.get(session_id) {
      Some(entries) => self.is_live(entries),
      None => return Vec::new(),
    };
    if !live {
      sessions.remove(session_id);
      return Vec::new();
    }
    sessions
      .get_mut(session_id)
      .map(|entries| {
        entries.last_seen = Instant::now();
        entries.items.values().cloned().collect()
      })
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  fn entry(id: ProductId, qty: i32) -> QuickCacheEntry {
    QuickCacheEntry {
      id,
      name: format!("product-{id}"),
      qty,
      price: Decimal::new(1999, 2),
    }
  }

  #[test]
  fn put_overwrites_instead_of_accumulating() {
    let cache = MemorySessionCache::new();
    cache.put("s1", entry(7, 3));
    cache.put("s1", entry(7, 2));

    let entries = cache.entries("s1");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].qty, 2);
  }

  #[test]
  fn sessions_are_isolated() {
    let cache = MemorySessionCache::new();
    cache.put("s1", entry(1, 1));
    cache.put("s2", entry(2, 1));

    assert_eq!(cache.entries("s1").iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
    cache.forget_item("s1", 1);
    assert!(cache.entries("s1").is_empty());
    assert_eq!(cache.entries("s2").len(), 1);
  }

  #[test]
  fn idle_sessions_are_dropped() {
    let cache = MemorySessionCache::with_idle_ttl(Duration::ZERO);
    cache.put("s1", entry(1, 2));
    cache.put("s2", entry(2, 1));

    assert!(cache.entries("s1").is_empty());
    assert!(!cache.sessions.read().contains_key("s1"));
  }

  #[test]
  fn forgetting_an_unknown_item_is_a_no_op() {
    let cache = MemorySessionCache::new();
    cache.forget_item("nobody", 42);
    assert!(cache.entries("nobody").is_empty());
  }
}
