//! Agent signer key cache.
//!
//! Agents hand the router a signer key for a wallet before asking it to
//! claim on that wallet's behalf. Keys live in process memory only, expire
//! after a fixed TTL, and can be dropped early with an explicit invalidate.
//! Expired entries are evicted when read, when any key is registered, and by
//! the periodic sweep from [`spawn_purge_task`].

use mintmatrix_domain::Address;
use mintmatrix_royalty::SignerKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().map(|o| *o).unwrap_or_default();
        self.start + offset
    }
}

/// Store of signer keys by wallet
pub trait KeyStore: Send + Sync {
    /// Live key for `wallet`; expired entries are evicted and yield `None`
    fn get(&self, wallet: &Address) -> Option<SignerKey>;

    /// Cache `key` for `wallet`, replacing any previous key; returns the TTL
    fn insert(&self, wallet: Address, key: SignerKey) -> Duration;

    /// Drop the key for `wallet`; true if one was present and live
    fn invalidate(&self, wallet: &Address) -> bool;

    /// Evict every expired entry; returns how many were removed
    fn purge_expired(&self) -> usize;
}

struct Entry {
    key: SignerKey,
    expires_at: Instant,
}

/// In-process [`KeyStore`] with a fixed time-to-live
pub struct TtlKeyStore {
    entries: RwLock<HashMap<Address, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TtlKeyStore {
    /// Store on the wall clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Store on a custom clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Entries held, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when no entries are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyStore for TtlKeyStore {
    fn get(&self, wallet: &Address) -> Option<SignerKey> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().ok()?;
            match entries.get(wallet) {
                Some(entry) if entry.expires_at > now => return Some(entry.key.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        if let Ok(mut entries) = self.entries.write() {
            if entries.get(wallet).is_some_and(|e| e.expires_at <= now) {
                entries.remove(wallet);
                tracing::debug!(wallet = %wallet, "Evicted expired agent key");
            }
        }
        None
    }

    fn insert(&self, wallet: Address, key: SignerKey) -> Duration {
        let now = self.clock.now();
        if let Ok(mut entries) = self.entries.write() {
            // drop expired wallets on every registration
            entries.retain(|_, e| e.expires_at > now);
            tracing::info!(wallet = %wallet, ttl_secs = self.ttl.as_secs(), "Cached agent key");
            entries.insert(
                wallet,
                Entry {
                    key,
                    expires_at: now + self.ttl,
                },
            );
        }
        self.ttl
    }

    fn invalidate(&self, wallet: &Address) -> bool {
        let now = self.clock.now();
        let removed = self
            .entries
            .write()
            .ok()
            .and_then(|mut entries| entries.remove(wallet));
        if removed.is_some() {
            tracing::info!(wallet = %wallet, "Invalidated agent key");
        }
        removed.is_some_and(|e| e.expires_at > now)
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired agent keys");
        }
        purged
    }
}

/// Spawn a task that purges expired keys every `every`
///
/// Runs until the returned handle is aborted or the runtime shuts down.
pub fn spawn_purge_task(keys: Arc<dyn KeyStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            keys.purge_expired();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(n: u8) -> Address {
        Address::parse(&format!("{:040x}", n)).unwrap()
    }

    fn key(s: &str) -> SignerKey {
        SignerKey::new(s).unwrap()
    }

    fn store() -> (ManualClock, TtlKeyStore) {
        let clock = ManualClock::new();
        let store = TtlKeyStore::with_clock(Duration::from_secs(900), Arc::new(clock.clone()));
        (clock, store)
    }

    #[test]
    fn test_get_before_and_after_ttl() {
        let (clock, store) = store();
        store.insert(wallet(1), key("k1"));

        clock.advance(Duration::from_secs(899));
        assert_eq!(store.get(&wallet(1)), Some(key("k1")));

        clock.advance(Duration::from_secs(1));
        assert_eq!(store.get(&wallet(1)), None);
        // evicted on read
        assert!(store.is_empty());
    }

    #[test]
    fn test_lookup_ignores_address_case() {
        let (_, store) = store();
        let lower = Address::parse("0x00000000000000000000000000000000000000ab").unwrap();
        let upper = Address::parse("0x00000000000000000000000000000000000000AB").unwrap();
        store.insert(lower, key("k"));
        assert!(store.get(&upper).is_some());
    }

    #[test]
    fn test_reinsert_refreshes_ttl() {
        let (clock, store) = store();
        store.insert(wallet(1), key("old"));
        clock.advance(Duration::from_secs(600));
        store.insert(wallet(1), key("new"));
        clock.advance(Duration::from_secs(600));

        assert_eq!(store.get(&wallet(1)), Some(key("new")));
    }

    #[test]
    fn test_invalidate() {
        let (_, store) = store();
        store.insert(wallet(1), key("k"));

        assert!(store.invalidate(&wallet(1)));
        assert!(store.get(&wallet(1)).is_none());
        assert!(!store.invalidate(&wallet(1)));
    }

    #[test]
    fn test_insert_sweeps_abandoned_wallets() {
        let (clock, store) = store();
        for n in 0..200 {
            store.insert(wallet(n), key("k"));
        }
        clock.advance(Duration::from_secs(3600));

        store.insert(wallet(250), key("fresh"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&wallet(250)), Some(key("fresh")));
    }

    #[tokio::test]
    async fn test_purge_task_evicts_without_reads() {
        let (clock, store) = store();
        let store = Arc::new(store);
        for n in 0..100 {
            store.insert(wallet(n), key("k"));
        }
        clock.advance(Duration::from_secs(3600));

        let task = spawn_purge_task(store.clone(), Duration::from_millis(5));
        for _ in 0..100 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        task.abort();

        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let (clock, store) = store();
        store.insert(wallet(1), key("a"));
        clock.advance(Duration::from_secs(500));
        store.insert(wallet(2), key("b"));
        clock.advance(Duration::from_secs(500));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&wallet(2)).is_some());
    }
}
