//! Generation history store
//!
//! Persists completed generations newest first under a single key. Every
//! read-modify-write runs behind one mutex so a shared store never loses a
//! concurrent append. Persistence failures degrade to an empty history or a
//! skipped write and are only logged.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use jimeng_domain::{GenerationHistory, HistoryItem, NewHistoryItem};
use tracing::{debug, info, warn};

use crate::keys;
use crate::ports::{Clock, KeyValueStore};

const ID_PREFIX: &str = "h-";

/// History persistence over a key-value store.
#[derive(Debug)]
pub struct HistoryStore<S, C> {
    store: S,
    clock: C,
    lock: Mutex<()>,
}

impl<S: KeyValueStore, C: Clock> HistoryStore<S, C> {
    /// Creates a history store.
    #[must_use]
    pub const fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns every record, newest first.
    ///
    /// An absent, unreadable or corrupt log reads as empty.
    pub fn list(&self) -> Vec<HistoryItem> {
        let _guard = self.guard();
        self.load().into_items()
    }

    /// Returns a single record.
    pub fn get(&self, id: &str) -> Option<HistoryItem> {
        let _guard = self.guard();
        self.load().get(id).cloned()
    }

    /// Stores a new record at the front of the log and returns it.
    ///
    /// The record gets a fresh id and the clock's current time. If the log
    /// cannot be written the record is still returned.
    pub fn append(&self, item: NewHistoryItem) -> HistoryItem {
        let _guard = self.guard();
        let mut history = self.load();
        let id = self.next_id(&history);
        let stored = HistoryItem::from_new(item, id, self.clock.now_millis());

        history.prepend(stored.clone());
        self.persist(&history);
        info!(id = %stored.id, kind = %stored.kind, "history record added");
        stored
    }

    /// Removes every record whose id is in `ids` and returns what is left.
    ///
    /// Unknown ids are ignored. Nothing is written when nothing was removed.
    pub fn delete_many(&self, ids: &HashSet<String>) -> Vec<HistoryItem> {
        let _guard = self.guard();
        let mut history = self.load();
        if ids.is_empty() || history.is_empty() {
            return history.into_items();
        }

        let removed = history.remove_ids(ids);
        if removed > 0 {
            self.persist(&history);
            debug!(removed, remaining = history.len(), "history records deleted");
        }
        history.into_items()
    }

    /// Removes the whole log. The id counter is kept.
    pub fn clear(&self) {
        let _guard = self.guard();
        if let Err(e) = self.store.remove(keys::HISTORY) {
            warn!(error = %e, "failed to clear history");
        }
    }

    fn load(&self) -> GenerationHistory {
        let raw = match self.store.get(keys::HISTORY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return GenerationHistory::default(),
            Err(e) => {
                warn!(error = %e, "failed to read history");
                return GenerationHistory::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring corrupt history");
            GenerationHistory::default()
        })
    }

    fn persist(&self, history: &GenerationHistory) {
        let json = match serde_json::to_string(history) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode history");
                return;
            }
        };
        match self.store.set(keys::HISTORY, &json) {
            Ok(()) => debug!(len = history.len(), "history saved"),
            Err(e) => warn!(error = %e, "failed to save history"),
        }
    }

    fn next_id(&self, history: &GenerationHistory) -> String {
        let mut seq = match self.store.get(keys::HISTORY_SEQ) {
            Ok(value) => value.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "failed to read history counter");
                0
            }
        };

        let id = loop {
            seq = seq.saturating_add(1);
            let candidate = format!("{ID_PREFIX}{seq}");
            if !history.contains_id(&candidate) {
                break candidate;
            }
        };

        if let Err(e) = self.store.set(keys::HISTORY_SEQ, &seq.to_string()) {
            warn!(error = %e, "failed to save history counter");
        }
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, MemoryStore};
    use jimeng_domain::GenerationType;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    const NOW: i64 = 1_700_000_000_000;

    fn store() -> HistoryStore<MemoryStore, FixedClock> {
        HistoryStore::new(MemoryStore::new(), FixedClock::from_millis(NOW))
    }

    fn entry(prompt: &str) -> NewHistoryItem {
        NewHistoryItem::new(
            GenerationType::TextToImage,
            prompt,
            json!({ "prompt": prompt }),
            vec![format!("https://cdn.example/{prompt}.png")],
        )
    }

    fn ids(items: &[HistoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn append_prepends_with_fresh_id_and_clock_time() {
        let history = store();
        let first = history.append(entry("one"));
        let second = history.append(entry("two"));

        assert_eq!(first.timestamp, NOW);
        assert_eq!(first.thumbnail_url.as_deref(), Some("https://cdn.example/one.png"));
        assert_ne!(first.id, second.id);

        let items = history.list();
        assert_eq!(ids(&items), vec![second.id.as_str(), first.id.as_str()]);
        assert_eq!(items[1], first);
    }

    #[test]
    fn ids_skip_values_already_in_the_log() {
        let existing = json!([{
            "id": "h-1",
            "timestamp": NOW,
            "type": "video-generation",
            "prompt": "old",
            "params": {},
            "resultUrls": ["https://cdn.example/old.mp4"]
        }]);
        let history = HistoryStore::new(
            MemoryStore::with_entries([(keys::HISTORY, existing.to_string())]),
            FixedClock::from_millis(NOW),
        );

        let stored = history.append(entry("new"));
        assert_eq!(stored.id, "h-2");
        assert_eq!(ids(&history.list()), vec!["h-2", "h-1"]);
    }

    #[test]
    fn corrupt_log_reads_as_empty() {
        let history = HistoryStore::new(
            MemoryStore::with_entries([(keys::HISTORY, "[{broken")]),
            FixedClock::from_millis(NOW),
        );
        assert!(history.list().is_empty());

        history.append(entry("fresh"));
        assert_eq!(history.list().len(), 1);
    }

    #[test]
    fn legacy_records_keep_their_ids() {
        let existing = json!([{
            "id": "lq3k9x2abc",
            "timestamp": NOW - 1_000,
            "type": "text-to-image",
            "prompt": "legacy",
            "params": { "model": "jimeng-4.0" },
            "resultUrls": ["u1"],
            "thumbnailUrl": "u1"
        }]);
        let history = HistoryStore::new(
            MemoryStore::with_entries([(keys::HISTORY, existing.to_string())]),
            FixedClock::from_millis(NOW),
        );

        let item = history.get("lq3k9x2abc").unwrap();
        assert_eq!(item.prompt, "legacy");
        assert_eq!(item.thumbnail_url.as_deref(), Some("u1"));
    }

    #[test]
    fn delete_many_removes_only_listed_ids() {
        let history = store();
        let a = history.append(entry("a"));
        let b = history.append(entry("b"));
        let c = history.append(entry("c"));

        let ids_to_delete: HashSet<String> =
            [a.id.clone(), c.id.clone(), "missing".to_string()].into();
        let remaining = history.delete_many(&ids_to_delete);

        assert_eq!(ids(&remaining), vec![b.id.as_str()]);
        assert_eq!(history.list(), remaining);
    }

    #[test]
    fn delete_many_all_ids_empties_history() {
        let history = store();
        let all: HashSet<String> = ["a", "b", "c"]
            .iter()
            .map(|p| history.append(entry(p)).id)
            .collect();

        let remaining = history.delete_many(&all);
        assert!(remaining.is_empty());
        assert!(history.list().is_empty());
    }

    #[test]
    fn delete_many_with_empty_set_writes_nothing() {
        let backing = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(Arc::clone(&backing), FixedClock::from_millis(NOW));
        history.append(entry("a"));
        history.append(entry("b"));
        let before_raw = backing.get(keys::HISTORY).unwrap();
        let before = history.list();

        let remaining = history.delete_many(&HashSet::new());
        assert_eq!(remaining, before);
        assert_eq!(ids(&remaining), vec!["h-2", "h-1"]);
        assert_eq!(backing.get(keys::HISTORY).unwrap(), before_raw);
        assert_eq!(history.list(), before);
    }

    #[test]
    fn float_params_survive_reload_unchanged() {
        let history = store();
        let stored = history.append(NewHistoryItem::new(
            GenerationType::ImageToImage,
            "strength",
            json!({ "sampleStrength": 0.994_141_423_413_993_5 }),
            vec!["https://cdn.example/s.png".to_string()],
        ));

        let items = history.list();
        assert_eq!(items[0], stored);
        assert_eq!(items[0].params["sampleStrength"].as_f64(), Some(0.994_141_423_413_993_5));
    }

    #[test]
    fn clear_removes_log_but_not_counter() {
        let backing = Arc::new(MemoryStore::new());
        let history = HistoryStore::new(Arc::clone(&backing), FixedClock::from_millis(NOW));
        history.append(entry("a"));
        history.clear();

        assert!(history.list().is_empty());
        assert_eq!(backing.get(keys::HISTORY).unwrap(), None);
        assert_eq!(history.append(entry("b")).id, "h-2");
    }

    #[test]
    fn write_failure_still_returns_record() {
        let history = HistoryStore::new(MemoryStore::with_quota(16), FixedClock::from_millis(NOW));
        let stored = history.append(entry("too big to persist"));

        assert_eq!(stored.prompt, "too big to persist");
        assert!(history.list().is_empty());
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let history = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let history = Arc::clone(&history);
                thread::spawn(move || history.append(entry(&format!("p{n}"))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let items = history.list();
        assert_eq!(items.len(), 8);
        let unique: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(unique.len(), 8);
    }
}
