//! InMemorySeenStore - テスト・開発用の状態置き場
//!
//! 生の JSON 文字列を保持するので、壊れた内容や旧形式をそのまま仕込める。

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::domain::{SeenRecord, StoreError};
use crate::ports::SeenStore;

#[derive(Debug, Default)]
pub struct InMemorySeenStore {
    raw: Mutex<Option<String>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `raw` as the persisted content (need not be valid JSON).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::new();
        *store.lock() = Some(raw.into());
        store
    }

    /// Make every subsequent `save()` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Decoded current record, if any and valid.
    pub fn record(&self) -> Option<SeenRecord> {
        self.raw().and_then(|s| serde_json::from_str(&s).ok())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.raw.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SeenStore for InMemorySeenStore {
    fn load(&self) -> Result<Option<SeenRecord>, StoreError> {
        match self.lock().as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    fn save(&self, record: &SeenRecord) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Other("save disabled".to_string()));
        }
        let json = serde_json::to_string(record).map_err(|e| StoreError::Other(e.to_string()))?;
        *self.lock() = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostId;

    #[test]
    fn empty_store_loads_none() {
        let store = InMemorySeenStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_content_is_reported() {
        let store = InMemorySeenStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn save_then_load() {
        let store = InMemorySeenStore::new();
        let record = SeenRecord {
            last_flushed_at: "2024-01-01T00:00:00Z".into(),
            ids: vec![PostId::new("a")],
        };
        store.save(&record).unwrap();
        assert_eq!(store.load().unwrap(), Some(record));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn failing_saves_do_not_touch_content() {
        let store = InMemorySeenStore::with_raw("keep");
        store.fail_saves(true);
        let record = SeenRecord {
            last_flushed_at: "2024-01-01T00:00:00Z".into(),
            ids: vec![],
        };
        assert!(store.save(&record).is_err());
        assert_eq!(store.raw().as_deref(), Some("keep"));
        assert_eq!(store.save_count(), 0);
    }
}
