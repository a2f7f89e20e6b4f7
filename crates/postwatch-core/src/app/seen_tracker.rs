//! SeenTracker - SeenSet の読み込み・flush・追加・保存・リセット
//!
//! # 失敗時の方針
//! - 読み込み失敗（欠落・破損）→ 空の SeenSet で続行。呼び出し側には失敗させない
//! - タイムスタンプだけ壊れている → ids は残し、`last_flushed_at` を now で置き換え
//! - 保存失敗 → ログのみ。次回の実行で重複排除の履歴が一部失われるだけ

use std::sync::Arc;

use chrono::TimeDelta;
use tracing::{debug, info, warn};

use crate::domain::{PostId, SeenRecord, SeenSet};
use crate::ports::{Clock, SeenStore};

pub struct SeenTracker {
    store: Arc<dyn SeenStore>,
    clock: Arc<dyn Clock>,
    cap: usize,
}

impl SeenTracker {
    pub fn new(store: Arc<dyn SeenStore>, clock: Arc<dyn Clock>, cap: usize) -> Self {
        Self { store, clock, cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Read persisted state. Never fails; degraded paths are logged.
    pub fn load(&self) -> SeenSet {
        let now = self.clock.now();
        let record = match self.store.load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(phase = "loading", "no seen state yet, starting fresh");
                return SeenSet::fresh(now);
            }
            Err(e) => {
                warn!(phase = "loading", error = %e, "seen state unreadable, starting fresh");
                return SeenSet::fresh(now);
            }
        };

        let last_flushed_at = record.parse_last_flushed().unwrap_or_else(|| {
            warn!(
                phase = "loading",
                raw = %record.last_flushed_at,
                "malformed lastFlushedAt, restarting the flush window now"
            );
            now
        });
        let stored = record.ids.len();
        let set = SeenSet::from_parts(last_flushed_at, record.ids, self.cap);
        if set.len() != stored {
            warn!(
                phase = "loading",
                stored,
                kept = set.len(),
                cap = self.cap,
                "seen state exceeded cap or held duplicates, normalized"
            );
        }
        debug!(phase = "loading", ids = set.len(), last_flushed_at = %set.last_flushed_at(), "seen state loaded");
        set
    }

    /// Wipe `set` if its window is older than `interval`; persists immediately.
    ///
    /// Returns `true` if a flush happened.
    pub fn flush_if_due(&self, set: &mut SeenSet, interval: TimeDelta) -> bool {
        let now = self.clock.now();
        if !set.is_flush_due(now, interval) {
            return false;
        }
        info!(
            phase = "flushing",
            dropped = set.len(),
            last_flushed_at = %set.last_flushed_at(),
            "flush interval elapsed, clearing seen state"
        );
        *set = SeenSet::fresh(now);
        self.save(set);
        true
    }

    /// Append `id` (FIFO eviction down to the cap).
    pub fn mark_seen(&self, set: &mut SeenSet, id: PostId) -> bool {
        set.mark_seen(id, self.cap)
    }

    /// Best-effort save. Returns whether it succeeded.
    pub fn save(&self, set: &SeenSet) -> bool {
        match self.store.save(&SeenRecord::from(set)) {
            Ok(()) => {
                debug!(phase = "persisting", ids = set.len(), "seen state saved");
                true
            }
            Err(e) => {
                warn!(phase = "persisting", error = %e, "failed to save seen state");
                false
            }
        }
    }

    /// Operator reset: a fresh set, persisted right away.
    pub fn reset(&self) -> SeenSet {
        let fresh = SeenSet::fresh(self.clock.now());
        info!(phase = "loading", "seen state reset by operator");
        self.save(&fresh);
        fresh
    }
}
