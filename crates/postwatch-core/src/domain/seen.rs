//! SeenSet - 処理済み投稿 ID の有界・時間窓つき集合
//!
//! # 不変条件
//! - `ids` に重複はない
//! - 実行と実行の間（永続化時点）では `ids.len() <= cap`
//! - `ids` の並びは追加順（末尾ほど新しい）
//!
//! # 追い出し方針
//! 追加順の FIFO。参照で順位は変わらない（LRU ではない）。
//! cap は 1 回のポーリング件数以上にしておかないと、フィードの並びが揺れたときに
//! 既出の投稿が再び「新着」として扱われる。

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PostId;

/// Bounded, time-windowed record of already-processed post ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenSet {
    last_flushed_at: DateTime<Utc>,
    ids: Vec<PostId>,
}

impl SeenSet {
    /// An empty set whose flush window starts at `now`.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            last_flushed_at: now,
            ids: Vec::new(),
        }
    }

    /// Rebuild a set from persisted parts, restoring the invariants.
    ///
    /// Duplicates keep their first position; if more than `cap` ids remain,
    /// only the newest `cap` are kept.
    pub fn from_parts(last_flushed_at: DateTime<Utc>, ids: Vec<PostId>, cap: usize) -> Self {
        let mut set = Self::fresh(last_flushed_at);
        for id in ids {
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set.truncate_to(cap);
        set
    }

    pub fn last_flushed_at(&self) -> DateTime<Utc> {
        self.last_flushed_at
    }

    pub fn ids(&self) -> &[PostId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.ids.iter().any(|seen| seen == id)
    }

    /// `now - last_flushed_at > interval`（ちょうど等しい場合はまだ flush しない）
    pub fn is_flush_due(&self, now: DateTime<Utc>, interval: TimeDelta) -> bool {
        now.signed_duration_since(self.last_flushed_at) > interval
    }

    /// Append `id` unless already present, then evict from the front down to `cap`.
    ///
    /// Returns `true` if the id was newly added.
    pub fn mark_seen(&mut self, id: PostId, cap: usize) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        self.truncate_to(cap);
        true
    }

    fn truncate_to(&mut self, cap: usize) {
        if self.ids.len() > cap {
            let excess = self.ids.len() - cap;
            self.ids.drain(..excess);
        }
    }
}

/// On-disk shape of a `SeenSet`.
///
/// Canonical form is `{"lastFlushedAt": "<RFC 3339>", "ids": [...]}`.
/// Files written by the earlier bot used `last_flushed` with Python's
/// `str(datetime)` format; both are accepted on read. When several timestamp
/// keys are present, `lastFlushedAt` wins, then `last_flushed_at`, then
/// `last_flushed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSeenRecord")]
pub struct SeenRecord {
    pub last_flushed_at: String,
    pub ids: Vec<PostId>,
}

/// 読み込み専用の形。旧キーが新キーと同居していても失敗させない
#[derive(Deserialize)]
struct RawSeenRecord {
    #[serde(rename = "lastFlushedAt")]
    canonical: Option<String>,
    #[serde(rename = "last_flushed_at")]
    snake: Option<String>,
    #[serde(rename = "last_flushed")]
    legacy: Option<String>,
    ids: Vec<PostId>,
}

impl TryFrom<RawSeenRecord> for SeenRecord {
    type Error = &'static str;

    fn try_from(raw: RawSeenRecord) -> Result<Self, Self::Error> {
        let last_flushed_at = raw
            .canonical
            .or(raw.snake)
            .or(raw.legacy)
            .ok_or("missing field `lastFlushedAt`")?;
        Ok(Self {
            last_flushed_at,
            ids: raw.ids,
        })
    }
}

impl SeenRecord {
    /// Parse `last_flushed_at`. `None` means the timestamp is malformed.
    ///
    /// Naive timestamps (no offset) are taken as UTC.
    pub fn parse_last_flushed(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_flushed_at.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        [
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
        ]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
    }
}

impl From<&SeenSet> for SeenRecord {
    fn from(set: &SeenSet) -> Self {
        Self {
            last_flushed_at: set
                .last_flushed_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            ids: set.ids.clone(),
        }
    }
}
