//! Domain identifiers.
//!
//! # PostId
//! フィードが払い出す投稿 ID（例: Reddit の `t3_xxxxx` の `xxxxx` 部分）。
//! 中身は不透明な文字列として扱い、比較は完全一致のみ。
//!
//! ## なぜ newtype にするのか？
//! - `SeenSet` に入るのは投稿 ID だけ（タイトルや URL を誤って入れられない）
//! - 空文字列の ID は `CandidatePost` 側で弾く

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a post, stable across polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 空白だけの ID も空とみなす
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a feed (subreddit name, board slug, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
