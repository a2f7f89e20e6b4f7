//! Errors - エラー型と分類
//!
//! # 分類
//! - **実行ローカルで回復**: 状態ファイルの欠落・破損、タイムスタンプ不正、
//!   投稿単位の不正データ、通知失敗 → ログを出して既定値で続行
//! - **実行にとって致命的**: フィード取得（認証・接続）の失敗 → `RunError::Aborted`
//!
//! どのエラーも、どのフェーズで起きたかをログに残す（`RunPhase` / `phase` フィールド）。

use thiserror::Error;

use super::ids::PostId;
use super::state::RunPhase;

/// Failure reported by a `PostSource`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("timed out: {0}")]
    Timeout(String),

    /// A single post could not be decoded; the rest of the listing is fine.
    #[error("malformed post{}: {reason}", .id.as_ref().map(|id| format!(" {id}")).unwrap_or_default())]
    MalformedPost { id: Option<PostId>, reason: String },
}

impl SourceError {
    /// Errors that only spoil one post. The scan skips it and continues.
    pub fn is_per_post(&self) -> bool {
        matches!(self, SourceError::MalformedPost { .. })
    }
}

/// Failure reported by a `Notifier`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification rejected: {0}")]
    Rejected(String),

    #[error("notification transport failed: {0}")]
    Transport(String),
}

/// Failure reported by a `SeenStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state is corrupt: {0}")]
    Corrupt(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

/// Invalid configuration, detected before any run starts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("roster phrase must not be empty")]
    EmptyPhrase,

    #[error("roster phrase {phrase:?} cannot be compiled: {reason}")]
    InvalidPhrase { phrase: String, reason: String },

    #[error("gate keyword must not be empty")]
    EmptyGateKeyword,

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Why a run did not reach `Done`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("run aborted during {phase}: {source}")]
    Aborted {
        phase: RunPhase,
        #[source]
        source: SourceError,
    },
}
