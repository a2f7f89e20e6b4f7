//! Notifier port - 通知の送信（メール・プッシュなど）
//!
//! 失敗は `NotifyError` で返すだけ。再送・致命扱いはしない（呼び出し側がログに残す）。

use async_trait::async_trait;

use crate::domain::NotifyError;

/// Notifier は digest を 1 通送る
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}
