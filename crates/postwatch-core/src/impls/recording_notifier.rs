//! RecordingNotifier - 送信内容を記録するだけの Notifier（テスト用）

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::NotifyError;
use crate::ports::Notifier;

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail_with: Option<NotifyError>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records the attempt and then fails.
    pub fn failing(error: NotifyError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    /// All `(subject, body)` pairs passed to `send`, including failed ones.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((subject.to_string(), body.to_string()));
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}
