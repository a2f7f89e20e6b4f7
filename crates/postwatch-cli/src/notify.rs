//! CLI 側の Notifier 実装
//!
//! - **StdoutNotifier**: digest を標準出力に書く（既定）
//! - **CommandNotifier**: `sh -c <cmd>` に本文を stdin で渡す。件名は環境変数
//!   `POSTWATCH_SUBJECT`。メール送信などはこのコマンド側で行う

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use postwatch_core::domain::NotifyError;
use postwatch_core::ports::Notifier;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const SUBJECT_ENV: &str = "POSTWATCH_SUBJECT";

const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        println!("Subject: {subject}\n\n{body}");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: String,
    timeout: Duration,
}

impl CommandNotifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn deliver(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env(SUBJECT_ENV, subject)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| NotifyError::Transport(format!("spawn `{}`: {e}", self.command)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(body.as_bytes())
                .await
                .map_err(|e| NotifyError::Transport(format!("write body: {e}")))?;
            // stdin を閉じないとコマンドが EOF を待ち続ける
            drop(stdin);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| NotifyError::Transport(format!("wait `{}`: {e}", self.command)))?;
        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected(format!(
                "`{}` exited with {status}",
                self.command
            )))
        }
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        match tokio::time::timeout(self.timeout, self.deliver(subject, body)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Transport(format!(
                "`{}` did not finish within {:?}",
                self.command, self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn command_receives_subject_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mail.txt");
        let cmd = format!(
            "{{ printf '%s\\n' \"${SUBJECT_ENV}\"; cat; }} > '{}'",
            out.display()
        );

        CommandNotifier::new(cmd)
            .send("[postwatch] 1 new match in GameSale", "Zelda\nhttps://x")
            .await
            .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "[postwatch] 1 new match in GameSale\nZelda\nhttps://x");
    }

    #[tokio::test]
    async fn failing_command_is_rejected() {
        let err = CommandNotifier::new("cat > /dev/null; exit 3")
            .send("s", "b")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Rejected(_)));
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let err = CommandNotifier::new("sleep 5")
            .with_timeout(Duration::from_millis(100))
            .send("s", "b")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
