//! State - 1 回の実行（run）の状態
//!
//! # 状態遷移
//! - Start -> SourceReady -> Scanning -> Notifying -> Persisting -> Done
//! - Start -> Aborted（フィード取得の失敗）
//! - Scanning -> Aborted（最初の 1 件を取る前に一覧の取得が失敗した場合）
//!
//! スキャン途中の取得失敗は Aborted にしない。そこまでの一致は保持したまま
//! Notifying へ進む。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a single poll-and-notify run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Loading the SeenSet, applying reset / flush, acquiring the listing.
    Start,

    /// Listing acquired, nothing scanned yet.
    SourceReady,

    /// Walking the listing newest-first.
    Scanning,

    /// Dispatching the digest.
    Notifying,

    /// Saving the SeenSet.
    Persisting,

    /// Completed normally.
    Done,

    /// Source failure before any post was scanned.
    Aborted,
}

impl RunPhase {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Aborted)
    }

    /// Legal forward transitions.
    pub fn can_advance_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Start, SourceReady)
                | (Start, Aborted)
                | (SourceReady, Scanning)
                | (Scanning, Notifying)
                | (Scanning, Aborted)
                | (Notifying, Persisting)
                | (Persisting, Done)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunPhase::Start => "start",
            RunPhase::SourceReady => "source_ready",
            RunPhase::Scanning => "scanning",
            RunPhase::Notifying => "notifying",
            RunPhase::Persisting => "persisting",
            RunPhase::Done => "done",
            RunPhase::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invocation mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Scheduled run.
    #[default]
    Normal,

    /// Operator-forced run: the SeenSet is cleared first.
    ManualReset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::done(RunPhase::Done, true)]
    #[case::aborted(RunPhase::Aborted, true)]
    #[case::scanning(RunPhase::Scanning, false)]
    #[case::start(RunPhase::Start, false)]
    fn terminal_states(#[case] phase: RunPhase, #[case] terminal: bool) {
        assert_eq!(phase.is_terminal(), terminal);
    }

    #[test]
    fn happy_path_is_a_chain_of_legal_transitions() {
        let path = [
            RunPhase::Start,
            RunPhase::SourceReady,
            RunPhase::Scanning,
            RunPhase::Notifying,
            RunPhase::Persisting,
            RunPhase::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn cannot_abort_after_scanning() {
        assert!(RunPhase::Start.can_advance_to(RunPhase::Aborted));
        assert!(RunPhase::Scanning.can_advance_to(RunPhase::Aborted));
        assert!(!RunPhase::Notifying.can_advance_to(RunPhase::Aborted));
        assert!(!RunPhase::Persisting.can_advance_to(RunPhase::Aborted));
        assert!(!RunPhase::Done.can_advance_to(RunPhase::Start));
    }

    #[test]
    fn phase_serializes_as_snake_case() {
        let s = serde_json::to_string(&RunPhase::SourceReady).unwrap();
        assert_eq!(s, "\"source_ready\"");
    }
}
