//! RunReport: what one run did, for the invoker and for logs.
//!
//! Serializable so the CLI can print it as JSON. Nothing here drives control
//! flow; the watcher fills it in as it goes.

use serde::{Deserialize, Serialize};

use super::digest::MatchResult;
use super::state::{RunMode, RunPhase};

/// Result of the notifying phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum NotifyOutcome {
    /// Nothing matched, so nothing was sent.
    Skipped,

    /// The digest was handed to the notifier.
    Sent,

    /// The notifier failed. Logged, never retried within the run.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub phase: RunPhase,

    /// Posts pulled from the source (including seen and malformed ones).
    pub scanned: usize,

    /// Posts skipped because their id was already in the SeenSet.
    pub already_seen: usize,

    /// Posts skipped because the source could not decode them.
    pub malformed: usize,

    /// The listing failed part-way; `matches` holds what was found before that.
    pub scan_interrupted: bool,

    /// The SeenSet was cleared by the time-based flush this run.
    pub flushed: bool,

    /// The SeenSet was cleared by an operator reset this run.
    pub reset: bool,

    pub matches: Vec<MatchResult>,
    pub notification: NotifyOutcome,

    /// Whether the final save succeeded.
    pub saved: bool,
}

impl RunReport {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            phase: RunPhase::Start,
            scanned: 0,
            already_seen: 0,
            malformed: 0,
            scan_interrupted: false,
            flushed: false,
            reset: false,
            matches: Vec::new(),
            notification: NotifyOutcome::Skipped,
            saved: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == RunPhase::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_outcome_is_tagged() {
        let v = serde_json::to_value(NotifyOutcome::Failed("smtp down".into())).unwrap();
        assert_eq!(v["status"], "failed");
        assert_eq!(v["detail"], "smtp down");

        let v = serde_json::to_value(NotifyOutcome::Sent).unwrap();
        assert_eq!(v["status"], "sent");
    }

    #[test]
    fn new_report_starts_at_start() {
        let r = RunReport::new(RunMode::Normal);
        assert_eq!(r.phase, RunPhase::Start);
        assert!(!r.is_done());
        assert_eq!(r.notification, NotifyOutcome::Skipped);
    }
}
