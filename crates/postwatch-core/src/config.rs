//! WatchConfig - 1 つの監視対象（フィード + Roster）の設定
//!
//! 設定は実行開始時に 1 回読み、以後は不変の値として Watcher に渡す。
//! プロセス全体のグローバル状態にはしない（同じプロセスで複数のフィードを
//! 独立に回せるように）。
//!
//! ```json
//! {
//!   "sourceId": "GameSale",
//!   "roster": ["elden ring", "god of war", "witcher 3"],
//!   "gateKeyword": "switch",
//!   "pollWindow": 25,
//!   "seenCap": 25,
//!   "flushIntervalSecs": 172800
//! }
//! ```

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, GateKeyword, MatchFilter, Roster, RunMode, SourceId};

pub const DEFAULT_POLL_WINDOW: usize = 25;
pub const DEFAULT_SEEN_CAP: usize = 25;
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 2 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Feed to poll (subreddit name for the Reddit source).
    pub source_id: String,

    /// Ordered phrases; the first one that matches labels the post.
    pub roster: Vec<String>,

    /// Token that must appear in the post before the roster is consulted.
    pub gate_keyword: Option<String>,

    /// Max posts fetched per run.
    pub poll_window: usize,

    /// Max ids kept in the SeenSet. Should be at least `poll_window`.
    pub seen_cap: usize,

    /// SeenSet is wiped when it is older than this.
    pub flush_interval_secs: u64,

    /// Clear the SeenSet before the next run.
    pub manual_reset: bool,

    /// Prepended to the digest subject.
    pub subject_prefix: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            source_id: "GameSale".to_string(),
            roster: Vec::new(),
            gate_keyword: None,
            poll_window: DEFAULT_POLL_WINDOW,
            seen_cap: DEFAULT_SEEN_CAP,
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            manual_reset: false,
            subject_prefix: "[postwatch]".to_string(),
        }
    }
}

impl WatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    /// Check everything that can be checked without touching ports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_window == 0 {
            return Err(ConfigError::NotPositive {
                field: "pollWindow",
            });
        }
        if self.seen_cap == 0 {
            return Err(ConfigError::NotPositive { field: "seenCap" });
        }
        if self.flush_interval_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "flushIntervalSecs",
            });
        }
        self.match_filter().map(|_| ())
    }

    /// Compile roster + gate. Fails on blank phrases or a blank gate keyword.
    pub fn match_filter(&self) -> Result<MatchFilter, ConfigError> {
        let roster = Roster::new(self.roster.iter().cloned())?;
        let gate = self
            .gate_keyword
            .as_deref()
            .map(GateKeyword::new)
            .transpose()?;
        Ok(MatchFilter::new(roster, gate))
    }

    pub fn source(&self) -> SourceId {
        SourceId::new(self.source_id.clone())
    }

    pub fn flush_interval(&self) -> TimeDelta {
        i64::try_from(self.flush_interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn run_mode(&self) -> RunMode {
        if self.manual_reset {
            RunMode::ManualReset
        } else {
            RunMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_poll_twenty_five_and_flush_every_two_days() {
        let c = WatchConfig::default();
        assert_eq!(c.poll_window, 25);
        assert_eq!(c.seen_cap, 25);
        assert_eq!(c.flush_interval(), TimeDelta::days(2));
        assert_eq!(c.run_mode(), RunMode::Normal);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "roster": ["zelda"], "gateKeyword": "switch" }"#;
        let c = WatchConfig::from_json_str(json).unwrap();
        assert_eq!(c.roster, vec!["zelda".to_string()]);
        assert_eq!(c.gate_keyword.as_deref(), Some("switch"));
        assert_eq!(c.poll_window, DEFAULT_POLL_WINDOW);
        c.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{ "rooster": ["zelda"] }"#;
        assert!(matches!(
            WatchConfig::from_json_str(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_poll_window_is_invalid() {
        let c = WatchConfig {
            poll_window: 0,
            ..WatchConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::NotPositive {
                field: "pollWindow"
            })
        );
    }

    #[test]
    fn blank_phrase_is_invalid() {
        let c = WatchConfig {
            roster: vec!["zelda".into(), " ".into()],
            ..WatchConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::EmptyPhrase));
    }

    #[test]
    fn manual_reset_selects_mode() {
        let c = WatchConfig {
            manual_reset: true,
            ..WatchConfig::default()
        };
        assert_eq!(c.run_mode(), RunMode::ManualReset);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.json");
        std::fs::write(&path, r#"{ "sourceId": "NintendoSwitchDeals", "seenCap": 100 }"#).unwrap();
        let c = WatchConfig::from_json_file(&path).unwrap();
        assert_eq!(c.source().as_str(), "NintendoSwitchDeals");
        assert_eq!(c.seen_cap, 100);
    }
}
