//! postwatch - listing feed watcher
//!
//! 1 回の起動で 1 回だけ poll-and-notify を行う。定期実行は cron などの外側に任せる。

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postwatch_core::domain::{CandidatePost, SeenSet};
use postwatch_core::impls::{JsonFilePostSource, JsonFileSeenStore};
use postwatch_core::app::SeenTracker;
use postwatch_core::ports::{Notifier, SystemClock};
use postwatch_core::{WatchConfig, WatcherBuilder};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod lock;
mod notify;

use lock::RunLock;
use notify::{CommandNotifier, StdoutNotifier};

const EXIT_ABORTED: u8 = 2;

/// How an invocation ended, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// 0: the run completed (zero matches included).
    Done,

    /// 2: the source could not be acquired, or another run holds the lock.
    Aborted,

    /// 1: configuration or usage error.
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::Aborted => ExitCode::from(EXIT_ABORTED),
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

/// postwatch - notify once per run about new posts matching a roster
#[derive(Parser, Debug)]
#[command(name = "postwatch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the watch configuration (JSON)
    #[arg(short, long, default_value = "postwatch.json")]
    config: PathBuf,

    /// Path to the seen-state file
    #[arg(short, long, default_value = "seen.json")]
    state: PathBuf,

    /// Log level (trace, debug, info, warn, error). Falls back to RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll once, notify about new matches, persist the seen set
    Run {
        /// Listing to scan (JSON array, newest first)
        #[arg(long)]
        posts: PathBuf,

        /// Clear the seen set before scanning
        #[arg(long)]
        reset: bool,

        /// Shell command that receives the digest body on stdin
        #[arg(long)]
        notify_command: Option<String>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear the seen set without running
    Reset,

    /// Show which roster phrase would match the given text
    Check {
        #[arg(long)]
        text: String,
    },
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // stdout は digest / JSON レポート用に空けておく
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> ExitCode {
    // clap は使い方の誤りを 2 で返すが、2 は中止した実行に使う
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.log_level.as_deref());

    execute(cli).into()
}

fn execute(cli: Cli) -> Outcome {
    match dispatch(cli) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e:#}");
            Outcome::Failed
        }
    }
}

fn dispatch(cli: Cli) -> Result<Outcome> {
    let config = WatchConfig::from_json_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Run {
            posts,
            reset,
            notify_command,
            json,
        } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start tokio runtime")?;
            runtime.block_on(run(config, &cli.state, posts, reset, notify_command, json))
        }
        Commands::Reset => reset_state(config, &cli.state),
        Commands::Check { text } => check(&config, &text),
    }
}

async fn run(
    mut config: WatchConfig,
    state: &Path,
    posts: PathBuf,
    reset: bool,
    notify_command: Option<String>,
    json: bool,
) -> Result<Outcome> {
    if reset {
        config.manual_reset = true;
    }
    let notifier: Arc<dyn Notifier> = match notify_command {
        Some(cmd) => Arc::new(CommandNotifier::new(cmd)),
        None => Arc::new(StdoutNotifier),
    };
    let watcher = WatcherBuilder::new(config)
        .source(Arc::new(JsonFilePostSource::new(posts)))
        .notifier(notifier)
        .store(Arc::new(JsonFileSeenStore::new(state)))
        .build()?;

    let Some(lock) = RunLock::try_acquire(state)
        .with_context(|| format!("locking {}", state.display()))?
    else {
        warn!(
            phase = "acquisition",
            lock = %RunLock::lock_path(state).display(),
            "another run holds the state lock, aborting"
        );
        return Ok(Outcome::Aborted);
    };
    debug!(lock = %lock.path().display(), "state lock acquired");

    match watcher.run_once().await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok(Outcome::Done)
        }
        Err(e) => {
            error!(error = %e, "run aborted");
            Ok(Outcome::Aborted)
        }
    }
}

fn reset_state(config: WatchConfig, state: &Path) -> Result<Outcome> {
    config.validate()?;
    let Some(_lock) = RunLock::try_acquire(state)
        .with_context(|| format!("locking {}", state.display()))?
    else {
        warn!("another run holds the state lock, not resetting");
        return Ok(Outcome::Aborted);
    };

    let tracker = SeenTracker::new(
        Arc::new(JsonFileSeenStore::new(state)),
        Arc::new(SystemClock),
        config.seen_cap,
    );
    let fresh: SeenSet = tracker.reset();
    info!(state = %state.display(), last_flushed_at = %fresh.last_flushed_at(), "seen state cleared");
    Ok(Outcome::Done)
}

fn check(config: &WatchConfig, text: &str) -> Result<Outcome> {
    let filter = config.match_filter()?;
    let post = CandidatePost::new("check", text, "");
    match filter.is_candidate(&post) {
        Some(entry) => println!("match: {}", entry.phrase()),
        None => println!("no match"),
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;

    fn config() -> WatchConfig {
        WatchConfig {
            roster: vec!["zelda".into()],
            ..WatchConfig::default()
        }
    }

    fn write_posts(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("posts.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn outcomes_map_to_exit_codes() {
        let code = |c: ExitCode| format!("{c:?}");
        assert_eq!(code(Outcome::Done.into()), code(ExitCode::from(0)));
        assert_eq!(code(Outcome::Aborted.into()), code(ExitCode::from(2)));
        assert_eq!(code(Outcome::Failed.into()), code(ExitCode::from(1)));
    }

    #[tokio::test]
    async fn empty_listing_is_done() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("seen.json");
        let posts = write_posts(dir.path(), "[]");

        let outcome = run(config(), &state, posts, false, None, false).await.unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert!(state.exists());
    }

    #[tokio::test]
    async fn missing_listing_is_aborted_without_state_write() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("seen.json");
        let posts = dir.path().join("nope.json");

        let outcome = run(config(), &state, posts, false, None, false).await.unwrap();

        assert_eq!(outcome, Outcome::Aborted);
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn held_lock_is_aborted_and_state_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("seen.json");
        let before = r#"{"lastFlushedAt":"2024-01-01T00:00:00.000Z","ids":["a"]}"#;
        fs::write(&state, before).unwrap();
        let posts = write_posts(
            dir.path(),
            r#"[{"id": "b", "title": "Zelda", "url": "https://b"}]"#,
        );

        let _held = RunLock::try_acquire(&state).unwrap().unwrap();
        let outcome = run(config(), &state, posts, true, None, false).await.unwrap();

        assert_eq!(outcome, Outcome::Aborted);
        assert_eq!(fs::read_to_string(&state).unwrap(), before);
    }

    #[test]
    fn reset_with_held_lock_is_aborted() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("seen.json");

        let _held = RunLock::try_acquire(&state).unwrap().unwrap();
        let outcome = reset_state(config(), &state).unwrap();

        assert_eq!(outcome, Outcome::Aborted);
        assert!(!state.exists());
    }

    #[test]
    fn invalid_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("postwatch.json");
        fs::write(&config_path, r#"{ "roster": ["zelda"], "pollWindow": 0 }"#).unwrap();
        let posts = write_posts(dir.path(), "[]");
        let state = dir.path().join("seen.json");

        let cli = Cli::try_parse_from(vec![
            OsString::from("postwatch"),
            "--config".into(),
            config_path.into_os_string(),
            "--state".into(),
            state.clone().into_os_string(),
            "run".into(),
            "--posts".into(),
            posts.into_os_string(),
        ])
        .unwrap();

        assert_eq!(execute(cli), Outcome::Failed);
        assert!(!state.exists());
    }

    #[test]
    fn unparsable_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("postwatch.json");
        fs::write(&config_path, "{ roster: ").unwrap();

        let cli = Cli::try_parse_from(vec![
            OsString::from("postwatch"),
            "--config".into(),
            config_path.into_os_string(),
            "check".into(),
            "--text".into(),
            "zelda".into(),
        ])
        .unwrap();

        assert_eq!(execute(cli), Outcome::Failed);
    }
}
