//! WatcherBuilder - Watcher の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に設定を検証し、Roster をコンパイルする
//! - ポートの差し込み漏れは BuildError::MissingPort
//! - 実行が始まってから設定ミスに気づくことはない

use std::sync::Arc;

use tracing::warn;

use super::seen_tracker::SeenTracker;
use super::watcher::Watcher;
use crate::config::WatchConfig;
use crate::domain::ConfigError;
use crate::ports::{Clock, Notifier, PostSource, SeenStore, SystemClock};

/// WatcherBuilder は Watcher を構築
///
/// # 使用例
/// ```ignore
/// let watcher = WatcherBuilder::new(config)
///     .source(Arc::new(JsonFilePostSource::new("posts.json")))
///     .notifier(Arc::new(my_notifier))
///     .store(Arc::new(JsonFileSeenStore::new("seen.json")))
///     .build()?;
/// let report = watcher.run_once().await?;
/// ```
pub struct WatcherBuilder {
    config: WatchConfig,
    source: Option<Arc<dyn PostSource>>,
    notifier: Option<Arc<dyn Notifier>>,
    store: Option<Arc<dyn SeenStore>>,
    clock: Arc<dyn Clock>,
}

/// BuildError は Watcher 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no {0} was provided to the builder")]
    MissingPort(&'static str),
}

impl WatcherBuilder {
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            source: None,
            notifier: None,
            store: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn source(mut self, source: Arc<dyn PostSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn store(mut self, store: Arc<dyn SeenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 既定は SystemClock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<Watcher, BuildError> {
        self.config.validate()?;
        let filter = self.config.match_filter()?;

        let source = self.source.ok_or(BuildError::MissingPort("post source"))?;
        let notifier = self.notifier.ok_or(BuildError::MissingPort("notifier"))?;
        let store = self.store.ok_or(BuildError::MissingPort("seen store"))?;

        if self.config.seen_cap < self.config.poll_window {
            // 古い一致が cap から押し出されると、次の実行で再通知される
            warn!(
                seen_cap = self.config.seen_cap,
                poll_window = self.config.poll_window,
                "seenCap is smaller than pollWindow; evicted matches may be notified again"
            );
        }
        if filter.roster().is_empty() {
            warn!("roster is empty; no post will ever match");
        }

        Ok(Watcher {
            source_id: self.config.source(),
            filter,
            poll_window: self.config.poll_window,
            flush_interval: self.config.flush_interval(),
            subject_prefix: self.config.subject_prefix.clone(),
            default_mode: self.config.run_mode(),
            tracker: SeenTracker::new(store, self.clock, self.config.seen_cap),
            source,
            notifier,
        })
    }
}
