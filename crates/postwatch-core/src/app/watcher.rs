//! Watcher - 1 回分の poll-and-notify を実行する
//!
//! # フロー
//! 1. Start: SeenSet 読み込み（手動モードならリセット）→ flush 判定 →
//!    新しい順に最大 poll_window 件を取得。取得に失敗したら Aborted
//! 2. SourceReady: 取得済み、未スキャン
//! 3. Scanning: 既出はスキップ、MatchFilter で判定、一致したら記録して mark_seen
//! 4. Notifying: 一致があれば digest を 1 通だけ送る。失敗してもログのみ
//! 5. Persisting: 通知の成否に関係なく SeenSet を保存
//! 6. Done
//!
//! # 保証
//! - 通知は 1 実行につき最大 1 回
//! - SeenSet の保存は正常終了時に 1 回（flush / リセットがあればその分 +1）
//! - 取得失敗で中止した場合、スキャン由来の書き込みは一切しない

use std::sync::Arc;

use chrono::TimeDelta;
use tracing::{debug, error, info, warn};

use super::seen_tracker::SeenTracker;
use crate::domain::{
    Digest, MatchFilter, MatchResult, NotifyOutcome, RunError, RunMode, RunPhase, RunReport,
    SeenSet, SourceError, SourceId,
};
use crate::ports::{Notifier, PostCursor, PostSource};

/// Runs poll-and-notify passes for one configured feed.
///
/// Built by `WatcherBuilder`; all configuration is fixed at construction.
pub struct Watcher {
    pub(crate) source_id: SourceId,
    pub(crate) filter: MatchFilter,
    pub(crate) poll_window: usize,
    pub(crate) flush_interval: TimeDelta,
    pub(crate) subject_prefix: String,
    pub(crate) default_mode: RunMode,
    pub(crate) tracker: SeenTracker,
    pub(crate) source: Arc<dyn PostSource>,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl Watcher {
    pub fn filter(&self) -> &MatchFilter {
        &self.filter
    }

    pub fn tracker(&self) -> &SeenTracker {
        &self.tracker
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    /// Run once in the mode chosen by configuration (`manualReset`).
    pub async fn run_once(&self) -> Result<RunReport, RunError> {
        self.run(self.default_mode).await
    }

    /// Run one complete pass.
    ///
    /// `Err` only when the source could not be acquired; everything else is
    /// recovered locally and reflected in the report.
    pub async fn run(&self, mode: RunMode) -> Result<RunReport, RunError> {
        let mut report = RunReport::new(mode);
        info!(source = %self.source_id, ?mode, "run started");

        let mut seen = match mode {
            RunMode::ManualReset => {
                report.reset = true;
                self.tracker.reset()
            }
            RunMode::Normal => self.tracker.load(),
        };
        report.flushed = self.tracker.flush_if_due(&mut seen, self.flush_interval);

        let cursor = match self
            .source
            .fetch_recent(&self.source_id, self.poll_window)
            .await
        {
            Ok(cursor) => cursor,
            Err(e) => {
                error!(phase = "acquisition", source = %self.source_id, error = %e, "failed to acquire listing, aborting run");
                return Err(abort(&mut report, RunPhase::Start, e));
            }
        };
        advance(&mut report, RunPhase::SourceReady);

        advance(&mut report, RunPhase::Scanning);
        self.scan(cursor, &mut seen, &mut report).await?;

        advance(&mut report, RunPhase::Notifying);
        report.notification = self.notify(&report.matches).await;

        advance(&mut report, RunPhase::Persisting);
        report.saved = self.tracker.save(&seen);

        advance(&mut report, RunPhase::Done);
        info!(
            source = %self.source_id,
            scanned = report.scanned,
            matches = report.matches.len(),
            already_seen = report.already_seen,
            saved = report.saved,
            "run finished"
        );
        Ok(report)
    }

    async fn scan(
        &self,
        mut cursor: Box<dyn PostCursor>,
        seen: &mut SeenSet,
        report: &mut RunReport,
    ) -> Result<(), RunError> {
        while report.scanned < self.poll_window {
            let Some(item) = cursor.next_post().await else {
                break;
            };

            let post = match item {
                Ok(post) if !post.id.is_blank() => post,
                Ok(post) => {
                    report.scanned += 1;
                    report.malformed += 1;
                    warn!(phase = "scanning", title = %post.title, "post without id skipped");
                    continue;
                }
                Err(e) if e.is_per_post() => {
                    report.scanned += 1;
                    report.malformed += 1;
                    warn!(phase = "scanning", error = %e, "malformed post skipped");
                    continue;
                }
                Err(e) if report.scanned == 0 => {
                    // 1 件も取れていない = 一覧の取得自体に失敗している
                    error!(phase = "acquisition", source = %self.source_id, error = %e, "listing failed before the first post, aborting run");
                    return Err(abort(report, RunPhase::Scanning, e));
                }
                Err(e) => {
                    report.scan_interrupted = true;
                    warn!(
                        phase = "scanning",
                        error = %e,
                        scanned = report.scanned,
                        matches = report.matches.len(),
                        "listing failed mid-scan, keeping matches found so far"
                    );
                    break;
                }
            };
            report.scanned += 1;

            if seen.contains(&post.id) {
                report.already_seen += 1;
                debug!(phase = "scanning", post_id = %post.id, "already seen");
                continue;
            }

            let Some(entry) = self.filter.is_candidate(&post) else {
                continue;
            };
            info!(phase = "scanning", post_id = %post.id, phrase = entry.phrase(), title = %post.title, "match");
            report.matches.push(MatchResult {
                post_id: post.id.clone(),
                phrase: entry.phrase().to_string(),
                title: post.title,
                url: post.url,
            });
            self.tracker.mark_seen(seen, post.id);
        }
        Ok(())
    }

    async fn notify(&self, matches: &[MatchResult]) -> NotifyOutcome {
        let Some(digest) = Digest::compose(&self.subject_prefix, &self.source_id, matches) else {
            debug!(phase = "notifying", "no matches, nothing to send");
            return NotifyOutcome::Skipped;
        };
        match self.notifier.send(&digest.subject, &digest.body).await {
            Ok(()) => {
                info!(phase = "notifying", subject = %digest.subject, "digest sent");
                NotifyOutcome::Sent
            }
            Err(e) => {
                error!(phase = "notifying", error = %e, matches = matches.len(), "failed to send digest");
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}

fn advance(report: &mut RunReport, next: RunPhase) {
    debug_assert!(
        report.phase.can_advance_to(next),
        "illegal transition {} -> {}",
        report.phase,
        next
    );
    debug!(from = %report.phase, to = %next, "phase");
    report.phase = next;
}

fn abort(report: &mut RunReport, phase: RunPhase, source: SourceError) -> RunError {
    advance(report, RunPhase::Aborted);
    RunError::Aborted { phase, source }
}
