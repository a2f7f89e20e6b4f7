//! StaticPostSource - 決まった一覧を返す PostSource（テスト・開発用）
//!
//! 取得失敗・途中失敗・不正投稿を仕込める。

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{CandidatePost, SourceError, SourceId};
use crate::ports::{PostCursor, PostSource, VecCursor};

#[derive(Debug, Default)]
pub struct StaticPostSource {
    items: Vec<Result<CandidatePost, SourceError>>,
    acquire_error: Option<SourceError>,
    fetches: AtomicUsize,
}

impl StaticPostSource {
    /// `posts` must already be newest-first.
    pub fn new(posts: Vec<CandidatePost>) -> Self {
        Self {
            items: posts.into_iter().map(Ok).collect(),
            ..Self::default()
        }
    }

    /// A source whose listing contains errors at given positions.
    pub fn with_items(items: Vec<Result<CandidatePost, SourceError>>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// A source that fails at acquisition.
    pub fn failing(error: SourceError) -> Self {
        Self {
            acquire_error: Some(error),
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostSource for StaticPostSource {
    async fn fetch_recent(
        &self,
        _source: &SourceId,
        limit: usize,
    ) -> Result<Box<dyn PostCursor>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.acquire_error {
            return Err(e.clone());
        }
        let page = self.items.iter().take(limit).cloned().collect();
        Ok(Box::new(VecCursor::new(page)))
    }
}
