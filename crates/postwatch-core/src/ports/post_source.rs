//! PostSource port - 投稿フィード（Reddit など）の抽象化
//!
//! 認証・ページング・レート制限は実装側の責務。コアは「新しい順に最大 N 件」
//! だけを要求する。
//!
//! # 二段構え
//! - `fetch_recent()`: 一覧の取得。失敗したら実行は中止（Aborted）
//! - `PostCursor::next_post()`: 1 件ずつ取り出す。遅延取得の実装では途中で
//!   失敗しうるので、項目ごとに `Result` を返す

use async_trait::async_trait;

use crate::domain::{CandidatePost, SourceError, SourceId};

/// A newest-first stream of posts from one acquisition.
#[async_trait]
pub trait PostCursor: Send {
    /// `None` when the listing is exhausted.
    async fn next_post(&mut self) -> Option<Result<CandidatePost, SourceError>>;
}

/// PostSource は外部フィードから最新の投稿を取得
///
/// # Thread Safety
/// - `Send + Sync` を要求（`Arc<dyn PostSource>` で持ち回すため）
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Acquire up to `limit` most-recent posts of `source`, newest first.
    async fn fetch_recent(
        &self,
        source: &SourceId,
        limit: usize,
    ) -> Result<Box<dyn PostCursor>, SourceError>;
}

/// Cursor over an already-materialized page.
pub struct VecCursor {
    items: std::vec::IntoIter<Result<CandidatePost, SourceError>>,
}

impl VecCursor {
    pub fn new(items: Vec<Result<CandidatePost, SourceError>>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    pub fn from_posts(posts: Vec<CandidatePost>) -> Self {
        Self::new(posts.into_iter().map(Ok).collect())
    }
}

#[async_trait]
impl PostCursor for VecCursor {
    async fn next_post(&mut self) -> Option<Result<CandidatePost, SourceError>> {
        self.items.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn vec_cursor_yields_in_order_then_none() {
        let mut cursor = VecCursor::from_posts(vec![
            CandidatePost::new("a", "A", "https://a"),
            CandidatePost::new("b", "B", "https://b"),
        ]);
        assert_eq!(cursor.next_post().await.unwrap().unwrap().id.as_str(), "a");
        assert_eq!(cursor.next_post().await.unwrap().unwrap().id.as_str(), "b");
        assert!(cursor.next_post().await.is_none());
    }
}
