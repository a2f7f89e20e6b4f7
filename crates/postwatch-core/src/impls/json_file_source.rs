//! JsonFilePostSource - JSON ファイルに書き出された一覧を読む PostSource
//!
//! 実フィードのクライアントは外部コラボレータ。このアダプタは、別プロセスが
//! 取得して書き出した一覧（新しい順の配列）を読むためのもの。
//!
//! ```json
//! [
//!   { "id": "1abc", "title": "Zelda for switch", "body": "", "url": "https://..." }
//! ]
//! ```
//!
//! - ファイルがない・読めない・配列でない → `SourceError::Unavailable`（取得失敗）
//! - 要素単位で壊れている → その要素だけ `SourceError::MalformedPost`

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CandidatePost, PostId, SourceError, SourceId};
use crate::ports::{PostCursor, PostSource, VecCursor};

#[derive(Debug, Clone)]
pub struct JsonFilePostSource {
    path: PathBuf,
}

impl JsonFilePostSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn decode_item(item: Value) -> Result<CandidatePost, SourceError> {
    let id = item
        .get("id")
        .and_then(Value::as_str)
        .map(PostId::new);
    let post: CandidatePost =
        serde_json::from_value(item).map_err(|e| SourceError::MalformedPost {
            id: id.clone(),
            reason: e.to_string(),
        })?;
    if post.id.is_blank() {
        return Err(SourceError::MalformedPost {
            id: None,
            reason: "blank id".to_string(),
        });
    }
    Ok(post)
}

#[async_trait]
impl PostSource for JsonFilePostSource {
    async fn fetch_recent(
        &self,
        source: &SourceId,
        limit: usize,
    ) -> Result<Box<dyn PostCursor>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SourceError::Unavailable(format!("{} ({source}): {e}", self.path.display()))
        })?;
        let listing: Value = serde_json::from_str(&content)
            .map_err(|e| SourceError::Unavailable(format!("listing is not JSON: {e}")))?;
        let Value::Array(items) = listing else {
            return Err(SourceError::Unavailable(
                "listing must be a JSON array".to_string(),
            ));
        };

        let page = items.into_iter().take(limit).map(decode_item).collect();
        Ok(Box::new(VecCursor::new(page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    async fn drain(mut cursor: Box<dyn PostCursor>) -> Vec<Result<CandidatePost, SourceError>> {
        let mut out = Vec::new();
        while let Some(item) = cursor.next_post().await {
            out.push(item);
        }
        out
    }

    #[tokio::test]
    async fn reads_listing_up_to_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(
            &path,
            r#"[
                {"id": "a", "title": "Zelda for switch", "url": "https://a"},
                {"id": "b", "title": "Mario", "body": "cib", "url": "https://b"},
                {"id": "c", "title": "Kirby", "url": "https://c"}
            ]"#,
        )
        .unwrap();

        let source = JsonFilePostSource::new(&path);
        let cursor = source.fetch_recent(&SourceId::new("GameSale"), 2).await.unwrap();
        let items = drain(cursor).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].as_ref().unwrap().body.as_deref(), Some("cib"));
    }

    #[tokio::test]
    async fn bad_element_becomes_malformed_post() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(
            &path,
            r#"[{"id": "a", "url": "https://a"}, {"id": "b", "title": "ok", "url": "u"}]"#,
        )
        .unwrap();

        let cursor = JsonFilePostSource::new(&path)
            .fetch_recent(&SourceId::new("s"), 10)
            .await
            .unwrap();
        let items = drain(cursor).await;

        match &items[0] {
            Err(SourceError::MalformedPost { id, .. }) => {
                assert_eq!(id.as_ref().map(PostId::as_str), Some("a"))
            }
            other => panic!("expected MalformedPost, got {other:?}"),
        }
        assert!(items[1].is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonFilePostSource::new(dir.path().join("nope.json"))
            .fetch_recent(&SourceId::new("s"), 10)
            .await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn non_array_listing_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, r#"{"posts": []}"#).unwrap();
        let result = JsonFilePostSource::new(&path)
            .fetch_recent(&SourceId::new("s"), 10)
            .await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}
