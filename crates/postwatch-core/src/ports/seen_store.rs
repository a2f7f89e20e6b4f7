//! SeenStore port - SeenSet の永続化先（ファイル / KV）
//!
//! ここは生の読み書きだけ。欠落・破損時の既定値への置き換えやログは
//! `app::SeenTracker` が担う。

use crate::domain::{SeenRecord, StoreError};

/// SeenStore は SeenRecord を丸ごと読み書きする
///
/// # 設計原則
/// - `load()` は「存在しない」を `Ok(None)` で返す
/// - 構造が壊れている場合は `StoreError::Corrupt`
/// - 書き込みは全置換（部分更新はしない）
pub trait SeenStore: Send + Sync {
    fn load(&self) -> Result<Option<SeenRecord>, StoreError>;

    fn save(&self, record: &SeenRecord) -> Result<(), StoreError>;
}
