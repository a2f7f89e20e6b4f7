//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて 1 回分の poll-and-notify を実装します。
//!
//! # 主要コンポーネント
//! - **WatcherBuilder**: 設定の検証とポートのワイヤリング
//! - **Watcher**: Start → SourceReady → Scanning → Notifying → Persisting → Done
//! - **SeenTracker**: SeenSet の読み込み・flush・保存

pub mod builder;
pub mod seen_tracker;
pub mod watcher;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, WatcherBuilder};
pub use self::seen_tracker::SeenTracker;
pub use self::watcher::Watcher;
