//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **JsonFileSeenStore**: 本番用の状態ファイル
//! - **JsonFilePostSource**: 別プロセスが書き出した一覧を読む
//! - **InMemorySeenStore / StaticPostSource / RecordingNotifier**: テスト・開発用
//!
//! 実フィード（Reddit API）やメール送信の実装はこのクレートには置かない。

pub mod inmem_seen_store;
pub mod json_file_source;
pub mod json_file_store;
pub mod recording_notifier;
pub mod static_source;

// 主要な型を再エクスポート
pub use self::inmem_seen_store::InMemorySeenStore;
pub use self::json_file_source::JsonFilePostSource;
pub use self::json_file_store::JsonFileSeenStore;
pub use self::recording_notifier::RecordingNotifier;
pub use self::static_source::StaticPostSource;
