//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（投稿フィード、通知手段、状態ファイル、時計）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - フィードと通知は非同期（タイムアウトは実装側が持つ）
//! - 状態の読み書きは同期（小さな JSON 1 個）

pub mod clock;
pub mod notifier;
pub mod post_source;
pub mod seen_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::notifier::Notifier;
pub use self::post_source::{PostCursor, PostSource, VecCursor};
pub use self::seen_store::SeenStore;
