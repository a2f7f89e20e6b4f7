//! postwatch-core
//!
//! Core building blocks for watching a listing feed and sending one digest
//! per run for posts that match a roster of phrases.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, post, seen, roster, filter, digest, state, report, errors）
//! - **ports**: 抽象化レイヤー（PostSource, Notifier, SeenStore, Clock）
//! - **app**: アプリケーションロジック（builder, watcher, seen_tracker）
//! - **impls**: 実装（JSON ファイル版と開発用のインメモリ版）
//! - **config**: WatchConfig（JSON）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BuildError, Watcher, WatcherBuilder};
pub use config::WatchConfig;
