// バッチ検出システムのモジュール
// 設定・進捗報告・並列実行・エンジンを機能別に分割

pub mod config;
pub mod engine;
pub mod parallel_execution;
pub mod reporting;
pub mod types;

// 公開API
pub use config::DefaultProcessingConfig;
pub use engine::BatchDetector;
pub use reporting::{ConsoleProgressReporter, NoOpProgressReporter};
pub use types::{BatchSummary, WorkItem};
