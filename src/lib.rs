//! 指紋画像のコアポイント検出とROI切り出し
//!
//! - `detector`: 1枚の画像からコアポイントを検出し 101x101 のROIを切り出す
//! - `image_loader`: グレースケール読み込みとメモリ上限つきLRUキャッシュ
//! - `processing`: 画像列を並列または逐次に検出するバッチエンジン

pub mod cli;
pub mod core;
pub mod detector;
pub mod file_scanner;
pub mod image_loader;
pub mod imaging;
pub mod processing;

pub use crate::core::{
    CorePoint, DetectionFailure, DetectionResult, LoaderError, ProcessingError, ProcessingStats,
    Roi, ROI_SIZE,
};
pub use detector::{CorePointDetector, DetectionParams};
pub use file_scanner::{FileBatch, FileInfo, FileScanner};
pub use image_loader::{CacheStatistics, CachedImageLoader, ImageCache, StandardImageLoader};
pub use processing::{
    BatchDetector, BatchSummary, ConsoleProgressReporter, DefaultProcessingConfig,
    NoOpProgressReporter,
};
