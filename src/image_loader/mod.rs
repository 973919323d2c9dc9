use crate::core::LoaderResult;
use async_trait::async_trait;
use image::GrayImage;
use mockall::automock;
use std::path::Path;

pub mod cache;
pub mod cached;
pub mod standard;
pub mod validation;

pub use cache::{CacheStatistics, ImageCache};
pub use cached::CachedImageLoader;
pub use standard::StandardImageLoader;
pub use validation::{is_valid_fingerprint_image, validate_image_for_processing};

/// 読み込み対象とする拡張子（小文字）
pub const SUPPORTED_EXTENSIONS: &[&str] = &["bmp", "jpg", "jpeg", "png", "tiff", "tif", "gif"];

/// 拡張子がサポート対象かどうか（大文字小文字を区別しない）
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 画像読み込みの結果情報
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// 8bitグレースケールに変換済みの画像
    pub image: GrayImage,
    /// 元の画像サイズ
    pub original_dimensions: (u32, u32),
    /// 元画像がグレースケールだったかどうか
    pub was_grayscale: bool,
    /// 読み込みにかかった時間（ミリ秒）
    pub load_time_ms: u64,
}

/// 画像読み込みバックエンドのトレイト
#[automock]
#[async_trait]
pub trait ImageLoaderBackend: Send + Sync {
    /// ファイルパスから画像を読み込む
    async fn load_from_path(&self, path: &Path) -> LoaderResult<LoadResult>;

    /// バイト配列から画像を読み込む
    async fn load_from_bytes(&self, data: &[u8]) -> LoaderResult<LoadResult>;

    /// 読み込み戦略の名前を取得
    fn strategy_name(&self) -> &'static str;

    /// メモリ使用量を推定（バイト）
    fn estimate_memory_usage(&self, width: u32, height: u32) -> u64 {
        // 1画素1バイト
        width as u64 * height as u64
    }
}
