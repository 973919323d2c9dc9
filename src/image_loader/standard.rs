use super::{is_supported_extension, ImageLoaderBackend, LoadResult};
use crate::core::{LoaderError, LoaderResult};
use async_trait::async_trait;
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;

/// 標準的な画像ローダー実装
///
/// `image` クレートでデコードし、常に8bitグレースケールへ変換する。
#[derive(Clone, Debug, Default)]
pub struct StandardImageLoader;

impl StandardImageLoader {
    /// 新しい標準画像ローダーを作成
    pub fn new() -> Self {
        Self
    }

    fn into_result(image: DynamicImage, start_time: Instant) -> LoadResult {
        let original_dimensions = (image.width(), image.height());
        let was_grayscale = matches!(image, DynamicImage::ImageLuma8(_));
        let gray = match image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        };

        LoadResult {
            image: gray,
            original_dimensions,
            was_grayscale,
            load_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }
}

#[async_trait]
impl ImageLoaderBackend for StandardImageLoader {
    async fn load_from_path(&self, path: &Path) -> LoaderResult<LoadResult> {
        let start_time = Instant::now();
        let display = path.display().to_string();

        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(LoaderError::not_found(display)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoaderError::not_found(display))
            }
            Err(e) => return Err(LoaderError::io(display, e)),
        }
        if !is_supported_extension(path) {
            return Err(LoaderError::UnsupportedExtension { path: display });
        }

        let image = tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            move || image::open(&path)
        })
        .await?
        .map_err(|e| LoaderError::decode(display, e))?;

        Ok(Self::into_result(image, start_time))
    }

    async fn load_from_bytes(&self, data: &[u8]) -> LoaderResult<LoadResult> {
        let start_time = Instant::now();

        let image = tokio::task::spawn_blocking({
            let data = data.to_vec();
            move || image::load_from_memory(&data)
        })
        .await?
        .map_err(|e| LoaderError::decode("<memory>", e))?;

        Ok(Self::into_result(image, start_time))
    }

    fn strategy_name(&self) -> &'static str {
        "Standard (grayscale)"
    }
}
