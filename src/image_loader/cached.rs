use super::cache::ImageCache;
use super::standard::StandardImageLoader;
use super::validation::is_valid_fingerprint_image;
use super::ImageLoaderBackend;
use crate::core::LoaderResult;
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// キャッシュ付きの画像ローダー
///
/// デコードはバックエンドに委譲し、成功した画像だけをキャッシュに登録する。
pub struct CachedImageLoader<L: ImageLoaderBackend = StandardImageLoader> {
    backend: L,
    cache: Arc<ImageCache>,
}

impl CachedImageLoader<StandardImageLoader> {
    /// 標準ローダーと指定サイズのキャッシュで作成
    pub fn with_capacity(cache_size_bytes: usize) -> Self {
        Self::new(StandardImageLoader::new(), Arc::new(ImageCache::new(cache_size_bytes)))
    }
}

impl<L: ImageLoaderBackend> CachedImageLoader<L> {
    pub fn new(backend: L, cache: Arc<ImageCache>) -> Self {
        Self { backend, cache }
    }

    pub fn backend(&self) -> &L {
        &self.backend
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// 1枚読み込む
    ///
    /// `use_cache` が真ならキャッシュを先に参照し、デコード成功時に登録する。
    /// 指紋画像として不自然なサイズ・コントラストの場合は警告のみ出す。
    pub async fn load_image(&self, path: &Path, use_cache: bool) -> LoaderResult<GrayImage> {
        if use_cache {
            if let Some(image) = self.cache.get(path) {
                return Ok(image);
            }
        }

        let loaded = self.backend.load_from_path(path).await.map_err(|e| {
            log::error!("{e}");
            e
        })?;

        if !is_valid_fingerprint_image(&loaded.image) {
            log::warn!(
                "Image may not be suitable for fingerprint processing: {}",
                path.display()
            );
        }

        if use_cache {
            self.cache.insert(path, &loaded.image);
        }
        Ok(loaded.image)
    }

    /// 順番に読み込む。失敗した位置は空画像になり、成否は2つ目の戻り値で返す
    pub async fn load_images_batch(
        &self,
        paths: &[PathBuf],
        use_cache: bool,
    ) -> (Vec<GrayImage>, Vec<bool>) {
        let mut images = Vec::with_capacity(paths.len());
        let mut success_flags = Vec::with_capacity(paths.len());

        for path in paths {
            match self.load_image(path, use_cache).await {
                Ok(image) => {
                    images.push(image);
                    success_flags.push(true);
                }
                Err(_) => {
                    images.push(GrayImage::new(0, 0));
                    success_flags.push(false);
                }
            }
        }

        (images, success_flags)
    }
}
