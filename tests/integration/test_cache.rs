// 画像キャッシュとローダーの統合テスト
use crate::fixtures::{noise_square, write_corrupted, write_png};
use fingerprint_roi::{CachedImageLoader, FileBatch, FileScanner, ImageCache, StandardImageLoader};
use image::GrayImage;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_repeated_load_hits_cache() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_png(temp_dir.path(), "print.png", &noise_square(4));
    let loader = CachedImageLoader::with_capacity(1 << 20);

    let first = loader.load_image(&path, true).await.unwrap();
    let second = loader.load_image(&path, true).await.unwrap();

    assert_eq!(first, second);
    let stats = loader.cache().statistics();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.total_memory_bytes, 256 * 256);
    assert_eq!(stats.hit_ratio, 0.5);
}

#[tokio::test]
async fn test_relative_and_absolute_paths_share_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_png(temp_dir.path(), "print.png", &noise_square(4));
    std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
    let dotted = temp_dir.path().join("sub").join("..").join("print.png");

    let loader = CachedImageLoader::with_capacity(1 << 20);
    loader.load_image(&path, true).await.unwrap();
    loader.load_image(&dotted, true).await.unwrap();

    assert_eq!(loader.cache().len(), 1);
    assert_eq!(loader.cache().statistics().cache_hits, 1);
}

#[tokio::test]
async fn test_lru_budget_across_files() {
    let temp_dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..4)
        .map(|i| {
            let image = GrayImage::from_pixel(100, 100, image::Luma([i as u8 * 40]));
            write_png(temp_dir.path(), &format!("{i}.png"), &image)
        })
        .collect();

    // 10000バイトの画像を2枚まで
    let cache = Arc::new(ImageCache::new(25_000));
    let loader = CachedImageLoader::new(StandardImageLoader::new(), cache.clone());

    loader.load_image(&paths[0], true).await.unwrap();
    loader.load_image(&paths[1], true).await.unwrap();
    // 0 を参照し直すと 1 が最古になる
    loader.load_image(&paths[0], true).await.unwrap();
    loader.load_image(&paths[2], true).await.unwrap();

    assert!(cache.contains(&paths[0]));
    assert!(!cache.contains(&paths[1]));
    assert!(cache.contains(&paths[2]));
    assert!(cache.total_bytes() <= 25_000);

    loader.load_image(&paths[3], true).await.unwrap();
    assert!(!cache.contains(&paths[0]));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_batch_load_with_failures() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_png(temp_dir.path(), "good.png", &noise_square(8));
    let bad = write_corrupted(temp_dir.path(), "bad.png");
    let missing = temp_dir.path().join("missing.png");

    let loader = CachedImageLoader::with_capacity(1 << 20);
    let (images, flags) = loader
        .load_images_batch(&[good, bad, missing], true)
        .await;

    assert_eq!(flags, vec![true, false, false]);
    assert_eq!(images.len(), 3);
    assert_eq!(images[0].dimensions(), (256, 256));
    assert_eq!(images[1].dimensions(), (0, 0));
    assert_eq!(loader.cache().len(), 1);
}

#[tokio::test]
async fn test_clear_and_remove() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_png(temp_dir.path(), "a.png", &noise_square(1));
    let b = write_png(temp_dir.path(), "b.png", &noise_square(2));
    let loader = CachedImageLoader::with_capacity(1 << 20);
    loader.load_image(&a, true).await.unwrap();
    loader.load_image(&b, true).await.unwrap();

    assert_eq!(loader.cache().cached_files().len(), 2);
    assert!(loader.cache().remove(&a));
    assert_eq!(loader.cache().cached_files(), vec![ImageCache::key_for(&b)]);

    loader.cache().clear();
    assert!(loader.cache().is_empty());
    assert_eq!(loader.cache().total_bytes(), 0);
}

#[test]
fn test_file_batch_from_scanned_directory() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["b.png", "a.jpg", "c.tiff"] {
        std::fs::write(temp_dir.path().join(name), b"x").unwrap();
    }
    std::fs::write(temp_dir.path().join("notes.md"), b"x").unwrap();

    let scanned = FileScanner::scan_directory(temp_dir.path(), false).unwrap();
    let batch = FileBatch::from_paths(&scanned);

    let names: Vec<_> = batch.map(|info| info.filename).collect();
    assert_eq!(names, vec!["a.jpg", "b.png", "c.tiff"]);
}
