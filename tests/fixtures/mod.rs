// テスト用の画像生成ヘルパー

#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};

/// 中央の正方形 [60, 196) に2値ノイズを置いた 256x256 画像（検出が成功する）
pub fn noise_square(seed: u32) -> GrayImage {
    let mut state = seed.max(1);
    GrayImage::from_fn(256, 256, |x, y| {
        if (60..196).contains(&x) && (60..196).contains(&y) {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Luma([if state & 1 == 0 { 0 } else { 255 }])
        } else {
            Luma([128])
        }
    })
}

/// 一様な画像（品質ゲートで失敗する）
pub fn flat_image(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([128]))
}

/// 画像をPNGとして保存し、そのパスを返す
pub fn write_png(dir: &Path, name: &str, image: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

/// 破損したPNGファイルを作成
pub fn write_corrupted(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"INVALID_PNG_DATA").unwrap();
    path
}

/// 処理時間を除いた比較用
pub fn strip_timing(results: &mut [fingerprint_roi::DetectionResult]) {
    for result in results {
        result.processing_time_us = 0;
    }
}
