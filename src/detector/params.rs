// 検出パラメータ
//
// 検出器の生成時に一度だけ正規化され、以後は変更されない。

use crate::imaging::simd_available;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// コアポイント検出のパラメータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// 最低信頼度 [0.0, 1.0]
    pub min_confidence: f32,
    /// ガウシアンぼかしのカーネルサイズ（奇数）
    pub gaussian_kernel_size: usize,
    pub gaussian_sigma: f32,
    /// Sobelカーネルサイズ（奇数、1/3/5/7）
    pub sobel_kernel_size: usize,
    /// 局所解析のブロックサイズ
    pub block_size: usize,
    pub ridge_threshold: f32,
    /// SIMD実装を使うかどうか（非対応環境では自動で無効化）
    pub use_simd: bool,
    /// 候補とみなす方向分散の下限
    pub orientation_variance_threshold: f32,
    /// 品質ゲートの下限
    pub min_image_quality: f32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            gaussian_kernel_size: 5,
            gaussian_sigma: 1.0,
            sobel_kernel_size: 3,
            block_size: 16,
            ridge_threshold: 0.5,
            use_simd: true,
            orientation_variance_threshold: 0.5,
            min_image_quality: 0.2,
        }
    }
}

impl DetectionParams {
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_gaussian(mut self, kernel_size: usize, sigma: f32) -> Self {
        self.gaussian_kernel_size = kernel_size;
        self.gaussian_sigma = sigma;
        self
    }

    pub fn with_sobel_kernel_size(mut self, kernel_size: usize) -> Self {
        self.sobel_kernel_size = kernel_size;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_simd(mut self, use_simd: bool) -> Self {
        self.use_simd = use_simd;
        self
    }

    pub fn with_orientation_variance_threshold(mut self, threshold: f32) -> Self {
        self.orientation_variance_threshold = threshold;
        self
    }

    pub fn with_min_image_quality(mut self, quality: f32) -> Self {
        self.min_image_quality = quality;
        self
    }

    /// JSONファイルからパラメータを読み込む（省略した項目はデフォルト値）
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// 検出器で使える形に正規化する
    ///
    /// カーネルサイズは奇数に、ブロックサイズは2以上に揃え、
    /// SIMD非対応環境では `use_simd` を無効化する。
    pub fn normalized(mut self) -> Self {
        if self.gaussian_kernel_size % 2 == 0 {
            self.gaussian_kernel_size += 1;
            log::warn!(
                "Gaussian kernel size must be odd, adjusted to {}",
                self.gaussian_kernel_size
            );
        }

        if self.sobel_kernel_size % 2 == 0 {
            self.sobel_kernel_size += 1;
            log::warn!(
                "Sobel kernel size must be odd, adjusted to {}",
                self.sobel_kernel_size
            );
        }
        if self.sobel_kernel_size > 7 {
            self.sobel_kernel_size = 7;
            log::warn!("Sobel kernel size is limited to 7");
        }

        if self.block_size < 2 {
            self.block_size = 2;
            log::warn!("Block size must be at least 2, adjusted to 2");
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            self.min_confidence = self.min_confidence.clamp(0.0, 1.0);
            log::warn!(
                "Minimum confidence must be within [0, 1], clamped to {}",
                self.min_confidence
            );
        }

        if self.use_simd && !simd_available() {
            self.use_simd = false;
            log::info!("SIMD requested but not available, using scalar implementation");
        }

        self
    }
}
