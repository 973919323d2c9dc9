// バッチ処理のデータ構造

use crate::core::DetectionResult;
use image::GrayImage;
use serde::Serialize;

/// ワーカーに渡す1件分の作業
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// 投入順の位置（結果の配置先）
    pub index: usize,
    pub image: GrayImage,
    pub filename: String,
}

/// 位置つきの検出結果
pub type IndexedResult = (usize, DetectionResult);

/// バッチ処理の集計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_images: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_processing_time_ms: u64,
    pub average_time_per_image_ms: f64,
}

impl BatchSummary {
    /// 結果一覧と経過時間から集計する
    pub fn from_results(results: &[DetectionResult], total_processing_time_ms: u64) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let total_images = results.len();
        let average_time_per_image_ms = if total_images > 0 {
            total_processing_time_ms as f64 / total_images as f64
        } else {
            0.0
        };

        Self {
            total_images,
            successful,
            failed: total_images - successful,
            total_processing_time_ms,
            average_time_per_image_ms,
        }
    }

    /// 1秒あたりの処理枚数
    pub fn images_per_second(&self) -> f64 {
        if self.total_processing_time_ms == 0 {
            0.0
        } else {
            self.total_images as f64 * 1000.0 / self.total_processing_time_ms as f64
        }
    }
}
