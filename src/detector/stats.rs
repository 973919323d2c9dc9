// 検出器の累積統計（スレッド間で共有されるため内部でロックする）

use crate::core::{DetectionResult, ProcessingStats};
use std::sync::{Mutex, MutexGuard};

/// 累積統計の保持者
#[derive(Debug, Default)]
pub struct StatsTracker {
    inner: Mutex<ProcessingStats>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProcessingStats> {
        // 統計は単純な数値なので、パニックで汚染されても値はそのまま使える
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 1回の検出結果を反映する（逐次平均）
    pub fn record(&self, result: &DetectionResult, used_simd: bool) {
        let mut stats = self.lock();
        stats.total_images_processed += 1;

        if result.success {
            stats.successful_detections += 1;
            if let Some(confidence) = result.confidence() {
                let n = stats.successful_detections as f64;
                stats.average_confidence =
                    (stats.average_confidence * (n - 1.0) + confidence as f64) / n;
            }
        } else {
            stats.failed_detections += 1;
        }

        if used_simd {
            stats.simd_operations_used += 1;
        }

        let n = stats.total_images_processed as f64;
        stats.average_processing_time_us =
            (stats.average_processing_time_us * (n - 1.0) + result.processing_time_us as f64) / n;
    }

    /// 現在の統計のスナップショット
    pub fn snapshot(&self) -> ProcessingStats {
        *self.lock()
    }

    /// 統計をリセット
    pub fn reset(&self) {
        *self.lock() = ProcessingStats::default();
    }
}
