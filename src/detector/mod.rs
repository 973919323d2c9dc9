// コアポイント検出器
//
// 前処理 → 品質ゲート → 方向場 → 隆線周波数 → 候補探索 → 選択 → 検証 → ROI切り出し
// の順に処理する。各段の失敗は `DetectionResult` として返し、呼び出し側には伝播しない。

pub mod candidates;
pub mod orientation;
pub mod params;
pub mod preprocess;
pub mod quality;
pub mod roi;
pub mod stats;

pub use params::DetectionParams;
pub use stats::StatsTracker;

use crate::core::{CorePoint, DetectionFailure, DetectionResult, ProcessingStats, Roi, ROI_SIZE};
use crate::imaging::{select_strategy, simd_available, GradientStrategy, SobelKernel};
use image::{DynamicImage, GrayImage};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// パイプラインの内部結果（SIMD経路を使ったかどうかを併せて返す）
struct PipelineOutcome {
    result: DetectionResult,
    used_simd: bool,
}

impl PipelineOutcome {
    fn failed(failure: DetectionFailure, filename: &str, file_index: i32, quality: f32) -> Self {
        Self {
            result: DetectionResult::failed(failure, filename, file_index, quality),
            used_simd: false,
        }
    }
}

/// 指紋画像のコアポイント検出器
///
/// パラメータは生成時に正規化され、以後は不変。統計のみ内部で同期して更新されるため、
/// `Arc<CorePointDetector>` として複数スレッドから同時に `detect` を呼べる。
#[derive(Debug)]
pub struct CorePointDetector {
    params: DetectionParams,
    strategy: Box<dyn GradientStrategy>,
    kernel: SobelKernel,
    stats: StatsTracker,
}

impl Default for CorePointDetector {
    fn default() -> Self {
        Self::new(DetectionParams::default())
    }
}

impl CorePointDetector {
    pub fn new(params: DetectionParams) -> Self {
        let params = params.normalized();
        let strategy = select_strategy(params.use_simd);
        let kernel = SobelKernel::new(params.sobel_kernel_size);

        log::info!(
            "Core point detector initialised (gradient strategy: {}, block size: {})",
            strategy.name(),
            params.block_size
        );

        Self {
            params,
            strategy,
            kernel,
            stats: StatsTracker::new(),
        }
    }

    /// 正規化済みのパラメータ
    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// 実行環境がSIMD命令をサポートしているか
    pub fn is_simd_supported() -> bool {
        simd_available()
    }

    /// 実行環境と選択された勾配戦略の概要
    pub fn system_info(&self) -> String {
        format!(
            "SIMD support: {}, gradient strategy: {}",
            if Self::is_simd_supported() { "available" } else { "not available" },
            self.strategy.name()
        )
    }

    /// 統計のスナップショット
    pub fn stats(&self) -> ProcessingStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// ROIが 101x101 の画素を持つか
    pub fn validate_roi_size(roi: &Roi) -> bool {
        roi.width() == ROI_SIZE && roi.height() == ROI_SIZE && roi.pixels().len() == ROI_SIZE * ROI_SIZE
    }

    /// 座標が非負で、信頼度が [0, 1] に収まっているか
    pub fn validate_core_point(point: &CorePoint) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && (0.0..=1.0).contains(&point.confidence)
    }

    /// 任意のカラータイプの画像を受け付ける入口（8bitグレースケール以外は拒否）
    pub fn detect_dynamic(&self, image: &DynamicImage, filename: &str, file_index: i32) -> DetectionResult {
        match image {
            DynamicImage::ImageLuma8(gray) => self.detect(gray, filename, file_index),
            other => {
                let start = Instant::now();
                let failure = if other.width() == 0 || other.height() == 0 {
                    DetectionFailure::EmptyImage
                } else {
                    DetectionFailure::NotGrayscale
                };
                let mut result = DetectionResult::failed(failure, filename, file_index, 0.0);
                result.processing_time_us = start.elapsed().as_micros() as u64;
                self.stats.record(&result, false);
                result
            }
        }
    }

    /// 1枚の画像からコアポイントとROIを検出する
    pub fn detect(&self, image: &GrayImage, filename: &str, file_index: i32) -> DetectionResult {
        let start = Instant::now();

        let outcome = if image.width() == 0 || image.height() == 0 {
            PipelineOutcome::failed(DetectionFailure::EmptyImage, filename, file_index, 0.0)
        } else if (image.width() as usize) < ROI_SIZE || (image.height() as usize) < ROI_SIZE {
            PipelineOutcome::failed(
                DetectionFailure::TooSmall {
                    width: image.width(),
                    height: image.height(),
                },
                filename,
                file_index,
                0.0,
            )
        } else {
            catch_unwind(AssertUnwindSafe(|| self.run_pipeline(image, filename, file_index)))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    log::error!("Detection panicked for '{filename}': {message}");
                    PipelineOutcome::failed(
                        DetectionFailure::Internal { message },
                        filename,
                        file_index,
                        0.0,
                    )
                })
        };

        let mut result = outcome.result;
        result.processing_time_us = start.elapsed().as_micros() as u64;
        self.stats.record(&result, outcome.used_simd);

        if let Some(message) = result.error_message() {
            log::debug!("Detection failed for '{filename}' (#{file_index}): {message}");
        }
        result
    }

    fn run_pipeline(&self, image: &GrayImage, filename: &str, file_index: i32) -> PipelineOutcome {
        let params = &self.params;

        let stage = Instant::now();
        let processed = preprocess::preprocess_image(image, params);
        log::debug!("[{filename}] preprocess: {:?}", stage.elapsed());

        let stage = Instant::now();
        let image_quality = quality::assess_image_quality(&processed);
        log::debug!("[{filename}] quality {image_quality:.3}: {:?}", stage.elapsed());
        if image_quality < params.min_image_quality {
            return PipelineOutcome::failed(
                DetectionFailure::LowQuality {
                    quality: image_quality,
                },
                filename,
                file_index,
                image_quality,
            );
        }

        let stage = Instant::now();
        let orientation =
            orientation::compute_orientation_field(&processed, self.strategy.as_ref(), &self.kernel);
        log::debug!(
            "[{filename}] orientation field ({}): {:?}",
            self.strategy.name(),
            stage.elapsed()
        );
        let used_simd = self.strategy.uses_simd();

        let stage = Instant::now();
        let frequency = orientation::compute_ridge_frequency(&processed, params.block_size);
        log::debug!("[{filename}] ridge frequency: {:?}", stage.elapsed());

        let stage = Instant::now();
        let found = candidates::detect_core_candidates(&orientation, &frequency, params);
        log::debug!("[{filename}] candidate search: {:?}", stage.elapsed());

        let fail = |failure| PipelineOutcome {
            result: DetectionResult::failed(failure, filename, file_index, image_quality),
            used_simd,
        };

        let Some(best) = candidates::select_best_core_point(&found) else {
            return fail(DetectionFailure::NoCandidates);
        };

        let confidence = candidates::validate_core_point(&processed, &best);
        if confidence <= 0.0 {
            return fail(DetectionFailure::ValidationFailed);
        }
        if confidence < params.min_confidence {
            return fail(DetectionFailure::LowConfidence { confidence });
        }

        let core_point = CorePoint::new(best.x, best.y, confidence);
        let Some(roi) = roi::extract_roi_around_point(image, &core_point, filename, file_index) else {
            return fail(DetectionFailure::EmptyImage);
        };

        let overall_quality = image_quality.min(quality::assess_roi_quality(&roi));
        log::debug!(
            "[{filename}] core point ({}, {}) confidence {confidence:.4}, quality {overall_quality:.3}",
            core_point.x,
            core_point.y
        );

        PipelineOutcome {
            result: DetectionResult {
                core_point: Some(core_point),
                roi,
                overall_quality,
                processing_time_us: 0,
                failure: None,
                success: true,
            },
            used_simd,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
