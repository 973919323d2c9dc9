// 処理結果のJSONレポート

use crate::core::{DetectionResult, ProcessingStats};
use crate::image_loader::CacheStatistics;
use crate::processing::BatchSummary;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 実行環境の情報
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub cpu_count: usize,
    pub simd_supported: bool,
    pub gradient_strategy: String,
}

/// 1枚分の結果
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub filename: String,
    pub file_index: i32,
    pub success: bool,
    pub core_x: Option<f32>,
    pub core_y: Option<f32>,
    pub confidence: Option<f32>,
    pub overall_quality: f32,
    pub processing_time_us: u64,
    pub error: Option<String>,
    pub roi_path: Option<PathBuf>,
}

impl ImageReport {
    pub fn from_result(result: &DetectionResult, roi_path: Option<PathBuf>) -> Self {
        Self {
            filename: result.roi.filename.clone(),
            file_index: result.roi.file_index,
            success: result.success,
            core_x: result.core_point.map(|p| p.x),
            core_y: result.core_point.map(|p| p.y),
            confidence: result.confidence(),
            overall_quality: result.overall_quality,
            processing_time_us: result.processing_time_us,
            error: result.error_message(),
            roi_path,
        }
    }
}

/// 実行全体のレポート
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub timestamp: DateTime<Local>,
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub system: SystemInfo,
    pub summary: BatchSummary,
    pub detector_stats: ProcessingStats,
    pub cache: CacheStatistics,
    pub images: Vec<ImageReport>,
}

impl ProcessReport {
    /// 整形済みJSONとして書き出す
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}
