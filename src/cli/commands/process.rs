use super::report::{ImageReport, ProcessReport, SystemInfo};
use crate::cli::Cli;
use crate::core::{DetectionResult, ProcessingConfig, ProcessingError};
use crate::detector::{CorePointDetector, DetectionParams};
use crate::file_scanner::FileScanner;
use crate::image_loader::{CachedImageLoader, ImageCache, StandardImageLoader};
use crate::processing::{BatchDetector, BatchSummary, ConsoleProgressReporter, DefaultProcessingConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 入力ディレクトリの画像を検出し、ROI画像とレポートを出力する
pub async fn execute_process(cli: &Cli) -> Result<ProcessReport> {
    // Validate input directory
    if !cli.input.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", cli.input.display());
    }

    let params = match &cli.config {
        Some(path) => DetectionParams::from_json_file(path)?,
        None => DetectionParams::default(),
    };
    let detector = CorePointDetector::new(params);

    let mut config = DefaultProcessingConfig::default().with_cache_size_mb(cli.cache_mb);
    if let Some(threads) = cli.threads {
        config = config.with_max_concurrent(threads);
    }
    config.validate()?;

    let system = SystemInfo {
        cpu_count: num_cpus::get(),
        simd_supported: CorePointDetector::is_simd_supported(),
        gradient_strategy: detector.strategy_name().to_string(),
    };

    println!("🔍 指紋コアポイント検出ツール");
    println!("💻 CPU数: {}", system.cpu_count);
    println!("⚡ {}", detector.system_info());
    println!("📂 入力ディレクトリ: {}", cli.input.display());
    println!("📁 出力ディレクトリ: {}", cli.output.display());

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory: {}", cli.output.display()))?;

    let mut paths = FileScanner::scan_directory(&cli.input, cli.recursive)
        .map_err(|e| ProcessingError::file_discovery(cli.input.display().to_string(), e))?;
    if let Some(max_files) = cli.max_files {
        paths.truncate(max_files);
    }
    println!("🖼️  対象ファイル数: {}", paths.len());

    // 読み込み（キャッシュ経由）
    let loader = CachedImageLoader::new(
        StandardImageLoader::new(),
        Arc::new(ImageCache::new(config.cache_size_bytes())),
    );
    let (images, loaded) = loader.load_images_batch(&paths, true).await;
    let load_failures = loaded.iter().filter(|ok| !**ok).count();
    if load_failures > 0 {
        println!("⚠️  {load_failures}個のファイルを読み込めませんでした");
    }

    let filenames: Vec<String> = paths.iter().map(|p| display_name(p)).collect();

    // 検出
    let engine = BatchDetector::new(detector, config, ConsoleProgressReporter::new());
    let (results, summary) = engine
        .detect_batch_with_summary(images, &filenames, !cli.sequential)
        .await;

    // ROI画像の保存
    let mut image_reports = Vec::with_capacity(results.len());
    for (result, path) in results.iter().zip(&paths) {
        let roi_path = if result.success {
            Some(save_roi(result, path, &cli.output)?)
        } else {
            None
        };
        image_reports.push(ImageReport::from_result(result, roi_path));
    }

    let report = ProcessReport {
        timestamp: chrono::Local::now(),
        input_directory: cli.input.clone(),
        output_directory: cli.output.clone(),
        system,
        summary,
        detector_stats: engine.detector().stats(),
        cache: loader.cache().statistics(),
        images: image_reports,
    };
    let report_path = cli.output.join("report.json");
    report.write_json(&report_path)?;

    print_summary(&report.summary);
    println!("📄 レポート: {}", report_path.display());

    Ok(report)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<stem>_roi_<index>.png` として保存
fn save_roi(result: &DetectionResult, source: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let roi_path = output_dir.join(format!("{stem}_roi_{}.png", result.roi.file_index));

    result
        .roi
        .to_gray_image()
        .save(&roi_path)
        .with_context(|| format!("Failed to save ROI: {}", roi_path.display()))?;
    Ok(roi_path)
}

fn print_summary(summary: &BatchSummary) {
    println!("\n✅ 処理完了!");
    println!("📊 処理結果:");
    println!("   - 対象画像数: {}", summary.total_images);
    println!("   - 検出成功: {}", summary.successful);
    println!("   - 検出失敗: {}", summary.failed);
    println!("   - 総処理時間: {}ms", summary.total_processing_time_ms);
    println!("   - 平均処理時間: {:.2}ms/画像", summary.average_time_per_image_ms);
    println!("   - スループット: {:.1}画像/秒", summary.images_per_second());
}
