// バッチ検出エンジン
// 共有検出器・設定・進捗報告を注入し、画像列を並列または逐次に処理する

use super::parallel_execution::{consumer::run_detection, DetectionPipeline};
use super::types::{BatchSummary, WorkItem};
use crate::core::{DetectionResult, ProcessingConfig, ProgressReporter};
use crate::detector::CorePointDetector;
use image::GrayImage;
use std::sync::Arc;
use std::time::Instant;

/// 依存性注入によるバッチ検出エンジン
pub struct BatchDetector<C, R> {
    detector: Arc<CorePointDetector>,
    config: C,
    reporter: Arc<R>,
}

impl<C, R> BatchDetector<C, R>
where
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
{
    /// コンストラクタインジェクション
    pub fn new(detector: CorePointDetector, config: C, reporter: R) -> Self {
        Self::with_shared_detector(Arc::new(detector), config, reporter)
    }

    /// 既存の検出器を共有して作成
    pub fn with_shared_detector(detector: Arc<CorePointDetector>, config: C, reporter: R) -> Self {
        Self {
            detector,
            config,
            reporter: Arc::new(reporter),
        }
    }

    pub fn detector(&self) -> &Arc<CorePointDetector> {
        &self.detector
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 画像列を検出し、入力順の結果を返す
    ///
    /// `parallel` かつ2枚以上なら並列ワーカーで処理し、それ以外は逐次処理する。
    /// `filenames` が足りない位置は空文字列、ファイル番号は0始まりの位置。
    pub async fn detect_batch(
        &self,
        images: Vec<GrayImage>,
        filenames: &[String],
        parallel: bool,
    ) -> Vec<DetectionResult> {
        let total = images.len();
        let items: Vec<WorkItem> = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| WorkItem {
                index,
                image,
                filename: filenames.get(index).cloned().unwrap_or_default(),
            })
            .collect();

        if self.config.enable_progress_reporting() {
            self.reporter.report_started(total).await;
        }

        let results = if parallel && total > 1 {
            DetectionPipeline::new(self.detector.clone())
                .execute(items, &self.config, self.progress_sink())
                .await
        } else {
            self.detect_sequential(items).await
        };

        if self.config.enable_progress_reporting() {
            let succeeded = results.iter().filter(|r| r.success).count();
            self.reporter
                .report_completed(succeeded, results.len() - succeeded)
                .await;
        }
        results
    }

    /// `detect_batch` に処理時間の集計を添えて返す
    pub async fn detect_batch_with_summary(
        &self,
        images: Vec<GrayImage>,
        filenames: &[String],
        parallel: bool,
    ) -> (Vec<DetectionResult>, BatchSummary) {
        let start_time = Instant::now();
        let results = self.detect_batch(images, filenames, parallel).await;
        let summary = BatchSummary::from_results(&results, start_time.elapsed().as_millis() as u64);
        (results, summary)
    }

    async fn detect_sequential(&self, items: Vec<WorkItem>) -> Vec<DetectionResult> {
        let total = items.len();
        let reporter = self.progress_sink();
        let mut results = Vec::with_capacity(total);

        // 検出はブロッキングスレッドで1件ずつ実行する
        for item in items {
            let (_, result) = run_detection(self.detector.clone(), item).await;
            if let Some(message) = result.error_message() {
                reporter.report_error(&result.roi.filename, &message).await;
            }
            results.push(result);
            reporter.report_progress(results.len(), total).await;
        }
        results
    }

    /// 進捗報告が無効なら何もしない報告先を返す
    fn progress_sink(&self) -> &dyn ProgressReporter {
        if self.config.enable_progress_reporting() {
            self.reporter.as_ref()
        } else {
            &super::reporting::NoOpProgressReporter
        }
    }
}
