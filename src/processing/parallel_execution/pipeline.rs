// Pipeline - Producer-Consumer パイプライン
// 投入・並列検出・結果の回収を組み立てる

use super::super::types::{IndexedResult, WorkItem};
use super::{consumer::spawn_consumers, producer::spawn_producer};
use crate::core::{
    DetectionFailure, DetectionResult, ProcessingConfig, ProcessingError, ProgressReporter,
};
use crate::detector::CorePointDetector;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 並列検出パイプライン
pub struct DetectionPipeline {
    detector: Arc<CorePointDetector>,
}

impl DetectionPipeline {
    pub fn new(detector: Arc<CorePointDetector>) -> Self {
        Self { detector }
    }

    /// 作業一覧を並列に処理し、投入順に並べた結果を返す
    pub async fn execute<C, R>(&self, items: Vec<WorkItem>, config: &C, reporter: &R) -> Vec<DetectionResult>
    where
        C: ProcessingConfig + ?Sized,
        R: ProgressReporter + ?Sized,
    {
        let total = items.len();
        let names: Vec<String> = items.iter().map(|item| item.filename.clone()).collect();
        let buffer_size = config.channel_buffer_size().max(1);
        let worker_count = config.max_concurrent_tasks().clamp(1, total.max(1));

        // Producer-Consumerチャンネル構築
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(buffer_size);
        let (result_tx, mut result_rx) = mpsc::channel::<IndexedResult>(buffer_size);

        log::debug!("Starting {worker_count} workers (queue depth {buffer_size}) for {total} images");

        let producer_handle = spawn_producer(items, work_tx);
        let consumer_handles = spawn_consumers(self.detector.clone(), work_rx, result_tx, worker_count);

        // 結果回収: 投入位置に配置する
        let mut slots: Vec<Option<DetectionResult>> = vec![None; total];
        let mut completed = 0;
        while let Some((index, result)) = result_rx.recv().await {
            if let Some(message) = result.error_message() {
                reporter.report_error(&names[index], &message).await;
            }
            slots[index] = Some(result);
            completed += 1;
            reporter.report_progress(completed, total).await;
        }

        if let Err(e) = producer_handle.await {
            let error = ProcessingError::from(e);
            log::error!("[{}] Producer: {error}", error.severity().as_str());
        }
        for handle in consumer_handles {
            if let Err(e) = handle.await {
                let error = ProcessingError::from(e);
                log::error!("[{}] Worker: {error}", error.severity().as_str());
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    let error = ProcessingError::parallel_execution(format!(
                        "no result for image {index}"
                    ));
                    log::warn!("[{}] {error}", error.severity().as_str());
                    DetectionResult::failed(
                        DetectionFailure::Internal {
                            message: "worker stopped before producing a result".to_string(),
                        },
                        &names[index],
                        index as i32,
                        0.0,
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{MockProcessingConfig, MockProgressReporter};
    use crate::processing::reporting::NoOpProgressReporter;
    use image::GrayImage;

    fn items(sizes: &[u32]) -> Vec<WorkItem> {
        sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| WorkItem {
                index,
                image: GrayImage::new(size, size),
                filename: format!("img_{index}.png"),
            })
            .collect()
    }

    fn config(workers: usize, buffer: usize) -> MockProcessingConfig {
        let mut config = MockProcessingConfig::new();
        config.expect_max_concurrent_tasks().return_const(workers);
        config.expect_channel_buffer_size().return_const(buffer);
        config
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_results_are_in_submission_order() {
        let pipeline = DetectionPipeline::new(Arc::new(CorePointDetector::default()));
        let sizes = [0, 50, 0, 20, 0, 99, 10, 0];

        let results = pipeline
            .execute(items(&sizes), &config(3, 2), &NoOpProgressReporter::new())
            .await;

        assert_eq!(results.len(), sizes.len());
        for (index, (result, &size)) in results.iter().zip(&sizes).enumerate() {
            assert_eq!(result.roi.file_index, index as i32);
            assert_eq!(result.roi.filename, format!("img_{index}.png"));
            let expected_empty = size == 0;
            assert_eq!(result.failure == Some(DetectionFailure::EmptyImage), expected_empty);
        }
    }

    #[tokio::test]
    async fn test_reporter_receives_progress_and_errors() {
        let mut reporter = MockProgressReporter::new();
        reporter.expect_report_progress().times(3).returning(|_, _| ());
        reporter
            .expect_report_error()
            .times(3)
            .returning(|_, error| assert_eq!(error, "Input image is empty"));

        let pipeline = DetectionPipeline::new(Arc::new(CorePointDetector::default()));
        let results = pipeline.execute(items(&[0, 0, 0]), &config(2, 1), &reporter).await;

        assert!(results.iter().all(|r| !r.success));
    }

    #[tokio::test]
    async fn test_zero_buffer_is_treated_as_one() {
        let pipeline = DetectionPipeline::new(Arc::new(CorePointDetector::default()));
        let results = pipeline
            .execute(items(&[0, 0]), &config(0, 0), &NoOpProgressReporter::new())
            .await;

        assert_eq!(results.len(), 2);
    }
}
