// バッチ検出の統合テスト
use crate::fixtures::{flat_image, noise_square, strip_timing};
use fingerprint_roi::{
    BatchDetector, CorePointDetector, DefaultProcessingConfig, DetectionParams,
    NoOpProgressReporter, ROI_SIZE,
};
use image::GrayImage;
use std::sync::Arc;

fn params() -> DetectionParams {
    DetectionParams::default().with_min_confidence(0.05)
}

fn batch_images() -> Vec<GrayImage> {
    (0..12)
        .map(|i| match i % 4 {
            0 | 1 => noise_square(100 + i),
            2 => flat_image(220, 180),
            _ => GrayImage::new(0, 0),
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_and_sequential_results_are_identical() {
    let detector = Arc::new(CorePointDetector::new(params()));
    let engine = BatchDetector::with_shared_detector(
        detector.clone(),
        DefaultProcessingConfig::new().with_max_concurrent(4).with_buffer_size(3),
        NoOpProgressReporter::new(),
    );
    let names: Vec<String> = (0..12).map(|i| format!("print_{i:02}.png")).collect();

    let mut parallel = engine.detect_batch(batch_images(), &names, true).await;
    let mut sequential = engine.detect_batch(batch_images(), &names, false).await;
    strip_timing(&mut parallel);
    strip_timing(&mut sequential);

    assert_eq!(parallel, sequential);
    for (index, result) in parallel.iter().enumerate() {
        assert_eq!(result.roi.file_index, index as i32);
        assert_eq!(result.roi.filename, names[index]);
        if result.success {
            assert_eq!(result.roi.pixels().len(), ROI_SIZE * ROI_SIZE);
            assert!(result.confidence().unwrap() >= detector.params().min_confidence);
        } else {
            assert!(result.error_message().is_some());
        }
    }
    assert_eq!(parallel.iter().filter(|r| r.success).count(), 6);

    let stats = detector.stats();
    assert_eq!(stats.total_images_processed, 24);
    assert_eq!(stats.successful_detections, 12);
    assert_eq!(stats.failed_detections, 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_small_queue_applies_backpressure_without_loss() {
    let engine = BatchDetector::new(
        CorePointDetector::new(params()),
        DefaultProcessingConfig::new().with_max_concurrent(2).with_buffer_size(1),
        NoOpProgressReporter::new(),
    );
    let images: Vec<GrayImage> = (0..40).map(|_| GrayImage::new(0, 0)).collect();

    let results = engine.detect_batch(images, &[], true).await;

    assert_eq!(results.len(), 40);
    assert!(results
        .iter()
        .enumerate()
        .all(|(i, r)| r.roi.file_index == i as i32 && r.roi.filename.is_empty()));
}

#[tokio::test]
async fn test_single_image_runs_sequentially() {
    let engine = BatchDetector::new(
        CorePointDetector::new(params()),
        DefaultProcessingConfig::default(),
        NoOpProgressReporter::new(),
    );

    let (results, summary) = engine
        .detect_batch_with_summary(vec![noise_square(42)], &["one.png".to_string()], true)
        .await;

    assert!(results[0].success);
    assert_eq!(summary.total_images, 1);
    assert_eq!(summary.successful, 1);
}
