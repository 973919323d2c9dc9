// エラーハンドリングの統合テスト
use crate::fixtures::{flat_image, write_corrupted};
use fingerprint_roi::{
    core::{ErrorSeverity, FailureCategory},
    image_loader::ImageLoaderBackend,
    CorePointDetector, DefaultProcessingConfig, DetectionFailure,
    DetectionParams, LoaderError, ProcessingError, StandardImageLoader,
};
use image::{DynamicImage, GrayImage};
use tempfile::TempDir;

#[tokio::test]
async fn test_corrupted_file_reports_decode_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_corrupted(temp_dir.path(), "broken.png");

    let error = StandardImageLoader::new().load_from_path(&path).await.unwrap_err();

    assert!(matches!(error, LoaderError::Decode { .. }));
    assert!(error.to_string().contains("broken.png"));
}

#[test]
fn test_every_failure_has_a_message() {
    let detector = CorePointDetector::new(DetectionParams::default());
    let inputs = [
        GrayImage::new(0, 0),
        GrayImage::new(100, 101),
        flat_image(200, 200),
        flat_image(101, 101),
    ];

    for (index, image) in inputs.iter().enumerate() {
        let result = detector.detect(image, "x.png", index as i32);
        assert!(!result.success);
        assert!(!result.error_message().unwrap().is_empty());
        assert!(result.core_point.is_none());
    }
}

#[test]
fn test_non_grayscale_input_is_rejected() {
    let detector = CorePointDetector::default();
    let rgba = DynamicImage::new_rgba8(256, 256);

    let result = detector.detect_dynamic(&rgba, "color.png", 0);

    assert_eq!(result.failure, Some(DetectionFailure::NotGrayscale));
    assert_eq!(result.error_message().as_deref(), Some("Input image must be grayscale"));
}

#[test]
fn test_failure_categories() {
    assert_eq!(DetectionFailure::EmptyImage.category(), FailureCategory::InputShape);
    assert_eq!(
        DetectionFailure::LowConfidence { confidence: 0.1 }.category(),
        FailureCategory::QualityOrConfidence
    );
    assert_eq!(
        DetectionFailure::Internal {
            message: "boom".to_string()
        }
        .category(),
        FailureCategory::Computational
    );
}

#[test]
fn test_configuration_error_severity() {
    let error = DefaultProcessingConfig::new()
        .with_buffer_size(0)
        .validate()
        .unwrap_err();

    assert!(matches!(error, ProcessingError::ConfigurationError { .. }));
    assert_eq!(error.severity(), ErrorSeverity::High);
    assert!(!error.is_recoverable());
}

#[test]
fn test_invalid_params_are_normalized() {
    let params = DetectionParams::default()
        .with_gaussian(4, 1.0)
        .with_sobel_kernel_size(9)
        .with_block_size(0)
        .with_min_confidence(3.0);

    let detector = CorePointDetector::new(params);

    assert_eq!(detector.params().gaussian_kernel_size, 5);
    assert_eq!(detector.params().sobel_kernel_size, 7);
    assert_eq!(detector.params().block_size, 2);
    assert_eq!(detector.params().min_confidence, 1.0);
}
