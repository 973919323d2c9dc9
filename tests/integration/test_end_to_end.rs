// エンドツーエンド統合テスト
use crate::fixtures::{flat_image, noise_square, write_corrupted, write_png};
use clap::Parser;
use fingerprint_roi::cli::{execute_process, Cli};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// テスト環境をセットアップ：検出できる画像・できない画像・非画像を含むディレクトリ
fn setup_test_images(base_dir: &std::path::Path) {
    write_png(base_dir, "a_print.png", &noise_square(17));
    write_png(base_dir, "b_flat.png", &flat_image(200, 200));
    write_png(base_dir, "c_small.png", &flat_image(80, 80));
    write_corrupted(base_dir, "d_corrupted.png");
    fs::write(base_dir.join("readme.txt"), "This is a text file").unwrap();

    let nested = base_dir.join("nested");
    fs::create_dir_all(&nested).unwrap();
    write_png(&nested, "e_nested.png", &noise_square(23));
}

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["fingerprint_roi"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_directory_workflow() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_test_images(input.path());
    let params = output.path().join("params.json");
    fs::write(&params, r#"{ "min_confidence": 0.05 }"#).unwrap();

    let cli = cli(&[
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
        "--config",
        params.to_str().unwrap(),
        "--threads",
        "2",
    ]);
    let report = execute_process(&cli).await.unwrap();

    // 非再帰なので nested は対象外、readme.txt も除外
    assert_eq!(report.summary.total_images, 4);
    assert_eq!(report.summary.successful, 1);
    assert_eq!(report.summary.failed, 3);

    let names: Vec<_> = report.images.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["a_print.png", "b_flat.png", "c_small.png", "d_corrupted.png"]);

    // 成功した画像のROIが保存されている
    let roi_path = output.path().join("a_print_roi_0.png");
    assert!(roi_path.exists());
    let roi = image::open(&roi_path).unwrap().to_luma8();
    assert_eq!(roi.dimensions(), (101, 101));

    assert!(report.images[1]
        .error
        .as_deref()
        .unwrap()
        .starts_with("Image quality too low"));
    assert!(report.images[2].error.as_deref().unwrap().contains("too small"));
    assert_eq!(report.images[3].error.as_deref(), Some("Input image is empty"));

    // レポートJSON
    let json: Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(json["summary"]["total_images"], 4);
    assert_eq!(json["detector_stats"]["total_images_processed"], 4);
    assert_eq!(json["cache"]["total_entries"], 3);
    assert_eq!(json["images"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_recursive_sequential_with_limit() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_test_images(input.path());

    let cli = cli(&[
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        output.path().to_str().unwrap(),
        "--recursive",
        "--sequential",
        "-n",
        "10",
    ]);
    let report = execute_process(&cli).await.unwrap();

    assert_eq!(report.summary.total_images, 5);
    assert!(report.images.iter().any(|r| r.filename == "e_nested.png"));

    let limited = execute_process(&cli_with_limit(input.path(), output.path(), 2))
        .await
        .unwrap();
    assert_eq!(limited.summary.total_images, 2);
}

fn cli_with_limit(input: &std::path::Path, output: &std::path::Path, limit: usize) -> Cli {
    let limit = limit.to_string();
    cli(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-n",
        &limit,
    ])
}

#[tokio::test]
async fn test_missing_input_directory_fails() {
    let output = TempDir::new().unwrap();
    let cli = cli(&[
        "-i",
        "/nonexistent/fingerprints",
        "-o",
        output.path().to_str().unwrap(),
    ]);

    let error = execute_process(&cli).await.unwrap_err();
    assert!(error.to_string().contains("Input directory does not exist"));
}
