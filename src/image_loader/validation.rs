// 読み込んだ画像が指紋処理に適しているかの簡易チェック

use crate::core::ROI_SIZE;
use crate::imaging::image_mean_std;
use image::GrayImage;

/// 指紋画像として妥当な大きさ
const MIN_FINGERPRINT_DIMENSION: u32 = 100;
const MAX_FINGERPRINT_DIMENSION: u32 = 2000;

/// 指紋画像として妥当か（サイズ 100..=2000 かつ標準偏差 > 10）
pub fn is_valid_fingerprint_image(image: &GrayImage) -> bool {
    let dims = MIN_FINGERPRINT_DIMENSION..=MAX_FINGERPRINT_DIMENSION;
    if !dims.contains(&image.width()) || !dims.contains(&image.height()) {
        return false;
    }
    image_mean_std(image).std_dev > 10.0
}

/// 検出処理に渡せない理由を返す（問題なければ `None`）
pub fn validate_image_for_processing(image: &GrayImage) -> Option<String> {
    if image.width() == 0 || image.height() == 0 {
        return Some("Image is empty".to_string());
    }
    if (image.width() as usize) < ROI_SIZE || (image.height() as usize) < ROI_SIZE {
        return Some(format!("Image too small (minimum {ROI_SIZE}x{ROI_SIZE})"));
    }
    if image_mean_std(image).std_dev < 5.0 {
        return Some("Image has insufficient contrast".to_string());
    }
    None
}
