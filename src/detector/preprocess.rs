// 前処理: ガウシアンぼかし → レンジ正規化 → ヒストグラム平坦化（この順序で固定）

use super::params::DetectionParams;
use crate::imaging::{equalize_histogram, gaussian_blur, normalize_min_max};
use image::GrayImage;

/// 検出用に画像を前処理する
pub fn preprocess_image(input: &GrayImage, params: &DetectionParams) -> GrayImage {
    let blurred = gaussian_blur(input, params.gaussian_kernel_size, params.gaussian_sigma);
    let normalized = normalize_min_max(&blurred);
    equalize_histogram(&normalized)
}
