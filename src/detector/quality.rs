// 画像品質の評価
// コントラスト（標準偏差/255）とシャープネス（ラプラシアン応答の標準偏差/1000）の合成

use crate::core::Roi;
use crate::imaging::{image_mean_std, laplacian, mean_std};
use image::GrayImage;

/// 画像全体の品質 [0.0, 1.0]
pub fn assess_image_quality(image: &GrayImage) -> f32 {
    let contrast = (image_mean_std(image).std_dev / 255.0) as f32;
    let sharpness = (mean_std(laplacian(image)).std_dev / 1000.0) as f32;

    (contrast + sharpness * 0.5).min(1.0)
}

/// ROIの品質（同じ式をROIに適用）
pub fn assess_roi_quality(roi: &Roi) -> f32 {
    assess_image_quality(&roi.to_gray_image())
}
