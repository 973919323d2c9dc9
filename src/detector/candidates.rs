// 方向場の特異点に基づくコアポイント候補の探索・選択・検証

use super::orientation::ScalarField;
use super::params::DetectionParams;
use crate::core::{CorePoint, ROI_HALF_SIZE};
use crate::imaging::region_mean_std;
use image::GrayImage;
use std::f32::consts::PI;

/// 局所コントラスト検証の窓サイズ
const VALIDATION_WINDOW: usize = 21;

/// 角度差（円周上の距離）
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs();
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

/// (x, y) を中心とした局所方向分散
///
/// 半径 `block_size / 2` の窓を2画素おきにサンプリングし、中心方向との
/// 角度差の2乗平均を返す。
pub fn local_orientation_variance(
    orientation: &ScalarField,
    x: usize,
    y: usize,
    block_size: usize,
) -> Option<f32> {
    let half = (block_size / 2) as i64;
    let center = orientation.get(x, y);
    let mut sum = 0.0f32;
    let mut count = 0usize;

    for dy in (-half..=half).step_by(2) {
        for dx in (-half..=half).step_by(2) {
            let sy = y as i64 + dy;
            let sx = x as i64 + dx;
            if sy < 0 || sy >= orientation.height as i64 || sx < 0 || sx >= orientation.width as i64 {
                continue;
            }
            let diff = angular_difference(orientation.get(sx as usize, sy as usize), center);
            sum += diff * diff;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f32)
}

/// 候補を行優先順に探索する
pub fn detect_core_candidates(
    orientation: &ScalarField,
    frequency: &ScalarField,
    params: &DetectionParams,
) -> Vec<CorePoint> {
    let window = params.block_size;
    let step = (window / 2).max(1);
    let mut candidates = Vec::new();

    for y in (window..orientation.height.saturating_sub(window)).step_by(step) {
        for x in (window..orientation.width.saturating_sub(window)).step_by(step) {
            let Some(variance) = local_orientation_variance(orientation, x, y, window) else {
                continue;
            };
            if variance <= params.orientation_variance_threshold {
                continue;
            }

            let confidence = variance * frequency.get(x, y);
            if confidence > params.min_confidence {
                candidates.push(CorePoint::new(x as f32, y as f32, confidence));
            }
        }
    }

    log::debug!("Found {} core point candidates", candidates.len());
    candidates
}

/// 最も信頼度の高い候補を選ぶ（同値の場合は先に見つかったもの）
pub fn select_best_core_point(candidates: &[CorePoint]) -> Option<CorePoint> {
    candidates.iter().fold(None, |best: Option<CorePoint>, &candidate| match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    })
}

/// ROIを切り出せる位置にあるか（端から `ROI_HALF_SIZE` 以上離れている）
pub fn is_point_valid(point: &CorePoint, width: u32, height: u32) -> bool {
    let margin = ROI_HALF_SIZE as f32;
    point.x >= margin
        && point.x < width as f32 - margin
        && point.y >= margin
        && point.y < height as f32 - margin
        && point.confidence > 0.0
}

/// 候補の信頼度を局所コントラストで再評価する
///
/// 無効な位置の場合は0。結果は [0, 1] にクランプされる。
pub fn validate_core_point(image: &GrayImage, candidate: &CorePoint) -> f32 {
    if !is_point_valid(candidate, image.width(), image.height()) {
        return 0.0;
    }

    let x = candidate.x as i64;
    let y = candidate.y as i64;
    let half = (VALIDATION_WINDOW / 2) as i64;

    let confidence = if x - half < 0
        || x + half >= image.width() as i64
        || y - half < 0
        || y + half >= image.height() as i64
    {
        candidate.confidence * 0.5
    } else {
        let local = region_mean_std(
            image,
            (x - half) as usize,
            (y - half) as usize,
            VALIDATION_WINDOW,
            VALIDATION_WINDOW,
        );
        candidate.confidence * (local.std_dev / 255.0) as f32
    };

    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_field(width: usize, height: usize, value: f32) -> ScalarField {
        ScalarField {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[test]
    fn test_angular_difference_wraps() {
        assert!((angular_difference(0.1, -0.1) - 0.2).abs() < 1e-6);
        assert!((angular_difference(3.0, -3.0) - (2.0 * PI - 6.0)).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_orientation_has_no_candidates() {
        let orientation = uniform_field(100, 100, 0.7);
        let frequency = uniform_field(100, 100, 1.0);

        let candidates = detect_core_candidates(&orientation, &frequency, &DetectionParams::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_singularity_produces_candidate_at_center() {
        // (48, 48) の点だけ方向が大きく異なる
        let mut orientation = uniform_field(96, 96, 0.0);
        orientation.set(48, 48, 1.5);
        let frequency = uniform_field(96, 96, 0.5);

        let candidates = detect_core_candidates(&orientation, &frequency, &DetectionParams::default());

        assert_eq!(candidates.len(), 1);
        assert_eq!((candidates[0].x, candidates[0].y), (48.0, 48.0));
        // 81サンプル中80が1.5ずれている
        let expected_variance = 80.0 * 1.5f32 * 1.5 / 81.0;
        assert!((candidates[0].confidence - expected_variance * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_variance_threshold_is_configurable() {
        let mut orientation = uniform_field(96, 96, 0.0);
        orientation.set(48, 48, 1.5);
        let frequency = uniform_field(96, 96, 0.5);
        let params = DetectionParams::default().with_orientation_variance_threshold(3.0);

        assert!(detect_core_candidates(&orientation, &frequency, &params).is_empty());
    }

    #[test]
    fn test_select_best_prefers_first_on_tie() {
        let candidates = vec![
            CorePoint::new(10.0, 10.0, 0.4),
            CorePoint::new(20.0, 10.0, 0.9),
            CorePoint::new(30.0, 10.0, 0.9),
        ];

        let best = select_best_core_point(&candidates).unwrap();
        assert_eq!((best.x, best.y), (20.0, 10.0));
        assert!(select_best_core_point(&[]).is_none());
    }

    #[test]
    fn test_is_point_valid_margin() {
        assert!(is_point_valid(&CorePoint::new(50.0, 50.0, 0.5), 101, 101));
        assert!(!is_point_valid(&CorePoint::new(51.0, 50.0, 0.5), 101, 101));
        assert!(!is_point_valid(&CorePoint::new(49.0, 60.0, 0.5), 200, 200));
        assert!(!is_point_valid(&CorePoint::new(100.0, 100.0, 0.0), 200, 200));
    }

    #[test]
    fn test_validate_rescales_by_local_contrast() {
        let image = GrayImage::from_fn(200, 200, |x, _| image::Luma([if x % 2 == 0 { 0 } else { 255 }]));
        let candidate = CorePoint::new(100.0, 100.0, 0.8);

        let confidence = validate_core_point(&image, &candidate);

        // 21列の内訳は 0 が11列、255 が10列
        let p = 10.0f64 / 21.0;
        let expected_std = 255.0 * (p * (1.0 - p)).sqrt();
        assert!((confidence as f64 - 0.8 * expected_std / 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_validate_rejects_edge_points() {
        let image = GrayImage::from_pixel(200, 200, image::Luma([100]));
        assert_eq!(validate_core_point(&image, &CorePoint::new(20.0, 100.0, 0.9)), 0.0);
    }

    #[test]
    fn test_validate_clamps_to_one() {
        let image = GrayImage::from_fn(200, 200, |x, _| image::Luma([if x % 2 == 0 { 0 } else { 255 }]));
        let candidate = CorePoint::new(100.0, 100.0, 5.0);

        assert_eq!(validate_core_point(&image, &candidate), 1.0);
    }
}
