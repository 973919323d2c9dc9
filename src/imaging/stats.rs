// 平均・標準偏差（母集団）の計算

use image::GrayImage;

/// 平均と標準偏差
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanStd {
    pub mean: f64,
    pub std_dev: f64,
}

/// 任意の値列の平均と標準偏差
pub fn mean_std<I>(values: I) -> MeanStd
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for v in values {
        count += 1;
        sum += v;
        sum_sq += v * v;
    }
    if count == 0 {
        return MeanStd::default();
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
    MeanStd {
        mean,
        std_dev: variance.sqrt(),
    }
}

/// 画像全体の平均と標準偏差
pub fn image_mean_std(image: &GrayImage) -> MeanStd {
    mean_std(image.as_raw().iter().map(|&p| p as f64))
}

/// 矩形領域 `[x, x+w) x [y, y+h)` の平均と標準偏差
///
/// 領域は画像内に収まっている必要がある。
pub fn region_mean_std(image: &GrayImage, x: usize, y: usize, w: usize, h: usize) -> MeanStd {
    let stride = image.width() as usize;
    let raw = image.as_raw();
    mean_std(
        (y..y + h).flat_map(|row| raw[row * stride + x..row * stride + x + w].iter().map(|&p| p as f64)),
    )
}
