// 方向場と隆線周波数の推定

use crate::imaging::{GradientStrategy, SobelKernel};
use image::GrayImage;

/// 画素ごとの f32 値を持つ2次元の場
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl ScalarField {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }
}

/// 方向場を計算する
///
/// 倍角表現 `0.5 * atan2(2·gx·gy, gx² − gy²)` で 180° の曖昧さを解消する。
pub fn compute_orientation_field(
    image: &GrayImage,
    strategy: &dyn GradientStrategy,
    kernel: &SobelKernel,
) -> ScalarField {
    let gradients = strategy.gradients(image, kernel);
    let data = gradients
        .gx
        .iter()
        .zip(&gradients.gy)
        .map(|(&gx, &gy)| (2.0 * gx * gy).atan2(gx * gx - gy * gy) * 0.5)
        .collect();

    ScalarField {
        width: gradients.width,
        height: gradients.height,
        data,
    }
}

/// 累積和テーブル（画素値とその2乗）
struct IntegralImage {
    stride: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sum = vec![0u64; stride * (h + 1)];
        let mut sum_sq = vec![0u64; stride * (h + 1)];
        let raw = image.as_raw();

        for y in 0..h {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for x in 0..w {
                let v = raw[y * w + x] as u64;
                row_sum += v;
                row_sq += v * v;
                sum[(y + 1) * stride + x + 1] = sum[y * stride + x + 1] + row_sum;
                sum_sq[(y + 1) * stride + x + 1] = sum_sq[y * stride + x + 1] + row_sq;
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    fn rect(table: &[u64], stride: usize, x: usize, y: usize, w: usize, h: usize) -> u64 {
        table[(y + h) * stride + x + w] + table[y * stride + x]
            - table[y * stride + x + w]
            - table[(y + h) * stride + x]
    }

    /// 矩形領域の標準偏差
    fn std_dev(&self, x: usize, y: usize, w: usize, h: usize) -> f64 {
        let n = (w * h) as f64;
        let s = Self::rect(&self.sum, self.stride, x, y, w, h) as f64;
        let sq = Self::rect(&self.sum_sq, self.stride, x, y, w, h) as f64;
        let mean = s / n;
        (sq / n - mean * mean).max(0.0).sqrt()
    }
}

/// 隆線周波数の代替指標（局所標準偏差/255）を計算する
///
/// 端から `block_size / 2` 以内の画素は0のまま。
pub fn compute_ridge_frequency(image: &GrayImage, block_size: usize) -> ScalarField {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut frequency = ScalarField::zeros(w, h);
    let half = block_size / 2;
    if w < block_size || h < block_size {
        return frequency;
    }

    let integral = IntegralImage::new(image);
    for y in half..h - half {
        for x in half..w - half {
            let std_dev = integral.std_dev(x - half, y - half, block_size, block_size);
            frequency.set(x, y, (std_dev / 255.0) as f32);
        }
    }
    frequency
}
