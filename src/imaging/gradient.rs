// Sobel勾配の計算戦略
//
// スカラー実装とレーン（8画素単位）実装の2つを用意し、検出器の生成時に
// 一度だけ選択する。両者は各画素で同じ順序の積和を行うため結果はビット単位で一致する。

use super::filters::clamp_index;
use image::GrayImage;
use std::fmt::Debug;

/// レーン実装で同時に処理する画素数
const LANES: usize = 8;

/// 分離型Sobelカーネル（平滑化 × 微分）
#[derive(Debug, Clone, PartialEq)]
pub struct SobelKernel {
    pub smooth: Vec<f32>,
    pub derivative: Vec<f32>,
}

impl SobelKernel {
    /// カーネルサイズ 1/3/5/7 に対応するSobelカーネルを作成
    ///
    /// サイズ1は平滑化なしの中心差分 `[-1, 0, 1]`。
    pub fn new(ksize: usize) -> Self {
        let ksize = match ksize {
            0 | 1 => 1,
            k if k % 2 == 0 => (k + 1).min(7),
            k => k.min(7),
        };

        let smooth = binomial_row(ksize - 1);
        let derivative = if ksize == 1 {
            vec![-1.0, 0.0, 1.0]
        } else {
            convolve(&binomial_row(ksize - 2), &[-1.0, 0.0, 1.0])
        };

        Self { smooth, derivative }
    }

    /// 実際のカーネルサイズ
    pub fn size(&self) -> usize {
        self.smooth.len()
    }
}

fn binomial_row(order: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 0..order {
        row = convolve(&row, &[1.0, 1.0]);
    }
    row
}

fn convolve(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0f32; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// x方向・y方向の勾配
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    pub width: usize,
    pub height: usize,
    pub gx: Vec<f32>,
    pub gy: Vec<f32>,
}

/// 勾配計算の戦略
pub trait GradientStrategy: Send + Sync + Debug {
    /// 戦略名
    fn name(&self) -> &'static str;

    /// SIMD向けの実装かどうか
    fn uses_simd(&self) -> bool;

    /// 水平方向の1次元畳み込み
    fn convolve_rows(&self, src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32>;

    /// 垂直方向の1次元畳み込み
    fn convolve_cols(&self, src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32>;

    /// Sobel勾配を計算
    fn gradients(&self, image: &GrayImage, kernel: &SobelKernel) -> GradientField {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let src: Vec<f32> = image.as_raw().iter().map(|&p| p as f32).collect();

        let dx = self.convolve_rows(&src, width, height, &kernel.derivative);
        let gx = self.convolve_cols(&dx, width, height, &kernel.smooth);

        let sx = self.convolve_rows(&src, width, height, &kernel.smooth);
        let gy = self.convolve_cols(&sx, width, height, &kernel.derivative);

        GradientField {
            width,
            height,
            gx,
            gy,
        }
    }
}

/// 画素ごとのスカラー実装
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarGradient;

impl GradientStrategy for ScalarGradient {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn uses_simd(&self) -> bool {
        false
    }

    fn convolve_rows(&self, src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
        let radius = (kernel.len() / 2) as i64;
        let mut out = vec![0.0f32; width * height];
        for y in 0..height {
            let row = &src[y * width..(y + 1) * width];
            for x in 0..width {
                let mut acc = 0.0f32;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = clamp_index(x as i64 + k as i64 - radius, width);
                    acc += weight * row[sx];
                }
                out[y * width + x] = acc;
            }
        }
        out
    }

    fn convolve_cols(&self, src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
        let radius = (kernel.len() / 2) as i64;
        let mut out = vec![0.0f32; width * height];
        for y in 0..height {
            for x in 0..width {
                let mut acc = 0.0f32;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sy = clamp_index(y as i64 + k as i64 - radius, height);
                    acc += weight * src[sy * width + x];
                }
                out[y * width + x] = acc;
            }
        }
        out
    }
}

/// 8画素単位で処理するレーン実装（自動ベクトル化向け）
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneGradient;

impl LaneGradient {
    /// `taps[k][x]` を重み付き加算して `out` に書き込む
    fn accumulate(taps: &[&[f32]], kernel: &[f32], out: &mut [f32]) {
        let width = out.len();
        let body = width - width % LANES;

        for base in (0..body).step_by(LANES) {
            let mut acc = [0.0f32; LANES];
            for (tap, &weight) in taps.iter().zip(kernel) {
                let lane = &tap[base..base + LANES];
                for l in 0..LANES {
                    acc[l] += weight * lane[l];
                }
            }
            out[base..base + LANES].copy_from_slice(&acc);
        }

        for x in body..width {
            let mut acc = 0.0f32;
            for (tap, &weight) in taps.iter().zip(kernel) {
                acc += weight * tap[x];
            }
            out[x] = acc;
        }
    }
}

impl GradientStrategy for LaneGradient {
    fn name(&self) -> &'static str {
        "simd-lanes"
    }

    fn uses_simd(&self) -> bool {
        true
    }

    fn convolve_rows(&self, src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
        let radius = kernel.len() / 2;
        let mut out = vec![0.0f32; width * height];
        let mut padded = vec![0.0f32; width + 2 * radius];

        for y in 0..height {
            let row = &src[y * width..(y + 1) * width];
            for (i, slot) in padded.iter_mut().enumerate() {
                *slot = row[clamp_index(i as i64 - radius as i64, width)];
            }
            let taps: Vec<&[f32]> = (0..kernel.len()).map(|k| &padded[k..k + width]).collect();
            Self::accumulate(&taps, kernel, &mut out[y * width..(y + 1) * width]);
        }
        out
    }

    fn convolve_cols(&self, src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
        let radius = (kernel.len() / 2) as i64;
        let mut out = vec![0.0f32; width * height];

        for y in 0..height {
            let taps: Vec<&[f32]> = (0..kernel.len())
                .map(|k| {
                    let sy = clamp_index(y as i64 + k as i64 - radius, height);
                    &src[sy * width..(sy + 1) * width]
                })
                .collect();
            Self::accumulate(&taps, kernel, &mut out[y * width..(y + 1) * width]);
        }
        out
    }
}

/// 実行環境がSIMD命令（AVX2 / NEON）をサポートしているか
pub fn simd_available() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }
    #[cfg(target_arch = "aarch64")]
    {
        std::arch::is_aarch64_feature_detected!("neon")
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

/// 設定に応じて勾配戦略を選択
pub fn select_strategy(use_simd: bool) -> Box<dyn GradientStrategy> {
    if use_simd && simd_available() {
        Box::new(LaneGradient)
    } else {
        Box::new(ScalarGradient)
    }
}
