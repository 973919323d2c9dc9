// 画像処理の基本演算
// 検出器が組み合わせて使うフィルタ・統計量・勾配計算

pub mod filters;
pub mod gradient;
pub mod stats;

pub use filters::{equalize_histogram, gaussian_blur, laplacian, normalize_min_max};
pub use gradient::{
    select_strategy, simd_available, GradientField, GradientStrategy, LaneGradient,
    ScalarGradient, SobelKernel,
};
pub use stats::{image_mean_std, mean_std, region_mean_std, MeanStd};
