// 検出処理に関連するデータ型定義

use super::error::DetectionFailure;
use image::GrayImage;
use serde::Serialize;

/// ROIの一辺の長さ（ピクセル）
pub const ROI_SIZE: usize = 101;

/// ROI中心から端までの距離
pub const ROI_HALF_SIZE: i64 = (ROI_SIZE / 2) as i64;

/// 検出されたコアポイント（元画像のピクセル座標）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CorePoint {
    pub x: f32,
    pub y: f32,
    /// 信頼度 [0.0, 1.0]。0以下は未設定扱い
    pub confidence: f32,
}

impl CorePoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 有効な点かどうか（信頼度が正）
    pub fn is_set(&self) -> bool {
        self.confidence > 0.0
    }
}

/// コアポイントを中心とした 101x101 の切り出し領域
///
/// 画素数は常に `ROI_SIZE * ROI_SIZE`。コンストラクタ以外で
/// バッファを差し替える手段は提供しない。
#[derive(Debug, Clone, PartialEq)]
pub struct Roi {
    pixels: Vec<u8>,
    /// 元ファイルの識別子
    pub filename: String,
    /// バッチ内の位置（未設定は -1）
    pub file_index: i32,
}

impl Roi {
    /// ゼロ埋めのROIを作成
    pub fn empty(filename: impl Into<String>, file_index: i32) -> Self {
        Self {
            pixels: vec![0; ROI_SIZE * ROI_SIZE],
            filename: filename.into(),
            file_index,
        }
    }

    /// 行優先の画素列からROIを作成。長さが合わない場合は `None`
    pub fn from_pixels(pixels: Vec<u8>, filename: impl Into<String>, file_index: i32) -> Option<Self> {
        (pixels.len() == ROI_SIZE * ROI_SIZE).then(|| Self {
            pixels,
            filename: filename.into(),
            file_index,
        })
    }

    pub fn width(&self) -> usize {
        ROI_SIZE
    }

    pub fn height(&self) -> usize {
        ROI_SIZE
    }

    /// (x, y) の画素値
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * ROI_SIZE + x]
    }

    /// 行優先の画素列
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// 画像として書き出すための変換
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(ROI_SIZE as u32, ROI_SIZE as u32, |x, y| {
            image::Luma([self.get(x as usize, y as usize)])
        })
    }
}

/// 1枚の画像に対する検出結果
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// 検出されたコアポイント（成功時のみ）
    pub core_point: Option<CorePoint>,
    /// 切り出したROI（`success` の場合のみ意味を持つ）
    pub roi: Roi,
    /// 画像全体の品質 [0.0, 1.0]
    pub overall_quality: f32,
    /// 処理時間（マイクロ秒）
    pub processing_time_us: u64,
    /// 失敗理由
    pub failure: Option<DetectionFailure>,
    pub success: bool,
}

impl DetectionResult {
    /// 失敗結果を作成
    pub fn failed(
        failure: DetectionFailure,
        filename: &str,
        file_index: i32,
        overall_quality: f32,
    ) -> Self {
        Self {
            core_point: None,
            roi: Roi::empty(filename, file_index),
            overall_quality,
            processing_time_us: 0,
            failure: Some(failure),
            success: false,
        }
    }

    /// 人が読める失敗理由
    pub fn error_message(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }

    /// 成功時の信頼度
    pub fn confidence(&self) -> Option<f32> {
        self.core_point.map(|point| point.confidence)
    }
}

/// 検出器の累積統計
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProcessingStats {
    pub total_images_processed: usize,
    pub successful_detections: usize,
    pub failed_detections: usize,
    pub average_processing_time_us: f64,
    /// 成功した検出のみの平均信頼度
    pub average_confidence: f64,
    pub simd_operations_used: usize,
}

impl ProcessingStats {
    /// 成功率 [0.0, 1.0]
    pub fn success_rate(&self) -> f64 {
        if self.total_images_processed == 0 {
            0.0
        } else {
            self.successful_detections as f64 / self.total_images_processed as f64
        }
    }
}
