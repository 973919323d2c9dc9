// 指紋処理のエラー型定義
// 検出失敗・画像読み込み失敗・バッチ処理失敗をそれぞれ専用の型で表現する

use thiserror::Error;

/// 1枚の画像に対する検出失敗の理由
///
/// `Display` の文字列がそのまま `DetectionResult::error_message` になる。
/// どの失敗もバッチ全体を止めることはない。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionFailure {
    #[error("Input image is empty")]
    EmptyImage,

    #[error("Input image must be grayscale")]
    NotGrayscale,

    #[error("Input image too small (minimum 101x101, got {width}x{height})")]
    TooSmall { width: u32, height: u32 },

    #[error("Image quality too low for processing ({quality:.3})")]
    LowQuality { quality: f32 },

    #[error("No core point candidates found")]
    NoCandidates,

    #[error("Core point failed validation")]
    ValidationFailed,

    #[error("Core point confidence too low: {confidence:.6}")]
    LowConfidence { confidence: f32 },

    #[error("Exception during processing: {message}")]
    Internal { message: String },
}

impl DetectionFailure {
    /// 失敗の分類を取得
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::EmptyImage | Self::NotGrayscale | Self::TooSmall { .. } => {
                FailureCategory::InputShape
            }
            Self::LowQuality { .. }
            | Self::NoCandidates
            | Self::ValidationFailed
            | Self::LowConfidence { .. } => FailureCategory::QualityOrConfidence,
            Self::Internal { .. } => FailureCategory::Computational,
        }
    }
}

/// 検出失敗の大分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// 空・非グレースケール・サイズ不足
    InputShape,
    /// 品質ゲート・候補なし・信頼度不足・検証失敗
    QualityOrConfidence,
    /// 処理中の予期しないエラー
    Computational,
}

/// 画像読み込みのエラー
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File does not exist: {path}")]
    NotFound { path: String },

    #[error("Unsupported file extension: {path}")]
    UnsupportedExtension { path: String },

    #[error("Failed to load image: {path} - {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {path} - {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn blocking task for image loading: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl LoaderError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn decode(path: impl Into<String>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for LoaderError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }
}

/// 読み込み結果型
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;

/// バッチ処理・設定に関するエラー
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("ファイル発見エラー: {path} - {source}")]
    FileDiscoveryError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("並列処理エラー: {message}")]
    ParallelExecutionError { message: String },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ProcessingError {
    /// ファイル発見エラーの作成
    pub fn file_discovery(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::FileDiscoveryError {
            path: path.into(),
            source,
        }
    }

    /// 並列実行エラーの作成
    pub fn parallel_execution(message: impl Into<String>) -> Self {
        Self::ParallelExecutionError {
            message: message.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } | Self::ParallelExecutionError { .. } => {
                ErrorSeverity::High
            }
            Self::FileDiscoveryError { .. } => ErrorSeverity::Medium,
            Self::TaskError { .. } => ErrorSeverity::Critical,
        }
    }

    /// エラーが回復可能かどうかを判定
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigurationError { .. } => false,
            Self::FileDiscoveryError { .. }
            | Self::ParallelExecutionError { .. }
            | Self::TaskError { .. } => true,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - システム停止レベル
    Critical,
}

impl ErrorSeverity {
    /// 重要度の文字列表現を取得
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// バッチ処理の結果型
pub type ProcessingResult<T> = std::result::Result<T, ProcessingError>;

impl From<tokio::task::JoinError> for ProcessingError {
    fn from(error: tokio::task::JoinError) -> Self {
        ProcessingError::TaskError { source: error }
    }
}
