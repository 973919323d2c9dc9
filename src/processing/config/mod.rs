// バッチ処理の設定管理

use crate::core::{ProcessingConfig, ProcessingError, ProcessingResult};
use crate::image_loader::cache::DEFAULT_CACHE_SIZE_BYTES;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessingConfig {
    max_concurrent: usize,
    buffer_size: usize,
    cache_size_bytes: usize,
    enable_progress: bool,
}

impl DefaultProcessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_cache_size_bytes(mut self, cache_size_bytes: usize) -> Self {
        self.cache_size_bytes = cache_size_bytes;
        self
    }

    pub fn with_cache_size_mb(self, cache_size_mb: usize) -> Self {
        self.with_cache_size_bytes(cache_size_mb.saturating_mul(1024 * 1024))
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// 実行可能な設定かどうかを検証
    pub fn validate(&self) -> ProcessingResult<()> {
        if self.max_concurrent == 0 {
            return Err(ProcessingError::configuration(
                "最大同時実行数は1以上である必要があります",
            ));
        }
        if self.buffer_size == 0 {
            return Err(ProcessingError::configuration(
                "チャンネルバッファサイズは1以上である必要があります",
            ));
        }
        Ok(())
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent: num_cpus::get().max(1) * 2,
            buffer_size: 100,
            cache_size_bytes: DEFAULT_CACHE_SIZE_BYTES,
            enable_progress: true,
        }
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn cache_size_bytes(&self) -> usize {
        self.cache_size_bytes
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
