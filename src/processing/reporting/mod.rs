// 進捗報告の実装

use crate::core::ProgressReporter;
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーも含めて何も出力しない
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_images: usize) {
        if !self.quiet {
            println!("🚀 Starting core point detection for {total_images} images...");
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && (completed % 10 == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 Progress: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_error(&self, filename: &str, error: &str) {
        if !self.quiet {
            eprintln!("❌ {filename}: {error}");
        }
    }

    async fn report_completed(&self, total_succeeded: usize, total_failed: usize) {
        if !self.quiet {
            println!("✅ Completed! Succeeded: {total_succeeded}, Failed: {total_failed}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_images: usize) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_error(&self, _filename: &str, _error: &str) {}

    async fn report_completed(&self, _total_succeeded: usize, _total_failed: usize) {}
}
