// バッチ処理システムのトレイト定義

use async_trait::async_trait;
use mockall::automock;

/// バッチ処理の設定を抽象化するトレイト
#[automock]
pub trait ProcessingConfig: Send + Sync {
    /// 最大同時実行タスク数（ワーカー数）を取得
    fn max_concurrent_tasks(&self) -> usize;

    /// タスクキューの深さ（バックプレッシャーの上限）を取得
    fn channel_buffer_size(&self) -> usize;

    /// 画像キャッシュの上限（バイト）を取得
    fn cache_size_bytes(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_images: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// 検出失敗時の報告
    async fn report_error(&self, filename: &str, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, total_succeeded: usize, total_failed: usize);
}
