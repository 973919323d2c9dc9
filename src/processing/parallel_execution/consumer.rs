// Consumer - 並列ワーカー機能

use super::super::types::{IndexedResult, WorkItem};
use crate::core::{DetectionFailure, DetectionResult};
use crate::detector::CorePointDetector;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// 1件の検出をブロッキングスレッドで実行する
pub(crate) async fn run_detection(detector: Arc<CorePointDetector>, item: WorkItem) -> IndexedResult {
    let WorkItem {
        index,
        image,
        filename,
    } = item;
    let file_index = index as i32;
    let fallback_name = filename.clone();

    let joined = tokio::task::spawn_blocking(move || detector.detect(&image, &filename, file_index)).await;

    let result = joined.unwrap_or_else(|e| {
        log::error!("Detection task for '{fallback_name}' failed: {e}");
        DetectionResult::failed(
            DetectionFailure::Internal {
                message: e.to_string(),
            },
            &fallback_name,
            file_index,
            0.0,
        )
    });
    (index, result)
}

/// 単一Consumerワーカー
pub fn spawn_single_consumer(
    worker_id: usize,
    detector: Arc<CorePointDetector>,
    work_rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    result_tx: mpsc::Sender<IndexedResult>,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut processed = 0;
        loop {
            // 次の作業を取得
            let item = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(item) => item,
                    None => break, // チャンネル終了
                }
            };

            let result = run_detection(detector.clone(), item).await;
            processed += 1;

            if result_tx.send(result).await.is_err() {
                // 結果チャンネルが閉じられた場合は終了
                break;
            }
        }
        log::debug!("Worker {worker_id} finished after {processed} images");
        processed
    })
}

/// Consumers: 並列ワーカープール
pub fn spawn_consumers(
    detector: Arc<CorePointDetector>,
    work_rx: mpsc::Receiver<WorkItem>,
    result_tx: mpsc::Sender<IndexedResult>,
    worker_count: usize,
) -> Vec<tokio::task::JoinHandle<usize>> {
    let work_rx = Arc::new(Mutex::new(work_rx));

    (0..worker_count.max(1))
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                detector.clone(),
                work_rx.clone(),
                result_tx.clone(),
            )
        })
        .collect()
}
