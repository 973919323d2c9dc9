// Producer - 作業の投入

use super::super::types::WorkItem;
use tokio::sync::mpsc;

/// 作業を順に投入する（キューが満杯の間は待機する）
pub fn spawn_producer(
    items: Vec<WorkItem>,
    work_tx: mpsc::Sender<WorkItem>,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut sent = 0;
        for item in items {
            if work_tx.send(item).await.is_err() {
                log::warn!("Work queue closed after {sent} items");
                break;
            }
            sent += 1;
        }
        sent
    })
}
