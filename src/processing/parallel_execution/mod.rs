// 並列実行機能
// Producer-Consumer パターンによる検出の並列実行

pub mod consumer;
pub mod pipeline;
pub mod producer;

// 公開API
pub use consumer::{spawn_consumers, spawn_single_consumer};
pub use pipeline::DetectionPipeline;
pub use producer::spawn_producer;
