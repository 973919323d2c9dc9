// 統合テストのエントリポイント

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod test_batch;
mod test_cache;
mod test_end_to_end;
mod test_error_handling;
