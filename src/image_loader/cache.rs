// 画像キャッシュ（メモリ上限つきLRU）
//
// マップと合計バイト数は1つのロックで保護する。取り出しは常に複製を返す。

use image::GrayImage;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const BYTES_PER_MB: usize = 1024 * 1024;

/// デフォルトのキャッシュ上限（256MB）
pub const DEFAULT_CACHE_SIZE_BYTES: usize = 256 * BYTES_PER_MB;

/// キャッシュのエントリ
#[derive(Debug, Clone)]
struct CacheEntry {
    image: GrayImage,
    source_path: PathBuf,
    footprint_bytes: usize,
    last_accessed: Instant,
    /// 同一時刻のアクセスを順序付けるための通し番号
    access_tick: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    total_bytes: usize,
    hits: u64,
    misses: u64,
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.total_bytes -= entry.footprint_bytes;
        Some(entry)
    }

    /// 最終アクセスが最も古いエントリを取り除く
    fn evict_oldest(&mut self) -> Option<CacheEntry> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.last_accessed, entry.access_tick))
            .map(|(key, _)| key.clone())?;
        self.remove(&oldest)
    }
}

/// キャッシュ統計
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStatistics {
    pub total_entries: usize,
    pub total_memory_bytes: usize,
    pub total_memory_mb: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_ratio: f64,
}

/// バイト数で上限を設定するLRU画像キャッシュ
#[derive(Debug)]
pub struct ImageCache {
    capacity_bytes: usize,
    state: Mutex<CacheState>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE_BYTES)
    }
}

impl ImageCache {
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn with_capacity_mb(capacity_mb: usize) -> Self {
        Self::new(capacity_mb.saturating_mul(BYTES_PER_MB))
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// キャッシュキー: 正規化された絶対パス
    ///
    /// 実在するファイルはシンボリックリンクを解決した正規パス、
    /// 解決できない場合は字句的に正規化した絶対パスを使う。
    pub fn key_for(path: &Path) -> String {
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| {
            let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            normalize_lexically(&absolute)
        });
        resolved.to_string_lossy().into_owned()
    }

    /// キャッシュから取り出す（ヒット時は最終アクセスを更新し、複製を返す）
    pub fn get(&self, path: &Path) -> Option<GrayImage> {
        let key = Self::key_for(path);
        let mut state = self.lock();
        let tick = state.next_tick();

        let entry = state.entries.get_mut(&key)?;
        entry.last_accessed = Instant::now();
        entry.access_tick = tick;
        let image = entry.image.clone();

        state.hits += 1;
        log::debug!("Cache hit: {key}");
        Some(image)
    }

    /// デコード済みの画像を登録する（ミスとして数える）
    ///
    /// 同じキーが既にあれば置き換える。登録後、合計が上限を超えている間は
    /// 最終アクセスが最も古いものから追い出す。
    pub fn insert(&self, path: &Path, image: &GrayImage) {
        let key = Self::key_for(path);
        let footprint_bytes = image.width() as usize * image.height() as usize;
        let mut state = self.lock();
        let access_tick = state.next_tick();

        state.misses += 1;
        state.remove(&key);
        state.entries.insert(
            key.clone(),
            CacheEntry {
                image: image.clone(),
                source_path: path.to_path_buf(),
                footprint_bytes,
                last_accessed: Instant::now(),
                access_tick,
            },
        );
        state.total_bytes += footprint_bytes;
        log::debug!("Added to cache: {key} ({footprint_bytes} bytes)");

        while state.total_bytes > self.capacity_bytes {
            match state.evict_oldest() {
                Some(evicted) => {
                    log::debug!("Evicted from cache: {}", evicted.source_path.display())
                }
                None => break,
            }
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        let key = Self::key_for(path);
        self.lock().entries.contains_key(&key)
    }

    /// 指定パスのエントリを削除
    pub fn remove(&self, path: &Path) -> bool {
        let key = Self::key_for(path);
        let removed = self.lock().remove(&key).is_some();
        if removed {
            log::debug!("Removed from cache: {key}");
        }
        removed
    }

    /// すべてのエントリを削除（統計は保持）
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.total_bytes = 0;
        log::info!("Image cache cleared");
    }

    /// キャッシュ済みのキー一覧（ソート済み）
    pub fn cached_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self.lock().entries.keys().cloned().collect();
        files.sort();
        files
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_bytes(&self) -> usize {
        self.lock().total_bytes
    }

    pub fn statistics(&self) -> CacheStatistics {
        let state = self.lock();
        let requests = state.hits + state.misses;
        CacheStatistics {
            total_entries: state.entries.len(),
            total_memory_bytes: state.total_bytes,
            total_memory_mb: state.total_bytes as f64 / BYTES_PER_MB as f64,
            cache_hits: state.hits,
            cache_misses: state.misses,
            hit_ratio: if requests > 0 {
                state.hits as f64 / requests as f64
            } else {
                0.0
            },
        }
    }

    /// ヒット・ミスの計数をリセット
    pub fn reset_statistics(&self) {
        let mut state = self.lock();
        state.hits = 0;
        state.misses = 0;
    }
}

/// `.` と `..` を字句的に解決する
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
