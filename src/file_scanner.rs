use crate::image_loader::is_supported_extension;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 入力ファイルの情報
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub filepath: PathBuf,
    pub filename: String,
    pub file_size: u64,
    pub is_valid: bool,
    pub error_message: Option<String>,
}

pub struct FileScanner;

impl FileScanner {
    /// サポート対象の画像ファイルをパス順に列挙する
    pub fn scan_directory(directory: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        if !directory.is_dir() {
            anyhow::bail!("Directory does not exist: {}", directory.display());
        }

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .sort_by_file_name();

        let mut file_paths = Vec::new();
        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to scan directory: {}", directory.display()))?;

            if entry.file_type().is_file() && is_supported_extension(entry.path()) {
                file_paths.push(entry.into_path());
            }
        }
        file_paths.sort();

        log::info!(
            "Found {} supported image files in {}",
            file_paths.len(),
            directory.display()
        );
        Ok(file_paths)
    }

    /// ファイルの存在・拡張子・サイズを調べる
    pub fn get_file_info(path: &Path) -> FileInfo {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut info = FileInfo {
            filepath: path.to_path_buf(),
            filename,
            file_size: 0,
            is_valid: false,
            error_message: None,
        };

        if !path.is_file() {
            info.error_message = Some("File does not exist".to_string());
            return info;
        }
        if !is_supported_extension(path) {
            info.error_message = Some("Unsupported file extension".to_string());
            return info;
        }

        info.file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        info.is_valid = true;
        info
    }
}

/// ファイル情報を順に取り出すバッチ
#[derive(Debug, Clone)]
pub struct FileBatch {
    files: Vec<FileInfo>,
    current_index: usize,
}

impl FileBatch {
    /// ディレクトリを走査して作成
    pub fn from_directory(directory: &Path, recursive: bool) -> Result<Self> {
        let paths = FileScanner::scan_directory(directory, recursive)?;
        Ok(Self::from_paths(&paths))
    }

    /// パスの一覧から作成（存在しないファイルも無効なエントリとして含める）
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        Self {
            files: paths.iter().map(|p| FileScanner::get_file_info(p)).collect(),
            current_index: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.files.len()
    }

    pub fn remaining(&self) -> usize {
        self.files.len() - self.current_index
    }

    /// 進捗率 [0.0, 1.0]（空のバッチは 1.0）
    pub fn progress(&self) -> f64 {
        if self.files.is_empty() {
            1.0
        } else {
            self.current_index as f64 / self.files.len() as f64
        }
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }
}

impl Iterator for FileBatch {
    type Item = FileInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let info = self.files.get(self.current_index)?.clone();
        self.current_index += 1;
        Some(info)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
