//! 撮影ソース
//!
//! カメラの代わりにフォルダ内の写真を1枚ずつ「撮影」する実装を持つ。

use crate::error::{NoteCaptureError, Result};
use crate::transfer::LocalImageHandle;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 画像の取得元（カメラなど）
#[async_trait(?Send)]
pub trait ImageSource {
    /// 1枚撮影してローカル画像の参照を返す。失敗は `Acquisition`
    async fn acquire(&self) -> Result<LocalImageHandle>;
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// フォルダ直下の画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(NoteCaptureError::Acquisition(format!(
            "フォルダが見つかりません: {}",
            folder.display()
        )));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// 用意した写真を順番に返す撮影ソース
#[derive(Debug, Default)]
pub struct FolderImageSource {
    queue: RefCell<VecDeque<PathBuf>>,
}

impl FolderImageSource {
    pub fn scan(folder: &Path) -> Result<Self> {
        Ok(Self::from_paths(scan_folder(folder)?))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            queue: RefCell::new(paths.into()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[async_trait(?Send)]
impl ImageSource for FolderImageSource {
    async fn acquire(&self) -> Result<LocalImageHandle> {
        let next = self.queue.borrow_mut().pop_front();
        let path = next
            .ok_or_else(|| NoteCaptureError::Acquisition("撮影できる写真が残っていません".into()))?;

        let absolute = tokio::fs::canonicalize(&path).await.map_err(|e| {
            NoteCaptureError::Acquisition(format!("{}: {}", path.display(), e))
        })?;
        Ok(LocalImageHandle::from_path(&absolute))
    }
}
