//! 画像転送モジュール
//!
//! バックエンドとのやり取りを `ImageTransport` トレイトに集約する。
//! 実装は状態を持たず、SessionThumbnailState の更新は呼び出し側の責務。
//!
//! タイムアウト方針: 全ての通信に同じ上限時間を適用し、超過時は
//! リクエストのFutureを破棄して転送を中断する。自動リトライはしない。

mod http;

pub use http::HttpTransferClient;

use crate::error::{NoteCaptureError, Result};
use async_trait::async_trait;
use notecap_common::{GenerationStatus, NoteSummary, ThumbnailEntry, UploadResponse};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FILE_SCHEME: &str = "file://";

/// 撮影直後のローカル画像への参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImageHandle {
    uri: String,
}

impl LocalImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(format!("{}{}", FILE_SCHEME, path.display()))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// `file://` のURIだけをローカル画像として受け付ける
    pub fn local_path(&self) -> Result<PathBuf> {
        match self.uri.strip_prefix(FILE_SCHEME) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Err(NoteCaptureError::InvalidInput(format!(
                "ローカル画像ではありません: {}",
                self.uri
            ))),
        }
    }
}

/// アップロード結果（サーバーの確定値）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub image_id: String,
    pub thumbnail_data: String,
    pub image_count: usize,
}

impl From<UploadResponse> for UploadedImage {
    fn from(response: UploadResponse) -> Self {
        Self {
            image_id: response.image_id,
            thumbnail_data: response.thumbnail_image,
            image_count: response.number_of_images,
        }
    }
}

/// サムネイル一覧の1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRecord {
    pub image_id: String,
    pub thumbnail_data: String,
}

impl From<ThumbnailEntry> for ThumbnailRecord {
    fn from(entry: ThumbnailEntry) -> Self {
        Self {
            image_id: entry.image_id,
            thumbnail_data: entry.thumbnail_image,
        }
    }
}

/// バックエンドとの転送操作
///
/// 全体が単一の論理スレッドで動く前提のため `?Send`。
#[async_trait(?Send)]
pub trait ImageTransport {
    async fn create_note(&self) -> Result<String>;

    async fn list_notes(&self) -> Result<Vec<NoteSummary>>;

    /// 画像を1枚アップロードする。`file://` 以外は通信前に `InvalidInput`。
    async fn upload(&self, session_id: &str, image: &LocalImageHandle) -> Result<UploadedImage>;

    async fn fetch_thumbnails(&self, notes_id: &str) -> Result<Vec<ThumbnailRecord>>;

    /// フル画像をBase64文字列で返す
    async fn fetch_full_image(&self, image_id: &str) -> Result<String>;

    /// 存在しないIDは `Transfer { kind: NotFound }` として返す
    async fn delete_image(&self, image_id: &str) -> Result<()>;

    async fn start_generation(&self, notes_id: &str) -> Result<GenerationStatus>;
}

/// 上限時間付きで実行する
///
/// 超過した場合は `fut` を破棄（＝転送中断）して `Timeout` を返す。
pub async fn with_deadline<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, limit_secs = limit.as_secs(), "request timed out");
            Err(NoteCaptureError::Timeout {
                operation,
                seconds: limit.as_secs(),
            })
        }
    }
}
