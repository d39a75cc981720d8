//! セッション共有のサムネイル状態
//!
//! 撮影画面のバッジ（最新サムネイル＋枚数）の元になる状態。
//! CaptureController と ReviewCollection がコンストラクタで同じ
//! `SharedThumbnailState` を受け取り、どちらも更新する。
//!
//! ## 書き込みの規律
//! ロックは使わない。全ての操作は単一の論理スレッド上で協調的に動き、
//! 書き込むのは「現在論理スレッドを保持している操作」だけ。
//! 各メソッドは借用を内部で完結させ、`.await` をまたいで借用を保持しない。

use notecap_common::to_jpeg_data_url;
use std::cell::RefCell;
use std::rc::Rc;

use crate::transfer::UploadedImage;

/// セッション中の最新サムネイル・枚数・最終画像ID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionThumbnailState {
    /// Base64のサムネイル（プレフィックスなし）
    pub latest_thumbnail: Option<String>,
    /// サーバーの確定枚数
    pub image_count: usize,
    pub last_image_id: Option<String>,
}

/// 撮影画面に出すバッジ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailBadge {
    pub thumbnail_url: String,
    pub image_count: usize,
}

impl SessionThumbnailState {
    /// サムネイルがある時だけバッジを表示する
    pub fn badge(&self) -> Option<ThumbnailBadge> {
        self.latest_thumbnail.as_ref().map(|thumbnail| ThumbnailBadge {
            thumbnail_url: to_jpeg_data_url(thumbnail),
            image_count: self.image_count,
        })
    }
}

/// 複数の画面で共有する `SessionThumbnailState`
#[derive(Debug, Clone, Default)]
pub struct SharedThumbnailState {
    inner: Rc<RefCell<SessionThumbnailState>>,
}

impl SharedThumbnailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionThumbnailState {
        self.inner.borrow().clone()
    }

    pub fn image_count(&self) -> usize {
        self.inner.borrow().image_count
    }

    pub fn last_image_id(&self) -> Option<String> {
        self.inner.borrow().last_image_id.clone()
    }

    pub fn badge(&self) -> Option<ThumbnailBadge> {
        self.inner.borrow().badge()
    }

    /// アップロード結果で置き換える（マージしない）
    pub fn apply_upload(&self, uploaded: &UploadedImage) {
        let mut state = self.inner.borrow_mut();
        state.latest_thumbnail = Some(uploaded.thumbnail_data.clone());
        state.image_count = uploaded.image_count;
        state.last_image_id = Some(uploaded.image_id.clone());
    }

    pub fn set_image_count(&self, count: usize) {
        self.inner.borrow_mut().image_count = count;
    }

    /// 撮影画面のバッジを別の画像に差し替える
    pub fn set_latest(&self, image_id: &str, thumbnail: &str) {
        let mut state = self.inner.borrow_mut();
        state.latest_thumbnail = Some(thumbnail.to_string());
        state.last_image_id = Some(image_id.to_string());
    }

    pub fn clear_thumbnail(&self) {
        let mut state = self.inner.borrow_mut();
        state.latest_thumbnail = None;
        state.last_image_id = None;
    }

    pub fn reset(&self) {
        *self.inner.borrow_mut() = SessionThumbnailState::default();
    }
}
