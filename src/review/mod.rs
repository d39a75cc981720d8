//! 撮影済み画像のレビュー
//!
//! サーバー順に並んだ {サムネイル, フル画像} の組を保持する。
//! 画像IDを正とし、位置（position）は並び順から毎回導出する。
//!
//! hydrate / remove / append / load_full_image は互いに直列化する。
//! 別の操作が進行中の場合は `Busy` で拒否する。

mod selection;

pub use selection::ActiveSelection;

use crate::error::{report, NoteCaptureError, Result};
use crate::session::SharedThumbnailState;
use crate::transfer::{ImageTransport, UploadedImage};
use futures::future::try_join_all;
use notecap_common::to_jpeg_data_url;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub image_id: String,
    pub thumbnail_data: String,
    /// 未取得の場合は None
    pub full_image_data: Option<String>,
    pub position: usize,
}

impl CapturedImage {
    /// 保存用のファイル名。画像IDは英数字と `-` `_` 以外を `_` に置き換える
    pub fn file_name(&self) -> String {
        let id: String = self
            .image_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{:02}_{}.jpg", self.position, id)
    }
}

/// レビュー用スライダーの1ページ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub position: usize,
    pub image_id: String,
    pub image_url: Option<String>,
}

/// サムネイル列の1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripItem {
    pub position: usize,
    pub image_id: String,
    pub thumbnail_url: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    Idle,
    Hydrating,
    Removing,
    Appending,
    LoadingImage,
}

impl ReviewPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewPhase::Idle => "idle",
            ReviewPhase::Hydrating => "hydrating",
            ReviewPhase::Removing => "removing",
            ReviewPhase::Appending => "appending",
            ReviewPhase::LoadingImage => "loading_image",
        }
    }
}

/// 操作の終了時（途中破棄を含む）にIdleへ戻す
struct OperationGuard<'a>(&'a Cell<ReviewPhase>);

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.0.set(ReviewPhase::Idle);
    }
}

pub struct ReviewCollection {
    transport: Rc<dyn ImageTransport>,
    state: SharedThumbnailState,
    images: RefCell<Vec<CapturedImage>>,
    selection: Cell<ActiveSelection>,
    phase: Cell<ReviewPhase>,
}

impl ReviewCollection {
    pub fn new(transport: Rc<dyn ImageTransport>, state: SharedThumbnailState) -> Self {
        Self {
            transport,
            state,
            images: RefCell::new(Vec::new()),
            selection: Cell::new(ActiveSelection::default()),
            phase: Cell::new(ReviewPhase::Idle),
        }
    }

    fn begin(&self, next: ReviewPhase) -> Result<OperationGuard<'_>> {
        let current = self.phase.get();
        if current != ReviewPhase::Idle {
            tracing::debug!(current = current.as_str(), requested = next.as_str(), "review operation rejected");
            return Err(NoteCaptureError::Busy(current.as_str()));
        }
        self.phase.set(next);
        Ok(OperationGuard(&self.phase))
    }

    pub fn phase(&self) -> ReviewPhase {
        self.phase.get()
    }

    /// サーバーからサムネイル一覧と全フル画像を取得して置き換える
    ///
    /// 1枚でも取得に失敗したら全体を失敗とし、コレクションは変更しない。
    pub async fn hydrate(&self, session_id: &str) -> Result<()> {
        let _guard = self.begin(ReviewPhase::Hydrating)?;
        self.fetch_all(session_id)
            .await
            .inspect_err(|err| {
                report("hydrate", err);
            })
    }

    async fn fetch_all(&self, session_id: &str) -> Result<()> {
        let thumbnails = self.transport.fetch_thumbnails(session_id).await?;

        {
            let mut seen = HashSet::new();
            if let Some(dup) = thumbnails.iter().find(|t| !seen.insert(t.image_id.as_str())) {
                return Err(NoteCaptureError::ApiParse(format!(
                    "画像IDが重複しています: {}",
                    dup.image_id
                )));
            }
        }

        let full_images = try_join_all(
            thumbnails
                .iter()
                .map(|t| self.transport.fetch_full_image(&t.image_id)),
        )
        .await?;

        let mut images: Vec<CapturedImage> = thumbnails
            .into_iter()
            .zip(full_images)
            .map(|(thumbnail, full)| CapturedImage {
                image_id: thumbnail.image_id,
                thumbnail_data: thumbnail.thumbnail_data,
                full_image_data: Some(full),
                position: 0,
            })
            .collect();
        renumber(&mut images);

        let last_known = self
            .state
            .last_image_id()
            .is_some_and(|id| images.iter().any(|i| i.image_id == id));
        let tail = images
            .last()
            .map(|i| (i.image_id.clone(), i.thumbnail_data.clone()));

        let count = images.len();
        *self.images.borrow_mut() = images;
        self.selection.set(ActiveSelection::default());
        self.state.set_image_count(count);

        // バッジは取得した画像列に含まれる画像だけを指す
        match tail {
            None => self.state.clear_thumbnail(),
            Some((id, thumbnail)) if !last_known => self.state.set_latest(&id, &thumbnail),
            Some(_) => {}
        }

        tracing::info!(notes_id = session_id, images = count, "review collection hydrated");
        Ok(())
    }

    /// サーバーで削除し、成功したらコレクションから外して詰め直す
    ///
    /// 失敗時はコレクション・選択位置とも変更しない。
    pub async fn remove(&self, image_id: &str) -> Result<()> {
        let _guard = self.begin(ReviewPhase::Removing)?;

        if self.position_of(image_id).is_none() {
            let err = NoteCaptureError::InvalidInput(format!("レビュー中の画像ではありません: {}", image_id));
            report("remove", &err);
            return Err(err);
        }

        if let Err(err) = self.transport.delete_image(image_id).await {
            report("remove", &err);
            return Err(err);
        }

        let mut images = self.images.borrow_mut();
        let Some(removed) = images.iter().position(|i| i.image_id == image_id) else {
            return Ok(());
        };
        images.remove(removed);
        renumber(&mut images);

        let remaining = images.len();
        let replacement = if self.state.last_image_id().as_deref() == Some(image_id) {
            images
                .last()
                .map(|i| (i.image_id.clone(), i.thumbnail_data.clone()))
        } else {
            None
        };
        drop(images);

        let mut selection = self.selection.get();
        selection.after_removal(removed, remaining);
        self.selection.set(selection);

        self.state.set_image_count(remaining);
        if remaining == 0 {
            self.state.clear_thumbnail();
        } else if let Some((id, thumbnail)) = replacement {
            self.state.set_latest(&id, &thumbnail);
        }

        tracing::info!(image_id, remaining, active = selection.index(), "image removed from review");
        Ok(())
    }

    /// アップロード直後の画像を末尾に追加する（フル画像は未取得）
    pub fn append(&self, uploaded: &UploadedImage) -> Result<()> {
        let _guard = self.begin(ReviewPhase::Appending)?;

        let mut images = self.images.borrow_mut();
        if images.iter().any(|i| i.image_id == uploaded.image_id) {
            return Err(NoteCaptureError::InvalidInput(format!(
                "同じ画像IDが既にあります: {}",
                uploaded.image_id
            )));
        }
        let position = images.len();
        images.push(CapturedImage {
            image_id: uploaded.image_id.clone(),
            thumbnail_data: uploaded.thumbnail_data.clone(),
            full_image_data: None,
            position,
        });
        Ok(())
    }

    /// 未取得のフル画像を取得する。取得済みなら何もしない
    pub async fn load_full_image(&self, image_id: &str) -> Result<()> {
        let _guard = self.begin(ReviewPhase::LoadingImage)?;

        let index = self.position_of(image_id).ok_or_else(|| {
            NoteCaptureError::InvalidInput(format!("レビュー中の画像ではありません: {}", image_id))
        })?;
        if self.images.borrow()[index].full_image_data.is_some() {
            return Ok(());
        }

        let full = self
            .transport
            .fetch_full_image(image_id)
            .await
            .inspect_err(|err| {
                report("load_full_image", err);
            })?;

        if let Some(image) = self
            .images
            .borrow_mut()
            .iter_mut()
            .find(|i| i.image_id == image_id)
        {
            image.full_image_data = Some(full);
        }
        Ok(())
    }

    /// 選択位置を変更する。範囲外は最後の有効位置に丸める
    pub fn select_index(&self, index: usize) {
        let mut selection = self.selection.get();
        selection.select(index, self.len());
        self.selection.set(selection);
    }

    /// スライダーのスクロールが止まった位置から選択する
    pub fn select_from_scroll(&self, offset: f64, page_width: f64) {
        self.select_index(ActiveSelection::index_for_offset(offset, page_width));
    }

    /// 選択中のページを表示するためのスクロール位置
    pub fn scroll_offset(&self, page_width: f64) -> f64 {
        self.selection.get().offset(page_width)
    }

    pub fn active_index(&self) -> usize {
        self.selection.get().index()
    }

    pub fn active_image(&self) -> Option<CapturedImage> {
        self.images.borrow().get(self.active_index()).cloned()
    }

    pub fn len(&self) -> usize {
        self.images.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.borrow().is_empty()
    }

    pub fn images(&self) -> Vec<CapturedImage> {
        self.images.borrow().clone()
    }

    pub fn image_ids(&self) -> Vec<String> {
        self.images.borrow().iter().map(|i| i.image_id.clone()).collect()
    }

    pub fn position_of(&self, image_id: &str) -> Option<usize> {
        self.images.borrow().iter().position(|i| i.image_id == image_id)
    }

    pub fn slides(&self) -> Vec<Slide> {
        self.images
            .borrow()
            .iter()
            .map(|i| Slide {
                position: i.position,
                image_id: i.image_id.clone(),
                image_url: i.full_image_data.as_deref().map(to_jpeg_data_url),
            })
            .collect()
    }

    pub fn strip(&self) -> Vec<StripItem> {
        let active = self.active_index();
        self.images
            .borrow()
            .iter()
            .map(|i| StripItem {
                position: i.position,
                image_id: i.image_id.clone(),
                thumbnail_url: to_jpeg_data_url(&i.thumbnail_data),
                active: i.position == active,
            })
            .collect()
    }
}

fn renumber(images: &mut [CapturedImage]) {
    for (position, image) in images.iter_mut().enumerate() {
        image.position = position;
    }
}
