//! 結合テスト用のフェイク
//!
//! サーバー側の画像列をメモリ上に持ち、呼び出し回数と失敗を制御できる。

#![allow(dead_code)]

use async_trait::async_trait;
use notecap_common::{GenerationStatus, NoteSummary, PROCESSING_STARTED};
use notecap_rust::error::{NoteCaptureError, Result};
use notecap_rust::transfer::{with_deadline, ThumbnailRecord};
use notecap_rust::{ImageSource, ImageTransport, LocalImageHandle, UploadedImage};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

pub const NOTE_ID: &str = "note-1";

pub struct FakeTransport {
    /// サーバー上の画像（サーバー順）
    pub server: RefCell<Vec<ThumbnailRecord>>,
    /// サーバーが既に持っている他端末からの枚数
    pub preexisting: Cell<usize>,
    next_id: Cell<usize>,
    pub timeout: Duration,

    pub upload_calls: Cell<usize>,
    pub delete_calls: Cell<usize>,
    pub full_image_calls: Cell<usize>,
    pub generation_calls: Cell<usize>,

    pub upload_delay: Cell<Option<Duration>>,
    pub fail_upload: Cell<Option<u16>>,
    pub fail_delete: Cell<Option<u16>>,
    pub fail_full_image: RefCell<Option<String>>,
    pub generation_status: RefCell<String>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            server: RefCell::new(Vec::new()),
            preexisting: Cell::new(0),
            next_id: Cell::new(1),
            timeout: Duration::from_secs(10),
            upload_calls: Cell::new(0),
            delete_calls: Cell::new(0),
            full_image_calls: Cell::new(0),
            generation_calls: Cell::new(0),
            upload_delay: Cell::new(None),
            fail_upload: Cell::new(None),
            fail_delete: Cell::new(None),
            fail_full_image: RefCell::new(None),
            generation_status: RefCell::new(PROCESSING_STARTED.to_string()),
        })
    }

    /// 画像を持った状態のサーバー
    pub fn with_images(ids: &[&str]) -> Rc<Self> {
        let fake = Self::new();
        fake.server.replace(
            ids.iter()
                .map(|id| ThumbnailRecord {
                    image_id: id.to_string(),
                    thumbnail_data: thumbnail_of(id),
                })
                .collect(),
        );
        fake
    }

    pub fn server_ids(&self) -> Vec<String> {
        self.server.borrow().iter().map(|r| r.image_id.clone()).collect()
    }
}

pub fn thumbnail_of(id: &str) -> String {
    format!("thumb-{}", id)
}

pub fn full_of(id: &str) -> String {
    format!("full-{}", id)
}

#[async_trait(?Send)]
impl ImageTransport for FakeTransport {
    async fn create_note(&self) -> Result<String> {
        tokio::task::yield_now().await;
        Ok(NOTE_ID.to_string())
    }

    async fn list_notes(&self) -> Result<Vec<NoteSummary>> {
        Ok(vec![NoteSummary {
            notes_id: NOTE_ID.to_string(),
            title: Some("数学".into()),
            ..NoteSummary::default()
        }])
    }

    async fn upload(&self, _session_id: &str, image: &LocalImageHandle) -> Result<UploadedImage> {
        image.local_path()?;
        self.upload_calls.set(self.upload_calls.get() + 1);

        with_deadline("upload", self.timeout, async {
            match self.upload_delay.get() {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
            if let Some(status) = self.fail_upload.get() {
                return Err(NoteCaptureError::transfer(status));
            }

            let id = format!("img-{}", self.next_id.get());
            self.next_id.set(self.next_id.get() + 1);
            let mut server = self.server.borrow_mut();
            server.push(ThumbnailRecord {
                image_id: id.clone(),
                thumbnail_data: thumbnail_of(&id),
            });
            Ok(UploadedImage {
                thumbnail_data: thumbnail_of(&id),
                image_count: self.preexisting.get() + server.len(),
                image_id: id,
            })
        })
        .await
    }

    async fn fetch_thumbnails(&self, _notes_id: &str) -> Result<Vec<ThumbnailRecord>> {
        tokio::task::yield_now().await;
        Ok(self.server.borrow().clone())
    }

    async fn fetch_full_image(&self, image_id: &str) -> Result<String> {
        self.full_image_calls.set(self.full_image_calls.get() + 1);
        tokio::task::yield_now().await;
        if self.fail_full_image.borrow().as_deref() == Some(image_id) {
            return Err(NoteCaptureError::transfer(500));
        }
        Ok(full_of(image_id))
    }

    async fn delete_image(&self, image_id: &str) -> Result<()> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        tokio::task::yield_now().await;
        if let Some(status) = self.fail_delete.get() {
            return Err(NoteCaptureError::transfer(status));
        }
        let mut server = self.server.borrow_mut();
        let index = server
            .iter()
            .position(|r| r.image_id == image_id)
            .ok_or_else(|| NoteCaptureError::transfer(404))?;
        server.remove(index);
        Ok(())
    }

    async fn start_generation(&self, _notes_id: &str) -> Result<GenerationStatus> {
        self.generation_calls.set(self.generation_calls.get() + 1);
        tokio::task::yield_now().await;
        Ok(GenerationStatus {
            status: self.generation_status.borrow().clone(),
        })
    }
}

/// 用意したURIを順に返す撮影ソース。尽きたら撮影失敗
pub struct FakeSource {
    queue: RefCell<VecDeque<String>>,
}

impl FakeSource {
    pub fn new(uris: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            queue: RefCell::new(uris.iter().map(|u| u.to_string()).collect()),
        })
    }

    /// 十分な枚数のローカル写真
    pub fn photos(count: usize) -> Rc<Self> {
        Rc::new(Self {
            queue: RefCell::new(
                (1..=count)
                    .map(|i| format!("file:///tmp/notecap/p{}.jpg", i))
                    .collect(),
            ),
        })
    }
}

#[async_trait(?Send)]
impl ImageSource for FakeSource {
    async fn acquire(&self) -> Result<LocalImageHandle> {
        tokio::task::yield_now().await;
        self.queue
            .borrow_mut()
            .pop_front()
            .map(LocalImageHandle::new)
            .ok_or_else(|| NoteCaptureError::Acquisition("カメラが使えません".into()))
    }
}
