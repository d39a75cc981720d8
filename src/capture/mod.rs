//! 撮影→アップロード制御
//!
//! 1回の撮影試行は次の状態を遷移する:
//! - 成功: Idle → Capturing → Uploading → Idle
//! - 失敗: Idle → Capturing → Uploading → Failed → Idle
//! - 撮影失敗: Idle → Capturing → Idle
//!
//! Idle以外での撮影要求は何もせずに拒否する。これでセッション内の
//! アップロードは常に1件以下になり、枚数の上書き競合が起きない。

mod source;

pub use source::{scan_folder, FolderImageSource, ImageSource};

use crate::error::{report, NoteCaptureError, Result};
use crate::session::SharedThumbnailState;
use crate::transfer::{ImageTransport, LocalImageHandle, UploadedImage};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    Capturing,
    Uploading,
    Failed,
}

impl CapturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapturePhase::Idle => "idle",
            CapturePhase::Capturing => "capturing",
            CapturePhase::Uploading => "uploading",
            CapturePhase::Failed => "failed",
        }
    }

    fn can_transition_to(self, next: CapturePhase) -> bool {
        use CapturePhase::*;
        matches!(
            (self, next),
            (Idle, Capturing)
                | (Capturing, Uploading)
                | (Capturing, Idle)
                | (Uploading, Idle)
                | (Uploading, Failed)
                | (Failed, Idle)
        )
    }
}

/// `capture_and_upload` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Uploaded(UploadedImage),
    /// 撮影に失敗した（通知済み）
    NoImage,
    /// 別の撮影が進行中のため拒否した
    Rejected,
}

/// 試行が途中で破棄されてもIdleに戻す
struct IdleOnDrop<'a>(&'a Cell<CapturePhase>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set(CapturePhase::Idle);
    }
}

pub struct CaptureController {
    source: Rc<dyn ImageSource>,
    transport: Rc<dyn ImageTransport>,
    state: SharedThumbnailState,
    phase: Cell<CapturePhase>,
}

impl CaptureController {
    pub fn new(
        source: Rc<dyn ImageSource>,
        transport: Rc<dyn ImageTransport>,
        state: SharedThumbnailState,
    ) -> Self {
        Self {
            source,
            transport,
            state,
            phase: Cell::new(CapturePhase::Idle),
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase.get()
    }

    pub fn state(&self) -> &SharedThumbnailState {
        &self.state
    }

    fn transition(&self, next: CapturePhase) -> Result<()> {
        let current = self.phase.get();
        if !current.can_transition_to(next) {
            return Err(NoteCaptureError::InvalidTransition {
                from: current.as_str(),
                to: next.as_str(),
            });
        }
        tracing::debug!(from = current.as_str(), to = next.as_str(), "capture phase");
        self.phase.set(next);
        Ok(())
    }

    /// 1枚撮影する。撮影失敗・進行中の試行がある場合は `None`
    pub async fn capture(&self) -> Option<LocalImageHandle> {
        if self.phase.get() != CapturePhase::Idle {
            tracing::debug!(phase = self.phase.get().as_str(), "capture rejected");
            return None;
        }
        let _idle = IdleOnDrop(&self.phase);
        self.transition(CapturePhase::Capturing).ok()?;
        let image = self.acquire().await;
        self.transition(CapturePhase::Idle).ok()?;
        image
    }

    /// 撮影してアップロードし、成功時にサムネイル状態をサーバーの値で置き換える
    ///
    /// 失敗時は状態を変更しない（直前の成功時の表示が残る）。
    pub async fn capture_and_upload(&self, session_id: &str) -> Result<CaptureOutcome> {
        if self.phase.get() != CapturePhase::Idle {
            tracing::debug!(phase = self.phase.get().as_str(), "capture rejected");
            return Ok(CaptureOutcome::Rejected);
        }
        let _idle = IdleOnDrop(&self.phase);

        self.transition(CapturePhase::Capturing)?;
        let Some(image) = self.acquire().await else {
            self.transition(CapturePhase::Idle)?;
            return Ok(CaptureOutcome::NoImage);
        };

        self.transition(CapturePhase::Uploading)?;
        match self.transport.upload(session_id, &image).await {
            Ok(uploaded) => {
                self.state.apply_upload(&uploaded);
                self.transition(CapturePhase::Idle)?;
                Ok(CaptureOutcome::Uploaded(uploaded))
            }
            Err(err) => {
                self.transition(CapturePhase::Failed)?;
                report("upload", &err);
                self.transition(CapturePhase::Idle)?;
                Err(err)
            }
        }
    }

    async fn acquire(&self) -> Option<LocalImageHandle> {
        match self.source.acquire().await {
            Ok(image) => Some(image),
            Err(err) => {
                report("capture", &err);
                None
            }
        }
    }
}
