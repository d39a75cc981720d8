//! 撮影セッション
//!
//! 1つのノート作成フロー（撮影→レビュー→生成開始）を表す。
//! セッションIDはサーバーが発行する `notes_id`。

mod state;

pub use state::{SessionThumbnailState, SharedThumbnailState, ThumbnailBadge};

use crate::error::{NoteCaptureError, Result};
use crate::transfer::ImageTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// 撮影・レビュー中
    Collecting,
    /// ノート生成をサーバーに依頼済み
    Generating,
}

#[derive(Debug)]
pub struct CaptureSession {
    notes_id: String,
    phase: SessionPhase,
}

impl CaptureSession {
    /// サーバーでノートを作成して新しいセッションを始める
    ///
    /// 前のセッションのサムネイル状態は破棄する。
    pub async fn begin(transport: &dyn ImageTransport, state: &SharedThumbnailState) -> Result<Self> {
        let notes_id = transport.create_note().await?;
        state.reset();
        tracing::info!(notes_id = %notes_id, "capture session started");
        Self::resume(notes_id)
    }

    /// 既存のノートIDでセッションを再開する
    pub fn resume(notes_id: impl Into<String>) -> Result<Self> {
        let notes_id = notes_id.into();
        if notes_id.trim().is_empty() {
            return Err(NoteCaptureError::InvalidInput("ノートIDが指定されていません".into()));
        }
        Ok(Self {
            notes_id,
            phase: SessionPhase::Collecting,
        })
    }

    pub fn id(&self) -> &str {
        &self.notes_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub(crate) fn mark_generating(&mut self) {
        tracing::debug!(notes_id = %self.notes_id, "session moved to generating");
        self.phase = SessionPhase::Generating;
    }

    /// ユーザーがフローを離れた。共有状態は空に戻す
    pub fn abandon(self, state: &SharedThumbnailState) {
        tracing::info!(notes_id = %self.notes_id, "capture session abandoned");
        state.reset();
    }
}
