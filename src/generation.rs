//! ノート生成の開始
//!
//! 画像が0枚でもクライアント側では止めない。受理するかはサーバーが決める。

use crate::error::{report, Result};
use crate::session::CaptureSession;
use crate::transfer::ImageTransport;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Accepted,
    /// サーバーが受理しなかった（返ってきたステータス）
    Rejected { status: String },
}

pub struct NoteGenerationTrigger {
    transport: Rc<dyn ImageTransport>,
}

impl NoteGenerationTrigger {
    pub fn new(transport: Rc<dyn ImageTransport>) -> Self {
        Self { transport }
    }

    /// 生成開始を依頼し、受理されたらセッションを生成中に進める
    pub async fn start(&self, session: &mut CaptureSession) -> Result<GenerationOutcome> {
        let status = self
            .transport
            .start_generation(session.id())
            .await
            .inspect_err(|err| {
                report("start_generation", err);
            })?;

        if status.is_accepted() {
            session.mark_generating();
            tracing::info!(notes_id = session.id(), "note generation started");
            Ok(GenerationOutcome::Accepted)
        } else {
            tracing::warn!(notes_id = session.id(), status = %status.status, "note generation not accepted");
            Ok(GenerationOutcome::Rejected {
                status: status.status,
            })
        }
    }
}
