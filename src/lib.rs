//! 手書きノートの撮影→アップロード→レビュー同期
//!
//! 撮影画面・レビュー用スライダー・サムネイル列の3つの表示が、
//! 共有の `SharedThumbnailState` と `ReviewCollection` を通して
//! 常に同じ状態を見るように同期する。
//!
//! 全ての操作は単一の論理スレッド（current-threadのtokioランタイム）上で
//! 協調的に動く前提で、共有状態は `Rc` / `RefCell` / `Cell` で持つ。

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod review;
pub mod session;
pub mod transfer;

pub use capture::{CaptureController, CaptureOutcome, CapturePhase, FolderImageSource, ImageSource};
pub use error::{NoteCaptureError, Result, TransferErrorKind};
pub use generation::{GenerationOutcome, NoteGenerationTrigger};
pub use review::{ActiveSelection, CapturedImage, ReviewCollection};
pub use session::{CaptureSession, SessionPhase, SessionThumbnailState, SharedThumbnailState};
pub use transfer::{HttpTransferClient, ImageTransport, LocalImageHandle, UploadedImage};
