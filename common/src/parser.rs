//! APIレスポンスパーサー
//!
//! レスポンス本文をワイヤ型にパースする。失敗時は本文の先頭を
//! エラーに含めて、サーバー側の不具合を追いやすくする。

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::types::{CreateNoteResponse, GenerationStatus, ThumbnailsResponse, UploadResponse};

const BODY_PREVIEW_CHARS: usize = 200;

/// レスポンス本文をJSONとしてパース
///
/// # Arguments
/// * `body` - レスポンス本文
///
/// # Returns
/// * `Ok(T)` - パース結果
/// * `Err(Error::Json)` - JSONとして不正、または必須フィールド欠落
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body.trim()).map_err(Error::Json)
}

/// アップロードレスポンスをパース
pub fn parse_upload_response(body: &str) -> Result<UploadResponse> {
    let response: UploadResponse = parse_response(body)?;
    if response.image_id.is_empty() {
        return Err(Error::Parse(format!(
            "image_idが空です: {}",
            body_preview(body)
        )));
    }
    Ok(response)
}

/// サムネイル一覧レスポンスをパース
pub fn parse_thumbnails_response(body: &str) -> Result<ThumbnailsResponse> {
    parse_response(body)
}

/// ノート作成レスポンスをパース
pub fn parse_create_note_response(body: &str) -> Result<CreateNoteResponse> {
    let response: CreateNoteResponse = parse_response(body)?;
    if response.notes_id.is_empty() {
        return Err(Error::Parse(format!(
            "notes_idが空です: {}",
            body_preview(body)
        )));
    }
    Ok(response)
}

/// ノート生成開始レスポンスをパース
pub fn parse_generation_status(body: &str) -> Result<GenerationStatus> {
    parse_response(body)
}

/// エラーメッセージ用に本文の先頭を切り出す
pub fn body_preview(body: &str) -> String {
    let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if body.chars().count() > BODY_PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    }
}
