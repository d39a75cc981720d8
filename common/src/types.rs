//! バックエンドREST APIのワイヤ型
//!
//! サーバーのJSONはsnake_caseのため、フィールド名をそのまま使用する:
//! - CreateNoteResponse: `POST /notes`
//! - UploadResponse: `POST /notes/{notes_id}/images`
//! - ThumbnailsResponse: `GET /notes/{notes_id}/thumbnails`
//! - GenerationStatus: `POST /notes/{notes_id}/process`

use serde::{Deserialize, Serialize};

/// ノート生成開始を受理した時にサーバーが返すステータス文字列
pub const PROCESSING_STARTED: &str = "Processing started.";

/// ノート作成レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteResponse {
    pub notes_id: String,
}

/// 画像アップロードレスポンス
///
/// `number_of_images` はサーバー側の確定枚数。クライアントで加算しないこと。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_id: String,
    /// Base64エンコードされたサムネイル（Data URLプレフィックスなし）
    pub thumbnail_image: String,
    pub number_of_images: usize,
}

/// サムネイル一覧の1件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailEntry {
    pub image_id: String,
    pub thumbnail_image: String,
}

/// サムネイル一覧レスポンス（サーバーの順序が表示順）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThumbnailsResponse {
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailEntry>,
}

/// ノート生成開始レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStatus {
    #[serde(default)]
    pub status: String,
}

impl GenerationStatus {
    /// サーバーが処理開始を受理したか
    pub fn is_accepted(&self) -> bool {
        self.status == PROCESSING_STARTED
    }
}

/// ノート一覧の1件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteSummary {
    pub notes_id: String,
    pub thumbnail_image: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
}

/// ノート一覧レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesResponse {
    #[serde(default)]
    pub notes: Vec<NoteSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_deserialize() {
        let json = r#"{
            "image_id": "img-42",
            "thumbnail_image": "/9j/4AAQ",
            "number_of_images": 3
        }"#;

        let response: UploadResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.image_id, "img-42");
        assert_eq!(response.thumbnail_image, "/9j/4AAQ");
        assert_eq!(response.number_of_images, 3);
    }

    #[test]
    fn test_upload_response_missing_count_fails() {
        // 枚数はサーバーの確定値なので欠落はエラーにする
        let json = r#"{"image_id": "img-1", "thumbnail_image": "abc"}"#;
        assert!(serde_json::from_str::<UploadResponse>(json).is_err());
    }

    #[test]
    fn test_thumbnails_response_keeps_server_order() {
        let json = r#"{"thumbnails": [
            {"image_id": "c", "thumbnail_image": "t3"},
            {"image_id": "a", "thumbnail_image": "t1"},
            {"image_id": "b", "thumbnail_image": "t2"}
        ]}"#;

        let response: ThumbnailsResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        let ids: Vec<&str> = response.thumbnails.iter().map(|t| t.image_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_thumbnails_response_missing_list() {
        let response: ThumbnailsResponse = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(response.thumbnails.is_empty());
    }

    #[test]
    fn test_generation_status_accepted() {
        let accepted: GenerationStatus =
            serde_json::from_str(r#"{"status": "Processing started."}"#).unwrap();
        assert!(accepted.is_accepted());

        let other: GenerationStatus =
            serde_json::from_str(r#"{"status": "Already processing"}"#).unwrap();
        assert!(!other.is_accepted());

        let empty: GenerationStatus = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_accepted());
    }

    #[test]
    fn test_note_summary_optional_fields() {
        let json = r#"{"notes": [{"notes_id": "n1"}, {"notes_id": "n2", "title": "微分積分"}]}"#;
        let response: NotesResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(response.notes.len(), 2);
        assert!(response.notes[0].thumbnail_image.is_none());
        assert_eq!(response.notes[1].title.as_deref(), Some("微分積分"));
    }
}
