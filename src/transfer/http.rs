//! HTTPによる `ImageTransport` 実装
//!
//! 全リクエストに `Authorization: Bearer <token>` を付与する。

use super::{with_deadline, ImageTransport, LocalImageHandle, ThumbnailRecord, UploadedImage};
use crate::config::Config;
use crate::error::{NoteCaptureError, Result};
use async_trait::async_trait;
use notecap_common::{
    body_preview, encode_image, parse_create_note_response, parse_generation_status,
    parse_response, parse_thumbnails_response, parse_upload_response, GenerationStatus,
    NoteSummary, NotesResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::{Duration, Instant};

const UPLOAD_FIELD: &str = "image";
const UPLOAD_FILE_NAME: &str = "note_image.jpg";
const UPLOAD_MIME: &str = "image/jpeg";

pub struct HttpTransferClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl HttpTransferClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.get_auth_token()?;
        Ok(Self::new(&config.api_url, token, config.timeout()))
    }

    /// パスの各要素はパーセントエンコードして連結する
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = || NoteCaptureError::Config(format!("api_urlが不正です: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, segments: &[&str]) -> Result<String> {
        let resp = self
            .client
            .get(self.endpoint(segments)?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        Ok(resp.text().await?)
    }

    async fn post_text(&self, segments: &[&str]) -> Result<String> {
        let resp = self
            .client
            .post(self.endpoint(segments)?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        Ok(resp.text().await?)
    }
}

#[async_trait(?Send)]
impl ImageTransport for HttpTransferClient {
    async fn create_note(&self) -> Result<String> {
        let body = with_deadline("create_note", self.timeout, self.post_text(&["notes"])).await?;
        let response = parse_create_note_response(&body).map_err(api_parse)?;
        tracing::info!(notes_id = %response.notes_id, "note created");
        Ok(response.notes_id)
    }

    async fn list_notes(&self) -> Result<Vec<NoteSummary>> {
        let body = with_deadline("list_notes", self.timeout, self.get_text(&["notes"])).await?;
        let response: NotesResponse = parse_response(&body).map_err(api_parse)?;
        Ok(response.notes)
    }

    async fn upload(&self, session_id: &str, image: &LocalImageHandle) -> Result<UploadedImage> {
        // 通信前に検証する
        let path = image.local_path()?;
        let url = self.endpoint(&["notes", session_id, "images"])?;
        let started = Instant::now();

        let response = with_deadline("upload", self.timeout, async {
            let bytes = tokio::fs::read(&path).await?;
            tracing::debug!(bytes = bytes.len(), path = %path.display(), "uploading image");

            let part = Part::bytes(bytes)
                .file_name(UPLOAD_FILE_NAME)
                .mime_str(UPLOAD_MIME)?;
            let form = Form::new().part(UPLOAD_FIELD, part);

            let resp = self
                .client
                .post(url)
                .bearer_auth(&self.token)
                .multipart(form)
                .send()
                .await?;
            let resp = check_response(resp).await?;
            let body = resp.text().await?;
            parse_upload_response(&body).map_err(api_parse)
        })
        .await?;

        tracing::info!(
            image_id = %response.image_id,
            number_of_images = response.number_of_images,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image uploaded"
        );
        Ok(response.into())
    }

    async fn fetch_thumbnails(&self, notes_id: &str) -> Result<Vec<ThumbnailRecord>> {
        let segments = ["notes", notes_id, "thumbnails"];
        let body = with_deadline("fetch_thumbnails", self.timeout, self.get_text(&segments)).await?;
        let response = parse_thumbnails_response(&body).map_err(api_parse)?;
        Ok(response.thumbnails.into_iter().map(ThumbnailRecord::from).collect())
    }

    async fn fetch_full_image(&self, image_id: &str) -> Result<String> {
        let url = self.endpoint(&["images", image_id])?;
        with_deadline("fetch_full_image", self.timeout, async {
            let resp = self.client.get(url).bearer_auth(&self.token).send().await?;
            let resp = check_response(resp).await?;
            let bytes = resp.bytes().await?;
            Ok::<_, NoteCaptureError>(encode_image(&bytes))
        })
        .await
    }

    async fn delete_image(&self, image_id: &str) -> Result<()> {
        let url = self.endpoint(&["images", image_id])?;
        with_deadline("delete_image", self.timeout, async {
            let resp = self.client.delete(url).bearer_auth(&self.token).send().await?;
            check_response(resp).await?;
            Ok::<_, NoteCaptureError>(())
        })
        .await?;
        tracing::info!(image_id, "image deleted");
        Ok(())
    }

    async fn start_generation(&self, notes_id: &str) -> Result<GenerationStatus> {
        let segments = ["notes", notes_id, "process"];
        let body = with_deadline("start_generation", self.timeout, self.post_text(&segments)).await?;
        parse_generation_status(&body).map_err(api_parse)
    }
}

/// 非成功ステータスを `Transfer` エラーに変換する
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body_preview(&body), "request failed");
    Err(NoteCaptureError::transfer(status.as_u16()))
}

fn api_parse(err: notecap_common::Error) -> NoteCaptureError {
    NoteCaptureError::ApiParse(err.to_string())
}
