//! Data URLユーティリティ
//!
//! サーバーはサムネイルをプレフィックスなしのBase64で返すため、
//! 表示用に `data:image/jpeg;base64,` を付与する。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Base64文字列をJPEGのData URLに変換
///
/// 既にData URLの場合はそのまま返す。
pub fn to_jpeg_data_url(base64_data: &str) -> String {
    if base64_data.starts_with("data:") {
        return base64_data.to_string();
    }
    format!("{}{}", JPEG_DATA_URL_PREFIX, base64_data)
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLをバイト列にデコード
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload = extract_base64_from_data_url(data_url)
        .ok_or_else(|| Error::DataUrl(format!("Base64部分がありません: {}", preview(data_url))))?;
    Ok(STANDARD.decode(payload)?)
}

/// 画像バイト列をBase64文字列にエンコード
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn preview(s: &str) -> String {
    s.chars().take(32).collect()
}
