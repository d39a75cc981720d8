//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Data URL error: {0}")]
    DataUrl(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_data_url() {
        let error = Error::DataUrl("カンマがありません".to_string());
        assert_eq!(format!("{}", error), "Data URL error: カンマがありません");
    }

    #[test]
    fn test_error_from_base64() {
        let decode_error = base64::engine::general_purpose::STANDARD
            .decode("!!!")
            .unwrap_err();
        let error: Error = decode_error.into();
        assert!(matches!(error, Error::Base64(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
