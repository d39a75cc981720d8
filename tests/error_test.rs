//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use notecap_rust::error::{report, NoteCaptureError, TransferErrorKind};
use notecap_rust::{CaptureSession, FolderImageSource, LocalImageHandle};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダを撮影ソースにした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = FolderImageSource::scan(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(NoteCaptureError::Acquisition(_))));
}

/// 画像のないフォルダは空のソースになる
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let source = FolderImageSource::scan(dir.path()).unwrap();
    assert_eq!(source.remaining(), 0);
}

/// HTTPステータスから転送エラーの種類を決める
#[test]
fn test_transfer_kind_from_status() {
    assert_eq!(TransferErrorKind::from_status(404), TransferErrorKind::NotFound);
    assert_eq!(TransferErrorKind::from_status(401), TransferErrorKind::Unauthorized);
    assert_eq!(TransferErrorKind::from_status(403), TransferErrorKind::Unauthorized);
    assert_eq!(TransferErrorKind::from_status(500), TransferErrorKind::Server);
    assert_eq!(TransferErrorKind::from_status(503), TransferErrorKind::Server);
    assert_eq!(TransferErrorKind::from_status(400), TransferErrorKind::Rejected);
    assert_eq!(TransferErrorKind::from_status(422), TransferErrorKind::Rejected);

    assert!(NoteCaptureError::transfer(404).is_not_found());
    assert!(!NoteCaptureError::transfer(500).is_not_found());
}

/// 不正な入力の検出
#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        LocalImageHandle::new("content://media/42").local_path(),
        Err(NoteCaptureError::InvalidInput(_))
    ));
    assert!(matches!(
        CaptureSession::resume(""),
        Err(NoteCaptureError::InvalidInput(_))
    ));
}

/// NoteCaptureErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        NoteCaptureError::InvalidInput("https://example.com/a.jpg".to_string()),
        NoteCaptureError::Timeout { operation: "upload", seconds: 10 },
        NoteCaptureError::transfer(500),
        NoteCaptureError::Acquisition("カメラが使えません".to_string()),
        NoteCaptureError::Busy("hydrating"),
        NoteCaptureError::InvalidTransition { from: "idle", to: "failed" },
        NoteCaptureError::Config("テスト設定エラー".to_string()),
        NoteCaptureError::MissingAuthToken,
        NoteCaptureError::ApiParse("不正なJSON".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
    }

    let timeout = NoteCaptureError::Timeout { operation: "upload", seconds: 10 };
    assert!(timeout.to_string().contains("upload"));
    assert!(timeout.to_string().contains("10"));
    assert!(NoteCaptureError::transfer(404).to_string().contains("404"));
}

/// どのエラーにもユーザー向けメッセージがある
#[test]
fn test_user_messages() {
    assert_ne!(
        NoteCaptureError::Timeout { operation: "upload", seconds: 10 }.user_message(),
        NoteCaptureError::transfer(500).user_message()
    );
    assert_eq!(
        NoteCaptureError::transfer(401).user_message(),
        NoteCaptureError::MissingAuthToken.user_message()
    );

    let err = NoteCaptureError::Acquisition("カメラが使えません".into());
    assert_eq!(report("capture", &err), err.user_message());
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: NoteCaptureError = io_err.into();
    assert!(matches!(err, NoteCaptureError::Io(_)));
}

/// 共通クレートのエラーからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = notecap_common::decode_data_url("data:image/jpeg;base64,@@@").unwrap_err();
    let err: NoteCaptureError = common_err.into();
    assert!(matches!(err, NoteCaptureError::Common(_)));
}
