use thiserror::Error;

/// 転送エラーの分類（HTTPステータスから決定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferErrorKind {
    /// 404: 存在しない画像・ノート
    NotFound,
    /// 401/403: トークン切れ・権限なし
    Unauthorized,
    /// 5xx
    Server,
    /// その他の非成功ステータス
    Rejected,
}

impl TransferErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => TransferErrorKind::NotFound,
            401 | 403 => TransferErrorKind::Unauthorized,
            500..=599 => TransferErrorKind::Server,
            _ => TransferErrorKind::Rejected,
        }
    }
}

impl std::fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferErrorKind::NotFound => write!(f, "not found"),
            TransferErrorKind::Unauthorized => write!(f, "unauthorized"),
            TransferErrorKind::Server => write!(f, "server error"),
            TransferErrorKind::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NoteCaptureError {
    #[error("入力が不正です: {0}")]
    InvalidInput(String),

    #[error("タイムアウト: {operation} が{seconds}秒以内に完了しませんでした")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("転送エラー (HTTP {status}, {kind})")]
    Transfer { status: u16, kind: TransferErrorKind },

    #[error("撮影エラー: {0}")]
    Acquisition(String),

    #[error("処理中のため受け付けできません: {0}")]
    Busy(&'static str),

    #[error("不正な状態遷移: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("認証トークンが設定されていません。`notecap config --set-token YOUR_TOKEN` で設定してください")]
    MissingAuthToken,

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] notecap_common::Error),
}

impl NoteCaptureError {
    /// 非成功ステータスから転送エラーを作る
    pub fn transfer(status: u16) -> Self {
        NoteCaptureError::Transfer {
            status,
            kind: TransferErrorKind::from_status(status),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NoteCaptureError::Transfer { kind: TransferErrorKind::NotFound, .. }
        )
    }

    /// ユーザーに表示するメッセージ
    ///
    /// どのエラーもユーザー操作の再実行で回復できる前提の文言にする。
    pub fn user_message(&self) -> &'static str {
        match self {
            NoteCaptureError::InvalidInput(_) => "画像が不正です。もう一度撮影してください。",
            NoteCaptureError::Timeout { .. } => "通信がタイムアウトしました。もう一度お試しください。",
            NoteCaptureError::Transfer { kind: TransferErrorKind::Unauthorized, .. }
            | NoteCaptureError::MissingAuthToken => "セッションの有効期限が切れました。再ログインしてください。",
            NoteCaptureError::Transfer { .. } | NoteCaptureError::Http(_) => {
                "サーバーとの通信に失敗しました。もう一度お試しください。"
            }
            NoteCaptureError::Acquisition(_) => "撮影に失敗しました。",
            NoteCaptureError::Busy(_) | NoteCaptureError::InvalidTransition { .. } => {
                "処理中です。完了までお待ちください。"
            }
            NoteCaptureError::Config(_) => "設定が正しくありません。",
            NoteCaptureError::ApiParse(_)
            | NoteCaptureError::JsonParse(_)
            | NoteCaptureError::Common(_) => "サーバーから想定外の応答がありました。",
            NoteCaptureError::Io(_) => "画像ファイルを読み込めませんでした。",
        }
    }
}

/// エラーをログに記録し、ユーザー向けメッセージを返す
///
/// `context` はログ用の操作名（"upload" など）。
pub fn report(context: &str, err: &NoteCaptureError) -> &'static str {
    tracing::error!(error = %err, operation = context, "operation failed");
    err.user_message()
}

pub type Result<T> = std::result::Result<T, NoteCaptureError>;
