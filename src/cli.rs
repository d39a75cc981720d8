use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notecap")]
#[command(about = "手書きノート撮影・アップロード・レビューツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 新しいノートを作成
    New,

    /// ノート一覧を表示
    Notes,

    /// フォルダの写真を1枚ずつ撮影・アップロード
    Capture {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 追加先のノートID（省略時は新規作成）
        #[arg(short, long)]
        note: Option<String>,

        /// 撮影する最大枚数
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// アップロード済みの画像を確認
    Review {
        /// ノートID
        #[arg(required = true)]
        note: String,

        /// 選択する位置（0始まり）
        #[arg(short, long)]
        select: Option<usize>,

        /// フル画像の保存先フォルダ
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// 画像を削除
    Delete {
        /// ノートID
        #[arg(required = true)]
        note: String,

        /// 削除する画像ID
        #[arg(required = true)]
        image_id: String,
    },

    /// ノート生成を開始
    Generate {
        /// ノートID
        #[arg(required = true)]
        note: String,
    },

    /// 設定を表示/編集
    Config {
        /// 認証トークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// APIのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
