use anyhow::Context;
use clap::Parser;
use notecap_common::{decode_data_url, to_jpeg_data_url};
use notecap_rust::cli::{Cli, Commands};
use notecap_rust::config::Config;
use notecap_rust::{
    CaptureController, CaptureOutcome, CaptureSession, FolderImageSource, GenerationOutcome,
    HttpTransferClient, ImageTransport, NoteGenerationTrigger, ReviewCollection,
    SharedThumbnailState,
};
use std::rc::Rc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let config = Config::load()?;

    match cli.command {
        Commands::New => {
            let transport = connect(&config)?;
            let state = SharedThumbnailState::new();
            let session = CaptureSession::begin(transport.as_ref(), &state).await?;
            println!("✔ ノートを作成しました: {}", session.id());
        }

        Commands::Notes => {
            let transport = connect(&config)?;
            let notes = transport.list_notes().await?;
            if notes.is_empty() {
                println!("ノートがありません");
            }
            for note in notes {
                let label = note.title.or(note.subject).unwrap_or_else(|| "(無題)".into());
                println!("  {}  {}", note.notes_id, label);
            }
        }

        Commands::Capture { folder, note, limit } => {
            println!("📷 notecap - 撮影\n");

            let transport = connect(&config)?;
            let state = SharedThumbnailState::new();
            let session = match note {
                Some(id) => CaptureSession::resume(id)?,
                None => CaptureSession::begin(transport.as_ref(), &state).await?,
            };
            println!("ノートID: {}", session.id());

            let source = Rc::new(FolderImageSource::scan(&folder)?);
            let shots = limit.unwrap_or(usize::MAX).min(source.remaining());
            println!("✔ {}枚の写真を検出\n", source.remaining());

            let controller = CaptureController::new(source, transport, state.clone());
            for shot in 1..=shots {
                match controller.capture_and_upload(session.id()).await {
                    Ok(CaptureOutcome::Uploaded(uploaded)) => {
                        println!(
                            "[{}/{}] ✔ {} (合計: {}枚)",
                            shot, shots, uploaded.image_id, uploaded.image_count
                        );
                    }
                    Ok(CaptureOutcome::NoImage) => {
                        println!("[{}/{}] 撮影に失敗しました", shot, shots);
                    }
                    Ok(CaptureOutcome::Rejected) => {
                        println!("[{}/{}] 処理中のためスキップしました", shot, shots);
                    }
                    Err(err) => {
                        println!("[{}/{}] ✖ {}", shot, shots, err.user_message());
                    }
                }
            }

            match state.badge() {
                Some(badge) => println!("\n✅ 撮影完了: {}枚", badge.image_count),
                None => println!("\nアップロードされた画像はありません"),
            }
        }

        Commands::Review { note, select, save_dir } => {
            let transport = connect(&config)?;
            let session = CaptureSession::resume(note)?;
            let review = ReviewCollection::new(transport, SharedThumbnailState::new());
            review.hydrate(session.id()).await?;

            if let Some(index) = select {
                review.select_index(index);
            }

            println!("画像: {}枚", review.len());
            for item in review.strip() {
                let marker = if item.active { "▶" } else { " " };
                println!("{} {:>3}  {}", marker, item.position, item.image_id);
            }

            if let Some(dir) = save_dir {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("create {}", dir.display()))?;
                for image in review.images() {
                    let Some(full) = image.full_image_data.as_deref() else {
                        continue;
                    };
                    let bytes = decode_data_url(&to_jpeg_data_url(full))?;
                    let path = dir.join(image.file_name());
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("write {}", path.display()))?;
                }
                println!("✔ 保存しました: {}", dir.display());
            }
        }

        Commands::Delete { note, image_id } => {
            let transport = connect(&config)?;
            let session = CaptureSession::resume(note)?;
            let state = SharedThumbnailState::new();
            let review = ReviewCollection::new(transport, state.clone());
            review.hydrate(session.id()).await?;
            review.remove(&image_id).await?;
            println!("✔ 削除しました: {} (残り: {}枚)", image_id, state.image_count());
        }

        Commands::Generate { note } => {
            let transport = connect(&config)?;
            let mut session = CaptureSession::resume(note)?;
            let trigger = NoteGenerationTrigger::new(transport);
            match trigger.start(&mut session).await? {
                GenerationOutcome::Accepted => println!("✔ ノート生成を開始しました"),
                GenerationOutcome::Rejected { status } => {
                    println!("ノート生成は開始されませんでした: {}", status)
                }
            }
        }

        Commands::Config { set_token, set_api_url, show } => {
            let mut config = config;

            if let Some(token) = set_token {
                config.set_auth_token(token)?;
                println!("✔ 認証トークンを設定しました");
            }

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API URL: {}", config.api_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  認証トークン: {}", if config.get_auth_token().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn connect(config: &Config) -> anyhow::Result<Rc<dyn ImageTransport>> {
    let client = HttpTransferClient::from_config(config)?;
    Ok(Rc::new(client))
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("NOTECAP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
