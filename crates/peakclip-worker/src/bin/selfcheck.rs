use std::path::Path;

use tokio::process::Command;

use peakclip_caption_client::CaptionClient;
use peakclip_storage::StoreConfig;
use peakclip_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env();
    let store = StoreConfig::from_env();

    println!(
        "peakclip-selfcheck: starting with work_dir={} output_dir={}",
        config.work_dir.display(),
        store.output_dir.display()
    );
    ensure_dir(&config.work_dir).await?;
    ensure_dir(&store.output_dir).await?;

    for tool in ["ffmpeg", "ffprobe"] {
        ensure_tool(tool, "-version").await?;
    }
    ensure_tool("yt-dlp", "--version").await?;

    let captions = CaptionClient::from_env()?;
    if !captions.health_check().await? {
        println!(
            "peakclip-selfcheck: warning: caption service at {} is not healthy",
            captions.base_url()
        );
    }

    println!("peakclip-selfcheck: ok");
    Ok(())
}

async fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {}", path.display(), e))
}

async fn ensure_tool(tool: &str, version_flag: &str) -> anyhow::Result<()> {
    let output = Command::new(tool)
        .arg(version_flag)
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("{} not available: {}", tool, e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} {} failed: {:?}",
            tool,
            version_flag,
            output.status
        ));
    }
    Ok(())
}
