use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{ensure_success, output_empty_collection, output_success, ApiClient};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum VideoCommands {
    #[command(about = "List published videos, newest first")]
    List,

    #[command(about = "Publish a video that was already uploaded to the media host")]
    Publish {
        #[arg(help = "Title")]
        title: String,
        #[arg(long, help = "Description")]
        description: String,
        #[arg(long, help = "URL of the uploaded video")]
        video_url: String,
        #[arg(long, help = "URL of the uploaded thumbnail")]
        thumbnail_url: String,
        #[arg(long, help = "Hide player controls")]
        no_controls: bool,
    },
}

pub async fn handle(client: &ApiClient, cmd: VideoCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        VideoCommands::List => list(client, output_format).await,
        VideoCommands::Publish {
            title,
            description,
            video_url,
            thumbnail_url,
            no_controls,
        } => {
            let payload = json!({
                "title": title,
                "description": description,
                "video_url": video_url,
                "thumbnail_url": thumbnail_url,
                "controls": !no_controls,
            });
            let (status, body) = client.post("/api/videos", &payload).await?;
            ensure_success(status, &body)?;

            let video = body.get("data").cloned().unwrap_or(Value::Null);
            output_success(output_format, &format!("Published '{}'", title), Some(json!({ "video": video })))
        }
    }
}

async fn list(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (status, body) = client.get("/api/videos").await?;
    ensure_success(status, &body)?;

    let videos = body
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if videos.is_empty() {
        return output_empty_collection(output_format, "videos", "No videos published yet");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "videos": videos }))?);
        }
        OutputFormat::Text => {
            for video in &videos {
                let title = video.get("title").and_then(Value::as_str).unwrap_or("(untitled)");
                let url = video.get("video_url").and_then(Value::as_str).unwrap_or("");
                println!("{}  {}", title, url);
            }
        }
    }
    Ok(())
}
