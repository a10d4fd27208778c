//! AiTools - command-line smoke test
//!
//! Usage:
//!   aitools chat <prompt>
//!   aitools image <prompt>
//!   aitools speak <text> <output.mp3>
//!   aitools health

use anyhow::{bail, Context, Result};
use tokio::signal;
use tracing::{info, warn};

use aitools::{AiTools, Config, ImageJob};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aitools=info".into()),
        )
        .with_target(true)
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    aitools::telemetry::describe_metrics();

    let tools = AiTools::from_config(&config)?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Dropping the command future on Ctrl+C abandons the operation
    tokio::select! {
        result = run(&tools, &args) => result,
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, abandoning operation");
            Ok(())
        }
    }
}

async fn run(tools: &AiTools, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("chat") => {
            let prompt = args.get(1).context("missing prompt")?;
            let reply = tools.chat_text(prompt).await?;
            println!("{}", reply);
        }
        Some("image") => {
            let prompt = args.get(1).context("missing prompt")?;
            for url in tools.image_urls_or_marker(&ImageJob::new(prompt.as_str())).await {
                println!("{}", url);
            }
        }
        Some("speak") => {
            let text = args.get(1).context("missing text")?;
            let path = args.get(2).context("missing output path")?;
            tools.speech_to_file(text, path, None).await?;
            info!(path = %path, "Audio written");
        }
        Some("health") => {
            println!("{}", tools.check_api_health().await?);
        }
        Some(other) => bail!("unknown command: {}", other),
        None => bail!("usage: aitools <chat|image|speak|health> [args]"),
    }
    Ok(())
}
