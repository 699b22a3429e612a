use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use redactor::config::RedactorConfig;
use redactor::domain::RedactionKind;
use redactor::session::{RedactionSession, parse_script};

/// Load an image, replay redaction gestures on it, write the result as PNG
#[derive(Parser, Debug)]
#[command(name = "redactor", version, about)]
struct Args {
    /// Image to redact
    input: PathBuf,

    /// Where to write the redacted PNG
    #[arg(short, long)]
    output: PathBuf,

    /// JSON array of session messages (down/move/up/mode/undo/redo/settle)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Initial redaction mode (black-out or blur)
    #[arg(short, long)]
    mode: Option<RedactionKind>,

    /// Config file; defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RedactorConfig::load_from(path)?,
        None => RedactorConfig::load(),
    };

    let mut session = RedactionSession::new(&config)?;
    if let Some(mode) = args.mode {
        session.set_mode(mode);
    }
    session.load_image(&args.input).await?;

    if let Some(path) = &args.script {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        let script = parse_script(&json)?;
        log::info!("running {} script step(s)", script.len());
        session.run(&script).await?;
    }

    session.save_png(&args.output).await?;
    Ok(())
}
