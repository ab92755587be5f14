use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use voice_memos::capture::{CaptureConfig, CaptureEngineFactory, CaptureSource};
use voice_memos::playback::probe_duration_millis;
use voice_memos::waveform::{terminal, WaveformStyle};
use voice_memos::{
    create_router, format_time, AppState, Config, PlaybackTracker, Recorder, WaveformView,
};

#[derive(Parser)]
#[command(name = "voice-memos")]
#[command(about = "Voice memo recorder with metering waveforms")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/voice-memos")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP control surface
    Serve,
    /// Capture a WAV file and print its waveform
    Render {
        /// 16-bit PCM WAV file
        path: PathBuf,

        /// Number of waveform bars
        #[arg(short, long)]
        buckets: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg).await,
        Command::Render { path, buckets } => render(cfg, path, buckets).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    info!("{} starting", cfg.service.name);

    info!("Recordings directory: {}", cfg.recorder.recordings_dir().display());

    let router = create_router(AppState::from_config(&cfg));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await.context("HTTP server failed")?;

    Ok(())
}

async fn render(cfg: Config, path: PathBuf, buckets: Option<usize>) -> Result<()> {
    let capture_config = CaptureConfig {
        realtime: false,
        ..CaptureConfig::from(&cfg.recorder)
    };
    let engine = CaptureEngineFactory::create(CaptureSource::File(path.clone()), capture_config)?;
    let mut recorder = Recorder::new(engine);

    recorder.start().await?;
    while recorder.is_capturing() {
        recorder.pump();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let memo = recorder
        .stop()
        .await?
        .with_context(|| format!("No recording produced from {}", path.display()))?;

    let bucket_count = buckets.unwrap_or(cfg.waveform.bucket_count);
    let style = WaveformStyle::from(&cfg.waveform);
    let view = WaveformView::build(&memo.metering, bucket_count, &style, &PlaybackTracker::new());
    let duration = probe_duration_millis(&memo.uri)?.unwrap_or(0);

    println!("{}", terminal::render_bars(&view.bars, &style));
    println!(
        "{} samples, {} bars, {}",
        memo.metering.len(),
        view.bars.len(),
        format_time(duration)
    );
    println!("Stored at {}", memo.uri);

    Ok(())
}
