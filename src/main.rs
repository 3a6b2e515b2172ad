use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxstream_reader::controllers::{Command, ReaderController, Reply};
use voxstream_reader::domain::playback::{PlaybackSequencer, PlaybackState};
use voxstream_reader::domain::reader::{ReaderService, ReaderServiceApi, DEFAULT_TEXT};
use voxstream_reader::domain::speech::SpeechService;
use voxstream_reader::infrastructure::audio::{
    AudioPlayer, ProcessPcmSink, ProcessSpeechSynthesizer,
};
use voxstream_reader::infrastructure::config::{Config, ConfigError, LogFormat};
use voxstream_reader::infrastructure::repositories::GeminiRepository;

/// Read text aloud chunk by chunk with cloud or system voices
#[derive(Debug, Parser)]
#[command(name = "voxstream-reader", version, about)]
struct Args {
    /// Text or HTML file to read
    file: Option<PathBuf>,

    /// Web article to extract and read
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,

    /// Voice id, overrides DEFAULT_VOICE
    #[arg(long)]
    voice: Option<String>,

    /// Start reading right away
    #[arg(long)]
    autoplay: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_env().context("failed to load configuration")?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        has_cloud_credentials = config.has_cloud_credentials(),
        tts_model = %config.gemini.tts_model,
        audio_cache_enabled = config.audio_cache_enabled,
        "Starting VoxStream Reader"
    );

    if !config.has_cloud_credentials() {
        tracing::warn!("GEMINI_API_KEY not set. Online voices and URL extraction are unavailable");
    }

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let gemini_repo = Arc::new(
        GeminiRepository::new(config.gemini.clone())
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?,
    );

    // 2. Audio backends
    let player = AudioPlayer::new(
        Box::new(ProcessPcmSink::new(config.pcm_player.clone())),
        Box::new(ProcessSpeechSynthesizer::new(config.speech_synthesizer.clone())),
    );

    // 3. Services
    let speech_service = SpeechService::new(gemini_repo.clone(), config.audio_cache_enabled);
    let reader_service = Arc::new(ReaderService::new(gemini_repo));

    let voice = args.voice.clone().unwrap_or_else(|| config.default_voice.clone());
    let state = PlaybackState::new(voice)
        .with_rate(config.playback_rate)
        .with_volume(config.volume)
        .with_auto_scroll(config.auto_scroll);
    let sequencer = PlaybackSequencer::new(speech_service, player, state);

    // 4. Controller
    let mut controller = ReaderController::new(reader_service.clone(), sequencer);

    if let Err(e) = controller.execute(Command::RefreshVoices).await {
        tracing::warn!(error = %e, "Could not list system voices");
    }

    let document = if let Some(path) = &args.file {
        reader_service
            .load_from_file(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    } else if let Some(url) = &args.url {
        match reader_service.load_from_url(url).await {
            Ok(document) => document,
            Err(e) => {
                eprintln!("{}", e.user_message());
                reader_service.load_text(DEFAULT_TEXT)
            }
        }
    } else {
        reader_service.load_text(DEFAULT_TEXT)
    };
    println!("{}", controller.load(document));

    if args.autoplay {
        run_command(&mut controller, Command::Play).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}. Type help for commands.", e);
                        continue;
                    }
                };
                if !run_command(&mut controller, command).await {
                    break;
                }
            }
            Some(event) = controller.next_event() => {
                if let Some(output) = controller.handle_event(event) {
                    println!("{}", output);
                }
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

/// Returns false when the session should end
async fn run_command(controller: &mut ReaderController, command: Command) -> bool {
    match controller.execute(command).await {
        Ok(Reply::Quit) => false,
        Ok(Reply::Output(output)) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            true
        }
        Err(e) => {
            println!("{}", e.user_message());
            true
        }
    }
}

fn init_logging(config: &Config) {
    // stdout belongs to the reader, logs go to stderr
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voxstream_reader=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voxstream_reader=info".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
