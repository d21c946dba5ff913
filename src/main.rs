//! VoiceRoute-TTS CLI
//!
//! Commands:
//! - `serve`   - run the HTTP server backing the remote execution path
//! - `engines` - list the engine catalog with enablement status
//! - `voices`  - list an engine's voices
//! - `speak`   - synthesize text to a WAV file using the local execution path

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use voiceroute_tts::adapters::AdapterCache;
use voiceroute_tts::engine::catalog::{profile, Engine};
use voiceroute_tts::engine::voice::SynthesisOptions;
use voiceroute_tts::router::EnablementStore;
use voiceroute_tts::server::{exec, CredentialStore, ServerConfig, TtsServer};
use voiceroute_tts::VERSION;

/// VoiceRoute-TTS - multi-engine TTS routing framework
#[derive(Parser, Debug)]
#[command(name = "voiceroute-tts")]
#[command(author, version, about, long_about = None)]
#[command(about = "Multi-engine TTS routing with mode resolution and fallback")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the TTS server
    Serve {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,

        /// Path to a YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the engine catalog with enablement status
    Engines,

    /// List an engine's voices
    Voices {
        /// Engine to query
        #[arg(short, long)]
        engine: String,
    },

    /// Synthesize text to a WAV file
    Speak {
        /// Text to synthesize
        #[arg(short, long)]
        text: String,

        /// Engine to use
        #[arg(short, long, default_value = "mock")]
        engine: String,

        /// Voice ID; defaults to the engine's first voice
        #[arg(long)]
        voice_id: Option<String>,

        /// Speaking rate multiplier
        #[arg(long)]
        rate: Option<f32>,

        /// Pitch shift
        #[arg(long)]
        pitch: Option<f32>,

        /// Volume gain (0.0 - 1.0)
        #[arg(long)]
        volume: Option<f32>,

        /// Output audio file path
        #[arg(short, long, default_value = "output.wav")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to initialize logging")?;

    match cli.command {
        Commands::Serve { host, port, config } => serve(host, port, config).await,
        Commands::Engines => engines(),
        Commands::Voices { engine } => voices(&engine).await,
        Commands::Speak {
            text,
            engine,
            voice_id,
            rate,
            pitch,
            volume,
            output,
        } => {
            speak(
                &text,
                &engine,
                voice_id,
                SynthesisOptions {
                    rate,
                    pitch,
                    volume,
                    format: None,
                },
                &output,
            )
            .await
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>, config: Option<PathBuf>) -> Result<()> {
    let mut config = match config {
        Some(path) => ServerConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    TtsServer::new(config).run().await?;
    Ok(())
}

fn engines() -> Result<()> {
    let store = CredentialStore::from_env();

    println!("VoiceRoute-TTS {} - engine catalog\n", VERSION);
    println!(
        "{:<16} {:<8} {:<12} {:<8} {:<8}",
        "ENGINE", "TYPE", "CREDENTIALS", "OFFLINE", "ENABLED"
    );

    for engine in Engine::ALL {
        let prof = profile(engine);
        println!(
            "{:<16} {:<8} {:<12} {:<8} {:<8}",
            engine.as_str(),
            format!("{:?}", prof.engine_type).to_lowercase(),
            if prof.requires_credentials { "required" } else { "none" },
            if prof.supports_offline { "yes" } else { "no" },
            if store.is_enabled(engine) { "yes" } else { "no" },
        );
    }

    let missing: Vec<_> = store
        .credential_status()
        .into_iter()
        .filter(|s| !s.has_credentials)
        .collect();
    if !missing.is_empty() {
        println!("\nEngines awaiting credentials:");
        for status in missing {
            println!(
                "  {:<16} set {}",
                status.engine.as_str(),
                status.missing_vars.join(", ")
            );
        }
    }

    Ok(())
}

async fn voices(engine: &str) -> Result<()> {
    let engine = Engine::from_str(engine)?;
    let adapters = AdapterCache::new();
    let store = CredentialStore::from_env();

    let voices = exec::list_engine_voices(&adapters, &store, engine).await?;

    println!("{} voices for {}\n", voices.len(), engine);
    for voice in voices {
        let languages: Vec<&str> = voice.language_codes.iter().map(|l| l.code.as_str()).collect();
        println!("{:<24} {:<32} {}", voice.id, voice.name, languages.join(", "));
    }

    Ok(())
}

async fn speak(
    text: &str,
    engine: &str,
    voice_id: Option<String>,
    options: SynthesisOptions,
    output: &PathBuf,
) -> Result<()> {
    let engine = Engine::from_str(engine)?;
    let adapters = AdapterCache::new();
    let store = CredentialStore::from_env();

    let voice_id = match voice_id {
        Some(id) => id,
        None => {
            let voices = exec::list_engine_voices(&adapters, &store, engine).await?;
            voices
                .first()
                .map(|v| v.id.clone())
                .context("engine has no voices")?
        }
    };

    let result =
        exec::synthesize_speech(&adapters, &store, engine, &voice_id, text, &options).await?;

    std::fs::write(output, &result.audio)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} bytes of {} audio to {} (engine: {}, voice: {})",
        result.audio.len(),
        result.format.mime(),
        output.display(),
        engine,
        voice_id
    );

    Ok(())
}
