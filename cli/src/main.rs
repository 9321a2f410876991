mod config;
mod error;
mod logging;
mod server;

use clap::{Parser, Subcommand};
use config::CliConfig;
use error::Result;
use std::path::PathBuf;
use wfsk_core::{analyze, decode_message, encode_message, mode_by_name, read_wav};

#[derive(Parser)]
#[command(name = "wfsk")]
#[command(about = "Chirp-synchronized Walsh-FSK acoustic modem")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (defaults silently if absent).
    #[arg(long, global = true, default_value = "wfsk.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text into a WAV audio file.
    Send {
        /// Text message to transmit.
        text: String,
        /// Output WAV path.
        output: PathBuf,
        /// Modulation mode: DEFAULT, ROBUST or FAST.
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// Decode a WAV file back into text.
    Decode {
        /// Input WAV path.
        input: PathBuf,
        /// Mode to try first (falls back to auto-detection).
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// Run full per-packet diagnostics on a WAV file.
    Analyze {
        /// Input WAV path.
        input: PathBuf,
    },
    /// Start the HTTP server.
    Serve {
        /// Port to listen on; overrides the config file.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)?;

    match cli.command {
        Commands::Send { text, output, mode } => send_command(&text, &output, mode, &config),
        Commands::Decode { input, mode } => decode_command(&input, mode, &config),
        Commands::Analyze { input } => analyze_command(&input),
        Commands::Serve { port } => serve_command(port, config),
    }
}

fn send_command(text: &str, output: &PathBuf, mode: Option<String>, config: &CliConfig) -> Result<()> {
    let mode_name = mode.unwrap_or_else(|| config.default_mode.clone());
    let modem_config = mode_by_name(&mode_name)?;
    tracing::info!(mode = modem_config.name, bytes = text.len(), "encoding message");

    let wav = encode_message(text, &modem_config)?;
    std::fs::write(output, &wav)?;
    println!("wrote {} bytes to {}", wav.len(), output.display());
    Ok(())
}

fn decode_command(input: &PathBuf, mode: Option<String>, config: &CliConfig) -> Result<()> {
    let wav_bytes = std::fs::read(input)?;
    let (pcm, sample_rate, channels) = read_wav(&wav_bytes)?;
    let pcm = downmix_if_needed(pcm, channels);

    let hint = mode.unwrap_or_else(|| config.default_mode.clone());
    let outcome = decode_message(&pcm, sample_rate, &hint)?;

    println!("mode: {}", outcome.detected_mode);
    println!("{}", outcome.text);
    Ok(())
}

fn analyze_command(input: &PathBuf) -> Result<()> {
    let wav_bytes = std::fs::read(input)?;
    let (pcm, sample_rate, channels) = read_wav(&wav_bytes)?;
    let pcm = downmix_if_needed(pcm, channels);

    let outcome = analyze(&pcm, sample_rate)?;
    match outcome.mode {
        Some(mode) => println!("detected mode: {mode}"),
        None => println!("no mode produced a CRC-valid packet"),
    }
    for packet in outcome.analyses {
        println!(
            "packet {:>3}  t={:>8.3}s  rs_ok={:<5}  errata={:<3}  crc_ok={:<5}  num={:?}/{:?}",
            packet.packet_index,
            packet.found_at_s,
            packet.rs_decode_success,
            packet.rs_errors_corrected,
            packet.crc_valid,
            packet.packet_num,
            packet.total_packets,
        );
    }
    Ok(())
}

fn serve_command(port: Option<u16>, config: CliConfig) -> Result<()> {
    let port = port.unwrap_or(config.server_port);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config, port))?;
    Ok(())
}

fn downmix_if_needed(pcm: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels == 2 {
        wfsk_core::resample::stereo_to_mono(&pcm)
    } else {
        pcm
    }
}
