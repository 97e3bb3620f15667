use anyhow::{bail, Context, Result};
use clap::Parser;
use opscribe_core::{
    AppConfig, AudioEncoding, OperationHandle, RecognitionRequest, SpeechService,
    STORAGE_URI_SCHEME,
};
use opscribe_poller::{OperationPoller, PollProgress, PollSettings};
use opscribe_rpc::{decode_operation_results, GrpcSpeechService, NullService};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "opscribe",
    about = "Submit cloud-stored audio for asynchronous transcription and poll for the result"
)]
struct Cli {
    /// Cloud Storage location of the audio, e.g. gs://bucket/path/file.flac
    #[arg(value_parser = parse_storage_uri)]
    input_uri: String,

    /// How the audio is encoded: LINEAR16, FLAC, MULAW, AMR or AMR_WB
    #[arg(long, default_value = "LINEAR16", value_parser = parse_encoding)]
    encoding: AudioEncoding,

    /// Sampling rate of the audio in hertz
    #[arg(long = "sample_rate", default_value_t = 16000, value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: u32,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Reject non-storage URIs at argument parsing time, before any network
/// activity.
fn parse_storage_uri(value: &str) -> Result<String, String> {
    if value.starts_with(STORAGE_URI_SCHEME) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "storage uri must be of the form gs://bucket/path, got `{value}`"
        ))
    }
}

fn parse_encoding(value: &str) -> Result<AudioEncoding, String> {
    value
        .parse::<AudioEncoding>()
        .map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {path:?}"))?,
        None => AppConfig::default(),
    };

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the transcription output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let request = RecognitionRequest::new(
        cli.input_uri,
        cli.encoding,
        cli.sample_rate,
        config.service.language_code.clone(),
    )?;

    match config.service.transport.as_str() {
        "grpc" => {
            let service = GrpcSpeechService::connect(&config.service, &config.auth).await?;
            run(service, &request, &config).await
        }
        "null" => {
            let polls = config.service.null_polls_before_done as usize;
            run(NullService::new(polls), &request, &config).await
        }
        other => bail!("unknown transport `{other}` (expected \"grpc\" or \"null\")"),
    }
}

async fn run<S: SpeechService>(
    mut service: S,
    request: &RecognitionRequest,
    config: &AppConfig,
) -> Result<()> {
    tracing::info!(
        uri = %request.audio_uri,
        encoding = %request.encoding,
        sample_rate = request.sample_rate_hz,
        "submitting transcription job",
    );

    let handle = service.start_recognition(request).await?;
    println!("{handle}");

    let terminal = if handle.done {
        handle
    } else {
        poll_until_done(service, handle, config).await?
    };

    if let Some(message) = terminal.error_message() {
        println!("Operation error: {message}");
    }

    let results = decode_operation_results(&terminal)?;
    for result in results {
        println!("Result:");
        for alternative in result.alternatives {
            println!("  ({}): {}", alternative.confidence, alternative.transcript);
        }
    }
    Ok(())
}

async fn poll_until_done<S: SpeechService>(
    service: S,
    handle: OperationHandle,
    config: &AppConfig,
) -> Result<OperationHandle> {
    let mut poller = OperationPoller::new(service, &handle, PollSettings::from(&config.poll));
    loop {
        println!("Waiting for server processing...");
        match poller.poll().await {
            Some(Ok(PollProgress::InProgress(current))) => {
                if let Some(message) = current.error_message() {
                    println!("Operation error: {message}");
                }
            }
            Some(Ok(PollProgress::Completed(current))) => return Ok(current),
            Some(Err(err)) => return Err(err.into()),
            None => bail!("poller yielded no further progress"),
        }
    }
}
