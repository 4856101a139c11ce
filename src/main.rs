//! voicemail-studio - draft, review and voice a phishing-awareness training voicemail.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use voicemail_studio::backends::{ElevenLabsClient, OpenAiClient, SpeechSynthesizer, TextGenerator};
use voicemail_studio::config_loader::{Credentials, Settings};
use voicemail_studio::error::StartupError;
use voicemail_studio::operator::ConsoleOperator;
use voicemail_studio::persistence::FileSink;
use voicemail_studio::pipeline::PipelineController;
use voicemail_studio::transport::{ReqwestTransport, Transport};

/// Interactive details -> script -> audio voicemail pipeline
#[derive(Parser)]
#[command(name = "voicemail-studio")]
#[command(version)]
#[command(about = "Generate a reviewed training voicemail with OpenAI and ElevenLabs", long_about = None)]
struct Cli {
    /// Extra configuration file (toml, yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the voicemail is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Callback number the script must use
    #[arg(long)]
    callback_number: Option<String>,

    /// Also save the approved script next to the audio
    #[arg(long)]
    save_script: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build(cli: &Cli) -> Result<PipelineController, StartupError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(number) = &cli.callback_number {
        settings.callback_number = number.clone();
    }
    if cli.save_script {
        settings.save_script = true;
    }
    settings.validate()?;

    let credentials = Credentials::from_env()?;

    let transport: Arc<dyn Transport> = Arc::new(
        ReqwestTransport::new(Duration::from_secs(settings.request_timeout_secs))
            .map_err(|e| StartupError::Http(e.to_string()))?,
    );
    let text = OpenAiClient::new(&settings, credentials.openai_api_key(), transport.clone());
    let speech = ElevenLabsClient::new(&settings, credentials.elevenlabs_api_key(), transport);
    info!(
        target = "studio",
        text = text.id(),
        speech = speech.id(),
        output = %settings.output_path().display(),
        "pipeline ready"
    );

    let sink = FileSink::new(
        settings.output_dir.clone(),
        settings.output_file.clone(),
        settings.save_script,
    );

    Ok(PipelineController::new(
        Box::new(text),
        Box::new(speech),
        Box::new(ConsoleOperator::stdio()),
        Box::new(sink),
        settings.callback_number,
    ))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut pipeline = match build(&cli) {
        Ok(p) => p,
        Err(e) => {
            error!(target = "studio", error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run() {
        Ok(location) => {
            info!(target = "studio", path = %location.display(), "pipeline completed");
            ExitCode::SUCCESS
        }
        // Already logged by the controller when it aborted.
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from([
            "voicemail-studio",
            "--output-dir",
            "/tmp/out",
            "--callback-number",
            "1-800-555-0100",
            "--save-script",
            "-vv",
        ]);
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.callback_number.as_deref(), Some("1-800-555-0100"));
        assert!(cli.save_script);
        assert_eq!(cli.verbose, 2);
    }
}
