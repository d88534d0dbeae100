//! Vesper application binary - composition root.
//!
//! Ties the Vesper crates together into a single executable:
//! 1. Load configuration from TOML
//! 2. Load and validate the primer catalog
//! 3. Build the Gemini transport and the conversation session
//! 4. Prime the session (system scan on first run, saved history after)
//! 5. Run the input loop: text REPL by default, microphone with --listen
//!
//! Inside the loop every error is logged and the loop continues; only
//! startup problems (bad catalog, missing API key) end the process.
//!
//! Speech recognition and synthesis are wired to the mock backends: the
//! trait seams are in place for vendor bindings, but none ships yet, so
//! `--listen` transcribes every utterance to the mock transcript.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use vesper_audio::{pcm, MicCaptureService, MockRecognizer, MockSynthesizer, SpeechRecognizer};
use vesper_core::config::VesperConfig;
use vesper_core::error::VesperError;
use vesper_core::prompts::{PrimerCatalog, PRIMER_DEFAULT, PRIMER_SYSTEM_SCAN};
use vesper_dispatch::{ConsoleSpeaker, Dispatcher, ResponseParser, ShellRunner, Speaker};
use vesper_llm::gemini::{GeminiConfig, GeminiTransport};
use vesper_session::{ConversationSession, HistoryStore};

mod cli;
mod speaker;

use cli::CliArgs;
use speaker::TtsSpeaker;

/// One full logical turn: send the input, parse the reply, dispatch.
///
/// All failures are soft; the conversation survives them.
async fn handle_input(
    session: &mut ConversationSession,
    parser: &ResponseParser,
    dispatcher: &Dispatcher,
    input: &str,
) {
    let reply = match session.send_turn(input).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(error = %e, "Turn failed");
            return;
        }
    };

    let actions = match parser.parse(&reply) {
        Ok(actions) => actions,
        Err(e) => {
            error!(error = %e, "Could not parse model response");
            return;
        }
    };

    if let Err(e) = dispatcher.dispatch(session, actions).await {
        error!(error = %e, "Dispatch failed");
    }
}

/// Read lines from stdin until EOF or an exit command.
async fn text_repl(
    session: &mut ConversationSession,
    parser: &ResponseParser,
    dispatcher: &Dispatcher,
    lines: &mut Lines<BufReader<Stdin>>,
) -> std::io::Result<()> {
    use std::io::Write;

    loop {
        print!("vesper> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        handle_input(session, parser, dispatcher, input).await;
    }
    Ok(())
}

/// Capture microphone audio between Enter presses and dispatch transcripts.
async fn voice_loop<R: SpeechRecognizer>(
    session: &mut ConversationSession,
    parser: &ResponseParser,
    dispatcher: &Dispatcher,
    capture: &MicCaptureService,
    recognizer: &R,
    lines: &mut Lines<BufReader<Stdin>>,
) -> std::io::Result<()> {
    info!("Voice mode: press Enter to send what was heard, Ctrl-D to exit");

    loop {
        println!("(listening — press Enter to send)");
        let Some(_) = lines.next_line().await? else {
            break;
        };

        let samples = capture.drain();
        if samples.is_empty() {
            warn!("No audio captured");
            continue;
        }

        let pcm_samples = pcm::f32_to_i16(&samples);
        let transcript = match recognizer.transcribe(&pcm_samples, capture.captured_rate()).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Transcription failed");
                continue;
            }
        };
        let transcript = transcript.trim();
        if transcript.is_empty() {
            info!("Heard nothing intelligible");
            continue;
        }

        println!("you> {}", transcript);
        handle_input(session, parser, dispatcher, transcript).await;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first, so the log level can come from it.
    let config_file = args.resolve_config_path();
    let config = VesperConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    info!("Starting Vesper v{}", env!("CARGO_PKG_VERSION"));
    info!(path = %config_file.display(), "Configuration loaded");

    // Primer catalog. A missing or incomplete catalog is a startup failure,
    // never a mid-session surprise.
    let prompts_file = args.resolve_prompts_file(&config.general.prompts_file);
    let catalog = PrimerCatalog::load(&prompts_file)?;
    catalog.validate()?;

    // API key comes from the environment variable named in the config.
    let api_key = std::env::var(&config.llm.api_key_env).map_err(|_| {
        VesperError::Config(format!(
            "API key environment variable {} is not set",
            config.llm.api_key_env
        ))
    })?;

    let transport = GeminiTransport::new(GeminiConfig {
        base_url: config.llm.base_url.clone(),
        model: config.llm.model.clone(),
        api_key,
        request_timeout: config
            .llm
            .request_timeout_secs
            .map(std::time::Duration::from_secs),
    })?;

    // History store. An empty path in the config disables persistence.
    let store = if config.general.history_file.is_empty() && args.history_file.is_none() {
        HistoryStore::new(None)
    } else {
        HistoryStore::new(Some(args.resolve_history_file(&config.general.history_file)))
    };

    // First run gets the system-scan primer so the model learns the machine;
    // later runs resume from the saved transcript under the default primer.
    let primer_name = match args.primer.as_deref() {
        Some(name) => name.to_string(),
        None if store.exists() => PRIMER_DEFAULT.to_string(),
        None => PRIMER_SYSTEM_SCAN.to_string(),
    };
    let primer = catalog.get(&primer_name)?.to_string();
    info!(primer = %primer_name, "Priming session");

    let mut session = ConversationSession::new(Box::new(transport), store);
    session.prime(&primer)?;

    // Spoken output goes through synthesis only when audio is enabled and
    // --quiet is absent.
    let speaker: Arc<dyn Speaker> = if !args.quiet && config.audio.enabled {
        info!("Speech synthesis enabled (mock backend)");
        Arc::new(TtsSpeaker::new(MockSynthesizer::new(
            config.audio.sample_rate,
        )))
    } else {
        Arc::new(ConsoleSpeaker::new())
    };

    let parser = ResponseParser::new();
    let dispatcher = Dispatcher::new(
        speaker,
        Arc::new(ShellRunner::new()),
        config.dispatch.max_branches,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if args.listen {
        let capture = MicCaptureService::new(config.audio.clone());
        match capture.start().await {
            Ok(()) => {
                let recognizer = MockRecognizer::default();
                voice_loop(
                    &mut session,
                    &parser,
                    &dispatcher,
                    &capture,
                    &recognizer,
                    &mut lines,
                )
                .await?;
                if capture.is_active() {
                    if let Err(e) = capture.stop().await {
                        warn!(error = %e, "Failed to stop capture");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Microphone unavailable; falling back to text input");
                text_repl(&mut session, &parser, &dispatcher, &mut lines).await?;
            }
        }
    } else {
        text_repl(&mut session, &parser, &dispatcher, &mut lines).await?;
    }

    session.save();
    info!("Goodbye");
    Ok(())
}
