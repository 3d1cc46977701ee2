//! huddle: terminal front-end for a Huddle session.
//!
//! Connects to the relay, runs a session coordinator in the background,
//! and maps stdin lines to intents and session events to stdout.

mod cli;
mod console;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use huddle_config::HuddleConfig;
use huddle_session::{
    Collaborators, Intent, MediaConstraints, SessionConfig, SessionCoordinator, WsRelayClient,
    WsRelayConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::console::{Action, Console};
use crate::terminal::{PlaceholderCapture, SignalingOnlyTransport, TerminalBell};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // An explicit --config must load; the default location falls back.
    let (config, config_error) = match &args.config {
        Some(path) => match huddle_config::load_config_from(path) {
            Ok(config) => (config, None),
            Err(e) => {
                eprintln!("huddle: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => match huddle_config::load_config() {
            Ok(config) => (config, None),
            Err(e) => (HuddleConfig::default(), Some(e)),
        },
    };

    // Initialize logging
    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Using default config");
    }

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "huddle exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Args, config: HuddleConfig) -> huddle_common::Result<()> {
    let relay_config = relay_config(&config, args.relay_url);
    tracing::info!(url = %relay_config.url, "Starting huddle");

    let (relay, relay_rx) = WsRelayClient::connect(relay_config);
    let collaborators = Collaborators {
        relay: Arc::new(relay),
        capture: Arc::new(PlaceholderCapture::default()),
        transport: Arc::new(SignalingOnlyTransport),
        cue: Arc::new(TerminalBell),
    };
    let (coordinator, mut events) = SessionCoordinator::new(session_config(&config), collaborators);
    let (intent_tx, intent_rx) = mpsc::channel::<Intent>(64);
    let session = tokio::spawn(coordinator.run(relay_rx, intent_rx));

    if let Some(name) = args.name.or(config.profile.display_name) {
        let _ = intent_tx.send(Intent::Join(name)).await;
    }
    println!("{}", console::HELP);

    let mut console = Console::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match console.handle_line(&line) {
                    Action::Intent(intent) => {
                        if intent_tx.send(intent).await.is_err() {
                            break;
                        }
                    }
                    Action::Print(text) => println!("{text}"),
                    Action::Quit => break,
                    Action::None => {}
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Some(text) = console.observe(&event) {
                    println!("{text}");
                }
            }
        }
    }

    drop(events);
    let _ = intent_tx.send(Intent::Shutdown).await;
    if let Err(e) = session.await {
        tracing::warn!(error = %e, "Session task ended abnormally");
    }
    Ok(())
}

fn relay_config(config: &HuddleConfig, url_override: Option<String>) -> WsRelayConfig {
    WsRelayConfig {
        url: url_override.unwrap_or_else(|| config.relay.url.clone()),
        connect_timeout_secs: u64::from(config.relay.connect_timeout_secs),
        reconnect_delay_secs: u64::from(config.relay.reconnect_delay_secs),
        max_reconnect_delay_secs: u64::from(config.relay.max_reconnect_delay_secs),
    }
}

fn session_config(config: &HuddleConfig) -> SessionConfig {
    SessionConfig {
        media: MediaConstraints {
            video: config.media.video,
            audio: config.media.audio,
        },
        sound_cue: config.chat.sound_cue,
        ring_timeout: config
            .call
            .ring_timeout_secs
            .map(|secs| Duration::from_secs(u64::from(secs))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_config_into_session_settings() {
        let mut config = HuddleConfig::default();
        config.call.ring_timeout_secs = Some(30);
        config.chat.sound_cue = false;
        config.media.video = false;

        let session = session_config(&config);
        assert_eq!(session.ring_timeout, Some(Duration::from_secs(30)));
        assert!(!session.sound_cue);
        assert!(!session.media.video);
        assert!(session.media.audio);
    }

    #[test]
    fn relay_url_flag_wins_over_config() {
        let config = HuddleConfig::default();
        let relay = relay_config(&config, Some("wss://relay.example/ws".into()));
        assert_eq!(relay.url, "wss://relay.example/ws");
        assert_eq!(relay.connect_timeout_secs, 15);

        let relay = relay_config(&config, None);
        assert_eq!(relay.url, config.relay.url);
    }
}
