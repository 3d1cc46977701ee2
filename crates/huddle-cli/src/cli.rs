use std::path::PathBuf;

use clap::Parser;

/// Huddle: presence, chat, and call signaling over a shared relay.
#[derive(Parser, Debug)]
#[command(name = "huddle", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Relay WebSocket URL (overrides `relay.url`).
    #[arg(long)]
    pub relay_url: Option<String>,

    /// Join immediately under this display name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "huddle",
            "--relay-url",
            "ws://relay.local/ws",
            "-n",
            "alice",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.relay_url.as_deref(), Some("ws://relay.local/ws"));
        assert_eq!(args.name.as_deref(), Some("alice"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
