//! Line-oriented console: turns typed lines into intents and session
//! events into printable text.

use huddle_session::{CallEndReason, CallState, Intent, PeerRecord, SessionEvent};

pub const HELP: &str = "\
commands:
  /join <name>       join under a display name
  /call <id|name>    call a participant
  /answer            answer the ringing call
  /decline           decline the ringing call
  /hangup            end the current call
  /peers             list participants
  /help              show this help
  /quit              leave
anything else is sent as a chat message (or used as your name before joining)";

/// What to do with a typed line.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Intent(Intent),
    Print(String),
    Quit,
    None,
}

/// Front-end state mirrored from session events.
#[derive(Debug, Default)]
pub struct Console {
    joined: bool,
    peers: Vec<PeerRecord>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_line(&self, line: &str) -> Action {
        let line = line.trim();
        if line.is_empty() {
            return Action::None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return if self.joined {
                Action::Intent(Intent::SendMessage(line.to_string()))
            } else {
                Action::Intent(Intent::Join(line.to_string()))
            };
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(n, r)| (n, r.trim()))
            .unwrap_or((command, ""));
        match name {
            "join" => Action::Intent(Intent::Join(rest.to_string())),
            "call" if rest.is_empty() => Action::Print("usage: /call <id|name>".into()),
            "call" => match self.resolve_target(rest) {
                Ok(id) => Action::Intent(Intent::Call(id)),
                Err(msg) => Action::Print(msg),
            },
            "answer" => Action::Intent(Intent::Answer),
            "decline" => Action::Intent(Intent::Decline),
            "hangup" => Action::Intent(Intent::Hangup),
            "peers" => Action::Print(self.peer_list()),
            "help" => Action::Print(HELP.to_string()),
            "quit" | "exit" => Action::Quit,
            other => Action::Print(format!("unknown command: /{other} (try /help)")),
        }
    }

    /// Map a connection id or a unique display name to a connection id.
    pub fn resolve_target(&self, query: &str) -> Result<String, String> {
        if let Some(peer) = self.peers.iter().find(|p| p.id == query) {
            return Ok(peer.id.clone());
        }
        let matches: Vec<&PeerRecord> = self
            .peers
            .iter()
            .filter(|p| p.display_name.eq_ignore_ascii_case(query))
            .collect();
        match matches.as_slice() {
            [peer] => Ok(peer.id.clone()),
            [] => Err(format!("nobody called {query} is here")),
            _ => Err(format!("{query} is ambiguous, use the id")),
        }
    }

    /// Update mirrored state and render the event, if it has anything to say.
    pub fn observe(&mut self, event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::Joined { .. } => self.joined = true,
            SessionEvent::PresenceChanged { peers } => self.peers = peers.clone(),
            SessionEvent::RelayDisconnected | SessionEvent::RelayUnreachable { .. } => {
                self.peers.clear()
            }
            _ => {}
        }
        render(event)
    }

    fn peer_list(&self) -> String {
        if self.peers.is_empty() {
            return "nobody else is here".to_string();
        }
        self.peers
            .iter()
            .map(|p| format!("  {} ({})", p.display_name, p.id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn render(event: &SessionEvent) -> Option<String> {
    let text = match event {
        SessionEvent::Connected { id } => format!("* connected as {id}"),
        SessionEvent::RelayDisconnected => "* relay connection lost, reconnecting".to_string(),
        SessionEvent::RelayUnreachable { reason } => {
            format!("* relay unreachable ({reason}), retrying")
        }
        SessionEvent::Joined { display_name } => format!("* joined as {display_name}"),
        SessionEvent::LocalMediaReady { .. } => return None,
        SessionEvent::MediaUnavailable { reason } => format!("* calls unavailable: {reason}"),
        SessionEvent::PresenceChanged { peers } => format!("* {} other(s) here", peers.len()),
        SessionEvent::MessageReceived { message, .. } => {
            format!("<{}> {}", message.display_name, message.text)
        }
        SessionEvent::IncomingCall { display_name, .. } => {
            format!("* {display_name} is calling: /answer or /decline")
        }
        SessionEvent::CallStateChanged { state, remote_id } => match (state, remote_id) {
            (CallState::Calling, Some(id)) => format!("* calling {id}..."),
            (CallState::Connected, Some(id)) => format!("* in a call with {id}"),
            _ => return None,
        },
        SessionEvent::RemoteStream(stream) => format!("* receiving {}", stream.id()),
        SessionEvent::CallEnded { reason } => match reason {
            CallEndReason::HungUp => "* call ended".to_string(),
            CallEndReason::Declined => "* call declined".to_string(),
            CallEndReason::TimedOut => "* no answer".to_string(),
            CallEndReason::Failed(reason) => format!("* call failed: {reason}"),
        },
        SessionEvent::Rejected(err) => format!("! {err}"),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_session::ChatMessage;

    fn console_with_peers() -> Console {
        let mut console = Console::new();
        console.observe(&SessionEvent::Joined {
            display_name: "alice".into(),
        });
        console.observe(&SessionEvent::PresenceChanged {
            peers: vec![
                PeerRecord {
                    id: "b-1".into(),
                    display_name: "Bob".into(),
                },
                PeerRecord {
                    id: "c-1".into(),
                    display_name: "Carol".into(),
                },
                PeerRecord {
                    id: "c-2".into(),
                    display_name: "carol".into(),
                },
            ],
        });
        console
    }

    #[test]
    fn plain_text_joins_then_chats() {
        let mut console = Console::new();
        assert_eq!(
            console.handle_line("alice"),
            Action::Intent(Intent::Join("alice".into()))
        );
        console.observe(&SessionEvent::Joined {
            display_name: "alice".into(),
        });
        assert_eq!(
            console.handle_line("  hi there "),
            Action::Intent(Intent::SendMessage("hi there".into()))
        );
        assert_eq!(console.handle_line("   "), Action::None);
    }

    #[test]
    fn parses_commands() {
        let console = console_with_peers();
        assert_eq!(console.handle_line("/answer"), Action::Intent(Intent::Answer));
        assert_eq!(console.handle_line("/decline"), Action::Intent(Intent::Decline));
        assert_eq!(console.handle_line("/hangup"), Action::Intent(Intent::Hangup));
        assert_eq!(console.handle_line("/quit"), Action::Quit);
        assert_eq!(
            console.handle_line("/join  bob "),
            Action::Intent(Intent::Join("bob".into()))
        );
        assert!(matches!(console.handle_line("/poke"), Action::Print(_)));
        assert!(matches!(console.handle_line("/call"), Action::Print(_)));
    }

    #[test]
    fn call_resolves_id_or_unique_name() {
        let console = console_with_peers();
        assert_eq!(
            console.handle_line("/call bob"),
            Action::Intent(Intent::Call("b-1".into()))
        );
        assert_eq!(
            console.handle_line("/call c-2"),
            Action::Intent(Intent::Call("c-2".into()))
        );
        assert!(console.resolve_target("carol").is_err());
        assert!(console.resolve_target("dave").is_err());
    }

    #[test]
    fn disconnect_forgets_peers() {
        let mut console = console_with_peers();
        console.observe(&SessionEvent::RelayDisconnected);
        assert_eq!(
            console.handle_line("/peers"),
            Action::Print("nobody else is here".into())
        );
    }

    #[test]
    fn unreachable_relay_is_shown_and_forgets_peers() {
        let mut console = console_with_peers();
        let event = SessionEvent::RelayUnreachable {
            reason: "relay connect error: connection refused".into(),
        };
        assert_eq!(
            console.observe(&event).as_deref(),
            Some("* relay unreachable (relay connect error: connection refused), retrying")
        );
        assert!(console.resolve_target("bob").is_err());
    }

    #[test]
    fn renders_chat_and_call_events() {
        let chat = SessionEvent::MessageReceived {
            message: ChatMessage::new("Bob", "hi"),
            remote: true,
        };
        assert_eq!(render(&chat).as_deref(), Some("<Bob> hi"));

        let ended = SessionEvent::CallEnded {
            reason: CallEndReason::Failed("ice failed".into()),
        };
        assert_eq!(render(&ended).as_deref(), Some("* call failed: ice failed"));

        let idle = SessionEvent::CallStateChanged {
            state: CallState::Idle,
            remote_id: None,
        };
        assert_eq!(render(&idle), None);
    }
}
