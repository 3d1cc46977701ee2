//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Huddle Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[relay]
url = "ws://127.0.0.1:8080/ws"
# connect_timeout_secs = 15      # 1-120
# reconnect_delay_secs = 1       # 1-60
# max_reconnect_delay_secs = 30  # >= reconnect_delay_secs, <= 600

[profile]
# display_name = "alice"         # join automatically with this name

[call]
# ring_timeout_secs = 45         # 5-600, unset waits indefinitely

[chat]
# sound_cue = true               # cue on messages from others

[media]
# video = true
# audio = true

[logging]
# level = "INFO"                 # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
