//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator runs them all and
//! collects errors into a single `ConfigError`.

mod helpers;


use crate::schema::HuddleConfig;
use huddle_common::ConfigError;

use helpers::validate_range;

/// Longest display name accepted in `profile.display_name`.
pub const MAX_DISPLAY_NAME_LEN: usize = 64;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &HuddleConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_relay(&mut errors, config);
    validate_profile(&mut errors, config);
    validate_call(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_relay(errors: &mut Vec<String>, config: &HuddleConfig) {
    let relay = &config.relay;
    if relay.url.trim().is_empty() {
        errors.push("relay.url must not be empty".into());
    } else if !(relay.url.starts_with("ws://") || relay.url.starts_with("wss://")) {
        errors.push(format!(
            "relay.url = {} must use the ws:// or wss:// scheme",
            relay.url
        ));
    }

    validate_range(
        errors,
        "relay.connect_timeout_secs",
        relay.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "relay.reconnect_delay_secs",
        relay.reconnect_delay_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "relay.max_reconnect_delay_secs",
        relay.max_reconnect_delay_secs,
        relay.reconnect_delay_secs,
        600,
    );
}

fn validate_profile(errors: &mut Vec<String>, config: &HuddleConfig) {
    if let Some(name) = &config.profile.display_name {
        if name.trim().is_empty() {
            errors.push("profile.display_name must not be blank".into());
        } else if name.chars().count() > MAX_DISPLAY_NAME_LEN {
            errors.push(format!(
                "profile.display_name is longer than {MAX_DISPLAY_NAME_LEN} characters"
            ));
        }
    }
}

fn validate_call(errors: &mut Vec<String>, config: &HuddleConfig) {
    if let Some(secs) = config.call.ring_timeout_secs {
        validate_range(errors, "call.ring_timeout_secs", secs, 5, 600);
    }
}
