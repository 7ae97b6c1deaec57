//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Length of a compressed secp256k1 public key in bytes.
const PUBLIC_KEY_LEN: usize = 33;

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_peer(config)?;
    validate_group(config)?;
    validate_sequence(config)?;
    validate_trust(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_peer(config: &Config) -> ConfigResult<()> {
    non_empty_path("peer.key_file", config.peer.key_file.as_deref())
}

fn validate_group(config: &Config) -> ConfigResult<()> {
    if let Some(id) = &config.group.id {
        if id.is_empty() {
            return Err(invalid("group.id", "group id must not be empty".to_owned()));
        }
        if let Some(c) = id.chars().find(|c| *c == '|' || c.is_control()) {
            return Err(invalid(
                "group.id",
                format!("group id '{id}' contains forbidden character {c:?}"),
            ));
        }
    }
    non_empty_path("group.key_file", config.group.key_file.as_deref())
}

fn validate_sequence(config: &Config) -> ConfigResult<()> {
    non_empty_path("sequence.path", config.sequence.path.as_deref())
}

fn validate_trust(config: &Config) -> ConfigResult<()> {
    for peer in &config.trust.peers {
        let bytes = hex::decode(peer).map_err(|_| {
            invalid("trust.peers", format!("'{peer}' is not a hex public key"))
        })?;
        let prefix_ok = matches!(bytes.first(), Some(0x02 | 0x03));
        if bytes.len() != PUBLIC_KEY_LEN || !prefix_ok {
            return Err(invalid(
                "trust.peers",
                format!("'{peer}' is not a {PUBLIC_KEY_LEN}-byte compressed public key"),
            ));
        }
    }

    if config.trust.require_trusted && config.trust.peers.is_empty() {
        return Err(invalid(
            "trust.require_trusted",
            "require_trusted is set but trust.peers is empty".to_owned(),
        ));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        ));
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        ));
    }

    Ok(())
}

fn non_empty_path(field: &str, path: Option<&str>) -> ConfigResult<()> {
    match path {
        Some(p) if p.trim().is_empty() => Err(invalid(field, "path must not be empty".to_owned())),
        _ => Ok(()),
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message,
    }
}
