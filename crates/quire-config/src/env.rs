//! Environment variable fallbacks.
//!
//! Env vars are a **fallback**, not an override: they only fill fields that
//! no config file set.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `QUIRE_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "QUIRE_PEER",
        field_path: "peer.name",
    },
    EnvMapping {
        var_name: "QUIRE_PEER_KEY",
        field_path: "peer.key_file",
    },
    EnvMapping {
        var_name: "QUIRE_GROUP",
        field_path: "group.id",
    },
    EnvMapping {
        var_name: "QUIRE_GROUP_KEY",
        field_path: "group.key_file",
    },
    EnvMapping {
        var_name: "QUIRE_SEQUENCE",
        field_path: "sequence.path",
    },
    EnvMapping {
        var_name: "QUIRE_REQUIRE_TRUSTED",
        field_path: "trust.require_trusted",
    },
    EnvMapping {
        var_name: "QUIRE_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "QUIRE_LOG_FORMAT",
        field_path: "logging.format",
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            let value = coerce_to_toml_value(mapping.field_path, val);
            set_field(merged, mapping.field_path, value);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Set a dotted field in the TOML tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let Some(table) = root.as_table_mut() else {
        return;
    };
    match path.split_once('.') {
        Some((head, rest)) => {
            let child = table
                .entry(head.to_owned())
                .or_insert(toml::Value::Table(toml::map::Map::new()));
            set_field(child, rest, value);
        },
        None => {
            table.insert(path.to_owned(), value);
        },
    }
}

/// Coerce a string env var value to the TOML type of the target field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    match (path, val.parse::<bool>()) {
        ("trust.require_trusted", Ok(b)) => toml::Value::Boolean(b),
        _ => toml::Value::String(val.to_owned()),
    }
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}
