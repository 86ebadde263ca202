use std::{env, path::PathBuf};

pub const APP_NAME: &str = "Staffroom presence";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_PATH: &str = "./public";
/// Snapshots a viewer may fall behind by before it skips ahead.
pub const DEFAULT_ROSTER_CHANNEL_CAPACITY: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub listen_address: String,
    pub port: u16,
    pub public_path: PathBuf,
    pub roster_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            listen_address: lookup("LISTEN_ADDRESS")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string()),
            port: parse_or_default(&lookup, "PORT", DEFAULT_PORT),
            public_path: PathBuf::from(
                lookup("PUBLIC_PATH").unwrap_or_else(|| DEFAULT_PUBLIC_PATH.to_string()),
            ),
            roster_channel_capacity: parse_or_default(
                &lookup,
                "ROSTER_CHANNEL_CAPACITY",
                DEFAULT_ROSTER_CHANNEL_CAPACITY,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or_default<T: std::str::FromStr + Copy + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {key}={raw}, using {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.listen_address, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.public_path, PathBuf::from("./public"));
        assert_eq!(config.roster_channel_capacity, 100);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("LISTEN_ADDRESS", "127.0.0.1"),
            ("PORT", "8080"),
            ("PUBLIC_PATH", "/srv/www"),
            ("ROSTER_CHANNEL_CAPACITY", "16"),
        ]);
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_path, PathBuf::from("/srv/www"));
        assert_eq!(config.roster_channel_capacity, 16);
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config_from(&[("PORT", "http")]).port, 3000);
    }
}
