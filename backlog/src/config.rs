//! A [SourceConfig] is built from the string options a pluggable source is
//! handed by whatever hosts it.
//!
//! | key              | required               | default  |
//! |------------------|------------------------|----------|
//! | `multicastAddr`  | yes                    |          |
//! | `apiAddr`        | no                     | disabled |
//! | `persistence`    | no (`memory`/`sqlite`) | `memory` |
//! | `localStorage`   | when `sqlite`          |          |
//! | `onParseFailure` | no (`drop`/`fail`)     | `drop`   |
//! | `lossyUtf8`      | no                     | `false`  |

use std::{
    collections::HashMap,
    net::{SocketAddr, SocketAddrV4},
    str::FromStr,
};

use thiserror::Error;

use crate::TextParser;

pub const MULTICAST_ADDR: &str = "multicastAddr";
pub const API_ADDR: &str = "apiAddr";
pub const PERSISTENCE: &str = "persistence";
pub const LOCAL_STORAGE: &str = "localStorage";
pub const ON_PARSE_FAILURE: &str = "onParseFailure";
pub const LOSSY_UTF8: &str = "lossyUtf8";

/// A problem with the options supplied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required option `{0}`")]
    Missing(&'static str),
    #[error("invalid value `{value}` for option `{key}`")]
    Invalid { key: &'static str, value: String },
    #[error("`{0}` is not a multicast address")]
    NotMulticast(SocketAddrV4),
}

/// Where the durable store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceConfig {
    /// In process memory. Nothing survives a restart.
    Memory,
    /// A sqlite database at this url or path.
    Sqlite(String),
}

/// What a subscription does when the parser rejects a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseFailurePolicy {
    /// Log it and carry on with the next payload.
    #[default]
    Drop,
    /// Stop the subscription.
    Fail,
}

impl FromStr for ParseFailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "fail" => Ok(Self::Fail),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub multicast_addr: SocketAddrV4,
    pub api_addr: Option<SocketAddr>,
    pub persistence: PersistenceConfig,
    pub on_parse_failure: ParseFailurePolicy,
    pub lossy_utf8: bool,
}

impl SourceConfig {
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let multicast_addr: SocketAddrV4 =
            parse(options, MULTICAST_ADDR)?.ok_or(ConfigError::Missing(MULTICAST_ADDR))?;
        if !multicast_addr.ip().is_multicast() {
            return Err(ConfigError::NotMulticast(multicast_addr));
        }

        let persistence = match options.get(PERSISTENCE).map(|v| v.to_ascii_lowercase()) {
            None => PersistenceConfig::Memory,
            Some(kind) if kind == "memory" => PersistenceConfig::Memory,
            Some(kind) if kind == "sqlite" => PersistenceConfig::Sqlite(
                options
                    .get(LOCAL_STORAGE)
                    .cloned()
                    .ok_or(ConfigError::Missing(LOCAL_STORAGE))?,
            ),
            Some(kind) => {
                return Err(ConfigError::Invalid {
                    key: PERSISTENCE,
                    value: kind,
                })
            }
        };

        Ok(Self {
            multicast_addr,
            api_addr: parse(options, API_ADDR)?,
            persistence,
            on_parse_failure: parse(options, ON_PARSE_FAILURE)?.unwrap_or_default(),
            lossy_utf8: parse(options, LOSSY_UTF8)?.unwrap_or(false),
        })
    }

    /// The payload parser these options describe.
    pub fn parser(&self) -> TextParser {
        if self.lossy_utf8 {
            TextParser::lossy()
        } else {
            TextParser::strict()
        }
    }
}

fn parse<T: FromStr>(
    options: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    options
        .get(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                key,
                value: value.clone(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = SourceConfig::from_options(&options(&[(MULTICAST_ADDR, "224.0.0.123:1234")]))
            .unwrap();
        assert_eq!(config.multicast_addr, "224.0.0.123:1234".parse().unwrap());
        assert_eq!(config.api_addr, None);
        assert_eq!(config.persistence, PersistenceConfig::Memory);
        assert_eq!(config.on_parse_failure, ParseFailurePolicy::Drop);
        assert!(!config.lossy_utf8);
    }

    #[test]
    fn everything() {
        let config = SourceConfig::from_options(&options(&[
            (MULTICAST_ADDR, "224.0.0.123:1234"),
            (API_ADDR, "127.0.0.1:7755"),
            (PERSISTENCE, "SQLite"),
            (LOCAL_STORAGE, "sqlite://ledger.db"),
            (ON_PARSE_FAILURE, "fail"),
            (LOSSY_UTF8, "true"),
        ]))
        .unwrap();
        assert_eq!(config.api_addr, Some("127.0.0.1:7755".parse().unwrap()));
        assert_eq!(
            config.persistence,
            PersistenceConfig::Sqlite("sqlite://ledger.db".into())
        );
        assert_eq!(config.on_parse_failure, ParseFailurePolicy::Fail);
        assert!(config.lossy_utf8);
    }

    #[test]
    fn errors() {
        assert_eq!(
            SourceConfig::from_options(&options(&[])),
            Err(ConfigError::Missing(MULTICAST_ADDR))
        );
        assert!(matches!(
            SourceConfig::from_options(&options(&[(MULTICAST_ADDR, "10.0.0.1:1234")])),
            Err(ConfigError::NotMulticast(_))
        ));
        assert_eq!(
            SourceConfig::from_options(&options(&[
                (MULTICAST_ADDR, "224.0.0.123:1234"),
                (PERSISTENCE, "sqlite"),
            ])),
            Err(ConfigError::Missing(LOCAL_STORAGE))
        );
        assert!(matches!(
            SourceConfig::from_options(&options(&[
                (MULTICAST_ADDR, "224.0.0.123:1234"),
                (PERSISTENCE, "file"),
            ])),
            Err(ConfigError::Invalid { key: PERSISTENCE, .. })
        ));
        assert!(matches!(
            SourceConfig::from_options(&options(&[
                (MULTICAST_ADDR, "224.0.0.123:1234"),
                (ON_PARSE_FAILURE, "retry"),
            ])),
            Err(ConfigError::Invalid { key: ON_PARSE_FAILURE, .. })
        ));
    }
}
