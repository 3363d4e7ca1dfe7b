// config lets the front end read a separate settings file
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// Settings for the interactive front end.
///
/// Read from an optional `keepset.{toml,json,yaml,...}` file and then from
/// `KEEPSET_*` environment variables, later sources winning. Missing keys
/// fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Filter handed to the tracing subscriber, unless `RUST_LOG` is set.
    pub log_filter: String,
    pub prompt: String,
    /// Records inserted at start-up, each as "first_name second_name".
    pub seed: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: String::from("info"),
            prompt: String::from("> "),
            seed: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from("keepset")
    }
    pub fn load_from(name: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(
                Environment::with_prefix("KEEPSET")
                    .try_parsing(true)
                    .list_separator(";")
                    .with_list_parse_key("seed"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
