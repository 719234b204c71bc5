//! Configuration for voicebox.
//!
//! Loaded once from `config.yml` at startup and read-only afterwards.
//! Channels and format rules keep the order they are declared in.

use crate::error::ConfigError;
use crate::markup::{FormatProfile, Rule};
use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Config file path used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

static CHANNEL_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

/// Where a channel's logs live and how to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChannelConfig {
    /// Directory holding the channel's log files
    pub log_directory: String,

    /// File name with strftime tokens, e.g. `#rust.%Y-%m-%d.log`
    pub log_template: String,

    /// Name of the entry in `formats` used to mark up lines
    pub log_format: String,
}

/// The file as written: format patterns are still strings.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    channels: IndexMap<String, ChannelConfig>,

    #[serde(default)]
    formats: IndexMap<String, IndexMap<String, String>>,
}

/// Validated configuration with compiled format profiles.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub channels: IndexMap<String, ChannelConfig>,
    pub formats: IndexMap<String, FormatProfile>,
}

impl Config {
    /// Load config from `path`.
    ///
    /// A missing or unreadable file yields an empty config so the service
    /// still comes up. A file that exists but is invalid is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Config {} not readable, starting with no channels: {}",
                    path.display(),
                    e
                );
                return Ok(Config::default());
            }
        };

        let config = Self::from_yaml(&content)?;
        info!(
            "Loaded config from {} ({} channels, {} formats)",
            path.display(),
            config.channels.len(),
            config.formats.len()
        );
        Ok(config)
    }

    /// Parse and validate config from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let raw: RawConfig = serde_yaml::from_str(content)?;

        let mut formats = IndexMap::with_capacity(raw.formats.len());
        for (format, patterns) in raw.formats {
            let profile = compile_profile(&format, &patterns)?;
            formats.insert(format, profile);
        }

        for (name, channel) in &raw.channels {
            validate_channel(name, channel, &formats)?;
        }

        Ok(Self {
            channels: raw.channels,
            formats,
        })
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelConfig> {
        self.channels.get(name)
    }

    pub fn format(&self, name: &str) -> Option<&FormatProfile> {
        self.formats.get(name)
    }

    /// Format profile used to mark up `channel`'s logs.
    pub fn profile_for(&self, channel: &ChannelConfig) -> Option<&FormatProfile> {
        self.format(&channel.log_format)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }
}

/// Channel names are single path segments of word characters.
pub fn is_valid_channel_name(name: &str) -> bool {
    CHANNEL_NAME.is_match(name)
}

fn compile_profile(
    format: &str,
    patterns: &IndexMap<String, String>,
) -> Result<FormatProfile, ConfigError> {
    let rules = patterns
        .iter()
        .map(|(label, pattern)| {
            Regex::new(pattern)
                .map(|regex| Rule::new(label.as_str(), regex))
                .map_err(|source| ConfigError::Pattern {
                    format: format.to_string(),
                    label: label.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FormatProfile::new(rules))
}

fn validate_channel(
    name: &str,
    channel: &ChannelConfig,
    formats: &IndexMap<String, FormatProfile>,
) -> Result<(), ConfigError> {
    if !is_valid_channel_name(name) {
        return Err(ConfigError::InvalidChannelName(name.to_string()));
    }

    if !formats.contains_key(&channel.log_format) {
        return Err(ConfigError::UnknownFormat {
            channel: name.to_string(),
            format: channel.log_format.clone(),
        });
    }

    let template = channel.path_template();
    if StrftimeItems::new(&template).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidTemplate {
            channel: name.to_string(),
            template,
        });
    }

    Ok(())
}
