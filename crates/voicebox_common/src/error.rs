//! Error types shared by the voicebox crates.

/// Errors raised while loading or validating `config.yml`.
///
/// A missing or unreadable file is not an error: the service starts with no
/// channels instead. Everything here means the file was read but is wrong.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid pattern for '{label}' in format '{format}': {source}")]
    Pattern {
        format: String,
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("channel '{channel}' uses unknown log format '{format}'")]
    UnknownFormat { channel: String, format: String },

    #[error("channel '{channel}' has an invalid log template: {template}")]
    InvalidTemplate { channel: String, template: String },

    #[error("invalid channel name '{0}' (expected letters, digits or '_')")]
    InvalidChannelName(String),
}
