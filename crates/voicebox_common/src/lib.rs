//! Voicebox Common - configuration, log discovery and line markup
//!
//! Everything here is synchronous and free of HTTP concerns; the daemon
//! crate wires it to routes.

pub mod config;
pub mod discovery;
pub mod error;
pub mod markup;

pub use config::{ChannelConfig, Config, DEFAULT_CONFIG_PATH};
pub use discovery::neighbours;
pub use error::ConfigError;
pub use markup::{markup, markup_log, ClassifiedLine, FormatProfile, Rule};
