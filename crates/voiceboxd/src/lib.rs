//! Voicebox daemon library - exposes modules for testing.

pub mod pages;
pub mod routes;
pub mod server;
