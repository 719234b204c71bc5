//! Routes for voiceboxd
//!
//! Every request that cannot be served (unknown channel, bad date, missing
//! log file, unknown suffix) ends in the same 404 page.

use crate::pages;
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;
use voicebox_common::config::is_valid_channel_name;
use voicebox_common::{markup_log, neighbours, ChannelConfig, Config};

type AppStateArc = Arc<AppState>;

/// `YYYY-MM-DD` with an optional `.suffix`.
static DATE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:\.(\w+))?$").unwrap());

/// How a day's log is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Marked-up HTML page (no suffix, `.htm`, `.html`)
    Html,
    /// The raw file as `text/plain` (`.txt`)
    Text,
}

impl LogFormat {
    pub fn from_suffix(suffix: Option<&str>) -> Option<Self> {
        match suffix {
            None | Some("htm") | Some("html") => Some(LogFormat::Html),
            Some("txt") => Some(LogFormat::Text),
            Some(_) => None,
        }
    }
}

/// The `{date}[.{format}]` path segment of a log request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRequest {
    pub date: NaiveDate,
    pub format: LogFormat,
}

impl LogRequest {
    /// `None` when the segment is not a real calendar date with a known
    /// suffix; the caller answers with 404.
    pub fn parse(segment: &str) -> Option<Self> {
        let caps = DATE_SEGMENT.captures(segment)?;
        let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
        let format = LogFormat::from_suffix(caps.get(2).map(|m| m.as_str()))?;
        Some(Self { date, format })
    }
}

// ============================================================================
// Index Routes
// ============================================================================

pub fn index_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(index))
        .route("/:channel", get(channel_index))
}

async fn index(State(state): State<AppStateArc>) -> Html<String> {
    Html(pages::index(&state.config))
}

async fn channel_index(
    State(state): State<AppStateArc>,
    Path(name): Path<String>,
) -> Response {
    let Some(channel) = find_channel(&state.config, &name) else {
        return not_found_response();
    };

    let dates = channel.log_dates();
    debug!("Channel {}: {} logs", name, dates.len());
    Html(pages::channel(&name, &dates)).into_response()
}

// ============================================================================
// Log Routes
// ============================================================================

pub fn log_routes() -> Router<AppStateArc> {
    Router::new().route("/:channel/:date", get(channel_log))
}

async fn channel_log(
    State(state): State<AppStateArc>,
    Path((name, segment)): Path<(String, String)>,
) -> Response {
    let Some(request) = LogRequest::parse(&segment) else {
        debug!("Not a log request: {}/{}", name, segment);
        return not_found_response();
    };
    let Some(channel) = find_channel(&state.config, &name) else {
        return not_found_response();
    };
    let Some(path) = channel.log_path(request.date) else {
        return not_found_response();
    };

    let contents = match tokio::fs::read(&path).await {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Log {} not readable: {}", path.display(), e);
            return not_found_response();
        }
    };

    match request.format {
        LogFormat::Text => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            contents,
        )
            .into_response(),
        LogFormat::Html => {
            let Some(profile) = state.config.profile_for(channel) else {
                debug!("Channel {} has no format '{}'", name, channel.log_format);
                return not_found_response();
            };

            let lines = markup_log(&contents, profile);
            let dates = channel.log_dates();
            let (previous, next) = neighbours(&dates, request.date);

            Html(pages::log(&name, request.date, &lines, previous, next)).into_response()
        }
    }
}

// ============================================================================
// Assets
// ============================================================================

pub fn asset_routes() -> Router<AppStateArc> {
    Router::new().route("/style.css", get(stylesheet))
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        pages::STYLESHEET,
    )
}

// ============================================================================
// Not Found
// ============================================================================

/// Fallback for every unmatched path.
pub async fn not_found() -> Response {
    not_found_response()
}

fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response()
}

fn find_channel<'a>(config: &'a Config, name: &str) -> Option<&'a ChannelConfig> {
    if !is_valid_channel_name(name) {
        return None;
    }
    config.channel(name)
}
