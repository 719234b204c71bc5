//! Line markup engine.
//!
//! Turns one raw log line into an HTML fragment: the timestamp in its own
//! span, the body escaped, linkified, classified against a format profile
//! and, for messages and actions, with the speaker's nickname colorized.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::warn;

/// Classification used when no rule of the profile matches.
pub const DEFAULT_CLASSIFICATION: &str = "message";

/// Number of nickname color classes (`c1` .. `c3`).
pub const COLOR_CLASSES: u32 = 3;

/// Classifications whose first capture group is a nickname.
const COLORIZED: [&str; 2] = ["message", "action"];

/// http://, https:// or www. followed by host characters, an optional port
/// and an optional path with query string. Host and path characters are
/// ASCII only.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://|www\.)[-A-Za-z0-9_.]+(?::[0-9]+)?(?:/(?:[-A-Za-z0-9_/.]*(?:\?\S+)?)?)?")
        .unwrap()
});

/// One classification rule of a format profile.
#[derive(Debug, Clone)]
pub struct Rule {
    label: String,
    pattern: Regex,
}

impl Rule {
    pub fn new(label: impl Into<String>, pattern: Regex) -> Self {
        Self {
            label: label.into(),
            pattern,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Ordered classification rules for one log format.
///
/// Rules are tried in declaration order and the first match wins. Profiles
/// are expected to be written so that at most one rule matches a line; that
/// is not checked.
#[derive(Debug, Clone, Default)]
pub struct FormatProfile {
    rules: Vec<Rule>,
}

impl FormatProfile {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile `(label, pattern)` pairs, keeping their order.
    pub fn from_patterns<'a, I>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let rules = patterns
            .into_iter()
            .map(|(label, pattern)| Ok(Rule::new(label, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule matching `text`, with its captures.
    fn classify<'t>(&self, text: &'t str) -> Option<(&Rule, Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.pattern.captures(text).map(|caps| (rule, caps)))
    }
}

/// A log line after markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// First whitespace-delimited token of the line, unescaped.
    pub timestamp: String,
    /// Label of the matching rule, or [`DEFAULT_CLASSIFICATION`].
    pub classification: String,
    /// Escaped, linkified and nickname-highlighted body.
    pub body: String,
}

impl fmt::Display for ClassifiedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "<span class=\"timestamp\">{}</span>",
            escape_html(&self.timestamp)
        )?;
        writeln!(f, "<span class=\"{}\">{}</span>", self.classification, self.body)
    }
}

/// Mark up a single log line against `profile`.
///
/// Never fails: lines without a body, or that no rule matches, are
/// classified as [`DEFAULT_CLASSIFICATION`].
pub fn markup(line: &str, profile: &FormatProfile) -> ClassifiedLine {
    let line = line.trim_end_matches(['\r', '\n']);
    let (timestamp, rest) = split_line(line);
    let mut body = linkify(&escape_html(rest));

    // Captures borrow the body, so pull out what we need before rewriting it.
    let classified = profile.classify(&body).map(|(rule, caps)| {
        let nick = caps.get(1).map(|m| m.range()).filter(|range| !range.is_empty());
        (rule.label().to_owned(), nick)
    });

    let classification = match classified {
        Some((label, nick)) => {
            if let Some(nick) = nick.filter(|_| COLORIZED.contains(&label.as_str())) {
                body = colorize_nick(&body, nick);
            }
            label
        }
        None => {
            warn!("Unmatched log line: {}", line);
            DEFAULT_CLASSIFICATION.to_string()
        }
    };

    ClassifiedLine {
        timestamp: timestamp.to_string(),
        classification,
        body,
    }
}

/// Mark up every non-blank line of a log file.
///
/// Each line is sanitized separately, so one corrupt line does not affect
/// the rest of the file.
pub fn markup_log(contents: &[u8], profile: &FormatProfile) -> Vec<ClassifiedLine> {
    contents
        .split(|&byte| byte == b'\n')
        .map(sanitize)
        .filter(|line| !line.trim().is_empty())
        .map(|line| markup(&line, profile))
        .collect()
}

/// Split a line on its first whitespace run into `(timestamp, rest)`.
pub fn split_line(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((timestamp, rest)) => (timestamp, rest.trim_start()),
        None => (line, ""),
    }
}

/// Drop invalid UTF-8 sequences. Must run before [`escape_html`].
pub fn sanitize(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()),
    }
}

/// Escape `& < > " '` for use in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap every URL-like substring in an anchor pointing at itself.
///
/// Expects already escaped text.
pub fn linkify(text: &str) -> String {
    URL_PATTERN
        .replace_all(text, r#"<a href="$0">$0</a>"#)
        .into_owned()
}

/// Color class for a nickname: `1 + (sum of character codes mod 3)`.
///
/// Character codes are Unicode scalar values of the nickname as it appears
/// in the escaped body, not its UTF-8 bytes, so `é` counts as 233.
pub fn color_index(nick: &str) -> u32 {
    let sum: u64 = nick.chars().map(|c| u64::from(u32::from(c))).sum();
    1 + (sum % u64::from(COLOR_CLASSES)) as u32
}

/// Wrap the nickname at `range` of `body` in its color span.
fn colorize_nick(body: &str, range: Range<usize>) -> String {
    let nick = &body[range.clone()];
    format!(
        "{}<span class=\"c{}\">{}</span>{}",
        &body[..range.start],
        color_index(nick),
        nick,
        &body[range.end..]
    )
}
