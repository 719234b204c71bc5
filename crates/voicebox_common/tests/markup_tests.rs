//! Line markup behaviour tests.
//!
//! Covers classification order, nickname coloring, the unmatched fallback
//! and escaping of hostile input.

use std::io;
use std::sync::{Arc, Mutex};
use voicebox_common::markup::{color_index, escape_html, linkify, DEFAULT_CLASSIFICATION};
use voicebox_common::{markup, FormatProfile};

fn irssi() -> FormatProfile {
    FormatProfile::from_patterns([
        ("message", r"^&lt;[ @+%]?([^&]+)&gt;"),
        ("action", r"^\* (\S+)"),
        ("join", r"^-!- \S+ .* has joined"),
        ("part", r"^-!- \S+ .* has left"),
    ])
    .unwrap()
}

/// Remove the tags markup inserts, leaving only text that came from the log.
fn strip_inserted_tags(html: &str) -> String {
    let tag = regex::Regex::new(r#"<span class="[^"]*">|</span>|<a href="[^"]*">|</a>"#).unwrap();
    tag.replace_all(html, "").into_owned()
}

fn has_raw_markup(text: &str) -> bool {
    let entity = regex::Regex::new(r"&(?:amp|lt|gt|quot|#39);").unwrap();
    let without_entities = entity.replace_all(text, "");
    without_entities.contains(['<', '>', '&'])
}

#[test]
fn test_example_line() {
    let line = markup("12:01:03 <nick> check http://example.com/x out", &irssi());
    let html = line.to_string();

    let expected_color = color_index("nick");
    assert!(html.contains(r#"<span class="timestamp">12:01:03</span>"#));
    assert!(html.contains(r#"<span class="message">"#));
    assert!(html.contains(&format!(r#"<span class="c{expected_color}">nick</span>"#)));
    assert!(html.contains(r#"<a href="http://example.com/x">http://example.com/x</a>"#));
}

#[test]
fn test_line_without_whitespace_never_fails() {
    for line in ["12:00", "garbage", "", "<<<>>>"] {
        let classified = markup(line, &irssi());
        assert_eq!(classified.classification, DEFAULT_CLASSIFICATION);
        assert_eq!(classified.body, "");
        assert!(classified
            .to_string()
            .contains(r#"<span class="message"></span>"#));
    }
}

#[test]
fn test_empty_profile_always_defaults() {
    let empty = FormatProfile::default();
    assert!(empty.is_empty());

    for line in [
        "12:00 <alice> hi",
        "12:01 * bob waves",
        "12:02 -!- carol has joined",
    ] {
        let classified = markup(line, &empty);
        assert_eq!(classified.classification, "message");
        assert!(!classified.body.contains("<span"));
    }
}

/// Log writer that keeps everything written to it.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_unmatched_lines_are_reported() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let empty = FormatProfile::default();
        markup("12:00 <alice> hi", &empty);
        markup("12:01 * bob waves", &empty);
        markup("12:02 -!- carol has joined", &empty);

        markup("12:03 <dave> matched", &irssi());
    });

    let output = logs.contents();
    assert_eq!(output.matches("Unmatched log line").count(), 3, "{output}");
    assert!(output.contains("Unmatched log line: 12:01 * bob waves"));
    assert!(!output.contains("dave"));
}

#[test]
fn test_earlier_rule_wins() {
    let first_generic = FormatProfile::from_patterns([
        ("notice", r"^-"),
        ("join", r"^-!- \S+ .* has joined"),
    ])
    .unwrap();
    let first_specific = FormatProfile::from_patterns([
        ("join", r"^-!- \S+ .* has joined"),
        ("notice", r"^-"),
    ])
    .unwrap();

    let line = "12:00 -!- alice [~a@host] has joined #rust";
    assert_eq!(markup(line, &first_generic).classification, "notice");
    assert_eq!(markup(line, &first_specific).classification, "join");
}

#[test]
fn test_single_occurrence_wrapped_once() {
    let classified = markup("12:00 <alice> hello there", &irssi());
    assert_eq!(classified.body.matches("alice").count(), 1);
    assert_eq!(classified.body.matches("<span class=\"c").count(), 1);
}

#[test]
fn test_only_first_occurrence_wrapped() {
    let classified = markup("12:00 <alice> alice is talking about alice", &irssi());
    assert_eq!(classified.body.matches("<span class=\"c").count(), 1);
    assert!(classified
        .body
        .starts_with(&format!("&lt;<span class=\"c{}\">alice</span>&gt;", color_index("alice"))));
}

#[test]
fn test_nick_inside_entity_text_keeps_entities_whole() {
    for (raw, nick) in [("12:00 <lt> hi", "lt"), ("12:00 <t> hi", "t"), ("12:00 <amp> &", "amp")] {
        let classified = markup(raw, &irssi());
        let wrapped = format!("&lt;<span class=\"c{}\">{nick}</span>&gt;", color_index(nick));
        assert!(classified.body.starts_with(&wrapped), "{:?}", classified.body);
        assert!(!has_raw_markup(&strip_inserted_tags(&classified.body)));
    }
}

#[test]
fn test_same_nick_same_color() {
    let first = markup("12:00 <alice> one", &irssi());
    let second = markup("13:00 * alice two", &irssi());
    let color = format!("<span class=\"c{}\">alice</span>", color_index("alice"));
    assert!(first.body.contains(&color));
    assert!(second.body.contains(&color));
}

#[test]
fn test_non_speaker_classes_not_colorized() {
    let classified = markup("12:00 -!- alice [~a@host] has left #rust", &irssi());
    assert_eq!(classified.classification, "part");
    assert!(!classified.body.contains("<span"));
}

#[test]
fn test_hostile_input_is_escaped() {
    let lines = [
        "12:00 <mallory> <script>alert('x')</script>",
        "12:00 <mallory> a & b <b>bold</b> \"quoted\"",
        "12:00 <mallory> http://evil.com/?q=<img src=x>",
        "12:00 <mallory> www.example.com/\"onmouseover=\"alert(1)",
    ];

    for raw in lines {
        let classified = markup(raw, &irssi());
        let text = strip_inserted_tags(&classified.body);
        assert!(!has_raw_markup(&text), "raw markup left in {:?}", classified.body);
    }
}

#[test]
fn test_escape_then_linkify_keeps_entities() {
    let escaped = escape_html("<http://example.com/a?b=1&c=2>");
    let linked = linkify(&escaped);
    assert!(linked.starts_with("&lt;<a href=\"http://example.com/a?b=1&amp;c=2&gt;\">"));
    assert!(!has_raw_markup(&strip_inserted_tags(&linked)));
}

#[test]
fn test_invalid_bytes_dropped_before_escaping() {
    let lines = voicebox_common::markup_log(b"12:00 <alice> caf\xe9 & co\n", &irssi());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].body.ends_with("caf &amp; co"));
}
