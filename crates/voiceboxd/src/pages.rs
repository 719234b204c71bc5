//! HTML pages.
//!
//! Channel names and dates are escaped here; marked-up log lines are
//! already safe HTML and are inserted as-is.

use chrono::NaiveDate;
use std::fmt::Write;
use voicebox_common::markup::escape_html;
use voicebox_common::{ClassifiedLine, Config};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Served at `/style.css`.
pub const STYLESHEET: &str = r#"body {
  font-family: sans-serif;
  margin: 0 auto;
  max-width: 60em;
  padding: 1em;
  color: #222;
}
header, footer { color: #777; }
header a, footer a { color: #555; }
nav.days { margin: 1em 0; }
nav.days a { margin-right: 1em; }
ul.channels, ul.dates { list-style: none; padding: 0; }
ul.dates a.raw { font-size: smaller; color: #999; margin-left: 0.5em; }
div.log { font-family: monospace; }
div.line { padding: 0.1em 0; }
div.line:target { background: #ffc; }
.timestamp { color: #999; margin-right: 0.5em; }
.message { }
.action { font-style: italic; }
.join, .part, .quit, .nick, .mode, .topic, .notice { color: #777; }
.c1 { color: #b22222; font-weight: bold; }
.c2 { color: #1e6fb2; font-weight: bold; }
.c3 { color: #2e8b57; font-weight: bold; }
"#;

/// Global index listing configured channels.
pub fn index(config: &Config) -> String {
    let mut body = String::new();

    if config.channels.is_empty() {
        body.push_str("<p>No channels configured.</p>\n");
    } else {
        body.push_str("<ul class=\"channels\">\n");
        for name in config.channel_names() {
            let name = escape_html(name);
            let _ = writeln!(body, "<li><a href=\"/{name}\">#{name}</a></li>");
        }
        body.push_str("</ul>\n");
    }

    layout("voicebox", "", &body)
}

/// Channel page listing every day with a log, newest first.
pub fn channel(name: &str, dates: &[NaiveDate]) -> String {
    let name = escape_html(name);
    let mut body = String::new();

    if dates.is_empty() {
        body.push_str("<p>No logs yet.</p>\n");
    } else {
        body.push_str("<ul class=\"dates\">\n");
        for date in dates {
            let _ = writeln!(
                body,
                "<li><a href=\"/{name}/{date}\">{date}</a>\
                 <a class=\"raw\" href=\"/{name}/{date}.txt\">txt</a></li>"
            );
        }
        body.push_str("</ul>\n");
    }

    layout(&format!("#{name}"), &breadcrumbs(&name, None), &body)
}

/// One day's log, marked up line by line.
pub fn log(
    name: &str,
    date: NaiveDate,
    lines: &[ClassifiedLine],
    previous: Option<NaiveDate>,
    next: Option<NaiveDate>,
) -> String {
    let name = escape_html(name);
    let mut body = String::new();

    let mut nav = String::from("<nav class=\"days\">");
    if let Some(previous) = previous {
        let _ = write!(nav, "<a rel=\"prev\" href=\"/{name}/{previous}\">&larr; {previous}</a>");
    }
    let _ = write!(nav, "<a href=\"/{name}/{date}.txt\">raw</a>");
    if let Some(next) = next {
        let _ = write!(nav, "<a rel=\"next\" href=\"/{name}/{next}\">{next} &rarr;</a>");
    }
    nav.push_str("</nav>\n");

    body.push_str(&nav);
    body.push_str("<div class=\"log\">\n");
    for (number, line) in lines.iter().enumerate() {
        let _ = write!(
            body,
            "<div class=\"line\" id=\"l{}\">\n{}</div>\n",
            number + 1,
            line
        );
    }
    body.push_str("</div>\n");
    body.push_str(&nav);

    layout(
        &format!("#{name} {date}"),
        &breadcrumbs(&name, Some(date)),
        &body,
    )
}

pub fn not_found() -> String {
    layout("Not found", "", "<p>Nothing here.</p>\n")
}

/// `voicebox / #channel / date` header links. `name` must already be escaped.
fn breadcrumbs(name: &str, date: Option<NaiveDate>) -> String {
    let mut crumbs = format!(" / <a href=\"/{name}\">#{name}</a>");
    if let Some(date) = date {
        let _ = write!(crumbs, " / {date}");
    }
    crumbs
}

/// `title` and `crumbs` are inserted as-is.
fn layout(title: &str, crumbs: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/style.css\">\n\
         </head>\n\
         <body>\n\
         <header><a href=\"/\">voicebox</a>{crumbs}</header>\n\
         <main>\n\
         <h1>{title}</h1>\n\
         {body}\
         </main>\n\
         <footer>voicebox {VERSION}</footer>\n\
         </body>\n\
         </html>\n"
    )
}
