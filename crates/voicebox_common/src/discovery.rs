//! Log discovery: map dates to log files and back.
//!
//! A channel's logs are named by a strftime template. Expanding the template
//! for a date gives the file for that day; globbing the template with its
//! tokens replaced by `*` and parsing the matches gives every day on disk.

use crate::config::ChannelConfig;
use chrono::NaiveDate;
use glob::Pattern;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// One strftime token: `%%`, or a specifier with an optional padding flag
/// such as `%Y` or `%-d`. Specifiers longer than one character (`%:z`,
/// `%.3f`) are not recognised; they never name a day.
static STRFTIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(?:%|[-_0]?[^%])").unwrap());

impl ChannelConfig {
    /// Directory and file template joined into one strftime template.
    pub fn path_template(&self) -> String {
        format!(
            "{}/{}",
            self.log_directory.trim_end_matches('/'),
            self.log_template
        )
    }

    /// Log file for `date`.
    ///
    /// `None` if the template cannot be expanded; config loading rejects
    /// such templates so this only happens for hand-built configs.
    pub fn log_path(&self, date: NaiveDate) -> Option<PathBuf> {
        let template = self.path_template();
        let mut path = String::new();
        write!(path, "{}", date.format(&template)).ok()?;
        Some(PathBuf::from(path))
    }

    /// Glob pattern matching every file the template can produce.
    ///
    /// Each run of adjacent specifiers becomes one `*`; `%%` is a literal `%`.
    pub fn glob_pattern(&self) -> String {
        let template = self.path_template();
        let mut pattern = String::with_capacity(template.len());
        let mut literal = String::new();
        let mut last = 0;

        for token in STRFTIME_TOKEN.find_iter(&template) {
            literal.push_str(&template[last..token.start()]);
            last = token.end();

            if token.as_str() == "%%" {
                literal.push('%');
            } else if literal.is_empty() && pattern.ends_with('*') {
                continue;
            } else {
                pattern.push_str(&Pattern::escape(&literal));
                pattern.push('*');
                literal.clear();
            }
        }
        literal.push_str(&template[last..]);
        pattern.push_str(&Pattern::escape(&literal));

        pattern
    }

    /// Every date with a log on disk, newest first.
    pub fn log_dates(&self) -> Vec<NaiveDate> {
        let pattern = self.glob_pattern();
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Invalid log glob {}: {}", pattern, e);
                return Vec::new();
            }
        };

        let dates: BTreeSet<NaiveDate> = paths
            .filter_map(Result::ok)
            .filter_map(|path| {
                let date = self.date_of(&path);
                if date.is_none() {
                    debug!("Skipping {}: not a log for this template", path.display());
                }
                date
            })
            .collect();

        dates.into_iter().rev().collect()
    }

    /// Date a matched log file belongs to.
    ///
    /// Parses the path relative to the log directory first, so separators
    /// normalised by the glob walk do not matter, then the whole path for
    /// templates with tokens in the directory part.
    fn date_of(&self, path: &Path) -> Option<NaiveDate> {
        let relative = path
            .strip_prefix(&self.log_directory)
            .ok()
            .and_then(Path::to_str)
            .and_then(|relative| NaiveDate::parse_from_str(relative, &self.log_template).ok());

        relative.or_else(|| {
            let path = path.to_str()?;
            NaiveDate::parse_from_str(path, &self.path_template()).ok()
        })
    }
}

/// Older and newer neighbours of `date` in a newest-first listing.
///
/// Returns `(previous, next)`, where previous is the older day.
pub fn neighbours(dates: &[NaiveDate], date: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let previous = dates.iter().copied().filter(|d| *d < date).max();
    let next = dates.iter().copied().filter(|d| *d > date).min();
    (previous, next)
}
