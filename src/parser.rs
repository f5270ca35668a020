use log::debug;
use regex::Regex;

use crate::commit::{CommitMessage, Commits, Component};

/// The line `git log` prints after every commit record
pub const RECORD_SENTINEL: &str = "==END==";

/// Subjects longer than this are hard cut
pub const MAX_SUBJECT_LENGTH: usize = 80;

/// Splits the raw output of a `git log --format=%H%n%s%n%b%n==END==` query into
/// one block per commit.
///
/// Each block is `hash`, `subject` and then any body lines. Blocks keep the
/// order the log source emitted them in, and empty blocks left over by a
/// trailing sentinel are discarded.
///
/// # Example
///
/// ```
/// # use conventional_changelog::parser::split_records;
/// let raw = "abc\nfeat: one\n\n==END==\ndef\nfix: two\n\n==END==\n";
/// let blocks = split_records(raw);
///
/// assert_eq!(blocks, vec!["abc\nfeat: one\n", "def\nfix: two\n"]);
/// ```
pub fn split_records(raw: &str) -> Vec<&str> {
    let separator = format!("\n{RECORD_SENTINEL}\n");
    let trailing = format!("\n{RECORD_SENTINEL}");

    raw.split(&separator[..])
        .map(|block| block.strip_suffix(&trailing[..]).unwrap_or(block))
        .filter(|block| !block.trim().is_empty() && block.trim() != RECORD_SENTINEL)
        .collect()
}

/// Turns raw commit blocks into `CommitMessage`s.
///
/// Parsing is a filter: a block whose subject is not of the form
/// `type(scope): text` produces no commit at all. Every extraction rule is
/// exposed on its own so each can be exercised in isolation.
#[derive(Debug, Clone)]
pub struct CommitParser {
    /// `type(scope): subject`
    pub subject_regex: Regex,
    /// Closing keyword followed by a single issue, used on the subject line
    pub subject_closes_regex: Regex,
    /// Closing keyword followed by a list of issues, used on body lines
    pub line_closes_regex: Regex,
    /// `BREAKING CHANGE:` and everything after it
    pub breaking_regex: Regex,
    issue_regex: Regex,
}

impl Default for CommitParser {
    fn default() -> Self {
        CommitParser {
            subject_regex: regex!(r"^(\w+)(?:\(([\w$.\-* ]*)\))?: (.*)$"),
            subject_closes_regex: regex!(r"(?i)\s*\b(?:closes|fix(?:es|ed)|resolve[sd])\s#(\d+)"),
            line_closes_regex: regex!(
                r"(?i)\b(?:closes|fix(?:es|ed)|resolve[sd])\s((?:#\d+(?:,\s*|\s+)?)+)"
            ),
            breaking_regex: regex!(r"(?s)BREAKING CHANGE:\s*(.*)"),
            issue_regex: regex!(r"\d+"),
        }
    }
}

impl CommitParser {
    pub fn new() -> Self { CommitParser::default() }

    /// Splits a raw `git log` blob and parses every block, silently dropping
    /// the ones that don't follow the conventional commit grammar.
    pub fn parse_log(&self, raw: &str) -> Commits {
        let blocks = split_records(raw);
        let total = blocks.len();
        let commits: Commits = blocks
            .into_iter()
            .filter_map(|block| self.parse_raw_commit(block))
            .collect();

        debug!(
            "Parsed {} of {} commit records ({} filtered out)",
            commits.len(),
            total,
            total - commits.len()
        );
        commits
    }

    /// Parses a single commit block, returning `None` if the subject does not
    /// match `type(scope): text`
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::{CommitParser, Component};
    /// let parser = CommitParser::new();
    /// let commit = parser
    ///     .parse_raw_commit("0123456789abcdef\nfeat(Stuff): Doing things\n\nFixes #12")
    ///     .unwrap();
    ///
    /// assert_eq!(commit.commit_type, "feat");
    /// assert_eq!(commit.component, Component::Named("Stuff".into()));
    /// assert_eq!(commit.closes, vec!["12"]);
    ///
    /// assert!(parser.parse_raw_commit("0123456789abcdef\nInitial commit").is_none());
    /// ```
    pub fn parse_raw_commit(&self, raw: &str) -> Option<CommitMessage> {
        if raw.trim().is_empty() {
            return None;
        }

        let mut lines = raw.lines();
        let hash = lines.next()?.trim().to_owned();
        let subject_line = lines.next().unwrap_or_default();
        let body_lines = lines.collect::<Vec<_>>();

        let (subject, mut closes) = self.subject_closes(subject_line);
        for line in &body_lines {
            closes.extend(self.line_closes(line));
        }
        let breaks = self.breaking_change(raw).into_iter().collect();
        let body = body_lines.join("\n");

        let (commit_type, component, text) = self.parse_subject(&subject)?;

        Some(CommitMessage {
            hash,
            subject: truncate_subject(text),
            body,
            commit_type: commit_type.to_owned(),
            component,
            closes,
            breaks,
        })
    }

    /// Removes every `Closes #N` style reference from a subject line,
    /// returning the cleaned subject and the issue numbers in order
    pub fn subject_closes(&self, subject: &str) -> (String, Vec<String>) {
        let closes = self
            .subject_closes_regex
            .captures_iter(subject)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .collect();
        let cleaned = self.subject_closes_regex.replace_all(subject, "");

        (cleaned.into_owned(), closes)
    }

    /// Finds the issue numbers of every `Fixes #1, #2` style list on a body
    /// line. Duplicates are kept.
    pub fn line_closes(&self, line: &str) -> Vec<String> {
        self.line_closes_regex
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .flat_map(|issues| {
                issues
                    .as_str()
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .map(str::trim)
                    .filter_map(|tok| self.issue_regex.find(tok))
                    .map(|m| m.as_str().to_owned())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Captures the text following the first `BREAKING CHANGE:` marker up to
    /// the end of the block. Later markers end up inside that same text.
    pub fn breaking_change(&self, raw: &str) -> Option<String> {
        self.breaking_regex
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end().to_owned())
            .filter(|text| !text.is_empty())
    }

    /// Matches a cleaned subject against `type(scope): text`
    pub fn parse_subject<'s>(&self, subject: &'s str) -> Option<(&'s str, Component, &'s str)> {
        let caps = self.subject_regex.captures(subject)?;
        let commit_type = caps.get(1)?.as_str();
        let component = Component::from_scope(caps.get(2).map(|m| m.as_str()));
        let text = caps.get(3)?.as_str();

        Some((commit_type, component, text))
    }
}

/// Cuts a subject down to `MAX_SUBJECT_LENGTH` characters
pub fn truncate_subject(text: &str) -> String { text.chars().take(MAX_SUBJECT_LENGTH).collect() }
