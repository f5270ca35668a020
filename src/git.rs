use std::{
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, trace};

use crate::error::{Error, Result};

/// Only commits whose message matches this (extended) pattern are retrieved
pub const DEFAULT_GREP: &str = "^feat|^fix|BREAKING";

/// `hash`, `subject`, `body` and a sentinel line for every commit
pub const DEFAULT_FORMAT: &str = "%H%n%s%n%b%n==END==";

/// The revisions to read commits between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRange {
    /// Exclusive lower bound, `None` for the whole history
    pub from: Option<String>,
    pub to: String,
}

impl LogRange {
    /// The range as `git log` expects it, `from..to` or just `to`
    pub fn as_arg(&self) -> String {
        match self.from.as_deref() {
            Some(from) if !from.is_empty() => format!("{from}..{}", self.to),
            _ => self.to.clone(),
        }
    }
}

/// Where raw commit text comes from.
///
/// `Git` shells out to the `git` executable; anything else able to answer
/// these three questions (an in-memory fake, a library binding) can stand in
/// for it.
pub trait LogSource {
    /// The most recent tag reachable from `to`, or `None` when no tag is.
    /// Tags on branches `to` never merged are not considered.
    fn latest_tag(&self, to: &str) -> Result<Option<String>>;

    /// The hash of the root commit. Fails if the repository has no commits.
    fn first_commit(&self) -> Result<String>;

    /// Raw log output for `range`, one `format` record per commit matching
    /// `grep`, newest first
    fn log(&self, grep: &str, format: &str, range: &LogRange) -> Result<String>;
}

/// Runs `git` inside a working tree
#[derive(Debug, Clone)]
pub struct Git {
    pub work_tree: PathBuf,
}

impl Git {
    pub fn new<P: AsRef<Path>>(work_tree: P) -> Self {
        Git {
            work_tree: work_tree.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        debug!("Running `git {}` in {:?}", command, self.work_tree);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_tree)
            .output()
            .map_err(|e| Error::git(&command, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::git(command, stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!("`git {}` returned {} bytes", command, stdout.len());
        Ok(stdout)
    }
}

/// `git describe` failures meaning "there is no tag", as opposed to a real
/// error such as a bad revision
fn is_untagged(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("no names found") || message.contains("no tags can describe")
}

impl LogSource for Git {
    fn latest_tag(&self, to: &str) -> Result<Option<String>> {
        match self.run(&["describe", "--tags", "--abbrev=0", to]) {
            Ok(tag) => Ok(Some(tag.trim().to_owned()).filter(|t| !t.is_empty())),
            Err(Error::Git { message, .. }) if is_untagged(&message) => {
                debug!("No tag reachable from {to}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn first_commit(&self) -> Result<String> {
        let out = self
            .run(&["rev-list", "--max-parents=0", "HEAD"])
            .map_err(|e| match e {
                Error::Git { command, .. } => Error::git(command, "no commits found"),
                e => e,
            })?;

        // Repositories with merged unrelated histories have several roots
        out.lines()
            .last()
            .map(|hash| hash.trim().to_owned())
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| Error::git("rev-list --max-parents=0 HEAD", "no commits found"))
    }

    fn log(&self, grep: &str, format: &str, range: &LogRange) -> Result<String> {
        let grep = format!("--grep={grep}");
        let format = format!("--format={format}");
        let range = range.as_arg();

        self.run(&["log", "-E", &grep, &format, &range])
    }
}
