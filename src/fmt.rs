mod md_writer;

use time::{macros::format_description, Date, OffsetDateTime};

pub use self::md_writer::MarkdownWriter;
use crate::{error::Result, sectionmap::SectionMap};

/// The fixed markup a changelog is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Heading for releases whose patch number is `0`
    pub version_heading: &'static str,
    /// Heading for every other release
    pub patch_version_heading: &'static str,
    pub section_heading: &'static str,
    pub bullet: &'static str,
    pub nested_bullet: &'static str,
    /// Path segment between the repository URL and a full commit hash
    pub commit_path: &'static str,
    /// Path segment between the repository URL and an issue number
    pub issue_path: &'static str,
    pub short_hash_len: usize,
    /// Wraps the version into an HTML anchor above the release heading
    pub anchor_open: &'static str,
    pub anchor_close: &'static str,
    /// Wraps a component name in front of its entries
    pub label_open: &'static str,
    pub label_close: &'static str,
}

pub const STYLE: Style = Style {
    version_heading: "##",
    patch_version_heading: "###",
    section_heading: "####",
    bullet: "*",
    nested_bullet: "  *",
    commit_path: "commit",
    issue_path: "issues",
    short_hash_len: 8,
    anchor_open: "<a name=\"",
    anchor_close: "\"></a>",
    label_open: "**",
    label_close: ":**",
};

impl Style {
    /// Whether a version gets the major/minor heading: at least three dotted
    /// parts, the third being exactly `0`
    pub fn is_minor_version(version: &str) -> bool {
        version.split('.').nth(2).map_or(false, |patch| patch == "0")
    }

    pub fn version_heading_for(&self, version: &str) -> &'static str {
        if Style::is_minor_version(version) {
            self.version_heading
        } else {
            self.patch_version_heading
        }
    }

    /// The anchor line and release heading, e.g.
    /// `<a name="1.1.0"></a>\n## 1.1.0 Codename (2015-02-06)`
    pub fn header(&self, version: &str, subtitle: Option<&str>, date: &str) -> String {
        let subtitle = subtitle.map(|s| format!(" {s}")).unwrap_or_default();
        format!(
            "{}{version}{}\n{} {version}{subtitle} ({date})",
            self.anchor_open,
            self.anchor_close,
            self.version_heading_for(version)
        )
    }

    pub fn section_title(&self, title: &str) -> String {
        format!("{} {title}", self.section_heading)
    }

    /// `* **name:**`, the bullet that entries of a component follow
    pub fn component_label(&self, name: &str) -> String {
        format!("{} {}{name}{}", self.bullet, self.label_open, self.label_close)
    }

    /// `(abcdef12)` or `[abcdef12](<repo>/commit/<hash>)`
    pub fn commit_link(&self, short_hash: &str, hash: &str, repo: Option<&str>) -> String {
        match repo {
            Some(repo) => format!("[{short_hash}]({repo}/{}/{hash})", self.commit_path),
            None => format!("({short_hash})"),
        }
    }

    /// `(#12)` or `[#12](<repo>/issues/12)`
    pub fn issue_link(&self, issue: &str, repo: Option<&str>) -> String {
        match repo {
            Some(repo) => format!("[#{issue}]({repo}/{}/{issue})", self.issue_path),
            None => format!("(#{issue})"),
        }
    }
}

/// Everything a writer needs to know about the release besides its commits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterOptions {
    pub version: String,
    pub subtitle: Option<String>,
    /// Base URL for commit and issue links, bare references are written
    /// when it is missing
    pub repository: Option<String>,
    /// The release date, today (UTC) when unset
    pub date: Option<Date>,
}

impl WriterOptions {
    pub fn new<S: Into<String>>(version: S) -> Self {
        WriterOptions {
            version: version.into(),
            ..WriterOptions::default()
        }
    }

    /// The repository URL, ignoring an empty one and any trailing slash
    pub fn repository(&self) -> Option<&str> {
        self.repository
            .as_deref()
            .map(|r| r.trim_end_matches('/'))
            .filter(|r| !r.is_empty())
    }

    pub fn subtitle(&self) -> Option<&str> { self.subtitle.as_deref().filter(|s| !s.is_empty()) }

    /// The release date formatted as `yyyy-MM-dd`
    pub fn date_string(&self) -> Result<String> {
        let date = self.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
        date.format(format_description!("[year]-[month]-[day]"))
            .map_err(Into::into)
    }
}

/// A trait that allows writing the results of a run in an arbitrary format.
/// The single required function `write_changelog()` accepts a `SectionMap`
/// which can be thought of as the changelog "AST" of sorts.
pub trait FormatWriter {
    /// Writes a changelog from a given `SectionMap`
    fn write_changelog(&mut self, options: &WriterOptions, section_map: &SectionMap) -> Result<()>;
}
