//! Turns a release's worth of [conventional commits] into a grouped Markdown
//! changelog.
//!
//! Raw `git log` output is split into commit records, parsed into
//! `CommitMessage`s (anything not shaped like `type(scope): subject` is
//! dropped), sorted into Bug Fixes, Features and Breaking Changes, and
//! rendered with `MarkdownWriter`. `Changelog` wires those steps together and
//! prepends the result to `CHANGELOG.md`.
//!
//! [conventional commits]: https://www.conventionalcommits.org
//!
//! # Example
//!
//! ```no_run
//! # use conventional_changelog::Changelog;
//! let text = Changelog::new()
//!     .version("1.1.0")
//!     .repository("https://github.com/me/project")
//!     .generate()
//!     .unwrap();
//! ```

#[macro_use]
mod macros;
mod changelog;
pub mod commit;
pub mod config;
pub mod error;
pub mod fmt;
pub mod git;
pub mod parser;
mod sectionmap;

pub use changelog::Changelog;
pub use commit::{CommitMessage, Commits, Component};
pub use parser::CommitParser;
pub use sectionmap::{ComponentMap, Section, SectionKind, SectionMap};

// The default config file
pub const DEFAULT_CONFIG_FILE: &str = ".changelog.toml";
