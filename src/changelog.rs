use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use time::Date;

use crate::{
    commit::Commits,
    config::RawChangelogCfg,
    error::{Error, Result},
    fmt::{MarkdownWriter, WriterOptions},
    git::{Git, LogRange, LogSource, DEFAULT_FORMAT, DEFAULT_GREP},
    parser::CommitParser,
    sectionmap::SectionMap,
    DEFAULT_CONFIG_FILE,
};

/// The base struct used to set options and generate changelogs.
#[derive(Debug, Clone)]
pub struct Changelog {
    /// The version label for the release, required
    pub version: Option<String>,
    /// Where to start looking for commits (Defaults to the latest tag)
    pub from: Option<String>,
    /// Where to stop looking for commits (Defaults to `HEAD`)
    pub to: String,
    /// The changelog file, relative to `working_directory` (Defaults to
    /// `CHANGELOG.md`)
    pub file: PathBuf,
    /// Root for revision resolution and the changelog file
    pub working_directory: PathBuf,
    /// The subtitle for the release
    pub subtitle: Option<String>,
    /// The repository used for the base of hyper-links
    pub repo: Option<String>,
    /// The date written in the release header (Defaults to today)
    pub date: Option<Date>,
    /// The grep search pattern used to find commits we are interested in
    pub grep: String,
    /// The format of the commit output from `git log`
    pub format: String,
    pub parser: CommitParser,
}

impl Default for Changelog {
    fn default() -> Self {
        Changelog {
            version: None,
            from: None,
            to: "HEAD".to_owned(),
            file: PathBuf::from("CHANGELOG.md"),
            working_directory: PathBuf::from("."),
            subtitle: None,
            repo: None,
            date: None,
            grep: DEFAULT_GREP.to_owned(),
            format: DEFAULT_FORMAT.to_owned(),
            parser: CommitParser::default(),
        }
    }
}

impl Changelog {
    /// Creates a `Changelog` with default options for the current directory
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::Changelog;
    /// let changelog = Changelog::new().version("1.0.1");
    ///
    /// assert_eq!(changelog.to, "HEAD");
    /// assert_eq!(changelog.changelog_path().file_name().unwrap(), "CHANGELOG.md");
    /// ```
    pub fn new() -> Self { Changelog::default() }

    /// Creates a `Changelog` for a project directory, picking up the
    /// `.changelog.toml` configuration file inside it when there is one
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use conventional_changelog::Changelog;
    /// let changelog = Changelog::with_dir("/myproject").unwrap().version("2.0.0");
    /// ```
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let cfg_file = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if cfg_file.is_file() {
            return Changelog::from_file(cfg_file);
        }

        debug!("No config file in {:?}, using defaults", dir.as_ref());
        Ok(Changelog::default().working_directory(dir))
    }

    /// Creates a `Changelog` from a TOML configuration file. The directory
    /// holding the file is used as the working directory unless the file
    /// names one.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use conventional_changelog::Changelog;
    /// let changelog = Changelog::from_file("/myproject/.changelog.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        debug!("Creating changelog with \n\tfile: {:?}", file.as_ref());
        let cfg_file = if file.as_ref().is_relative() {
            env::current_dir()
                .map_err(|_| Error::CurrentDir)?
                .join(file.as_ref())
        } else {
            file.as_ref().to_path_buf()
        };

        let cfg = RawChangelogCfg::from_file(&cfg_file)?;
        let mut dir = cfg_file;
        dir.pop();

        let changelog = Changelog::default().apply_config(cfg, dir);
        debug!("Returning changelog:\n{:?}", changelog);
        Ok(changelog)
    }

    fn apply_config(mut self, cfg: RawChangelogCfg, cfg_dir: PathBuf) -> Self {
        self.working_directory = match cfg.working_directory {
            Some(wd) if wd.is_relative() => cfg_dir.join(wd),
            Some(wd) => wd,
            None => cfg_dir,
        };
        if let Some(file) = cfg.file {
            self.file = file.into();
        }
        if let Some(to) = cfg.to {
            self.to = to;
        }
        self.from = cfg.from.or(self.from);
        self.repo = cfg.repository.or(self.repo);
        self.subtitle = cfg.subtitle.or(self.subtitle);
        self
    }

    /// Sets the version label for the release
    pub fn version<S: Into<String>>(mut self, v: S) -> Changelog {
        self.version = Some(v.into());
        self
    }

    /// Sets where to begin searching commits, overriding the latest tag
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::Changelog;
    /// let changelog = Changelog::new().from("6d8183f");
    /// ```
    pub fn from<S: Into<String>>(mut self, f: S) -> Changelog {
        self.from = Some(f.into());
        self
    }

    /// Sets what point to stop searching for commits (Defaults to `HEAD`)
    pub fn to<S: Into<String>>(mut self, t: S) -> Changelog {
        self.to = t.into();
        self
    }

    /// Sets the changelog file to prepend to
    pub fn file<P: AsRef<Path>>(mut self, f: P) -> Changelog {
        self.file = f.as_ref().to_path_buf();
        self
    }

    pub fn working_directory<P: AsRef<Path>>(mut self, d: P) -> Changelog {
        self.working_directory = d.as_ref().to_path_buf();
        self
    }

    /// Sets the subtitle written after the version
    pub fn subtitle<S: Into<String>>(mut self, s: S) -> Changelog {
        self.subtitle = Some(s.into());
        self
    }

    /// Sets the repository used for the base of hyper-links
    ///
    /// **NOTE:** Leave off the trailing `.git`
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::Changelog;
    /// let changelog = Changelog::new().repository("https://github.com/me/project");
    /// ```
    pub fn repository<S: Into<String>>(mut self, r: S) -> Changelog {
        self.repo = Some(r.into());
        self
    }

    /// Pins the date written in the release header
    pub fn date(mut self, d: Date) -> Changelog {
        self.date = Some(d);
        self
    }

    /// The changelog file path, resolved against the working directory
    pub fn changelog_path(&self) -> PathBuf { self.working_directory.join(&self.file) }

    fn checked_version(&self) -> Result<&str> {
        self.version
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingVersion)
    }

    /// Works out which revisions to read: `from` if set, otherwise the latest
    /// tag reachable from `to`, otherwise everything up to `to`
    pub fn log_range<S: LogSource + ?Sized>(&self, source: &S) -> Result<LogRange> {
        let from = match self.from.as_ref() {
            Some(from) => Some(from.clone()),
            None => match source.latest_tag(&self.to)? {
                Some(tag) => Some(tag),
                None => {
                    let first = source.first_commit()?;
                    debug!("No tags found, reading history from root commit {first}");
                    None
                }
            },
        };

        Ok(LogRange {
            from,
            to: self.to.clone(),
        })
    }

    /// Retrieves and parses the commits in range, dropping any that aren't
    /// conventional commits
    pub fn get_commits<S: LogSource + ?Sized>(&self, source: &S) -> Result<Commits> {
        let range = self.log_range(source)?;
        debug!("Reading commits in range {}", range.as_arg());

        let raw = source.log(&self.grep, &self.format, &range)?;
        Ok(self.parser.parse_log(&raw))
    }

    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            version: self.version.clone().unwrap_or_default(),
            subtitle: self.subtitle.clone(),
            repository: self.repo.clone(),
            date: self.date,
        }
    }

    /// Renders already parsed commits as Markdown without touching git or
    /// the file system
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::{Changelog, CommitParser};
    /// let commits = CommitParser::new().parse_log("0123456789\nfix(Bar): Fixed it\n\n==END==\n");
    /// let text = Changelog::new().version("1.0.1").render(commits).unwrap();
    ///
    /// assert!(text.contains("* **Bar:** Fixed it ((01234567))"));
    /// ```
    pub fn render(&self, commits: Commits) -> Result<String> {
        self.checked_version()?;
        let sm = SectionMap::from_commits(commits);
        MarkdownWriter::render(&self.writer_options(), &sm)
    }

    /// Prepends `content` to the changelog file, separated from what was
    /// already there by a blank line, or creates the file if it doesn't exist
    pub fn write_changelog(&self, content: &str) -> Result<()> {
        let path = self.changelog_path();
        debug!("Writing changelog to file: {:?}", path);

        let existing = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::persistence(&path, e)),
        };

        let contents = match existing {
            Some(old) => format!("{}\n\n{old}", content.trim_end_matches('\n')),
            None => content.to_owned(),
        };

        fs::write(&path, contents).map_err(|e| Error::persistence(&path, e))
    }

    /// Generates the changelog for the release using `git` in the working
    /// directory, prepends it to the changelog file and returns the new text
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use conventional_changelog::Changelog;
    /// let text = Changelog::new()
    ///     .version("1.1.0")
    ///     .repository("https://github.com/me/project")
    ///     .generate()
    ///     .unwrap();
    /// ```
    pub fn generate(&self) -> Result<String> {
        self.checked_version()?;
        self.generate_with(&Git::new(&self.working_directory))
    }

    /// Same as `generate()` but reads commits from any `LogSource`
    pub fn generate_with<S: LogSource + ?Sized>(&self, source: &S) -> Result<String> {
        let version = self.checked_version()?;
        debug!("Generating changelog for version {version}");

        let commits = self.get_commits(source)?;
        let text = self.render(commits)?;
        self.write_changelog(&text)?;

        Ok(text)
    }
}
