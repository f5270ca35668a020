use std::io;

use log::debug;

use crate::{
    commit::CommitMessage,
    error::Result,
    fmt::{FormatWriter, WriterOptions, STYLE},
    sectionmap::{Section, SectionMap},
};

/// Wraps a `std::io::Write` object to write changelog output in a Markdown
/// format
///
/// # Example
///
/// ```
/// # use conventional_changelog::{SectionMap, fmt::{FormatWriter, MarkdownWriter, WriterOptions}};
/// let sm = SectionMap::default();
/// let mut out = Vec::new();
///
/// let mut writer = MarkdownWriter::new(&mut out);
/// writer.write_changelog(&WriterOptions::new("1.0.0"), &sm).unwrap();
///
/// assert!(String::from_utf8(out).unwrap().starts_with("<a name=\"1.0.0\"></a>\n## 1.0.0 ("));
/// ```
pub struct MarkdownWriter<'a>(&'a mut dyn io::Write);

impl<'a> MarkdownWriter<'a> {
    /// Creates a new instance of the `MarkdownWriter` struct using a
    /// `std::io::Write` object.
    pub fn new<T: io::Write + 'a>(writer: &'a mut T) -> MarkdownWriter<'a> { MarkdownWriter(writer) }

    /// Renders a changelog straight into a `String`
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::{SectionMap, fmt::{MarkdownWriter, WriterOptions}};
    /// let text = MarkdownWriter::render(&WriterOptions::new("1.0.1"), &SectionMap::default())
    ///     .unwrap();
    ///
    /// assert!(text.contains("### 1.0.1"));
    /// ```
    pub fn render(options: &WriterOptions, sm: &SectionMap) -> Result<String> {
        let mut out = Vec::with_capacity(256);
        MarkdownWriter::new(&mut out).write_changelog(options, sm)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn write_header(&mut self, options: &WriterOptions) -> Result<()> {
        let date = options.date_string()?;
        let header = STYLE.header(&options.version, options.subtitle(), &date);

        write!(self.0, "{header}\n\n").map_err(Into::into)
    }

    /// Writes a particular section of a changelog
    fn write_section(&mut self, options: &WriterOptions, section: &Section) -> Result<()> {
        if section.is_empty() {
            return Ok(());
        }
        debug!("Writing section: {}", section.kind);

        write!(self.0, "\n{}\n\n", STYLE.section_title(section.kind.title()))?;

        let nested = section.components.len() > 1;
        for (component, entries) in &section.components {
            let prefix = match component.name() {
                None => STYLE.bullet.to_owned(),
                Some(name) if nested => {
                    writeln!(self.0, "{}", STYLE.component_label(name))?;
                    STYLE.nested_bullet.to_owned()
                }
                Some(name) => STYLE.component_label(name),
            };

            for entry in entries {
                self.write_entry(options, &prefix, entry)?;
            }
        }

        writeln!(self.0).map_err(Into::into)
    }

    fn write_entry(
        &mut self,
        options: &WriterOptions,
        prefix: &str,
        entry: &CommitMessage,
    ) -> Result<()> {
        let repo = options.repository();
        write!(
            self.0,
            "{prefix} {} ({}",
            entry.subject,
            STYLE.commit_link(entry.short_hash(STYLE.short_hash_len), &entry.hash, repo)
        )?;

        if !entry.closes.is_empty() {
            let closes_string = entry
                .closes
                .iter()
                .map(|issue| STYLE.issue_link(issue, repo))
                .collect::<Vec<String>>()
                .join(", ");

            write!(self.0, ", closes {closes_string}")?;
        }

        writeln!(self.0, ")").map_err(Into::into)
    }
}

impl<'a> FormatWriter for MarkdownWriter<'a> {
    fn write_changelog(&mut self, options: &WriterOptions, sm: &SectionMap) -> Result<()> {
        self.write_header(options)?;

        for section in sm.iter() {
            self.write_section(options, section)?;
        }

        self.0.flush().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::commit::Component;

    fn options(version: &str) -> WriterOptions {
        WriterOptions {
            date: Some(date!(2015 - 02 - 06)),
            ..WriterOptions::new(version)
        }
    }

    fn commit(hash: &str, ty: &str, component: &str, subject: &str) -> CommitMessage {
        CommitMessage {
            commit_type: ty.to_owned(),
            component: Component::from_scope(Some(component)),
            ..CommitMessage::new(hash, subject)
        }
    }

    fn basic_commits() -> Vec<CommitMessage> {
        let mut fixing = commit(
            "as8df6a768sh098asdh5asdh987asdh987asdh98",
            "fix",
            "README",
            "Fixing README",
        );
        fixing.closes = vec!["123".into(), "456".into()];
        let mut adding = commit(
            "2bc2fb9fb22a843a6cd161b634288c80335eafff",
            "feat",
            "README",
            "Adding README",
        );
        adding.breaks = vec!["I broke something oh no!".into()];
        let main = commit(
            "123125125122a843a6cd161b634288c80335eaff",
            "feat",
            "Main.rs",
            "Main class feature #1",
        );

        vec![fixing, adding, main]
    }

    fn render(options: &WriterOptions, commits: Vec<CommitMessage>) -> String {
        MarkdownWriter::render(options, &SectionMap::from_commits(commits)).unwrap()
    }

    #[test]
    fn writes_full_changelog() {
        let text = render(&options("1.2.3"), basic_commits());

        let expected = "<a name=\"1.2.3\"></a>\n\
                        ### 1.2.3 (2015-02-06)\n\
                        \n\
                        \n\
                        #### Bug Fixes\n\
                        \n\
                        * **README:** Fixing README ((as8df6a7), closes (#123), (#456))\n\
                        \n\
                        \n\
                        #### Features\n\
                        \n\
                        * **README:**\n  \
                        * Adding README ((2bc2fb9f))\n\
                        * **Main.rs:**\n  \
                        * Main class feature #1 ((12312512))\n\
                        \n\
                        \n\
                        #### Breaking Changes\n\
                        \n\
                        * **README:** I broke something oh no! ((2bc2fb9f))\n\
                        \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn no_repo_doesnt_link_commits() {
        let text = render(&options("1.2.3"), basic_commits());
        assert!(text.contains("(as8df6a7)"));
        assert!(!text.contains("]("));
    }

    #[test]
    fn with_repo_links_commits_and_issues() {
        let opts = WriterOptions {
            repository: Some("http://myrepo.com".into()),
            ..options("1.2.3")
        };
        let text = render(&opts, basic_commits());

        assert!(text.contains(
            "([as8df6a7](http://myrepo.com/commit/as8df6a768sh098asdh5asdh987asdh987asdh98), \
             closes [#123](http://myrepo.com/issues/123), [#456](http://myrepo.com/issues/456))"
        ));
    }

    #[test]
    fn header_uses_minor_heading_and_subtitle() {
        let opts = WriterOptions {
            subtitle: Some("Codename".into()),
            ..options("1.1.0")
        };
        let text = render(&opts, vec![]);

        assert_eq!(text, "<a name=\"1.1.0\"></a>\n## 1.1.0 Codename (2015-02-06)\n\n");
    }

    #[test]
    fn empty_sections_are_omitted() {
        let text = render(
            &options("1.0.1"),
            vec![commit("abcdef1234", "feat", "", "Only a feature")],
        );

        assert!(!text.contains("Bug Fixes"));
        assert!(!text.contains("Breaking Changes"));
        assert_eq!(text.matches("#### Features").count(), 1);
        assert!(text.contains("\n* Only a feature ((abcdef12))\n"));
    }

    #[test]
    fn unscoped_entries_use_plain_bullets_next_to_components() {
        let text = render(
            &options("1.0.1"),
            vec![
                commit("1111111111", "fix", "", "Loose fix"),
                commit("2222222222", "fix", "Core", "Core fix"),
            ],
        );

        assert!(text.contains("* Loose fix ((11111111))\n* **Core:**\n  * Core fix ((22222222))\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render(&options("1.0.1"), basic_commits());
        let b = render(&options("1.0.1"), basic_commits());
        assert_eq!(a, b);
    }
}
