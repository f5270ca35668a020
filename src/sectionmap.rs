use indexmap::IndexMap;
use log::debug;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::commit::{CommitMessage, Component};

/// The three categories a changelog is made of, in the order they are written
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SectionKind {
    Fix,
    Feat,
    Breaking,
}

impl SectionKind {
    /// The section a commit type files into. Only `fix` and `feat` have one;
    /// breaking changes are picked up from the commit body instead.
    pub fn for_type(commit_type: &str) -> Option<SectionKind> {
        match commit_type {
            "fix" => Some(SectionKind::Fix),
            "feat" => Some(SectionKind::Feat),
            _ => None,
        }
    }

    /// The heading used for this section in a rendered changelog
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Fix => "Bug Fixes",
            SectionKind::Feat => "Features",
            SectionKind::Breaking => "Breaking Changes",
        }
    }
}

/// The second level of the changelog, i.e. the components -> commit
/// information. Components keep the order they were first seen in.
pub type ComponentMap = IndexMap<Component, Vec<CommitMessage>>;

/// One category of the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub components: ComponentMap,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Section {
            kind,
            components: IndexMap::new(),
        }
    }

    pub fn push(&mut self, commit: CommitMessage) {
        self.components
            .entry(commit.component.clone())
            .or_insert_with(Vec::new)
            .push(commit);
    }

    /// Whether no commit at all landed in this section
    pub fn is_empty(&self) -> bool { self.components.values().all(Vec::is_empty) }

    pub fn len(&self) -> usize { self.components.values().map(Vec::len).sum() }
}

/// A struct which holds the sections and their components->commits maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    pub fixes: Section,
    pub features: Section,
    pub breaking: Section,
}

impl Default for SectionMap {
    fn default() -> Self {
        SectionMap {
            fixes: Section::new(SectionKind::Fix),
            features: Section::new(SectionKind::Feat),
            breaking: Section::new(SectionKind::Breaking),
        }
    }
}

impl SectionMap {
    /// Creates a section map from a list of commits, which we can then
    /// iterate through and write.
    ///
    /// `fix` and `feat` commits are filed by component, every breaking change
    /// note additionally becomes an entry under "Breaking Changes", and all
    /// other commit types are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::{CommitParser, SectionMap};
    /// let parser = CommitParser::new();
    /// let commits = parser.parse_log(
    ///     "0123456789\nfeat(Foo): Extended Foo\n\n==END==\n\
    ///      0123456789\nchore(Bar): Did a chore\n\n==END==\n",
    /// );
    ///
    /// let sm = SectionMap::from_commits(commits);
    ///
    /// assert_eq!(sm.features.len(), 1);
    /// assert!(sm.fixes.is_empty());
    /// ```
    pub fn from_commits<I>(commits: I) -> SectionMap
    where
        I: IntoIterator<Item = CommitMessage>,
    {
        let mut sm = SectionMap::default();

        for entry in commits {
            for text in &entry.breaks {
                sm.breaking.push(CommitMessage {
                    subject: text.clone(),
                    body: String::new(),
                    closes: vec![],
                    breaks: vec![],
                    ..entry.clone()
                });
            }

            if let Some(kind) = SectionKind::for_type(&entry.commit_type) {
                sm.section_mut(kind).push(entry);
            }
        }

        debug!(
            "Classified {} fixes, {} features, {} breaking changes",
            sm.fixes.len(),
            sm.features.len(),
            sm.breaking.len()
        );
        sm
    }

    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Fix => &self.fixes,
            SectionKind::Feat => &self.features,
            SectionKind::Breaking => &self.breaking,
        }
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Fix => &mut self.fixes,
            SectionKind::Feat => &mut self.features,
            SectionKind::Breaking => &mut self.breaking,
        }
    }

    /// All three sections in the order they are written
    pub fn iter(&self) -> impl Iterator<Item = &Section> + '_ {
        SectionKind::iter().map(move |kind| self.section(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, ty: &str, component: &str, subject: &str) -> CommitMessage {
        CommitMessage {
            commit_type: ty.to_owned(),
            component: Component::from_scope(Some(component)),
            ..CommitMessage::new(hash, subject)
        }
    }

    fn named(name: &str) -> Component { Component::Named(name.into()) }

    fn sample() -> Vec<CommitMessage> {
        let mut adding = commit("aaaa1111", "feat", "Foo", "Adding foo feature");
        adding.breaks.push("Breaks Mr. Guy!".into());
        let mut fixing = commit("bbbb2222", "fix", "Bar", "Fixed something in Bar");
        fixing.breaks.push("I broke it".into());
        fixing.closes.push("200".into());

        vec![
            commit("dddd4444", "feat", "Foo", "Extended Foo"),
            commit("cccc3333", "chore", "Bar", "Did a chore"),
            fixing,
            adding,
        ]
    }

    #[test]
    fn files_commits_by_type_and_component() {
        let sm = SectionMap::from_commits(sample());

        assert_eq!(sm.fixes.len(), 1);
        assert_eq!(sm.fixes.components[&named("Bar")][0].subject, "Fixed something in Bar");

        let foo = &sm.features.components[&named("Foo")];
        assert_eq!(foo.len(), 2);
        assert_eq!(foo[0].subject, "Extended Foo");
        assert_eq!(foo[1].subject, "Adding foo feature");
    }

    #[test]
    fn breaking_changes_use_note_as_subject() {
        let sm = SectionMap::from_commits(sample());

        let keys = sm.breaking.components.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec![named("Bar"), named("Foo")]);

        let bar = &sm.breaking.components[&named("Bar")][0];
        assert_eq!(bar.subject, "I broke it");
        assert_eq!(bar.hash, "bbbb2222");
        assert!(bar.closes.is_empty());
        assert_eq!(sm.breaking.components[&named("Foo")][0].subject, "Breaks Mr. Guy!");
    }

    #[test]
    fn other_types_are_ignored() {
        let sm = SectionMap::from_commits(vec![
            commit("a", "chore", "", "chore"),
            commit("b", "docs", "Bar", "docs"),
            commit("c", "Feat", "", "wrong case"),
        ]);

        assert!(sm.iter().all(Section::is_empty));
    }

    #[test]
    fn breaking_note_on_ignored_type_still_counts() {
        let mut chore = commit("a", "chore", "", "chore");
        chore.breaks.push("Dropped support".into());
        let sm = SectionMap::from_commits(vec![chore]);

        assert_eq!(sm.breaking.components[&Component::None][0].subject, "Dropped support");
        assert!(sm.fixes.is_empty() && sm.features.is_empty());
    }

    #[test]
    fn classification_is_repeatable() {
        assert_eq!(SectionMap::from_commits(sample()), SectionMap::from_commits(sample()));
    }

    #[test]
    fn sections_iterate_in_fixed_order() {
        let sm = SectionMap::default();
        let titles = sm.iter().map(|s| s.kind.title()).collect::<Vec<_>>();

        assert_eq!(titles, vec!["Bug Fixes", "Features", "Breaking Changes"]);
        assert_eq!(SectionKind::Breaking.to_string(), "breaking");
    }
}
