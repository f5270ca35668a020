use std::fmt;

/// The scope of a commit, i.e. the `(component)` part of `feat(component): ...`
///
/// Commits without a scope use `Component::None` rather than an empty name so
/// the two can never collide when used as a map key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Component {
    #[default]
    None,
    Named(String),
}

impl Component {
    /// Builds a component from a captured scope, treating an empty scope the
    /// same as a missing one
    pub fn from_scope<S: AsRef<str>>(scope: Option<S>) -> Self {
        match scope {
            Some(s) if !s.as_ref().is_empty() => Component::Named(s.as_ref().to_owned()),
            _ => Component::None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Component::None => None,
            Component::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name().unwrap_or_default())
    }
}

/// The struct representation of a parsed conventional commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    /// The full commit hash
    pub hash: String,
    /// The commit subject, at most 80 characters, with closing references
    /// removed
    pub subject: String,
    /// The remaining lines of the commit message
    pub body: String,
    /// The conventional commit type, e.g. `feat` or `fix`
    pub commit_type: String,
    /// The component (if any)
    pub component: Component,
    /// Any issues this commit closes, in the order they were found
    pub closes: Vec<String>,
    /// Any breaking change notes attached to this commit
    pub breaks: Vec<String>,
}

impl CommitMessage {
    /// Creates a bare commit with a hash and subject, everything else empty
    ///
    /// # Example
    ///
    /// ```
    /// # use conventional_changelog::CommitMessage;
    /// let msg = CommitMessage::new("asdf", "The subject");
    ///
    /// assert_eq!("asdf", msg.hash);
    /// assert_eq!("The subject", msg.subject);
    /// ```
    pub fn new<H: Into<String>, S: Into<String>>(hash: H, subject: S) -> Self {
        CommitMessage {
            hash: hash.into(),
            subject: subject.into(),
            body: String::new(),
            commit_type: String::new(),
            component: Component::None,
            closes: vec![],
            breaks: vec![],
        }
    }

    /// The abbreviated hash shown in rendered changelogs
    pub fn short_hash(&self, len: usize) -> &str {
        match self.hash.char_indices().nth(len) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }
}

/// A convienience type for multiple commits
pub type Commits = Vec<CommitMessage>;
