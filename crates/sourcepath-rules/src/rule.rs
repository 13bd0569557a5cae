//! Rules: a path bound to an identifier and a diagnostic.

use std::fmt;
use std::sync::Arc;

use sourcepath::{Axis, Engine, EngineError, NodeKind, SourceNode, SourcePath};

/// How a matched rule is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Reported as an error.
    #[default]
    Error,
    /// Reported as a warning.
    Warning,
}

impl Severity {
    /// Returns the severity name as written in rule files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    pub(crate) fn parse(text: &str) -> Option<Self> {
        match text {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule: an identifier, a path anchored at the tested node, and
/// how to report a match.
#[derive(Debug, Clone)]
pub struct Rule<K: NodeKind> {
    id: String,
    path: SourcePath<K>,
    severity: Severity,
    message: Option<String>,
}

impl<K: NodeKind> Rule<K> {
    pub(crate) fn new(
        id: String,
        path: SourcePath<K>,
        severity: Severity,
        message: Option<String>,
    ) -> Self {
        Self {
            id,
            path,
            severity,
            message,
        }
    }

    /// Returns the rule identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the rule's path. Its first segments carry the self
    /// axis, so the path answers "does this node violate the rule".
    #[must_use]
    pub const fn path(&self) -> &SourcePath<K> {
        &self.path
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the diagnostic message, if the rule file gave one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the node kinds that can possibly match this rule, for
    /// callers that index rules by kind before visiting a tree.
    #[must_use]
    pub fn root_kinds(&self) -> Vec<Arc<K>> {
        self.path.root_kinds()
    }

    /// Returns whether this rule matches at `node`.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from evaluation.
    pub fn matches<N>(&self, engine: &Engine, node: &N) -> Result<bool, EngineError>
    where
        N: SourceNode<Kind = K>,
    {
        engine.matches(&self.path, node, Axis::Self_)
    }
}

/// An ordered collection of rules loaded from one file.
#[derive(Debug, Clone)]
pub struct RuleSet<K: NodeKind> {
    rules: Vec<Rule<K>>,
}

impl<K: NodeKind> Default for RuleSet<K> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<K: NodeKind> RuleSet<K> {
    pub(crate) const fn new(rules: Vec<Rule<K>>) -> Self {
        Self { rules }
    }

    /// Returns the rules in file order.
    #[must_use]
    pub fn rules(&self) -> &[Rule<K>] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rule with the given identifier, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule<K>> {
        self.rules.iter().find(|rule| rule.id() == id)
    }
}

impl<'a, K: NodeKind> IntoIterator for &'a RuleSet<K> {
    type Item = &'a Rule<K>;
    type IntoIter = std::slice::Iter<'a, Rule<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
