//! Strict parsing of rule files.
//!
//! The format is line oriented:
//!
//! ```text
//! no_empty_catch
//!     catch[block[.text('{}')]]
//!     warning: empty catch clause
//!
//! no_async_void
//!     method[async && void]
//! ```
//!
//! A line at column zero opens a rule with that identifier. The first
//! indented line under it is the rule's path; an optional second
//! indented line is `severity: message`, where the message may be
//! empty and the severity is `error` or `warning`. Blank lines are
//! ignored. Omitting the severity line means `error` with no message.
//!
//! Loading is strict: any malformed line fails the whole file with a
//! line-numbered error, so a typo disables nothing silently.

use std::path::{Path, PathBuf};

use thiserror::Error;

use sourcepath::{Axis, Dialect, ParseError, PathParser};

use crate::rule::{Rule, RuleSet, Severity};

/// Conventional name for a rule file at a project root.
pub const DEFAULT_FILE_NAME: &str = ".sourcepathrc";

/// Errors from loading a rule file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The file could not be read.
    #[error("failed to read rule file {}", path.display())]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rule's path failed to parse.
    #[error("rule '{id}' (line {line}): {source}")]
    Path {
        /// The rule being loaded.
        id: String,
        /// One-based line number of the path.
        line: usize,
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },

    /// An indented line appeared before any rule identifier.
    #[error("line {line}: indented line before any rule identifier")]
    OrphanLine {
        /// One-based line number.
        line: usize,
    },

    /// A rule ended without a path line.
    #[error("rule '{id}' (line {line}) has no path line")]
    MissingPath {
        /// The rule being loaded.
        id: String,
        /// One-based line number of the rule identifier.
        line: usize,
    },

    /// The severity line names an unknown severity.
    #[error("rule '{id}' (line {line}): unknown severity '{severity}'")]
    UnknownSeverity {
        /// The rule being loaded.
        id: String,
        /// One-based line number of the severity line.
        line: usize,
        /// The text before the colon.
        severity: String,
    },

    /// A rule has more indented lines than the format allows.
    #[error("rule '{id}' (line {line}): unexpected extra line")]
    ExtraLine {
        /// The rule being loaded.
        id: String,
        /// One-based line number of the extra line.
        line: usize,
    },

    /// Two rules share an identifier.
    #[error("rule '{id}' (line {line}) is defined twice")]
    DuplicateRule {
        /// The duplicated identifier.
        id: String,
        /// One-based line number of the second definition.
        line: usize,
    },
}

impl<K: sourcepath::NodeKind> RuleSet<K> {
    /// Parses rule file content.
    ///
    /// Paths are parsed with the self axis enforced on their first
    /// segments, so each rule answers "does this node violate the
    /// rule" when evaluated at a node. An explicit axis on a rule
    /// path's first segment is therefore a load error.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for the first malformed line; nothing is
    /// loaded from a bad file.
    pub fn parse<D>(content: &str, dialect: &D) -> Result<Self, RuleError>
    where
        D: Dialect<Kind = K>,
    {
        Loader::new(dialect).load(content)
    }

    /// Reads and parses a rule file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Io`] when reading fails, otherwise as
    /// [`parse`](Self::parse).
    pub fn load<D>(path: &Path, dialect: &D) -> Result<Self, RuleError>
    where
        D: Dialect<Kind = K>,
    {
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&content, dialect)
    }
}

/// Accumulates one rule while its lines arrive.
struct PendingRule<K: sourcepath::NodeKind> {
    id: String,
    id_line: usize,
    path: Option<sourcepath::SourcePath<K>>,
    severity: Option<(Severity, Option<String>)>,
}

struct Loader<'d, D: Dialect> {
    parser: PathParser<'d, D>,
}

impl<'d, D: Dialect> Loader<'d, D> {
    const fn new(dialect: &'d D) -> Self {
        Self {
            parser: PathParser::new(dialect),
        }
    }

    fn load(&self, content: &str) -> Result<RuleSet<D::Kind>, RuleError> {
        let mut rules: Vec<Rule<D::Kind>> = Vec::new();
        let mut pending: Option<PendingRule<D::Kind>> = None;

        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let indented = raw.starts_with(char::is_whitespace);
            if indented {
                let Some(current) = pending.as_mut() else {
                    return Err(RuleError::OrphanLine { line });
                };
                self.continuation(current, raw.trim(), line)?;
            } else {
                if let Some(done) = pending.take() {
                    rules.push(finish(done)?);
                }
                let id = raw.trim().to_owned();
                if rules.iter().any(|rule| rule.id() == id) {
                    return Err(RuleError::DuplicateRule { id, line });
                }
                pending = Some(PendingRule {
                    id,
                    id_line: line,
                    path: None,
                    severity: None,
                });
            }
        }
        if let Some(done) = pending.take() {
            rules.push(finish(done)?);
        }
        Ok(RuleSet::new(rules))
    }

    fn continuation(
        &self,
        current: &mut PendingRule<D::Kind>,
        text: &str,
        line: usize,
    ) -> Result<(), RuleError> {
        if current.path.is_none() {
            let path = self
                .parser
                .parse_with_axis(text, Axis::Self_)
                .map_err(|source| RuleError::Path {
                    id: current.id.clone(),
                    line,
                    source,
                })?;
            current.path = Some(path);
            return Ok(());
        }
        if current.severity.is_some() {
            return Err(RuleError::ExtraLine {
                id: current.id.clone(),
                line,
            });
        }
        let (severity_text, message) = match text.split_once(':') {
            Some((severity_text, message)) => (severity_text.trim(), message.trim()),
            None => (text, ""),
        };
        let severity =
            Severity::parse(severity_text).ok_or_else(|| RuleError::UnknownSeverity {
                id: current.id.clone(),
                line,
                severity: severity_text.to_owned(),
            })?;
        let message = if message.is_empty() {
            None
        } else {
            Some(message.to_owned())
        };
        current.severity = Some((severity, message));
        Ok(())
    }
}

fn finish<K: sourcepath::NodeKind>(pending: PendingRule<K>) -> Result<Rule<K>, RuleError> {
    let Some(path) = pending.path else {
        return Err(RuleError::MissingPath {
            id: pending.id,
            line: pending.id_line,
        });
    };
    let (severity, message) = pending.severity.unwrap_or((Severity::Error, None));
    Ok(Rule::new(pending.id, path, severity, message))
}
