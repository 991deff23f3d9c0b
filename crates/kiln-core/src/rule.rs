//! Rule values and the views they get of a file
//!
//! A rule is one of three capabilities:
//!
//! - [`LintRule`]: observes nodes of the kinds it binds and reports
//!   diagnostics; never changes the tree.
//! - [`FormatRule`]: rewrites nodes of the kinds it binds; each callback
//!   returns the id of the replacement node (or the node itself).
//! - [`FileRule`]: sees the raw text of the whole file once, before parsing.
//!
//! ```rust,ignore
//! let rule = LintRule::new("NoTodo").on(&[SyntaxKind::Identifier], |cx, node| {
//!     if cx.tree().token_text(node) == "TODO" {
//!         cx.diagnose(Severity::Warning, "unfinished work", node);
//!     }
//! });
//! pipeline.register(rule.into());
//! ```

use std::fmt;
use std::rc::Rc;

use biome_text_size::TextRange;
use indexmap::IndexSet;

use crate::config::Configuration;
use crate::context::Context;
use crate::diagnostics::{Location, Severity};
use crate::pipeline::Rewriter;
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// Lint callback
pub type LintFn = dyn Fn(&LintCx<'_>, NodeId);

/// Format callback; returns the rewritten node
pub type FormatFn = dyn Fn(&mut Rewriter<'_>, NodeId) -> NodeId;

/// Whole-file callback; `None` leaves the text unchanged
pub type FileFn = dyn Fn(&FileCx<'_>, &str) -> Option<String>;

/// What a rule is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Lint,
    Format,
    File,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Lint => "lint",
            Capability::Format => "format",
            Capability::File => "file",
        })
    }
}

/// Callback bound to a set of node kinds; a kind listed twice still binds once
pub(crate) struct Binding<F: ?Sized> {
    pub(crate) kinds: IndexSet<SyntaxKind>,
    pub(crate) callback: Rc<F>,
}

/// Read-only rule
pub struct LintRule {
    name: &'static str,
    pub(crate) bindings: Vec<Binding<LintFn>>,
}

impl LintRule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            bindings: Vec::new(),
        }
    }

    /// Run `callback` on every node of the given kinds
    pub fn on<F>(mut self, kinds: &[SyntaxKind], callback: F) -> Self
    where
        F: Fn(&LintCx<'_>, NodeId) + 'static,
    {
        self.bindings.push(Binding {
            kinds: kinds.iter().copied().collect(),
            callback: Rc::new(callback),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Rewriting rule
pub struct FormatRule {
    name: &'static str,
    pub(crate) bindings: Vec<Binding<FormatFn>>,
}

impl FormatRule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            bindings: Vec::new(),
        }
    }

    /// Rewrite every node of the given kinds with `callback`
    pub fn on<F>(mut self, kinds: &[SyntaxKind], callback: F) -> Self
    where
        F: Fn(&mut Rewriter<'_>, NodeId) -> NodeId + 'static,
    {
        self.bindings.push(Binding {
            kinds: kinds.iter().copied().collect(),
            callback: Rc::new(callback),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Rule over the raw text of a file
pub struct FileRule {
    name: &'static str,
    pub(crate) callback: Box<FileFn>,
}

impl FileRule {
    pub fn new<F>(name: &'static str, callback: F) -> Self
    where
        F: Fn(&FileCx<'_>, &str) -> Option<String> + 'static,
    {
        Self {
            name,
            callback: Box::new(callback),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Any rule
pub enum Rule {
    Lint(LintRule),
    Format(FormatRule),
    File(FileRule),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Lint(rule) => rule.name(),
            Rule::Format(rule) => rule.name(),
            Rule::File(rule) => rule.name(),
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Rule::Lint(_) => Capability::Lint,
            Rule::Format(_) => Capability::Format,
            Rule::File(_) => Capability::File,
        }
    }

    /// Kinds this rule observes; empty for file rules
    pub fn kinds(&self) -> Vec<SyntaxKind> {
        let kinds: IndexSet<SyntaxKind> = match self {
            Rule::Lint(rule) => rule.bindings.iter().flat_map(|b| b.kinds.iter().copied()).collect(),
            Rule::Format(rule) => rule.bindings.iter().flat_map(|b| b.kinds.iter().copied()).collect(),
            Rule::File(_) => IndexSet::new(),
        };
        kinds.into_iter().collect()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name())
            .field("capability", &self.capability())
            .finish()
    }
}

impl From<LintRule> for Rule {
    fn from(rule: LintRule) -> Self {
        Rule::Lint(rule)
    }
}

impl From<FormatRule> for Rule {
    fn from(rule: FormatRule) -> Self {
        Rule::Format(rule)
    }
}

impl From<FileRule> for Rule {
    fn from(rule: FileRule) -> Self {
        Rule::File(rule)
    }
}

/// What a lint callback sees
pub struct LintCx<'a> {
    tree: &'a SyntaxTree,
    context: &'a Context,
    rule: &'static str,
}

impl<'a> LintCx<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree, context: &'a Context, rule: &'static str) -> Self {
        Self {
            tree,
            context,
            rule,
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    pub fn configuration(&self) -> &'a Configuration {
        self.context.configuration()
    }

    /// Report a finding at the source range of `node`
    pub fn diagnose(&self, severity: Severity, message: impl AsRef<str>, node: NodeId) {
        self.diagnose_range(severity, message, self.tree.range(node));
    }

    pub fn diagnose_range(
        &self,
        severity: Severity,
        message: impl AsRef<str>,
        range: Option<TextRange>,
    ) {
        let location = self.context.location(range);
        self.context
            .emit_for_rule(self.rule, severity, message.as_ref(), location);
    }
}

/// What a file callback sees
pub struct FileCx<'a> {
    context: &'a Context,
    rule: &'static str,
}

impl<'a> FileCx<'a> {
    pub(crate) fn new(context: &'a Context, rule: &'static str) -> Self {
        Self { context, rule }
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    pub fn configuration(&self) -> &'a Configuration {
        self.context.configuration()
    }

    /// Report a finding at a byte range of the text this rule received
    pub fn diagnose(&self, severity: Severity, message: impl AsRef<str>, range: Option<TextRange>) {
        let location = self.context.location(range);
        self.context
            .emit_for_rule(self.rule, severity, message.as_ref(), location);
    }

    /// Report a finding at a 1-based line and column
    pub fn diagnose_at(&self, severity: Severity, message: impl AsRef<str>, line: usize, column: usize) {
        let location = Location::new(self.context.file().to_path_buf(), line, column);
        self.context
            .emit_for_rule(self.rule, severity, message.as_ref(), location);
    }
}
