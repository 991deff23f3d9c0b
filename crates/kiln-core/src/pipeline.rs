//! Pass registry and tree traversal
//!
//! Rules register callbacks per [`SyntaxKind`]. Execution order for a kind is
//! registration order. [`Pipeline::run`] walks the tree once:
//!
//! - [`Mode::Lint`]: pre-order. A node's callbacks fire before its children
//!   are visited. Format rules run too, so they can report, but whatever
//!   they allocate is thrown away and the input tree comes back unchanged.
//! - [`Mode::Format`]: post-order. Children are rewritten first, the node is
//!   rebuilt from them, then its format callbacks run as a chain, each one
//!   consuming the previous one's result. Lint rules do not run.

use std::fmt;
use std::rc::Rc;

use biome_text_size::TextRange;
use indexmap::IndexMap;

use crate::config::Configuration;
use crate::context::Context;
use crate::diagnostics::Severity;
use crate::rule::{FileCx, FileRule, FormatFn, LintCx, LintFn, Rule};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// Traversal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Lint,
    Format,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Lint => "lint",
            Mode::Format => "format",
        })
    }
}

enum Callback {
    Lint(Rc<LintFn>),
    Format(Rc<FormatFn>),
}

struct Pass {
    rule: &'static str,
    callback: Callback,
}

type PassTable = IndexMap<SyntaxKind, Vec<Pass>>;

/// Registered rules for one file
pub struct Pipeline {
    context: Context,
    passes: PassTable,
    file_rules: Vec<FileRule>,
    registered: Vec<&'static str>,
}

impl Pipeline {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            passes: IndexMap::new(),
            file_rules: Vec::new(),
            registered: Vec::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn into_context(self) -> Context {
        self.context
    }

    /// Names of registered rules, in registration order
    pub fn registered_rules(&self) -> &[&'static str] {
        &self.registered
    }

    /// Bind a rule's callbacks to their kinds. File rules are routed to
    /// [`Pipeline::register_file_rule`].
    pub fn register(&mut self, rule: Rule) {
        let name = rule.name();
        tracing::debug!("Registering {} rule {}", rule.capability(), name);
        match rule {
            Rule::Lint(rule) => {
                self.registered.push(name);
                for binding in rule.bindings {
                    for kind in binding.kinds {
                        self.passes.entry(kind).or_default().push(Pass {
                            rule: name,
                            callback: Callback::Lint(Rc::clone(&binding.callback)),
                        });
                    }
                }
            }
            Rule::Format(rule) => {
                self.registered.push(name);
                for binding in rule.bindings {
                    for kind in binding.kinds {
                        self.passes.entry(kind).or_default().push(Pass {
                            rule: name,
                            callback: Callback::Format(Rc::clone(&binding.callback)),
                        });
                    }
                }
            }
            Rule::File(rule) => self.register_file_rule(rule),
        }
    }

    pub fn register_file_rule(&mut self, rule: FileRule) {
        self.registered.push(rule.name());
        self.file_rules.push(rule);
    }

    /// Rule names bound to `kind`, in execution order
    pub fn rules_for(&self, kind: SyntaxKind) -> Vec<&'static str> {
        self.passes
            .get(&kind)
            .map(|passes| passes.iter().map(|pass| pass.rule).collect())
            .unwrap_or_default()
    }

    /// Thread the text through every file rule in registration order
    ///
    /// The context's line index follows the text, so each rule reports
    /// positions in the revision it was given.
    pub fn run_file_rules(&mut self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.file_rules {
            tracing::trace!("file rule {}", rule.name());
            let cx = FileCx::new(&self.context, rule.name());
            if let Some(replacement) = (rule.callback)(&cx, &current)
                && replacement != current
            {
                current = replacement;
                self.context.reindex(&current);
            }
        }
        current
    }

    /// Run every tree rule over `tree`
    pub fn run(&self, mut tree: SyntaxTree, mode: Mode) -> SyntaxTree {
        tracing::debug!("{} pass over {}", mode, self.context.file().display());
        match mode {
            Mode::Lint => {
                self.lint(&mut tree);
                tree
            }
            Mode::Format => {
                let root = tree.root();
                let mut rewriter = Rewriter::new(&mut tree, &self.context, Some(&self.passes));
                let root = rewriter.visit(root);
                tree.set_root(root);
                tree.compact()
            }
        }
    }

    fn lint(&self, tree: &mut SyntaxTree) {
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            if let Some(passes) = self.passes.get(&tree.kind(node)) {
                for pass in passes {
                    match &pass.callback {
                        Callback::Lint(callback) => {
                            let cx = LintCx::new(tree, &self.context, pass.rule);
                            callback(&cx, node);
                        }
                        Callback::Format(callback) => {
                            let mark = tree.node_count();
                            let mut rewriter = Rewriter::new(tree, &self.context, None);
                            rewriter.rule = pass.rule;
                            rewriter.in_flight = Some(node);
                            callback(&mut rewriter, node);
                            tree.truncate(mark);
                        }
                    }
                }
            }
            stack.extend(tree.children(node).iter().rev().copied());
        }
    }
}

/// Mutable view of the tree handed to format callbacks
///
/// Owns the traversal state: the node whose callbacks are running is "in
/// flight", and a nested [`Rewriter::visit`] of that exact node only recurses
/// into its children instead of dispatching to callbacks again.
pub struct Rewriter<'a> {
    tree: &'a mut SyntaxTree,
    context: &'a Context,
    passes: Option<&'a PassTable>,
    in_flight: Option<NodeId>,
    rule: &'static str,
}

impl<'a> Rewriter<'a> {
    fn new(tree: &'a mut SyntaxTree, context: &'a Context, passes: Option<&'a PassTable>) -> Self {
        Self {
            tree,
            context,
            passes,
            in_flight: None,
            rule: "",
        }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SyntaxTree {
        &mut *self.tree
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    pub fn configuration(&self) -> &'a Configuration {
        self.context.configuration()
    }

    /// Name of the rule whose callback is running
    pub fn rule(&self) -> &'static str {
        self.rule
    }

    /// Rewrite `node`: children first, then the callbacks for its kind
    pub fn visit(&mut self, node: NodeId) -> NodeId {
        if self.in_flight == Some(node) {
            tracing::trace!("re-entrant visit of {}, recursing structurally", node);
            return self.visit_children(node);
        }
        let Some(passes) = self.passes else {
            return self.visit_children(node);
        };

        let kind = self.tree.kind(node);
        let mut current = self.visit_children(node);
        let Some(chain) = passes.get(&kind) else {
            return current;
        };

        for pass in chain {
            let Callback::Format(callback) = &pass.callback else {
                continue;
            };
            let saved_flight = self.in_flight.replace(current);
            let saved_rule = std::mem::replace(&mut self.rule, pass.rule);
            current = callback(self, current);
            self.in_flight = saved_flight;
            self.rule = saved_rule;
        }
        current
    }

    /// Rebuild `node` from its visited children; no callbacks for `node`
    pub fn visit_children(&mut self, node: NodeId) -> NodeId {
        if self.tree.is_leaf(node) {
            return node;
        }
        let children = self.tree.children(node).to_vec();
        let rewritten: Vec<NodeId> = children.into_iter().map(|child| self.visit(child)).collect();
        self.tree.replace_children(node, rewritten)
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
