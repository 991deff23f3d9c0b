//! Built-in rules
//!
//! Each module exposes its rule name as `NAME` and a `rule` constructor that
//! reads whatever it needs from the file's [`Context`](kiln_core::Context).

pub mod do_not_use_semicolons;
pub mod identifiers_must_be_ascii;
pub mod line_length_limit;
pub mod maximum_blank_lines;
pub mod no_block_comments;
pub mod no_parens_around_conditions;
pub mod use_only_spaces;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use kiln_core::{Configuration, Context, Diagnostic, Mode, Pipeline, Rule, parse};

    /// Run one rule over `source` and return the verbatim output and findings
    pub fn run_with(
        configuration: Configuration,
        build: fn(&Context) -> Rule,
        source: &str,
        mode: Mode,
    ) -> (String, Vec<Diagnostic>) {
        let context = Context::new(Arc::new(configuration), "test.swift", source);
        let rule = build(&context);
        let mut pipeline = Pipeline::new(context);
        pipeline.register(rule);

        let text = pipeline.run_file_rules(source);
        let tree = parse(&text).unwrap();
        let tree = pipeline.run(tree, mode);
        let diagnostics = pipeline.into_context().take_diagnostics();
        (tree.to_string(), diagnostics)
    }

    pub fn format(build: fn(&Context) -> Rule, source: &str) -> String {
        run_with(Configuration::default(), build, source, Mode::Format).0
    }

    pub fn lint(build: fn(&Context) -> Rule, source: &str) -> Vec<String> {
        run_with(Configuration::default(), build, source, Mode::Lint)
            .1
            .into_iter()
            .map(|diagnostic| diagnostic.message)
            .collect()
    }
}
