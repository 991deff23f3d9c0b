//! kiln rules
//!
//! Built-in lint and format rules. Rules are listed explicitly in
//! [`ALL_RULES`]; registration order is execution order for every node kind
//! two rules share.

pub mod builtin;

use kiln_core::{Capability, Context, Pipeline, Rule};

/// Static description of a built-in rule
#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    pub name: &'static str,
    pub capability: Capability,
    pub description: &'static str,
    pub build: fn(&Context) -> Rule,
}

impl std::fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .finish()
    }
}

/// Every built-in rule, in registration order
pub const ALL_RULES: &[RuleDescriptor] = &[
    RuleDescriptor {
        name: builtin::line_length_limit::NAME,
        capability: Capability::File,
        description: "Lines must not be wider than the configured line length",
        build: builtin::line_length_limit::rule,
    },
    RuleDescriptor {
        name: builtin::use_only_spaces::NAME,
        capability: Capability::File,
        description: "Lines must be indented with spaces when the indent unit is spaces",
        build: builtin::use_only_spaces::rule,
    },
    RuleDescriptor {
        name: builtin::maximum_blank_lines::NAME,
        capability: Capability::Format,
        description: "Collapse runs of blank lines to the configured maximum",
        build: builtin::maximum_blank_lines::rule,
    },
    RuleDescriptor {
        name: builtin::do_not_use_semicolons::NAME,
        capability: Capability::Format,
        description: "Statements are separated by line breaks, not semicolons",
        build: builtin::do_not_use_semicolons::rule,
    },
    RuleDescriptor {
        name: builtin::no_parens_around_conditions::NAME,
        capability: Capability::Format,
        description: "Conditions of if, guard, while, repeat and switch are not parenthesized",
        build: builtin::no_parens_around_conditions::rule,
    },
    RuleDescriptor {
        name: builtin::identifiers_must_be_ascii::NAME,
        capability: Capability::Lint,
        description: "Declared names use only ASCII characters",
        build: builtin::identifiers_must_be_ascii::rule,
    },
    RuleDescriptor {
        name: builtin::no_block_comments::NAME,
        capability: Capability::Lint,
        description: "Use line comments instead of block comments",
        build: builtin::no_block_comments::rule,
    },
];

/// Look up a built-in rule by name
pub fn find_rule(name: &str) -> Option<&'static RuleDescriptor> {
    ALL_RULES.iter().find(|descriptor| descriptor.name == name)
}

/// Register every rule the configuration leaves enabled
pub fn populate(pipeline: &mut Pipeline) {
    let rules: Vec<Rule> = ALL_RULES
        .iter()
        .filter(|descriptor| {
            let enabled = pipeline
                .context()
                .configuration()
                .is_rule_enabled(descriptor.name);
            if !enabled {
                tracing::debug!("Rule {} disabled by configuration", descriptor.name);
            }
            enabled
        })
        .map(|descriptor| (descriptor.build)(pipeline.context()))
        .collect();

    for rule in rules {
        pipeline.register(rule);
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{Configuration, RuleSeverity};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn pipeline(configuration: Configuration) -> Pipeline {
        Pipeline::new(Context::new(Arc::new(configuration), "test.swift", ""))
    }

    #[test]
    fn test_rule_names_are_unique() {
        let names: HashSet<_> = ALL_RULES.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), ALL_RULES.len());
    }

    #[test]
    fn test_descriptors_match_built_rules() {
        let context = Context::new(Arc::new(Configuration::default()), "test.swift", "");
        for descriptor in ALL_RULES {
            let rule = (descriptor.build)(&context);
            assert_eq!(rule.name(), descriptor.name);
            assert_eq!(rule.capability(), descriptor.capability);
        }
    }

    #[test]
    fn test_populate_registers_in_order() {
        let mut pipeline = pipeline(Configuration::default());
        populate(&mut pipeline);
        let expected: Vec<_> = ALL_RULES.iter().map(|d| d.name).collect();
        assert_eq!(pipeline.registered_rules(), expected.as_slice());
    }

    #[test]
    fn test_populate_skips_disabled_rules() {
        let mut configuration = Configuration::default();
        configuration.rules.insert(
            builtin::do_not_use_semicolons::NAME.to_string(),
            RuleSeverity::Off,
        );
        let mut pipeline = pipeline(configuration);
        populate(&mut pipeline);

        assert!(!pipeline
            .registered_rules()
            .contains(&builtin::do_not_use_semicolons::NAME));
        assert_eq!(pipeline.registered_rules().len(), ALL_RULES.len() - 1);
    }

    #[test]
    fn test_find_rule() {
        assert!(find_rule("NoBlockComments").is_some());
        assert!(find_rule("NoSuchRule").is_none());
    }
}
