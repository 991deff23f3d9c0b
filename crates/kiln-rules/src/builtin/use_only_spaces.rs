//! Indent with spaces when the indent unit is spaces

use kiln_core::{Context, FileRule, Indent, Rule, Severity};

pub const NAME: &str = "UseOnlySpaces";

pub fn rule(context: &Context) -> Rule {
    let uses_spaces = matches!(context.configuration().indentation, Indent::Spaces(_));
    FileRule::new(NAME, move |cx, text| {
        if !uses_spaces {
            return None;
        }
        for (index, line) in text.lines().enumerate() {
            let indentation = line.len() - line.trim_start_matches([' ', '\t']).len();
            if let Some(column) = line[..indentation].find('\t') {
                cx.diagnose_at(
                    Severity::Warning,
                    "use spaces for indentation",
                    index + 1,
                    column + 1,
                );
            }
        }
        None
    })
    .into()
}
