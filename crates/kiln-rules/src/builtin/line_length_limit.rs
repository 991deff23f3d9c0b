//! Lines must fit in `lineLength` columns
//!
//! Width is display width: wide characters count two columns, combining
//! marks none, and a tab advances to the next multiple of `tabWidth`.

use kiln_core::{Context, FileCx, FileRule, Rule, Severity};
use unicode_width::UnicodeWidthChar;

pub const NAME: &str = "LineLengthLimit";

pub fn rule(context: &Context) -> Rule {
    let limit = context.configuration().line_length;
    let tab_width = context.configuration().tab_width;
    FileRule::new(NAME, move |cx, text| {
        check(cx, text, limit, tab_width);
        None
    })
    .into()
}

fn check(cx: &FileCx<'_>, text: &str, limit: usize, tab_width: usize) {
    for (index, line) in text.lines().enumerate() {
        let mut width = 0;
        let mut overflow = None;
        for (column, c) in line.chars().enumerate() {
            width += char_width(c, width, tab_width);
            if width > limit && overflow.is_none() {
                overflow = Some(column + 1);
            }
        }
        if let Some(column) = overflow {
            cx.diagnose_at(
                Severity::Warning,
                format!("line is {width} columns wide, the limit is {limit}"),
                index + 1,
                column,
            );
        }
    }
}

fn char_width(c: char, column: usize, tab_width: usize) -> usize {
    if c == '\t' {
        tab_width - column % tab_width
    } else {
        c.width().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::run_with;
    use kiln_core::{Configuration, Mode};

    fn findings(source: &str, line_length: usize) -> Vec<(usize, usize, String)> {
        let configuration = Configuration {
            line_length,
            tab_width: 4,
            ..Configuration::default()
        };
        run_with(configuration, rule, source, Mode::Lint)
            .1
            .into_iter()
            .map(|d| (d.location.line, d.location.column, d.message))
            .collect()
    }

    #[test]
    fn test_reports_long_lines() {
        assert_eq!(
            findings("let a = 1\nlet abcdef = 1\n", 10),
            vec![(
                2,
                11,
                "[LineLengthLimit]: line is 14 columns wide, the limit is 10".to_string()
            )]
        );
    }

    #[test]
    fn test_exact_fit_passes() {
        assert!(findings("0123456789\n", 10).is_empty());
    }

    #[test]
    fn test_wide_characters_and_tabs() {
        // five double-width characters
        assert_eq!(findings("let s = \"日本語日本\"\n", 16).len(), 1);
        assert!(findings("let s = \"日本語日本\"\n", 20).is_empty());
        // tab stops at 4: "\ta" is five columns
        assert_eq!(findings("\ta\n", 4).len(), 1);
        assert!(findings("\ta\n", 5).is_empty());
    }
}
