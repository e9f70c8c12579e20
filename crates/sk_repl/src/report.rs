use std::io;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use sk_interpreter::Error;

/// Render `error` to stderr, pointing into `source` (named `name` in the report).
pub fn report_error(name: &str, source: &str, error: &Error) -> io::Result<()> {
    let diagnostic = error.diagnostic();

    let span = match error.span() {
        Some(span) => span,
        None => {
            eprintln!("Error: {}", diagnostic.message);
            return Ok(());
        }
    };

    let range = char_range(source, span.range());
    let mut report = Report::build(ReportKind::Error, (name, range.clone()))
        .with_message(format!("{} error", diagnostic.category))
        .with_label(
            Label::new((name, range))
                .with_message(&diagnostic.message)
                .with_color(Color::Red),
        );

    if !diagnostic.expected.is_empty() {
        report = report.with_note(format!(
            "expected one of: {}",
            diagnostic.expected.join(", ")
        ));
    }

    report.finish().eprint((name, Source::from(source)))
}

/// Reports index by character, spans by byte.
fn char_range(source: &str, bytes: Range<usize>) -> Range<usize> {
    let to_char = |offset: usize| match source.get(..offset) {
        Some(prefix) => prefix.chars().count(),
        None => source.chars().count(),
    };

    to_char(bytes.start)..to_char(bytes.end)
}

#[cfg(test)]
mod tests {
    use crate::report::char_range;

    #[test]
    fn char_ranges() {
        assert_eq!(char_range("x = 1", 4..5), 4..5);
        assert_eq!(char_range("s = 'é' + 1", 9..10), 8..9);
        assert_eq!(char_range("s = 'é' + 1", 11..12), 10..11);
        assert_eq!(char_range("abc", 3..3), 3..3);
        assert_eq!(char_range("abc", 2..10), 2..3);
    }
}
