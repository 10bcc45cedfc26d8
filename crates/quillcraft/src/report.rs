//! Reports of document warnings, built with ariadne.

use quill::diag::Catalog;
use quill::error::Error;
use std::io::IsTerminal;
use std::ops::Range;

/// Character offset of the start of each line of the source.
pub struct LineStarts(Vec<usize>);

impl LineStarts {
    pub fn new(source: &str) -> LineStarts {
        let mut starts = vec![0];
        let mut offset = 0;
        for line in source.split_inclusive('\n') {
            offset += line.chars().count();
            starts.push(offset);
        }
        LineStarts(starts)
    }

    /// Returns the character span of the warning in the whole source.
    ///
    /// Warnings without columns span their whole line.
    pub fn span(&self, source: &str, warning: &Error) -> Range<usize> {
        let line = (warning.source.line_number as usize).saturating_sub(1);
        let start = self.0.get(line).copied().unwrap_or(0);
        let line_len = source
            .lines()
            .nth(line)
            .map(|l| l.chars().count())
            .unwrap_or(0);
        match &warning.columns {
            Some(columns) => start + columns.start.min(line_len)..start + columns.end.min(line_len),
            None => start..start + line_len,
        }
    }
}

/// Builds the ariadne report of a warning.
pub fn build<'a>(
    warning: &Error,
    catalog: &dyn Catalog,
    file_name: &'a str,
    span: Range<usize>,
    color: bool,
) -> ariadne::Report<'static, (&'a str, Range<usize>)> {
    let mut report = ariadne::Report::build(ariadne::ReportKind::Warning, (file_name, span.clone()))
        .with_config(ariadne::Config::default().with_color(color))
        .with_message(warning.title(catalog));
    report = report.with_label(
        ariadne::Label::new((file_name, span))
            .with_message(format!["`{}`", warning.detail])
            .with_color(ariadne::Color::BrightYellow),
    );
    for note in &warning.notes {
        report = report.with_note(note);
    }
    report.finish()
}

/// Writes the reports of every warning to standard error.
///
/// Reports are colored only when standard error is a terminal.
pub fn eprint_all(
    warnings: &[Error],
    catalog: &dyn Catalog,
    file_name: &str,
    source: &str,
) -> Result<(), String> {
    let starts = LineStarts::new(source);
    let cache: (&str, _) = (file_name, ariadne::Source::from(source.to_string()));
    let color = std::io::stderr().is_terminal();
    for warning in warnings {
        let span = starts.span(source, warning);
        build(warning, catalog, file_name, span, color)
            .eprint(cache.clone())
            .map_err(|err| format!["Failed to write report: {err}"])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill::error::Kind;
    use quill::source::Source;

    #[test]
    fn span_with_columns() {
        let source = "first\nab[bogus]cd\n";
        let warning = Error::new(Kind::InvalidCommand, Source::new(0, 2), "[bogus]").with_columns(2..9);
        let span = LineStarts::new(source).span(source, &warning);
        assert_eq!(span, 8..15);
        let chars: Vec<char> = source.chars().collect();
        assert_eq!(chars[span].iter().collect::<String>(), "[bogus]");
    }

    #[test]
    fn span_without_columns() {
        let source = "é\nline two";
        let warning = Error::new(Kind::UnterminatedBlockComment, Source::new(0, 2), "");
        assert_eq!(LineStarts::new(source).span(source, &warning), 2..10);
    }

    #[test]
    fn report_without_color() {
        let source = "ab[bogus]cd\n";
        let warning = Error::new(Kind::InvalidCommand, Source::new(0, 1), "[bogus]")
            .with_columns(2..9)
            .with_note("check the spelling");
        let catalog = quill::diag::DefaultCatalog;
        let span = LineStarts::new(source).span(source, &warning);
        let mut buffer = Vec::new();
        build(&warning, &catalog, "doc.ql", span, false)
            .write(("doc.ql", ariadne::Source::from(source.to_string())), &mut buffer)
            .unwrap();
        let report = String::from_utf8(buffer).unwrap();
        assert!(report.contains("invalid command"));
        assert!(report.contains("`[bogus]`"));
        assert!(report.contains("check the spelling"));
        assert!(!report.contains('\u{1b}'));
    }
}
