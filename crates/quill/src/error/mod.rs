//! Error handling
//!
//! Errors in Quill documents are never fatal.
//! Parse errors are recovered by the tokenizer, which re-emits the offending span as text,
//!     and errors in output commands are recovered by the dispatch engine, which leaves the
//!     document state unchanged.
//! In both cases the [Error] is recorded as a warning in the
//!     [diagnostics](crate::diag::Diagnostics).
//!
//! The only unrecoverable errors are precondition violations in the Rust code using Quill.
//! These panic via [null_argument].

use crate::diag;
use crate::source::{FileTable, Source};
use quill_stdext::color::Colorize;
use std::fmt;
use std::ops::Range;

/// The kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// The command root is not registered.
    InvalidCommand,
    /// The parameter of a command is malformed or out of range.
    InvalidCommandParameter,
    /// The parameter of an end-of-line treatment command is not a known treatment.
    InvalidEolTreatment,
    /// A mandatory argument was not provided by the Rust caller.
    NullArgument,
    /// An alias command points at a command that is not registered.
    UnresolvedReplacementRoot,
    /// The command is not allowed inside a code section.
    CommandNotAllowedInCode,
    /// The attribute cannot change once output has begun.
    AttributeFrozen,
    /// The document ended inside a block comment.
    UnterminatedBlockComment,
}

impl Kind {
    /// Key of the human readable title of this kind in the message catalog.
    pub fn catalog_key(&self) -> &'static str {
        match self {
            Kind::InvalidCommand => "error.invalid_command",
            Kind::InvalidCommandParameter => "error.invalid_command_parameter",
            Kind::InvalidEolTreatment => "error.invalid_eol_treatment",
            Kind::NullArgument => "error.null_argument",
            Kind::UnresolvedReplacementRoot => "error.unresolved_replacement_root",
            Kind::CommandNotAllowedInCode => "error.command_not_allowed_in_code",
            Kind::AttributeFrozen => "error.attribute_frozen",
            Kind::UnterminatedBlockComment => "error.unterminated_block_comment",
        }
    }
}

/// An error in a Quill document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error {
    pub kind: Kind,
    pub source: Source,
    /// The offending text or value.
    pub detail: String,
    pub notes: Vec<String>,
    /// Character columns of the offending text within its line, if known.
    pub columns: Option<Range<usize>>,
}

impl Error {
    pub fn new<T: Into<String>>(kind: Kind, source: Source, detail: T) -> Error {
        Error {
            kind,
            source,
            detail: detail.into(),
            notes: vec![],
            columns: None,
        }
    }

    pub fn with_note<T: Into<String>>(mut self, note: T) -> Error {
        self.notes.push(note.into());
        self
    }

    pub fn with_columns(mut self, columns: Range<usize>) -> Error {
        self.columns = Some(columns);
        self
    }

    /// The human readable title of the error, looked up in the catalog.
    pub fn title<'a>(&self, catalog: &'a dyn diag::Catalog) -> &'a str {
        diag::message(catalog, self.kind.catalog_key())
    }

    /// Single line description, used in log messages.
    pub fn summary(&self, catalog: &dyn diag::Catalog) -> String {
        if self.detail.is_empty() {
            self.title(catalog).to_string()
        } else {
            format!["{}: {}", self.title(catalog), self.detail]
        }
    }

    /// Multi-line description for terminal output.
    pub fn render(&self, catalog: &dyn diag::Catalog, files: Option<&FileTable>) -> String {
        let location = match files {
            None => self.source.to_string(),
            Some(files) => files.describe(self.source),
        };
        let mut s = format![
            "{} {}: {}",
            "warning:".bright_yellow().bold(),
            location,
            self.summary(catalog).as_str().bold(),
        ];
        for note in &self.notes {
            s.push_str(&format!["\n  {} {note}", "=".bright_blue()]);
        }
        s
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.summary(&diag::DefaultCatalog))
    }
}

impl std::error::Error for Error {}

/// Panics because a mandatory argument was not provided.
///
/// This is a bug in the calling Rust code, not an error in the document.
#[track_caller]
pub fn null_argument(what: &str) -> ! {
    panic![
        "{}: {what}",
        diag::message(&diag::DefaultCatalog, Kind::NullArgument.catalog_key())
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_source_and_detail() {
        let err = Error::new(Kind::InvalidCommand, Source::new(2, 14), "[bogus:]");
        let s = err.to_string();
        assert!(s.starts_with("file 2, line 14: "), "{s}");
        assert!(s.ends_with("[bogus:]"), "{s}");
    }

    #[test]
    fn every_kind_has_a_catalog_entry() {
        use diag::Catalog;
        for kind in [
            Kind::InvalidCommand,
            Kind::InvalidCommandParameter,
            Kind::InvalidEolTreatment,
            Kind::NullArgument,
            Kind::UnresolvedReplacementRoot,
            Kind::CommandNotAllowedInCode,
            Kind::AttributeFrozen,
            Kind::UnterminatedBlockComment,
        ] {
            assert!(diag::DefaultCatalog.lookup(kind.catalog_key()).is_some());
        }
    }

    #[test]
    #[should_panic(expected = "dispatch input")]
    fn null_argument_panics() {
        null_argument("dispatch input");
    }
}
