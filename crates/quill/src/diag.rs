//! Diagnostics: the warning log and the message catalog.
//!
//! Document errors are recorded in a [Diagnostics] value in the order they occur.
//! Each recorded warning is also emitted as a `tracing` event with the file and line
//!     as structured fields, so a subscriber installed by the application sees them as they happen.
//!
//! Human readable text comes from a [Catalog].
//! A catalog lookup that fails falls back to the key itself,
//!     so a missing message never stops a compilation.

use crate::error;
use crate::source::Source;

/// Source of human readable messages.
pub trait Catalog {
    fn lookup(&self, key: &str) -> Option<&str>;
}

/// Returns the message for the key, or the key itself if the catalog doesn't have it.
pub fn message<'a>(catalog: &'a dyn Catalog, key: &'a str) -> &'a str {
    catalog.lookup(key).unwrap_or(key)
}

/// The built-in English catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCatalog;

impl Catalog for DefaultCatalog {
    fn lookup(&self, key: &str) -> Option<&str> {
        Some(match key {
            "error.invalid_command" => "invalid command",
            "error.invalid_command_parameter" => "invalid command parameter",
            "error.invalid_eol_treatment" => "invalid end-of-line treatment",
            "error.null_argument" => "a mandatory argument was not provided",
            "error.unresolved_replacement_root" => "alias refers to an unknown command",
            "error.command_not_allowed_in_code" => "command is not allowed in a code section",
            "error.attribute_frozen" => "attribute cannot change after output has begun",
            "error.unterminated_block_comment" => "document ends inside a block comment",
            "info.code_section_opened" => "code section opened",
            "info.code_section_closed" => "code section closed",
            "info.format_restored_at_bottom" => "no saved format to restore; using the defaults",
            _ => return None,
        })
    }
}

/// Log of the warnings and informational messages produced while compiling a document.
pub struct Diagnostics {
    warnings: Vec<error::Error>,
    infos: Vec<(Source, String)>,
    catalog: Box<dyn Catalog>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics::new(Box::new(DefaultCatalog))
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("warnings", &self.warnings)
            .field("infos", &self.infos)
            .finish_non_exhaustive()
    }
}

impl Diagnostics {
    pub fn new(catalog: Box<dyn Catalog>) -> Diagnostics {
        Diagnostics {
            warnings: vec![],
            infos: vec![],
            catalog,
        }
    }

    /// Records a warning.
    pub fn warn(&mut self, error: error::Error) {
        tracing::warn!(
            file = error.source.file_number,
            line = error.source.line_number,
            "{}",
            error.summary(self.catalog.as_ref())
        );
        self.warnings.push(error);
    }

    /// Records an informational message, given as a catalog key.
    pub fn info(&mut self, source: Source, key: &str) {
        let text = message(self.catalog.as_ref(), key).to_string();
        tracing::info!(
            file = source.file_number,
            line = source.line_number,
            "{text}"
        );
        self.infos.push((source, text));
    }

    pub fn warnings(&self) -> &[error::Error] {
        &self.warnings
    }

    pub fn infos(&self) -> &[(Source, String)] {
        &self.infos
    }

    pub fn take_warnings(&mut self) -> Vec<error::Error> {
        std::mem::take(&mut self.warnings)
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Moves all of the messages in the other diagnostics into this one.
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.warnings.append(&mut other.warnings);
        self.infos.append(&mut other.infos);
    }
}
