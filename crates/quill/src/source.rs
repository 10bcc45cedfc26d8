//! Source locations.
//!
//! Every token and every diagnostic carries a [Source]: the number of the file it came
//!     from and the line within that file.
//! File numbers are assigned by a [FileTable] so that diagnostics can name the file.

use std::fmt;
use std::path::{Path, PathBuf};

/// A `(file number, line number)` pair.
///
/// Line numbers start at 1.
/// Two sources are equal if and only if both fields are equal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    pub file_number: u32,
    pub line_number: u32,
}

impl Source {
    pub fn new(file_number: u32, line_number: u32) -> Source {
        Source {
            file_number,
            line_number,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {}, line {}", self.file_number, self.line_number)
    }
}

/// Table of the files in a compilation.
///
/// The file number of a path is its index in the table.
#[derive(Debug, Default)]
pub struct FileTable {
    paths: Vec<PathBuf>,
}

impl FileTable {
    /// Registers a file and returns its file number.
    ///
    /// Registering the same path twice returns the original number.
    pub fn register<P: AsRef<Path>>(&mut self, path: P) -> u32 {
        let path = path.as_ref();
        if let Some(i) = self.paths.iter().position(|p| p == path) {
            return i as u32;
        }
        self.paths.push(path.to_path_buf());
        (self.paths.len() - 1) as u32
    }

    /// Returns the path of the file with the provided number.
    pub fn path(&self, file_number: u32) -> Option<&Path> {
        self.paths.get(file_number as usize).map(PathBuf::as_path)
    }

    /// Returns a human readable description of a source, using the file name if known.
    pub fn describe(&self, source: Source) -> String {
        match self.path(source.file_number) {
            None => source.to_string(),
            Some(path) => format!["{}:{}", path.display(), source.line_number],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_both_fields() {
        assert_eq!(Source::new(1, 2), Source::new(1, 2));
        assert_ne!(Source::new(1, 2), Source::new(2, 2));
        assert_ne!(Source::new(1, 2), Source::new(1, 3));
    }

    #[test]
    fn file_table_reuses_numbers() {
        let mut table = FileTable::default();
        assert_eq!(table.register("a.qd"), 0);
        assert_eq!(table.register("b.qd"), 1);
        assert_eq!(table.register("a.qd"), 0);
        assert_eq!(table.describe(Source::new(1, 7)), "b.qd:7");
        assert_eq!(table.describe(Source::new(5, 7)), "file 5, line 7");
    }
}
