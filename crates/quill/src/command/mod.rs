//! Quill commands API
//!
//! A command is identified by its *root*: the fixed literal prefix of the command,
//!     like `[b]`, `[leading:` or `[font|face:`.
//! The root determines what comes after it:
//!
//! | command type  | example root   | example use            | tokens produced
//! |---------------|----------------|------------------------|----------------
//! | no parameter  | `[b]`          | `[b]`                  | one command token
//! | symbol        | `[copyright]`  | `[copyright]`          | one symbol token
//! | value         | `[leading:`    | `[leading:14pt]`       | one command token with a [Measure](crate::parse::Measure)
//! | string        | `[align:`      | `[align:center]`       | one command token with a string
//! | replacement   | `[ff:`         | `[ff:Arial]`           | the tokens of the canonical command
//!
//! Roots that contain a `|` belong to a *family*.
//! The family prefix, like `[font|`, allows several attributes to be set in one
//!     compound command: `[font|size:12pt|face:Arial]`.
//!
//! The parse-time registry of commands is the [Map].
//! It is distinct from the output-side [dispatch map](crate::dispatch::Map) that each backend builds.

use crate::options::Options;
use crate::source::Source;

pub mod family;
pub mod map;

pub use map::InvalidAttributes;
pub use map::InvalidRoot;
pub use map::Map;

/// The type of parameter a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamType {
    None,
    Value,
    String,
    Symbol,
}

impl ParamType {
    /// Returns the parameter type for its character in a command table.
    pub fn from_char(c: char) -> Option<ParamType> {
        match c {
            '0' => Some(ParamType::None),
            'v' => Some(ParamType::Value),
            's' => Some(ParamType::String),
            'y' => Some(ParamType::Symbol),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            ParamType::None => '0',
            ParamType::Value => 'v',
            ParamType::String => 's',
            ParamType::Symbol => 'y',
        }
    }
}

/// A Quill command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// A command without a parameter, like `[b]`.
    NoParam,
    /// A command that stands for a character, like `[copyright]`.
    Symbol,
    /// A command whose parameter is a measure, like `[leading:14pt]`.
    ValueParam,
    /// A command whose parameter is a string, like `[align:center]`.
    StringParam,
    /// An alias for another command in the same map.
    ///
    /// The canonical command is referenced by its root and looked up when the alias is used,
    ///     so an alias can be registered before its canonical command.
    Replacement {
        replacement_root: String,
        param_type: ParamType,
    },
}

impl Command {
    pub fn param_type(&self) -> ParamType {
        match self {
            Command::NoParam => ParamType::None,
            Command::Symbol => ParamType::Symbol,
            Command::ValueParam => ParamType::Value,
            Command::StringParam => ParamType::String,
            Command::Replacement { param_type, .. } => *param_type,
        }
    }
}

/// A command together with its root and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Descriptor {
    root: String,
    command: Command,
    allowed_in_code: bool,
    doc: Option<String>,
}

impl Descriptor {
    fn new<T: Into<String>>(root: T, command: Command) -> Descriptor {
        Descriptor {
            root: root.into(),
            command,
            allowed_in_code: false,
            doc: None,
        }
    }

    /// Create a new command without a parameter. The root must end with `]`.
    pub fn new_no_param<T: Into<String>>(root: T) -> Descriptor {
        Descriptor::new(root, Command::NoParam)
    }

    /// Create a new symbol command. The root must end with `]`.
    pub fn new_symbol<T: Into<String>>(root: T) -> Descriptor {
        Descriptor::new(root, Command::Symbol)
    }

    /// Create a new value command. The root must end with `:`.
    pub fn new_value<T: Into<String>>(root: T) -> Descriptor {
        Descriptor::new(root, Command::ValueParam)
    }

    /// Create a new string command. The root must end with `:`.
    pub fn new_string<T: Into<String>>(root: T) -> Descriptor {
        Descriptor::new(root, Command::StringParam)
    }

    /// Create a new alias for the command with the replacement root.
    pub fn new_alias<T: Into<String>, R: Into<String>>(
        root: T,
        replacement_root: R,
        param_type: ParamType,
    ) -> Descriptor {
        Descriptor::new(
            root,
            Command::Replacement {
                replacement_root: replacement_root.into(),
                param_type,
            },
        )
    }

    /// Set whether the command is honored inside code sections.
    ///
    /// Commands are not allowed in code sections unless this is set.
    pub fn with_allowed_in_code(mut self, allowed_in_code: bool) -> Descriptor {
        self.allowed_in_code = allowed_in_code;
        self
    }

    /// Set the documentation for this command.
    pub fn with_doc<T: Into<String>>(mut self, doc: T) -> Descriptor {
        self.doc = Some(doc.into());
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn param_type(&self) -> ParamType {
        self.command.param_type()
    }

    pub fn allowed_in_code(&self) -> bool {
        self.allowed_in_code
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub(crate) fn set_root(&mut self, root: String) {
        self.root = root;
    }
}

/// A cursor into a buffer of characters, positioned at the start of a command.
///
/// A context never outlives the characters it parses.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub source: Source,
    pub chars: &'a [char],
    pub start: usize,
    pub map: &'a Map,
    pub options: &'a Options,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        source: Source,
        chars: &'a [char],
        start: usize,
        map: &'a Map,
        options: &'a Options,
    ) -> ParseContext<'a> {
        ParseContext {
            source,
            chars,
            start,
            map,
            options,
        }
    }

    /// Returns the same context over different characters.
    pub fn with_chars<'b>(&self, chars: &'b [char]) -> ParseContext<'b>
    where
        'a: 'b,
    {
        ParseContext {
            source: self.source,
            chars,
            start: self.start,
            map: self.map,
            options: self.options,
        }
    }

    /// The characters from `start` to `start + len`, as a string.
    pub fn text(&self, len: usize) -> String {
        let end = (self.start + len).min(self.chars.len());
        self.chars[self.start.min(end)..end].iter().collect()
    }
}
