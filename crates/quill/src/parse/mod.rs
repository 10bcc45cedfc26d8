//! Parsing command parameters.
//!
//! Commands take one of two kinds of parameters:
//!     a [measure](measure::Measure) like `12pt`,
//!     or a [string](string::parse_string) like `Arial` or `{Times [Bold]}`.

pub mod measure;
pub mod string;

pub use measure::Conversion;
pub use measure::Measure;
pub use measure::Unit;

/// The parameter carried by a token.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandParameter {
    #[default]
    None,
    Measure(Measure),
    String(String),
}

impl CommandParameter {
    pub fn measure(&self) -> Option<Measure> {
        match self {
            CommandParameter::Measure(m) => Some(*m),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<&str> {
        match self {
            CommandParameter::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandParameter::None => Ok(()),
            CommandParameter::Measure(m) => write!(f, "{m}"),
            CommandParameter::String(s) => write!(f, "{s}"),
        }
    }
}
