//! Compilation options.

/// Options that control tokenization and dispatch.
///
/// With the `serde` feature enabled the options can be read from a configuration file.
/// Missing fields take their default values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Whether the literal text of an alias command is emitted as a
    ///     [ReplacedCommand](crate::token::TokenType::ReplacedCommand) token
    ///     before the tokens of its canonical command.
    ///
    /// Listing backends use this to show the document as it was written.
    pub emit_replaced_commands: bool,

    /// Resolution used to convert `px` measures to points.
    pub pixels_per_inch: f32,

    /// Root of the command that opens a code section.
    pub code_open_root: String,

    /// Root of the command that closes a code section.
    pub code_close_root: String,

    /// File number assigned to tokens when the caller doesn't provide one.
    pub file_number: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            emit_replaced_commands: false,
            pixels_per_inch: 96.0,
            code_open_root: "[code]".into(),
            code_close_root: "[/code]".into(),
            file_number: 0,
        }
    }
}
