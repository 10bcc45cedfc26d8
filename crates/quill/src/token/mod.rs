//! Quill tokens.
//!
//! The tokenizer turns source code into a [TokenList].
//! The list is append-only while it is being built and read-only while it is dispatched.

use crate::parse::CommandParameter;
use crate::source::Source;

/// The type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenType {
    /// Literal text.
    Text,
    /// A command, like `[leading:12pt]`.
    Command,
    /// A command that stands for a character, like `[copyright]`.
    Symbol,
    /// The full text of a compound command like `[font|size:12pt|face:Arial]`.
    ///
    /// It is followed by one [Command](TokenType::Command) token per attribute
    ///     and then a [CompoundCommandEnd](TokenType::CompoundCommandEnd) token.
    CompoundCommand,
    /// Marks the end of a compound command.
    CompoundCommandEnd,
    /// The literal text of an alias command, before it was replaced by its canonical command.
    ReplacedCommand,
    /// The end of a source line.
    EndOfLine,
}

/// A Quill token.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    source: Source,
    token_type: TokenType,
    root: String,
    content: String,
    parameter: CommandParameter,
}

impl Token {
    pub fn new_text<T: Into<String>>(source: Source, content: T) -> Token {
        Token {
            source,
            token_type: TokenType::Text,
            root: String::new(),
            content: content.into(),
            parameter: CommandParameter::None,
        }
    }

    pub fn new_command<R: Into<String>, C: Into<String>>(
        source: Source,
        root: R,
        content: C,
        parameter: CommandParameter,
    ) -> Token {
        Token {
            source,
            token_type: TokenType::Command,
            root: root.into(),
            content: content.into(),
            parameter,
        }
    }

    pub fn new_symbol<R: Into<String>>(source: Source, root: R) -> Token {
        let root = root.into();
        Token {
            source,
            token_type: TokenType::Symbol,
            content: root.clone(),
            root,
            parameter: CommandParameter::None,
        }
    }

    pub fn new_compound_command<R: Into<String>, C: Into<String>>(
        source: Source,
        family: R,
        content: C,
    ) -> Token {
        Token {
            source,
            token_type: TokenType::CompoundCommand,
            root: family.into(),
            content: content.into(),
            parameter: CommandParameter::None,
        }
    }

    pub fn new_compound_command_end<R: Into<String>>(source: Source, family: R) -> Token {
        Token {
            source,
            token_type: TokenType::CompoundCommandEnd,
            root: family.into(),
            content: String::new(),
            parameter: CommandParameter::None,
        }
    }

    pub fn new_replaced_command<R: Into<String>, C: Into<String>>(
        source: Source,
        alias_root: R,
        content: C,
    ) -> Token {
        Token {
            source,
            token_type: TokenType::ReplacedCommand,
            root: alias_root.into(),
            content: content.into(),
            parameter: CommandParameter::None,
        }
    }

    pub fn new_end_of_line(source: Source) -> Token {
        Token {
            source,
            token_type: TokenType::EndOfLine,
            root: String::new(),
            content: String::new(),
            parameter: CommandParameter::None,
        }
    }

    #[inline]
    pub fn source(&self) -> Source {
        self.source
    }

    #[inline]
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The command root, like `[font|face:`. Empty for text tokens.
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The source text of the token.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    pub fn parameter(&self) -> &CommandParameter {
        &self.parameter
    }

    /// Rewrites the content to the spelling the author used.
    ///
    /// This is used when an alias command has been processed as its canonical command:
    ///     the token keeps the canonical root but shows the original text.
    pub(crate) fn restore_original_spelling(&mut self, original: String) {
        self.content = original;
    }
}

/// Append-only list of tokens.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn extend<I: IntoIterator<Item = Token>>(&mut self, tokens: I) {
        self.tokens.extend(tokens);
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.tokens.get_mut(index)
    }

}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl IntoIterator for TokenList {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Text => write!(f, "text {:?}", self.content),
            TokenType::Command => match &self.parameter {
                CommandParameter::None => write!(f, "command {}", self.root),
                parameter => write!(f, "command {}{}", self.root, parameter),
            },
            TokenType::Symbol => write!(f, "symbol {}", self.root),
            TokenType::CompoundCommand => write!(f, "compound command {}", self.content),
            TokenType::CompoundCommandEnd => write!(f, "end of compound command {}", self.root),
            TokenType::ReplacedCommand => write!(f, "replaced command {}", self.content),
            TokenType::EndOfLine => write!(f, "end of line"),
        }
    }
}
