//! The output dispatch engine.
//!
//! The [Engine] walks a [TokenList] in order.
//! For each command token it looks up the token's root in the backend's [Map] and invokes
//!     the handler against the backend's document state.
//! Text, end-of-line and replaced command tokens, and commands the backend doesn't define,
//!     are passed to the backend's [Handlers].
//!
//! A handler returns the number of *following* tokens it consumed.
//! Most handlers return 0;
//!     handlers for multi-token constructs like compound commands return more
//!     so that the engine skips the tokens they have already processed.
//!
//! Errors returned by handlers are never fatal.
//! The engine records them as warnings and continues with the next token.
//! A handler must therefore validate its parameter before changing any state,
//!     so that a rejected command leaves the document state unchanged.

use crate::diag::Diagnostics;
use crate::error::Error;
use crate::format::{Attribute, FormatStack};
use crate::parse::Conversion;
use crate::source::Source;
use crate::token::{Token, TokenList, TokenType};

mod map;

pub use map::Map;

/// The Rust type of output-side command handlers.
///
/// The returned value is the number of tokens after the current one that the handler consumed.
pub type HandlerFn<S> = fn(token: &Token, input: &mut Input<'_, S>) -> Result<usize, Error>;

/// A command handler together with its documentation.
pub struct Handler<S> {
    func: HandlerFn<S>,
    doc: Option<&'static str>,
}

impl<S> Handler<S> {
    pub fn new(func: HandlerFn<S>) -> Handler<S> {
        Handler { func, doc: None }
    }

    /// Set the doc for this handler.
    pub fn with_doc(mut self, doc: &'static str) -> Handler<S> {
        self.doc = Some(doc);
        self
    }

    pub fn func(&self) -> HandlerFn<S> {
        self.func
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }
}

impl<S> Clone for Handler<S> {
    fn clone(&self) -> Self {
        Handler {
            func: self.func,
            doc: self.doc,
        }
    }
}

impl<S> From<HandlerFn<S>> for Handler<S> {
    fn from(func: HandlerFn<S>) -> Self {
        Handler::new(func)
    }
}

/// Document state of a backend.
///
/// Every backend keeps a [FormatStack].
/// The other methods have defaults suitable for backends that don't need them.
pub trait State: Sized {
    fn formats(&self) -> &FormatStack;

    fn formats_mut(&mut self) -> &mut FormatStack;

    /// Whether the backend has begun writing output.
    ///
    /// Some attributes, like the page margins, cannot change after this point.
    fn is_output_open(&self) -> bool {
        false
    }

    /// Records where an attribute was last changed.
    fn mark_changed(&mut self, attribute: Attribute, source: Source) {
        _ = (attribute, source);
    }

    /// Returns where an attribute was last changed, if it has been.
    fn last_changed(&self, attribute: Attribute) -> Option<Source> {
        _ = attribute;
        None
    }

    /// Resolution used to convert `px` measures.
    fn pixels_per_inch(&self) -> f32 {
        96.0
    }

    /// Unit conversion built from the live format.
    ///
    /// This is computed on each call so that `li` measures follow the current leading.
    fn conversion(&self) -> Conversion {
        self.formats().current().conversion(self.pixels_per_inch())
    }

    /// Hook that is invoked before each command handler.
    fn pre_command_hook(token: &Token, input: &mut Input<Self>) -> Result<(), Error> {
        _ = (token, input);
        Ok(())
    }
}

/// Handlers for tokens that are not dispatched through the backend's [Map].
pub trait Handlers<S: State> {
    /// Handler for text tokens.
    fn text_handler(token: &Token, input: &mut Input<S>) -> Result<(), Error> {
        _ = (token, input);
        Ok(())
    }

    /// Handler for command tokens whose root is not in the backend's map.
    ///
    /// The default passes the command's text to the text handler.
    fn undefined_command_handler(token: &Token, input: &mut Input<S>) -> Result<(), Error> {
        Self::text_handler(&Token::new_text(token.source(), token.content()), input)
    }

    fn end_of_line_handler(token: &Token, input: &mut Input<S>) -> Result<(), Error> {
        _ = (token, input);
        Ok(())
    }

    /// Handler for the literal text of alias commands.
    fn replaced_command_handler(token: &Token, input: &mut Input<S>) -> Result<(), Error> {
        _ = (token, input);
        Ok(())
    }
}

pub struct DefaultHandlers;

impl<S: State> Handlers<S> for DefaultHandlers {}

/// The input to a handler: the document state, the token list and the diagnostics.
pub struct Input<'a, S> {
    state: &'a mut S,
    tokens: &'a [Token],
    index: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a, S> Input<'a, S> {
    pub fn new(
        state: &'a mut S,
        tokens: &'a [Token],
        index: usize,
        diagnostics: &'a mut Diagnostics,
    ) -> Input<'a, S> {
        Input {
            state,
            tokens,
            index,
            diagnostics,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &*self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }

    /// Index of the token being dispatched.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The tokens after the token being dispatched.
    pub fn following(&self) -> &'a [Token] {
        &self.tokens[(self.index + 1).min(self.tokens.len())..]
    }

    /// The token before the token being dispatched, if there is one.
    pub fn previous(&self) -> Option<&'a Token> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    /// Returns the token `offset` positions after the token being dispatched.
    ///
    /// # Panics
    ///
    /// Panics if the position is past the end of the token list.
    /// Use [following](Input::following) to inspect tokens that may not exist.
    pub fn token(&self, offset: usize) -> &'a Token {
        match self.tokens.get(self.index + offset) {
            None => crate::error::null_argument("a token offset within the token list"),
            Some(token) => token,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &*self.diagnostics
    }

    pub fn warn(&mut self, error: Error) {
        self.diagnostics.warn(error);
    }

    pub fn info(&mut self, source: Source, key: &str) {
        self.diagnostics.info(source, key);
    }
}

impl<'a, S: State> Input<'a, S> {
    #[inline]
    pub fn formats(&self) -> &FormatStack {
        self.state.formats()
    }

    #[inline]
    pub fn formats_mut(&mut self) -> &mut FormatStack {
        self.state.formats_mut()
    }
}

/// The dispatch engine of one backend.
pub struct Engine<S> {
    pub state: S,
    commands: Map<S>,
    diagnostics: Diagnostics,
}

impl<S: State> Engine<S> {
    pub fn new(state: S, commands: Map<S>) -> Engine<S> {
        Engine {
            state,
            commands,
            diagnostics: Default::default(),
        }
    }

    /// Use the provided diagnostics, for example the diagnostics of the tokenizer.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Engine<S> {
        self.diagnostics = diagnostics;
        self
    }

    pub fn commands(&self) -> &Map<S> {
        &self.commands
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn into_parts(self) -> (S, Diagnostics) {
        (self.state, self.diagnostics)
    }

    /// Dispatches every token in the list.
    pub fn run<H: Handlers<S>>(&mut self, tokens: &TokenList) {
        let tokens = tokens.as_slice();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let mut input = Input::new(&mut self.state, tokens, i, &mut self.diagnostics);
            let skip = match dispatch::<S, H>(&self.commands, token, &mut input) {
                Ok(skip) => skip,
                Err(err) => {
                    input.warn(err);
                    0
                }
            };
            i = i.saturating_add(1).saturating_add(skip);
        }
    }
}

fn dispatch<S: State, H: Handlers<S>>(
    commands: &Map<S>,
    token: &Token,
    input: &mut Input<S>,
) -> Result<usize, Error> {
    match token.token_type() {
        TokenType::Text => H::text_handler(token, input).map(|()| 0),
        TokenType::EndOfLine => H::end_of_line_handler(token, input).map(|()| 0),
        TokenType::ReplacedCommand => H::replaced_command_handler(token, input).map(|()| 0),
        TokenType::Command | TokenType::Symbol => match commands.get(token.root()) {
            None => H::undefined_command_handler(token, input).map(|()| 0),
            Some(handler) => {
                S::pre_command_hook(token, input)?;
                (handler.func())(token, input)
            }
        },
        // Without a handler for the whole compound command,
        //  the attribute tokens that follow are dispatched one by one.
        TokenType::CompoundCommand => match commands.get(token.root()) {
            None => Ok(0),
            Some(handler) => {
                S::pre_command_hook(token, input)?;
                (handler.func())(token, input)
            }
        },
        TokenType::CompoundCommandEnd => Ok(0),
    }
}
