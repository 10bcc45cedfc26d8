/*!
Quill unit testing library

This is a crate for writing unit tests for code that uses Quill.
It is used extensively in the Quill standard library.

## Basic setup

Tests are written using the [test_suite] macro.
The macro expects a function `registry` in scope that returns the parse-time
    [command map](quill::command::Map) used to tokenize the test inputs:

```
use quill::command;
use quill_testing::*;

fn registry() -> command::Map {
    let mut map = command::Map::default();
    map.insert(command::Descriptor::new_no_param("[b]")).unwrap();
    map.insert(command::Descriptor::new_value("[size:")).unwrap();
    map
}

test_suite![
    token_tests(
        (plain_text, "Hello", "Hello\n"),
        (no_param_command, "A[b]B", "A<[b]>B\n"),
        (value_command, "[size:12pt]x", "<[size:12pt>x\n"),
    ),
    warning_tests(
        (bad_value, "[size:big]", vec![quill::error::Kind::InvalidCommandParameter]),
    ),
];
```

Token tests compare the [rendered](render_tokens) token list against an expected string
    and fail if the tokenizer produced any warnings.
Warning tests compare the kinds of the warnings produced.

## Dispatch tests

Dispatch tests tokenize the input, run the tokens through a dispatch [Engine](quill::dispatch::Engine),
    and then call a check function on the resulting document state.
They need a state type, a type implementing [Handlers](quill::dispatch::Handlers),
    and the dispatch map of the backend, passed using [TestOption::Handlers].
By default the state type is [State] and the handlers are [RecordingHandlers].

```
use quill::command;
use quill::dispatch;
use quill_testing::*;

fn registry() -> command::Map {
    let mut map = command::Map::default();
    map.insert(command::Descriptor::new_no_param("[b]")).unwrap();
    map
}

fn bold(_: &quill::token::Token, input: &mut dispatch::Input<State>) -> Result<usize, quill::error::Error> {
    input.formats_mut().current_mut().font.bold = true;
    Ok(0)
}

fn handlers() -> dispatch::Map<State> {
    let mut map = dispatch::Map::new();
    map.insert("[b]", dispatch::Handler::new(bold));
    map
}

test_suite![
    options(
        TestOption::Registry(registry),
        TestOption::Handlers(handlers),
    ),
    dispatch_tests(
        (bold_command, "a[b]b", |state: &State| {
            assert!(state.formats.current().font.bold);
            assert_eq!(state.output, "ab\n");
        }),
    ),
];
```
*/

use quill::command;
use quill::diag::Diagnostics;
use quill::dispatch;
use quill::error::{Error, Kind};
use quill::format::FormatStack;
use quill::lexer::macros::MacroExpander;
use quill::options::Options;
use quill::token::{Token, TokenList, TokenType};
use quill::tokenizer::Tokenizer;

/// Simple state type for use in unit tests.
///
/// The state records the text it receives so that tests can inspect the output.
#[derive(Debug, Default)]
pub struct State {
    pub formats: FormatStack,
    pub output: String,
}

impl dispatch::State for State {
    fn formats(&self) -> &FormatStack {
        &self.formats
    }

    fn formats_mut(&mut self) -> &mut FormatStack {
        &mut self.formats
    }
}

/// Handlers that append text and ends of line to the [State] output.
pub struct RecordingHandlers;

impl dispatch::Handlers<State> for RecordingHandlers {
    fn text_handler(token: &Token, input: &mut dispatch::Input<State>) -> Result<(), Error> {
        input.state_mut().output.push_str(token.content());
        Ok(())
    }

    fn end_of_line_handler(_: &Token, input: &mut dispatch::Input<State>) -> Result<(), Error> {
        input.state_mut().output.push('\n');
        Ok(())
    }
}

/// Option passed to a test runner.
pub enum TestOption<'a, S> {
    /// The parse-time command map is obtained by calling this function.
    Registry(fn() -> command::Map),

    /// The parse-time command map is obtained by calling this closure.
    RegistryDyn(Box<dyn Fn() -> command::Map + 'a>),

    /// The dispatch map is obtained by calling this function.
    ///
    /// Defaults to an empty map.
    Handlers(fn() -> dispatch::Map<S>),

    /// The dispatch map is obtained by calling this closure.
    HandlersDyn(Box<dyn Fn() -> dispatch::Map<S> + 'a>),

    /// Tokenizer options.
    Options(Options),
}

struct ResolvedOptions<'a, S> {
    registry: Option<&'a dyn Fn() -> command::Map>,
    handlers: Option<&'a dyn Fn() -> dispatch::Map<S>>,
    options: Options,
}

impl<'a, S> ResolvedOptions<'a, S> {
    fn new(options: &'a [TestOption<S>]) -> Self {
        let mut resolved = Self {
            registry: None,
            handlers: None,
            options: Default::default(),
        };
        for option in options {
            match option {
                TestOption::Registry(f) => resolved.registry = Some(f),
                TestOption::RegistryDyn(f) => resolved.registry = Some(f),
                TestOption::Handlers(f) => resolved.handlers = Some(f),
                TestOption::HandlersDyn(f) => resolved.handlers = Some(f),
                TestOption::Options(o) => resolved.options = o.clone(),
            }
        }
        resolved
    }

    fn registry(&self) -> command::Map {
        match self.registry {
            None => Default::default(),
            Some(f) => f(),
        }
    }

    fn handlers(&self) -> dispatch::Map<S> {
        match self.handlers {
            None => Default::default(),
            Some(f) => f(),
        }
    }
}

/// Returns a macro expander with fixed values, so that test output doesn't depend on the clock.
pub fn fixed_macro_expander() -> MacroExpander {
    MacroExpander::new_with_values("2000-01-01".into(), "12:00".into())
}

/// Renders a token list in a compact form that is convenient to compare in tests.
///
/// - Text tokens are rendered as their content.
/// - Command and symbol tokens are rendered as `<root parameter>`, like `<[size:12pt>`.
/// - Compound commands are rendered as `<[font|...>` followed by the attribute tokens
///     and then `</[font|>`.
/// - Replaced command tokens are rendered as `<~content>`.
/// - End of line tokens are rendered as a newline.
pub fn render_tokens(tokens: &TokenList) -> String {
    let mut s = String::new();
    for token in tokens.iter() {
        match token.token_type() {
            TokenType::Text => s.push_str(token.content()),
            TokenType::Command | TokenType::Symbol => {
                s.push_str(&format!["<{}{}>", token.root(), token.parameter()])
            }
            TokenType::CompoundCommand => s.push_str(&format!["<{}...>", token.root()]),
            TokenType::CompoundCommandEnd => s.push_str(&format!["</{}>", token.root()]),
            TokenType::ReplacedCommand => s.push_str(&format!["<~{}>", token.content()]),
            TokenType::EndOfLine => s.push('\n'),
        }
    }
    s
}

/// Tokenizes the input using the provided options.
pub fn tokenize<S>(input: &str, options: &[TestOption<S>]) -> (TokenList, Diagnostics) {
    let options = ResolvedOptions::new(options);
    let map = options.registry();
    let mut tokenizer =
        Tokenizer::new(&map, options.options.clone()).with_macro_expander(fixed_macro_expander());
    let tokens = tokenizer.tokenize(input);
    (tokens, tokenizer.into_diagnostics())
}

fn warning_kinds(diagnostics: &Diagnostics) -> Vec<Kind> {
    diagnostics.warnings().iter().map(|w| w.kind).collect()
}

fn assert_no_warnings(input: &str, diagnostics: &Diagnostics) {
    if diagnostics.warnings().is_empty() {
        return;
    }
    let mut message = format!["Unexpected warnings for input {input:?}:\n"];
    for warning in diagnostics.warnings() {
        message.push_str(&format!["- {}\n", warning.summary(diagnostics.catalog())]);
    }
    panic!("{message}");
}

/// Runs a token test.
///
/// The rendered tokens of the input must equal the expected string,
///     and tokenizing must not produce warnings.
pub fn run_token_test<S>(input: &str, want: &str, options: &[TestOption<S>]) {
    let (tokens, diagnostics) = tokenize(input, options);
    assert_no_warnings(input, &diagnostics);
    let got = render_tokens(&tokens);
    if got != want {
        println!("Token lists do not match");
        println!("Input: {input:?}");
        println!("Expected: {want:?}");
        println!("Actual:   {got:?}");
        panic!("token test failed");
    }
}

/// Runs a warning test.
///
/// The kinds of the warnings produced while tokenizing the input must equal the expected kinds.
pub fn run_warning_test<S>(input: &str, want: Vec<Kind>, options: &[TestOption<S>]) {
    let (_, diagnostics) = tokenize(input, options);
    assert_eq!(
        warning_kinds(&diagnostics),
        want,
        "unexpected warnings for input {input:?}"
    );
}

/// Tokenizes and dispatches the input, returning the final state and the diagnostics.
pub fn tokenize_and_dispatch<S: dispatch::State + Default, H: dispatch::Handlers<S>>(
    input: &str,
    options: &[TestOption<S>],
) -> (S, Diagnostics) {
    let (tokens, diagnostics) = tokenize(input, options);
    let resolved = ResolvedOptions::new(options);
    let mut engine =
        dispatch::Engine::new(S::default(), resolved.handlers()).with_diagnostics(diagnostics);
    engine.run::<H>(&tokens);
    engine.into_parts()
}

/// Runs a dispatch test.
///
/// Tokenizing and dispatching the input must not produce warnings.
/// The check function is then called on the final state.
pub fn run_dispatch_test<S: dispatch::State + Default, H: dispatch::Handlers<S>>(
    input: &str,
    check: impl FnOnce(&S),
    options: &[TestOption<S>],
) {
    let (state, diagnostics) = tokenize_and_dispatch::<S, H>(input, options);
    assert_no_warnings(input, &diagnostics);
    check(&state);
}

/// Runs a dispatch warning test.
///
/// The kinds of the warnings produced while tokenizing and dispatching the input
///     must equal the expected kinds.
pub fn run_dispatch_warning_test<S: dispatch::State + Default, H: dispatch::Handlers<S>>(
    input: &str,
    want: Vec<Kind>,
    options: &[TestOption<S>],
) {
    let (_, diagnostics) = tokenize_and_dispatch::<S, H>(input, options);
    assert_eq!(
        warning_kinds(&diagnostics),
        want,
        "unexpected warnings for input {input:?}"
    );
}

/// Macro to generate a suite of unit tests
///
/// The general use of this macro looks like this:
/// ```
/// # use quill_testing::*;
/// # fn registry() -> quill::command::Map { Default::default() }
/// test_suite![
///     state(State),
///     handlers(RecordingHandlers),
///     options(TestOption::Registry(registry)),
///     token_tests(
///         (case_1, "input_1", "rendered_1\n"),
///         (case_2, "input_2", "rendered_2\n"),
///     ),
///     dispatch_tests(
///         (case_3, "input_3", |state: &State| assert_eq!(state.output, "input_3\n")),
///     ),
/// ];
/// ```
///
/// The arguments to the macro are:
///
/// - `state(State)`: defines which Rust type is used as the document state in dispatch tests.
///     This argument can be omitted, in which case it defaults to [State].
///
/// - `handlers(RecordingHandlers)`: the [Handlers](quill::dispatch::Handlers) type used
///     in dispatch tests. Can be omitted, in which case it defaults to [RecordingHandlers].
///
/// - `options(option_1, option_2, ..., option_n)`: options to pass to the test runner.
///     This is a list of values of type [TestOption].
///     The options can be omitted, in which case they default to `options(TestOption::Registry(registry))`.
///     In this case a function `registry` must be in scope.
///
/// - `token_tests(cases...)`, `warning_tests(cases...)`, `dispatch_tests(cases...)`,
///     `dispatch_warning_tests(cases...)`: each case is a tuple of the test name,
///     the input, and the expected value or check function.
///     Each of these sections can be repeated or omitted.
#[macro_export]
macro_rules! test_suite {
    ( state($state: ty), handlers($handlers: ty), options $options: tt, token_tests ( $( ($name: ident, $input: expr, $want: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                $crate::run_token_test::<$state>($input, $want, &options);
            }
        )*
    );
    ( state($state: ty), handlers($handlers: ty), options $options: tt, warning_tests ( $( ($name: ident, $input: expr, $want: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                $crate::run_warning_test::<$state>($input, $want, &options);
            }
        )*
    );
    ( state($state: ty), handlers($handlers: ty), options $options: tt, dispatch_tests ( $( ($name: ident, $input: expr, $check: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                $crate::run_dispatch_test::<$state, $handlers>($input, $check, &options);
            }
        )*
    );
    ( state($state: ty), handlers($handlers: ty), options $options: tt, dispatch_warning_tests ( $( ($name: ident, $input: expr, $want: expr $(,)? ) ),* $(,)? ) $(,)? ) => (
        $(
            #[test]
            fn $name() {
                let options = vec! $options;
                $crate::run_dispatch_warning_test::<$state, $handlers>($input, $want, &options);
            }
        )*
    );
    ( state($state: ty), handlers($handlers: ty), options $options: tt, $test_kind: ident $test_cases: tt $(,)? ) => (
        compile_error!("Invalid keyword: test_suite! only supports the following keywords: `state`, `handlers`, `options`, `token_tests`, `warning_tests`, `dispatch_tests`, `dispatch_warning_tests`");
    );
    ( state($state: ty), handlers($handlers: ty), options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $(
            $crate::test_suite![state($state), handlers($handlers), options $options, $test_kind $test_cases,];
        )+
    );
    ( state($state: ty), options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $crate::test_suite![state($state), handlers($crate::RecordingHandlers), options $options, $( $test_kind $test_cases, )+];
    );
    ( handlers($handlers: ty), options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $crate::test_suite![state($crate::State), handlers($handlers), options $options, $( $test_kind $test_cases, )+];
    );
    ( options $options: tt, $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $crate::test_suite![state($crate::State), handlers($crate::RecordingHandlers), options $options, $( $test_kind $test_cases, )+];
    );
    ( $( $test_kind: ident $test_cases: tt ),+ $(,)? ) => (
        $crate::test_suite![options($crate::TestOption::Registry(registry)), $( $test_kind $test_cases, )+];
    );
}
