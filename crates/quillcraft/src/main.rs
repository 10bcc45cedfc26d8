use clap::Parser;
use quill::dispatch::Engine;
use quill::token::{Token, TokenType};
use quill_stdlib::listing::{ListingHandlers, ListingState};
use quill_stdlib::{StdHandlers, StdState};
use std::path::PathBuf;

mod common;
mod report;
use common::*;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = cli.run() {
        if !err.is_empty() {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

/// Tools for working with Quill documents.
#[derive(Debug, Parser)]
#[command(
    name = "quillcraft",
    author = "The Quillcraft Project",
    version,
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log more: -v for warnings as they happen, -vv for information, -vvv for debugging.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        match self.command {
            Command::Tokens(tokens) => tokens.run(),
            Command::Check(check) => check.run(),
            Command::Listing(listing) => listing.run(),
            Command::Text(text) => text.run(),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Print the tokens of a document, one per line.
    ///
    /// Each line shows the source line of the token, its type and its content.
    /// Commands also show their root and parameter:
    ///
    ///     3  command   [font|size:  12pt  "[fsize:12pt]"
    Tokens(Tokens),

    /// Check that a document has no warnings.
    ///
    /// Every warning is reported with the offending text.
    /// The command fails if there are any warnings.
    Check(Check),

    /// Write an HTML listing of a document.
    Listing(Listing),

    /// Apply the commands of a document and print its plain text.
    Text(Text),
}

#[derive(Clone, Debug, clap::Args)]
struct Tokens {
    #[command(flatten)]
    compile: CompileArgs,
}

impl Tokens {
    fn run(&self) -> Result<(), String> {
        let compilation = self.compile.compile()?;
        for token in compilation.tokens.iter() {
            println!("{}", describe(token));
        }
        print_warnings(&compilation)
    }
}

fn describe(token: &Token) -> String {
    let line = token.source().line_number;
    match token.token_type() {
        TokenType::Text => format!["{line:>4}  text      {:?}", token.content()],
        TokenType::Command => format![
            "{line:>4}  command   {}  {}  {:?}",
            token.root(),
            token.parameter(),
            token.content()
        ],
        TokenType::Symbol => format!["{line:>4}  symbol    {}", token.root()],
        TokenType::CompoundCommand => {
            format!["{line:>4}  compound  {}  {:?}", token.root(), token.content()]
        }
        TokenType::CompoundCommandEnd => format!["{line:>4}  end       {}", token.root()],
        TokenType::ReplacedCommand => format!["{line:>4}  replaced  {:?}", token.content()],
        TokenType::EndOfLine => format!["{line:>4}  eol"],
    }
}

fn print_warnings(compilation: &Compilation) -> Result<(), String> {
    let file_name = compilation.path.to_string_lossy();
    report::eprint_all(
        compilation.diagnostics.warnings(),
        compilation.diagnostics.catalog(),
        &file_name,
        &compilation.source,
    )
}

#[derive(Clone, Debug, clap::Args)]
struct Check {
    #[command(flatten)]
    compile: CompileArgs,

    /// Also dispatch the document, reporting the warnings of the output handlers.
    #[arg(long)]
    dispatch: bool,

    /// Print one line per warning instead of a report with the offending text.
    #[arg(long)]
    brief: bool,
}

impl Check {
    fn run(&self) -> Result<(), String> {
        let mut compilation = self.compile.compile()?;
        if self.dispatch {
            let diagnostics = std::mem::take(&mut compilation.diagnostics);
            let mut engine = Engine::new(
                StdState::new(&compilation.options),
                quill_stdlib::handlers(),
            )
            .with_diagnostics(diagnostics);
            engine.run::<StdHandlers>(&compilation.tokens);
            compilation.diagnostics = engine.into_parts().1;
        }
        if self.brief {
            for warning in compilation.diagnostics.warnings() {
                eprintln!(
                    "{}",
                    warning.render(compilation.diagnostics.catalog(), Some(&compilation.files))
                );
            }
        } else {
            print_warnings(&compilation)?;
        }
        let n = compilation.diagnostics.warnings().len();
        if n > 0 {
            Err(format!("Check failure: {} warnings", n))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Debug, clap::Args)]
struct Listing {
    #[command(flatten)]
    compile: CompileArgs,

    /// Output path for the HTML listing.
    ///
    /// If not provided the listing is printed to standard out.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Listing {
    fn run(&self) -> Result<(), String> {
        let compilation = self.compile.compile()?;
        print_warnings(&compilation)?;
        let mut engine = Engine::new(ListingState::default(), quill_stdlib::listing::handlers());
        engine.run::<ListingHandlers>(&compilation.tokens);
        let (state, _) = engine.into_parts();
        let title = compilation
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let html = state.into_html(&title);
        match &self.output {
            None => {
                print!("{html}");
                Ok(())
            }
            Some(path) => write(path, &html),
        }
    }
}

#[derive(Clone, Debug, clap::Args)]
struct Text {
    #[command(flatten)]
    compile: CompileArgs,
}

impl Text {
    fn run(&self) -> Result<(), String> {
        let mut compilation = self.compile.compile()?;
        let diagnostics = std::mem::take(&mut compilation.diagnostics);
        let mut engine = Engine::new(
            StdState::new(&compilation.options),
            quill_stdlib::handlers(),
        )
        .with_diagnostics(diagnostics);
        engine.run::<StdHandlers>(&compilation.tokens);
        let (state, diagnostics) = engine.into_parts();
        compilation.diagnostics = diagnostics;
        print_warnings(&compilation)?;
        if let Some(cover) = &state.cover_text {
            println!("{cover}\n");
        }
        println!("{}", state.text.trim_end());
        Ok(())
    }
}
