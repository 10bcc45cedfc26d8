use quill::command;
use quill::diag::Diagnostics;
use quill::lexer::macros::MacroExpander;
use quill::options::Options;
use quill::source::FileTable;
use quill::token::TokenList;
use quill::tokenizer::Tokenizer;
use std::path::{Path, PathBuf};

/// Arguments shared by every subcommand that compiles a document.
#[derive(Clone, Debug, clap::Args)]
pub struct CompileArgs {
    /// Path to the Quill source file.
    pub path: PathBuf,

    /// JSON file with the compiler options.
    ///
    /// The flags below override the values in this file.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Command table with additional commands and aliases.
    ///
    /// Each line of the table has the form `root = attributes`, for example
    ///
    ///     [hl: = sn [font|face:
    ///
    /// Lines starting with # are ignored.
    #[arg(long)]
    pub alias_table: Option<PathBuf>,

    /// Emit the literal text of aliases as well as the commands they stand for.
    #[arg(long)]
    pub emit_replaced: bool,

    /// Resolution used to convert px measures.
    #[arg(long)]
    pub pixels_per_inch: Option<f32>,
}

/// A tokenized document.
pub struct Compilation {
    pub path: PathBuf,
    pub source: String,
    pub files: FileTable,
    pub options: Options,
    pub tokens: TokenList,
    pub diagnostics: Diagnostics,
}

impl CompileArgs {
    pub fn options(&self) -> Result<Options, String> {
        let mut options: Options = match &self.options {
            None => Default::default(),
            Some(path) => {
                let data = read(path)?;
                serde_json::from_str(&data).map_err(|err| {
                    format!["Failed to parse options file `{}`: {err}", path.display()]
                })?
            }
        };
        if self.emit_replaced {
            options.emit_replaced_commands = true;
        }
        if let Some(pixels_per_inch) = self.pixels_per_inch {
            if pixels_per_inch <= 0.0 {
                return Err(format![
                    "the pixels per inch must be positive but it is {pixels_per_inch}"
                ]);
            }
            options.pixels_per_inch = pixels_per_inch;
        }
        Ok(options)
    }

    pub fn registry(&self) -> Result<command::Map, String> {
        let mut map = quill_stdlib::registry();
        if let Some(path) = &self.alias_table {
            let table = read(path)?;
            let n = map
                .insert_from_table(&table)
                .map_err(|err| format!["Invalid command table `{}`: {err}", path.display()])?;
            tracing::info!(path = %path.display(), commands = n, "loaded command table");
        }
        Ok(map)
    }

    /// Reads and tokenizes the document.
    pub fn compile(&self) -> Result<Compilation, String> {
        let mut options = self.options()?;
        let map = self.registry()?;
        let source = read(&self.path)?;
        let mut files = FileTable::default();
        options.file_number = files.register(&self.path);
        let mut macros = MacroExpander::new();
        if let Some(name) = self.path.file_name() {
            macros.set_file_name(name.to_string_lossy());
        }
        let mut tokenizer = Tokenizer::new(&map, options.clone()).with_macro_expander(macros);
        let tokens = tokenizer.tokenize(&source);
        tracing::debug!(tokens = tokens.len(), "tokenized {}", self.path.display());
        Ok(Compilation {
            path: self.path.clone(),
            source,
            files,
            options,
            tokens,
            diagnostics: tokenizer.into_diagnostics(),
        })
    }
}

pub fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!["Failed to read `{}`: {err}", path.display()])
}

pub fn write(path: &Path, content: &str) -> Result<(), String> {
    std::fs::write(path, content)
        .map_err(|err| format!["Failed to write `{}`: {err}", path.display()])
}
