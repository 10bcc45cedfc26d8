use quill::command;
use quill::diag::Diagnostics;
use quill::dispatch::Engine;
use quill::options::Options;
use quill::token::TokenList;
use quill::tokenizer::Tokenizer;
use quill_stdlib::{StdHandlers, StdState};
use rand::prelude::Distribution;
use rand::Rng;

/// Tokenizes the input with the given command registry.
pub fn run_tokenizer(map: &command::Map, input: &str) -> (TokenList, Diagnostics) {
    let mut tokenizer = Tokenizer::new(map, Options::default());
    let tokens = tokenizer.tokenize(input);
    (tokens, tokenizer.into_diagnostics())
}

/// Dispatches tokens to the standard library handlers and returns the length of the output text.
pub fn run_dispatch(tokens: &TokenList) -> usize {
    let options = Options::default();
    let mut engine = Engine::new(StdState::new(&options), quill_stdlib::handlers());
    engine.run::<StdHandlers>(tokens);
    engine.into_parts().0.text.len()
}

static RANDOM_COMMANDS: [&str; 18] = [
    "[b]",
    "[/b]",
    "[i]",
    "[/i]",
    "[u]",
    "[/u]",
    "[fsize:12pt]",
    "[ff:Arial]",
    "[font|size:10pt|face:Times]",
    "[leading:14pt]",
    "[paraskip:6pt]",
    "[copyright]",
    "[emdash]",
    "[bullet]",
    "[savefmt]",
    "[restorefmt]",
    "[skip:1li]",
    "[cr]",
];

pub struct Weights {
    pub space: u32,
    pub letter: u32,
    pub other: u32,
    pub command: u32,
    pub line_comment: u32,
    pub blank_line: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            space: 20,
            letter: 200,
            other: 20,
            command: 15,
            line_comment: 1,
            blank_line: 2,
        }
    }
}

/// Generates a random document without warnings.
///
/// Every line but the first two has a length within the bounds, give or take one command.
pub fn generate_random_document(
    rng: &mut rand::prelude::StdRng,
    num_lines: usize,
    line_length_bounds: (usize, usize),
    weights: &Weights,
) -> String {
    let line_dist = rand::distributions::WeightedIndex::new([
        weights.space + weights.letter + weights.other + weights.command,
        weights.line_comment,
        weights.blank_line,
    ])
    .unwrap();
    let mut result = String::with_capacity(num_lines * (line_length_bounds.1 + 1) + 200);
    result.push_str("%% This Quill document was randomly generated by the performance crate.\n");
    result.push_str("[cover|text:Random document]\n");
    for _ in 2..num_lines {
        match line_dist.sample(rng) {
            0 => {
                let line = generate_random_line(rng, line_length_bounds, weights);
                result.push_str(&line);
            }
            1 => result.push_str("%% comment"),
            _ => {}
        }
        result.push('\n');
    }
    result
}

/// Generates a random line of text and commands without a line terminator.
pub fn generate_random_line(
    rng: &mut rand::prelude::StdRng,
    line_length_bounds: (usize, usize),
    weights: &Weights,
) -> String {
    let dist = rand::distributions::WeightedIndex::new([
        weights.space,
        weights.letter,
        weights.other,
        weights.command,
    ])
    .unwrap();
    let line_length = if line_length_bounds.1 <= line_length_bounds.0 {
        line_length_bounds.1
    } else {
        rng.gen_range(line_length_bounds.0..line_length_bounds.1 + 1)
    };
    let mut result = String::with_capacity(line_length + 30);
    while result.len() < line_length {
        let temp;
        let s = match dist.sample(rng) {
            0 => " ",
            1 => {
                let ascii_offset = match rng.gen_range(0..4) {
                    0 => 65, // uppercase
                    _ => 97, // lowercase
                };
                temp = char::from_u32(ascii_offset + rng.gen_range(0..26))
                    .unwrap()
                    .to_string();
                &temp
            }
            2 => match rng.gen_range(0..8) {
                0 => "0",
                1 => "1",
                2 => "2",
                3 => ".",
                4 => ",",
                5 => ";",
                6 => ":",
                _ => "&",
            },
            _ => RANDOM_COMMANDS[rng.gen_range(0..RANDOM_COMMANDS.len())],
        };
        result.push_str(s);
    }
    result
}
