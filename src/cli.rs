use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Normalizes a context-free grammar to CNF and parses sentences with CYK")]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Sentences to parse (default: read lines from stdin until `quit`)
    pub sentences: Vec<String>,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Print the recognition table of every parse
    #[arg(short, long)]
    pub table: bool,

    /// Print the normalized grammar and what each pass did
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate sentences instead of parsing them
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Seed for generation (default: random)
    #[arg(long, value_name = "SEED", requires = "generate")]
    pub seed: Option<u64>
}
