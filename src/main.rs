mod cli;

use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use cyk::cyk::CykParser;
use cyk::error_handling::Location;
use cyk::generator::Generator;
use cyk::grammar::Grammar;
use cyk::loader;
use cyk::normalizer::Normalizer;
use rand::rngs::StdRng;
use rand::SeedableRng;

const QUIT: &str = "quit";

fn print_parse(parser: &CykParser, sentence: &str, table: bool) {
    let parse = parser.parse(sentence);

    if parse.accepted {
        println!("ACCEPTED ({:.6} s)", parse.elapsed.as_secs_f64());
    } else {
        println!("REJECTED ({:.6} s)", parse.elapsed.as_secs_f64());
    }
    if let Some(tree) = &parse.tree {
        println!("{}", tree);
    }
    if table {
        println!("{}", parse.chart);
    }
}

fn generate(cli: &cli::Cli, grammar: &Grammar, amount: u32) -> ExitCode {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let generator = Generator::new(grammar);
    let location = Location::whole(cli.file.clone());

    for _ in 0..amount {
        match generator.generate(&mut rng, &location) {
            Ok(words) => println!("{}", words.join(" ")),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn interact(parser: &CykParser, table: bool) {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        // Nothing sensible to do if stdout is gone
        let _ = std::io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let sentence = line.trim();
        if sentence == QUIT {
            break;
        }
        if !sentence.is_empty() {
            print_parse(parser, sentence, table);
        }
    }
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let grammar = match loader::load_file_with_start(&cli.file, cli.start.as_deref()) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for e in errors {
                eprintln!("{}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    if let Some(amount) = cli.generate {
        return generate(&cli, &grammar, amount);
    }

    let normalized = Normalizer::new(&grammar).run();
    if cli.verbose {
        println!("{}", normalized.report);
        println!("{}", normalized.grammar);
    }

    let parser = match CykParser::new(normalized.grammar) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.sentences.is_empty() {
        interact(&parser, cli.table);
    } else {
        for sentence in &cli.sentences {
            println!("{}", sentence);
            print_parse(&parser, sentence, cli.table);
        }
    }

    ExitCode::SUCCESS
}
