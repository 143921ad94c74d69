//! CLI entry point for the pocket solver.
//!
//! Usage:
//!   pocket-solver solve <input.json> [--levels <n>]
//!   pocket-solver solve --stdin [--levels <n>]
//!   pocket-solver scramble [--length <n>] [--seed <n>]
//!
//! Solve input is JSON with `start` and `end` arrangements and an optional
//! `generators` list of `{ "name", "perm" }`; without it the pocket cube
//! quarter twists are used. `scramble` prints input that `solve` accepts.
//!
//! Logs go to stderr and are filtered with `RUST_LOG`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use pocket_solver::cube;
use pocket_solver::search::DEFAULT_LEVELS_PER_SIDE;
use pocket_solver::{
    search, Arrangement, GeneratorSet, InputError, NamedPerm, SearchConfig, SearchResult, Twist,
};

#[derive(Parser)]
#[command(name = "pocket-solver")]
#[command(about = "Shortest move sequences between permutation states")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest move sequence from `start` to `end`
    Solve {
        /// Path to input JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read input from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Levels expanded from each end (the move bound is twice this)
        #[arg(long, default_value_t = DEFAULT_LEVELS_PER_SIDE)]
        levels: usize,
    },

    /// Print a random pocket cube position as solver input
    Scramble {
        /// Number of random quarter twists
        #[arg(long, default_value = "10")]
        length: usize,

        /// Seed for a reproducible scramble
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Solver input
#[derive(Debug, Serialize, Deserialize)]
struct SolveInput {
    start: Arrangement,
    end: Arrangement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generators: Option<Vec<NamedPerm>>,
}

/// Output format for a solve
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    levels_expanded: usize,
    start_discovered: usize,
    end_discovered: usize,
    time_elapsed_ms: u64,
}

/// Output format for a scramble
#[derive(Debug, Serialize, Deserialize)]
struct ScrambleOutput {
    scramble: Vec<String>,
    start: Arrangement,
    end: Arrangement,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            file,
            stdin,
            levels,
        } => solve(file, stdin, levels),
        Commands::Scramble { length, seed } => scramble(length, seed),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pocket_solver=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String, InputError> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = file {
        Ok(fs::read_to_string(path)?)
    } else {
        Err(InputError::MissingInput)
    }
}

/// Parse solver input and resolve its generator set
fn parse_input(json: &str) -> Result<(GeneratorSet, Arrangement, Arrangement), InputError> {
    let input: SolveInput = serde_json::from_str(json)?;

    let generators = match input.generators {
        Some(generators) => GeneratorSet::new(generators)?,
        None => cube::quarter_twists(),
    };
    generators.check_state(&input.start)?;
    generators.check_state(&input.end)?;

    Ok((generators, input.start, input.end))
}

fn solve(file: Option<PathBuf>, stdin: bool, levels: usize) -> Result<ExitCode, InputError> {
    let json = read_input(file, stdin)?;
    let (generators, start, end) = parse_input(&json)?;

    let config = SearchConfig {
        levels_per_side: levels,
    };
    let result = search(&generators, &start, &end, &config);
    let output = format_result(&generators, &result);

    println!("{}", serde_json::to_string_pretty(&output)?);

    if result.found() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn format_result(generators: &GeneratorSet, result: &SearchResult<Twist>) -> SolveOutput {
    SolveOutput {
        found: result.found(),
        moves: result.path.as_ref().map(|path| generators.names_of(path)),
        length: result.path.as_ref().map(Vec::len),
        levels_expanded: result.levels_expanded,
        start_discovered: result.start_discovered,
        end_discovered: result.end_discovered,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}

fn scramble(length: usize, seed: Option<u64>) -> Result<ExitCode, InputError> {
    let twists = cube::quarter_twists();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (end, moves) = cube::scramble(&twists, &mut rng, length);
    let output = ScrambleOutput {
        scramble: twists.names_of(&moves),
        start: cube::solved(),
        end,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_solver::PermError;

    #[test]
    fn test_parse_input_defaults_to_cube() {
        let solved: Vec<u8> = (0..24).collect();
        let json = serde_json::json!({ "start": solved.clone(), "end": solved }).to_string();

        let (generators, start, end) = parse_input(&json).unwrap();
        assert_eq!(generators.len(), 6);
        assert_eq!(start, end);
    }

    #[test]
    fn test_parse_input_with_generators() {
        let json = r#"{
            "start": [1, 2, 3],
            "end": [2, 1, 3],
            "generators": [
                { "name": "A", "perm": [1, 0, 2] },
                { "name": "B", "perm": [0, 2, 1] }
            ]
        }"#;

        let (generators, start, end) = parse_input(json).unwrap();
        let result = search(&generators, &start, &end, &SearchConfig::default());
        let output = format_result(&generators, &result);

        assert!(output.found);
        assert_eq!(output.moves, Some(vec!["A".to_string()]));
        assert_eq!(output.length, Some(1));
    }

    #[test]
    fn test_parse_input_rejects_length_mismatch() {
        let json = r#"{ "start": [0, 1], "end": [1, 0] }"#;
        assert!(matches!(
            parse_input(json),
            Err(InputError::Perm(PermError::LengthMismatch {
                expected: 24,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_scramble_output_round_trips_as_input() {
        let twists = cube::quarter_twists();
        let (end, moves) = cube::scramble(&twists, &mut StdRng::seed_from_u64(3), 4);
        let output = ScrambleOutput {
            scramble: twists.names_of(&moves),
            start: cube::solved(),
            end: end.clone(),
        };

        let json = serde_json::to_string(&output).unwrap();
        let (_, start, parsed_end) = parse_input(&json).unwrap();
        assert_eq!(start, cube::solved());
        assert_eq!(parsed_end, end);
    }

    #[test]
    fn test_not_found_output_omits_moves() {
        let twists = cube::quarter_twists();
        let result: SearchResult<Twist> = SearchResult {
            path: None,
            levels_expanded: 7,
            start_discovered: 10,
            end_discovered: 12,
            time_elapsed_ms: 1,
        };

        let value = serde_json::to_value(format_result(&twists, &result)).unwrap();
        assert_eq!(value["found"], false);
        assert!(value.get("moves").is_none());
        assert_eq!(value["levelsExpanded"], 7);
    }
}
