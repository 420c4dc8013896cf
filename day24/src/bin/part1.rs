use day24::get_num_crossings;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use util::{init_tracing, read_input};

/// Counts hailstone pairs whose paths cross inside the test area, ignoring Z.
#[derive(Parser, Debug)]
struct Args {
    /// Puzzle input, stdin when omitted
    input: Option<PathBuf>,

    /// Lower bound of the test area on both X and Y
    #[arg(long, default_value_t = 200_000_000_000_000)]
    min: i64,

    /// Upper bound of the test area on both X and Y
    #[arg(long, default_value_t = 400_000_000_000_000)]
    max: i64,
}

fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let input = read_input(args.input.as_deref())?;
    let res = get_num_crossings(input.lines(), args.min..=args.max)?;

    println!("{res}");

    Ok(())
}
