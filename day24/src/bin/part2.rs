use day24::{get_rock, RockSolver};

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use util::{init_tracing, read_input};

/// Finds the rock that hits every hailstone and prints its starting coordinates sum.
#[derive(Parser, Debug)]
struct Args {
    /// Puzzle input, stdin when omitted
    input: Option<PathBuf>,

    /// Number of leading hailstones used to build the equations (at least 3)
    #[arg(long, default_value_t = RockSolver::default().observations)]
    observations: usize,

    /// Reject rocks that meet a hailstone before t = 0
    #[arg(long)]
    forward_only: bool,
}

fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let input = read_input(args.input.as_deref())?;
    let solver = RockSolver::new(args.observations).forward_only(args.forward_only);
    let rock = get_rock(input.lines(), &solver)?;

    println!("{rock}");
    println!("{}", rock.position_sum());

    Ok(())
}
