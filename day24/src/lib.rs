use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{Context, Result};
use nom::{
    character::complete::{char, space0},
    combinator::map,
    error::{FromExternalError, ParseError},
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};
use nom_supreme::error::ErrorTree;
use num::{BigInt, BigRational};
use thiserror::Error;
use util::{parse_nice, parse_number, ParseReport, Span};

mod crossing;
mod elimination;
mod rock;

pub use crossing::{count_crossings, crosses_within};
pub use elimination::{solve_exact, EliminationError};
pub use rock::{RockSolution, RockSolver, MIN_OBSERVATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Vec3 {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// Position and constant velocity of one observed hailstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hailstone {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl fmt::Display for Hailstone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.position, self.velocity)
    }
}

impl FromStr for Hailstone {
    type Err = ParseReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_nice(s, parse_hailstone::<ErrorTree<Span>>)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HailError {
    #[error("line {line}: malformed hailstone record\n{report}")]
    Parse { line: usize, report: String },

    #[error("need at least {needed} hailstones to pin down the rock, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("no rock trajectory satisfies the observed hailstones")]
    NoSolution,

    #[error("observed hailstones do not determine a unique rock trajectory (rank {rank} of 6)")]
    Ambiguous { rank: usize },

    #[error("rock trajectory never meets hailstone {index} ({hailstone})")]
    Miss { index: usize, hailstone: Hailstone },

    #[error("rock meets hailstone {index} in the past (t = {time})")]
    PastCollision { index: usize, time: BigRational },
}

pub(crate) fn rational(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn separator<'a, E>(c: char) -> impl FnMut(Span<'a>) -> IResult<Span<'a>, char, E>
where
    E: ParseError<Span<'a>>,
{
    delimited(space0, char(c), space0)
}

fn parse_vec3<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Vec3, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, std::num::ParseIntError>,
{
    map(
        tuple((
            parse_number,
            preceded(separator(','), parse_number),
            preceded(separator(','), parse_number),
        )),
        |(x, y, z)| Vec3::new(x, y, z),
    )(i)
}

fn parse_hailstone<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Hailstone, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, std::num::ParseIntError>,
{
    map(
        delimited(
            space0,
            separated_pair(parse_vec3, separator('@'), parse_vec3),
            space0,
        ),
        |(position, velocity)| Hailstone { position, velocity },
    )(i)
}

/// Parses one hailstone per line, in input order. Blank lines are skipped.
pub fn parse_hailstones(
    input: impl Iterator<Item = impl Into<String>>,
) -> Result<Vec<Hailstone>, HailError> {
    input
        .map(|l| {
            let l: String = l.into();
            l
        })
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            l.parse::<Hailstone>().map_err(|report| HailError::Parse {
                line: i + 1,
                report: report.rendered,
            })
        })
        .collect()
}

pub fn get_num_crossings(
    input: impl Iterator<Item = impl Into<String>>,
    area: RangeInclusive<i64>,
) -> Result<usize> {
    let hailstones = parse_hailstones(input).context("parsing hailstones")?;

    Ok(count_crossings(&hailstones, &area))
}

pub fn get_rock(
    input: impl Iterator<Item = impl Into<String>>,
    solver: &RockSolver,
) -> Result<RockSolution> {
    let hailstones = parse_hailstones(input).context("parsing hailstones")?;

    solver
        .solve(&hailstones)
        .context("solving rock trajectory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let res = get_num_crossings(TEST_INPUT.lines(), 7..=27);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 2);
    }

    #[test]
    fn part2() {
        let res = get_rock(TEST_INPUT.lines(), &RockSolver::default());
        assert!(res.is_ok());
        assert_eq!(res.unwrap().position_sum(), rational(47));
    }

    #[rstest]
    #[case("19, 13, 30 @ -2, 1, -2", "19, 13, 30 @ -2, 1, -2")]
    #[case("20, 19, 15 @  1, -5, -3", "20, 19, 15 @ 1, -5, -3")]
    #[case("  12,31,  28 @-1, -2, -1  ", "12, 31, 28 @ -1, -2, -1")]
    #[case(
        "308205470708820, 82023714100543, 475164418926765 @ 42, 274, -194",
        "308205470708820, 82023714100543, 475164418926765 @ 42, 274, -194"
    )]
    fn hailstone_round_trip(#[case] line: &str, #[case] canonical: &str) {
        let hailstone = line.parse::<Hailstone>();
        assert!(hailstone.is_ok());
        assert_eq!(hailstone.unwrap().to_string(), canonical);
    }

    #[rstest]
    #[case("19, 13 @ -2, 1, -2")]
    #[case("19, 13, 30 @ -2, 1")]
    #[case("19, 13, 30 -2, 1, -2")]
    #[case("19, 13, 30 @ -2, 1, -2, 7")]
    #[case("19, 13, thirty @ -2, 1, -2")]
    #[case("19, 13, 99999999999999999999 @ -2, 1, -2")]
    fn hailstone_malformed(#[case] line: &str) {
        assert!(line.parse::<Hailstone>().is_err());
    }

    #[test]
    fn parse_keeps_file_order() {
        let res = parse_hailstones(TEST_INPUT.lines());
        assert!(res.is_ok());
        let hailstones = res.unwrap();
        assert_eq!(hailstones.len(), 5);
        assert_eq!(hailstones[0].position, Vec3::new(19, 13, 30));
        assert_eq!(hailstones[4].velocity, Vec3::new(1, -5, -3));
    }

    #[test]
    fn parse_skips_blank_lines() {
        let input = "\n19, 13, 30 @ -2, 1, -2\n\n18, 19, 22 @ -1, -1, -2\n   \n";
        let res = parse_hailstones(input.lines());
        assert!(res.is_ok());
        assert_eq!(res.unwrap().len(), 2);
    }

    #[test]
    fn parse_reports_offending_line() {
        let input = "19, 13, 30 @ -2, 1, -2\n18, 19 @ -1, -1, -2\n20, 25, 34 @ -2, -2, -4";
        let res = parse_hailstones(input.lines());
        assert!(matches!(res, Err(HailError::Parse { line: 2, .. })));
    }

    #[test]
    fn errors_name_the_stage() {
        let res = get_rock("19, 13, 30 @ -2, 1".lines(), &RockSolver::default());
        let err = res.unwrap_err();
        assert!(format!("{err:#}").starts_with("parsing hailstones"));

        let res = get_rock(TEST_INPUT.lines().take(2), &RockSolver::default());
        let err = res.unwrap_err();
        assert!(format!("{err:#}").starts_with("solving rock trajectory"));
        assert!(matches!(
            err.downcast_ref::<HailError>(),
            Some(HailError::InsufficientData { got: 2, .. })
        ));
    }
}
