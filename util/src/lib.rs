use std::{
    fs,
    io::{self, Read},
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result};
use miette::GraphicalReportHandler;
use nom::{
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    error::{FromExternalError, ParseError},
    sequence::tuple,
    IResult,
};
use nom_locate::LocatedSpan;
use nom_supreme::{
    error::{BaseErrorKind, ErrorTree, GenericErrorTree},
    final_parser::final_parser,
};
use tracing_subscriber::{prelude::*, EnvFilter};

// Thanks to FasterThanLime! https://fasterthanli.me/series/advent-of-code-2022/part-11

pub type Span<'a> = LocatedSpan<&'a str>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("bad input")]
struct BadInput<'a> {
    #[source_code]
    src: &'a str,

    #[label("{kind}")]
    bad_bit: miette::SourceSpan,

    kind: BaseErrorKind<&'a str, Box<dyn std::error::Error + Send + Sync>>,
}

/// A parse failure rendered as a diagnostic pointing into the source line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{rendered}")]
pub struct ParseReport {
    pub offset: usize,
    pub rendered: String,
}

pub fn parse_number<'a, E>(i: Span<'a>) -> IResult<Span<'a>, i64, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, std::num::ParseIntError>,
{
    map_res(recognize(tuple((opt(char('-')), digit1))), |i: Span<'a>| {
        FromStr::from_str(i.fragment())
    })(i)
}

// Stack and Alt wrap the base errors, the first base is the one nom gave up on first.
fn innermost_base<'a>(
    e: ErrorTree<Span<'a>>,
) -> Option<(Span<'a>, BaseErrorKind<&'static str, Box<dyn std::error::Error + Send + Sync>>)> {
    match e {
        GenericErrorTree::Base { location, kind } => Some((location, kind)),
        GenericErrorTree::Stack { base, .. } => innermost_base(*base),
        GenericErrorTree::Alt(alts) => alts.into_iter().find_map(innermost_base),
    }
}

pub fn parse_nice<'a, T, F>(l: &'a str, parse_fun: F) -> Result<T, ParseReport>
where
    F: FnMut(Span<'a>) -> IResult<Span<'a>, T, ErrorTree<Span<'a>>>,
{
    let line_span = Span::new(l);
    let line: Result<_, ErrorTree<Span>> = final_parser(parse_fun)(line_span);

    line.map_err(|e| match innermost_base(e) {
        Some((location, kind)) => {
            let offset = location.location_offset();
            let err = BadInput {
                src: l,
                bad_bit: miette::SourceSpan::new(offset.into(), 0.into()),
                kind,
            };
            let mut rendered = String::new();
            if GraphicalReportHandler::new()
                .render_report(&mut rendered, &err)
                .is_err()
            {
                rendered = format!("bad input at column {}: {l}", offset + 1);
            }
            ParseReport { offset, rendered }
        }
        None => ParseReport {
            offset: 0,
            rendered: format!("bad input: {l}"),
        },
    })
}

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading input from {}", path.display())),
        None => read_input_as_string(),
    }
}

pub fn read_input_as_string() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut input)
        .context("reading input from stdin")?;
    Ok(input)
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, warnings only by default.
pub fn init_tracing() -> Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(anyhow::Error::msg)
}
