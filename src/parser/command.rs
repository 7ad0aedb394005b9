// Command parsers for the view DSL

use super::ast::{BrushSpec, ViewCommand};
use super::lexer::{index_literal, number_literal, value, ws};
use crate::ir::{CellId, Extent};
use nom::{
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list0,
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

/// Parenthesized, comma separated list of names or values
fn value_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), ws(value)),
        ws(char(')')),
    )(input)
}

/// Parse an include command
/// Format: include(a, b, "with space")
pub fn parse_include(input: &str) -> IResult<&str, ViewCommand> {
    let (input, _) = ws(tag("include"))(input)?;
    map(value_list, ViewCommand::Include)(input)
}

/// Parse a drill command
/// Format: drill(x, y, z) - order matters
pub fn parse_drill(input: &str) -> IResult<&str, ViewCommand> {
    let (input, _) = ws(tag("drill"))(input)?;
    map(value_list, ViewCommand::Drill)(input)
}

/// Parse a color command
/// Format: color(species) or color() to clear
pub fn parse_color(input: &str) -> IResult<&str, ViewCommand> {
    let (input, _) = ws(tag("color"))(input)?;
    let (input, var) = delimited(ws(char('(')), opt(ws(value)), ws(char(')')))(input)?;
    Ok((input, ViewCommand::Color(var)))
}

/// Parse a filter command
/// Format: filter(setosa, "Iris virginica")
pub fn parse_filter(input: &str) -> IResult<&str, ViewCommand> {
    let (input, _) = ws(tag("filter"))(input)?;
    map(value_list, ViewCommand::Filter)(input)
}

/// Parse a size command
/// Format: size(120)
pub fn parse_size(input: &str) -> IResult<&str, ViewCommand> {
    let (input, _) = ws(tag("size"))(input)?;
    let (input, size) = delimited(ws(char('(')), ws(number_literal), ws(char(')')))(input)?;
    Ok((input, ViewCommand::Size(size)))
}

/// `[lo, hi]`
fn range(input: &str) -> IResult<&str, (f64, f64)> {
    delimited(
        ws(char('[')),
        separated_pair(ws(number_literal), ws(char(',')), ws(number_literal)),
        ws(char(']')),
    )(input)
}

/// Parse a brush command
/// Format: brush(col: 0, row: 1, x: [1.0, 2.5], y: [3, 4])
pub fn parse_brush(input: &str) -> IResult<&str, ViewCommand> {
    let (input, _) = ws(tag("brush"))(input)?;
    let (input, _) = ws(char('('))(input)?;

    let (input, column) = preceded(ws(tag("col:")), ws(index_literal))(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, row) = preceded(ws(tag("row:")), ws(index_literal))(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, x) = preceded(ws(tag("x:")), range)(input)?;
    let (input, _) = ws(char(','))(input)?;
    let (input, y) = preceded(ws(tag("y:")), range)(input)?;

    let (input, _) = ws(char(')'))(input)?;

    Ok((
        input,
        ViewCommand::Brush(BrushSpec {
            cell: CellId { column, row },
            extent: Extent::from_corners((x.0, y.0), (x.1, y.1)),
        }),
    ))
}
