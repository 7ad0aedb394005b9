// Pipeline parser for the view DSL

use super::ast::{ViewCommand, ViewSpec};
use super::command::{parse_brush, parse_color, parse_drill, parse_filter, parse_include, parse_size};
use super::lexer::ws;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, opt},
    multi::separated_list0,
    IResult,
};

fn parse_pipeline_component(input: &str) -> IResult<&str, ViewCommand> {
    alt((
        parse_include,
        parse_drill,
        parse_color,
        parse_filter,
        parse_size,
        parse_brush,
    ))(input)
}

/// Parse a complete view specification
/// Format: command | command | ...
pub fn parse_view_spec(input: &str) -> IResult<&str, ViewSpec> {
    // If input starts with "|", consume it
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, commands) = separated_list0(
        ws(tag("|")),
        parse_pipeline_component
    )(input)?;

    // Consume trailing whitespace and ensure end of input
    let (input, _) = ws(eof)(input)?;

    Ok((input, ViewSpec { commands }))
}
