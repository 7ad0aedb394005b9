// Lexical helpers shared by the view DSL parsers

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{map, map_res, recognize},
    multi::many0_count,
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Bare column name: letter or underscore, then letters, digits, `_`, `.` or `-`
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_"), tag("."), tag("-")))),
        )),
        |s: &str| s.to_string(),
    )(input)
}

/// Double-quoted string without escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        |s: &str| s.to_string(),
    )(input)
}

/// A name or value: quoted string or bare identifier
pub fn value(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

pub fn index_literal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("sepal_length)"), Ok((")", "sepal_length".to_string())));
        assert_eq!(identifier("x.1-b,"), Ok((",", "x.1-b".to_string())));
        assert!(identifier("1abc").is_err());
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("\"two words\" rest"), Ok((" rest", "two words".to_string())));
        assert!(string_literal("\"open").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(number_literal("-2.5]"), Ok(("]", -2.5)));
        assert_eq!(index_literal("12,"), Ok((",", 12)));
    }
}
