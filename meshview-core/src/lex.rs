/// Shared nom parsers for whitespace-separated text records
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{i64 as signed, space0, space1, u64 as unsigned},
    combinator::{all_consuming, eof, map, peek, verify},
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::Vertex;

/// A field ends at whitespace or at the end of the line.
fn field_end(input: &str) -> IResult<&str, &str> {
    alt((space1, eof))(input)
}

/// `kw` followed by at least one space or tab.
pub(crate) fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), space1)
}

/// One finite floating-point field.
pub(crate) fn coordinate(input: &str) -> IResult<&str, f64> {
    preceded(
        space0,
        terminated(verify(double, |v: &f64| v.is_finite()), peek(field_end)),
    )(input)
}

/// Three coordinate fields; anything after the third is left unconsumed.
pub(crate) fn vector3(input: &str) -> IResult<&str, Vertex> {
    map(
        tuple((coordinate, coordinate, coordinate)),
        |(x, y, z)| Point3::new(x, y, z),
    )(input)
}

/// A bare token holding nothing but an unsigned integer.
pub(crate) fn count_token(token: &str) -> Option<u64> {
    all_consuming(unsigned::<&str, nom::error::Error<&str>>)(token)
        .ok()
        .map(|(_, n)| n)
}

/// A bare token holding nothing but a signed integer.
pub(crate) fn index_token(token: &str) -> Option<i64> {
    all_consuming(signed::<&str, nom::error::Error<&str>>)(token)
        .ok()
        .map(|(_, n)| n)
}

/// Parse three coordinates from `fields`, reporting failures against `line`.
pub(crate) fn position(line_no: usize, line: &str, fields: &str) -> Result<Vertex, MeshError> {
    vector3(fields)
        .map(|(_, v)| v)
        .map_err(|_| MeshError::parse(line_no, line, "expected three finite coordinates"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_ignores_extra_fields() {
        let (rest, v) = vector3("1.5 -2 3e2 1.0").unwrap();
        assert_eq!(v, Point3::new(1.5, -2.0, 300.0));
        assert_eq!(rest.trim(), "1.0");
    }

    #[test]
    fn test_vector3_rejects_glued_garbage() {
        assert!(vector3("1 2x 3").is_err());
        assert!(vector3("1 2 3x").is_err());
        assert!(vector3("1 2").is_err());
    }

    #[test]
    fn test_vector3_rejects_non_finite() {
        assert!(vector3("nan 0 0").is_err());
        assert!(vector3("0 inf 0").is_err());
    }

    #[test]
    fn test_keyword_requires_whitespace() {
        assert!(keyword("v")("v 1 2 3").is_ok());
        assert!(keyword("v")("vn 1 2 3").is_err());
        assert!(keyword("v")("v\t1 2 3").is_ok());
    }

    #[test]
    fn test_integer_tokens() {
        assert_eq!(count_token("12"), Some(12));
        assert_eq!(count_token("-1"), None);
        assert_eq!(index_token("-4"), Some(-4));
        assert_eq!(index_token("4x"), None);
    }
}
