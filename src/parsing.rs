//! # Parsing Utilities
//!
//! Token-level combinators shared by the frame validator and the field parsers.
//! Every field arrives as an already split `&str`, so most of these parse a whole
//! token and reject anything left over.

use nom::{
    Err, Input, Mode, OutputMode, PResult, Parser,
    bytes::complete::take_while_m_n,
    character::complete::i64 as signed,
    combinator::map_res,
    error::{ErrorKind, ParseError},
    number::complete::{double, hex_u32},
};

use crate::{Error, IResult};

/// Ensures that the parser consumes all input.
///
/// # Arguments
///
/// * `f` - The parser to run
/// * `e` - Error kind to return if input is not fully consumed
///
/// # Examples
///
/// ```rust
/// use nmea0183_navdata::parsing::consumed;
/// use nom::{IResult, Parser, bytes::complete::take, error::ErrorKind};
///
/// let mut parser = consumed(take(3u8), ErrorKind::Count);
/// let result: IResult<_, _> = parser.parse("abc");
/// assert!(result.is_ok());
///
/// // Not all input is consumed
/// let result = parser.parse("abcd");
/// assert!(result.is_err());
/// ```
pub fn consumed<I, E: ParseError<I>, F>(
    f: F,
    e: ErrorKind,
) -> impl Parser<I, Output = <F as Parser<I>>::Output, Error = E>
where
    I: Input,
    F: Parser<I, Error = E>,
{
    Consumed { f, e }
}

struct Consumed<F> {
    f: F,
    e: ErrorKind,
}

impl<I, F> Parser<I> for Consumed<F>
where
    I: Input,
    F: Parser<I>,
{
    type Output = <F as Parser<I>>::Output;
    type Error = <F as Parser<I>>::Error;

    fn process<OM: OutputMode>(&mut self, i: I) -> PResult<OM, I, Self::Output, Self::Error> {
        let (i, o) = self.f.process::<OM>(i)?;

        if i.input_len() != 0 {
            return Err(Err::Error(OM::Error::bind(|| {
                <F as Parser<I>>::Error::from_error_kind(i, self.e)
            })));
        }

        Ok((i, o))
    }
}

/// Exactly two ASCII digits, as found in `hhmmss` and `ddmmyy` groups.
pub fn two_digits(i: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
        str::parse::<u8>,
    )
    .parse(i)
}

/// A complete decimal token such as `5624.91014` or `-12.4`.
///
/// Non-finite spellings (`nan`, `inf`) are rejected.
pub fn number(i: &str) -> IResult<&str, f64> {
    let (rest, value) = consumed(double, ErrorKind::Float).parse(i)?;

    if !value.is_finite() {
        return Err(Err::Error(Error::InvalidValue(i)));
    }

    Ok((rest, value))
}

/// A complete, optionally signed, integer token.
pub fn integer(i: &str) -> IResult<&str, i64> {
    consumed(signed, ErrorKind::Digit).parse(i)
}

/// A complete hexadecimal token that fits in one byte, such as a GSV signal id.
pub fn hex_byte(i: &str) -> IResult<&str, u8> {
    let (rest, value) = consumed(hex_u32, ErrorKind::HexDigit).parse(i)?;

    match u8::try_from(value) {
        Ok(value) => Ok((rest, value)),
        Err(_) => Err(Err::Error(Error::InvalidValue(i))),
    }
}
