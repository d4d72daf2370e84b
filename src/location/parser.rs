//! Location expression parser
//!
//! Recursive descent over the compacted (whitespace-free) location text.
//! Operator arguments are split on top-level commas only, so
//! `join(complement(1..5),10..20)` has two arguments.
//!
//! Every grammar violation is reported as
//! [`GenbankError::MalformedLocation`] with the original text and a short
//! reason. Operators nest at most [`MAX_NESTING`] levels deep, which also
//! bounds the recursion of [`evaluate`](crate::location::evaluate) on
//! parsed trees.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{cut, opt},
    error::{ErrorKind, ParseError},
    multi::separated_list1,
    sequence::delimited,
    IResult, Parser,
};

use crate::coords::OneBasedPos;
use crate::error::GenbankError;
use crate::location::{Fuzzy, Location};

/// Why a location failed to parse
#[derive(Debug, Clone, PartialEq)]
enum Reason {
    Nom(ErrorKind),
    UnknownOperator(String),
    NonNumericEndpoint,
    EndpointOverflow,
    ZeroPosition,
    ReversedRange { start: u64, end: u64 },
    ComplementArity(usize),
}

/// Error type threaded through the nom combinators
#[derive(Debug, Clone, PartialEq)]
struct LocationError<'a> {
    input: &'a str,
    reason: Reason,
}

impl<'a> LocationError<'a> {
    fn failure(input: &'a str, reason: Reason) -> nom::Err<Self> {
        nom::Err::Failure(Self { input, reason })
    }

    fn describe(&self) -> String {
        match &self.reason {
            Reason::UnknownOperator(op) => format!("unrecognized operator '{op}'"),
            Reason::NonNumericEndpoint => "non-numeric range endpoint".to_string(),
            Reason::EndpointOverflow => "range endpoint too large".to_string(),
            Reason::ZeroPosition => "position 0 is not a valid 1-based coordinate".to_string(),
            Reason::ReversedRange { start, end } => {
                format!("range start {start} is greater than end {end}")
            }
            Reason::ComplementArity(n) => {
                format!("complement takes exactly one argument, found {n}")
            }
            Reason::Nom(_) => match self.input.chars().next() {
                Some(c) => format!("unexpected '{c}'"),
                None => "unexpected end of input".to_string(),
            },
        }
    }
}

impl<'a> ParseError<&'a str> for LocationError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            reason: Reason::Nom(kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type LocResult<'a, T> = IResult<&'a str, T, LocationError<'a>>;

/// Deepest operator nesting accepted by [`parse_location`]
pub const MAX_NESTING: usize = 64;

/// Parse a location expression
///
/// Whitespace anywhere in the text is ignored, so continuation lines from
/// a feature table can be passed joined as-is. `^` (between-base sites) is
/// read as a range separator.
///
/// # Examples
///
/// ```
/// use ferro_genbank::location::{parse_location, Location};
///
/// let loc = parse_location("complement(join(1..3, 5..7))").unwrap();
/// assert!(matches!(loc, Location::Complement { .. }));
///
/// assert!(parse_location("join(1..3").is_err());
/// assert!(parse_location("9..2").is_err());
/// ```
pub fn parse_location(raw: &str) -> Result<Location, GenbankError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(GenbankError::malformed_location(raw, "empty location"));
    }
    check_balanced(&compact).map_err(|reason| GenbankError::malformed_location(raw, reason))?;

    match location(&compact) {
        Ok(("", loc)) => Ok(loc),
        Ok((rest, _)) => Err(GenbankError::malformed_location(
            raw,
            format!("unexpected trailing input '{rest}'"),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(GenbankError::malformed_location(raw, e.describe()))
        }
        Err(nom::Err::Incomplete(_)) => Err(GenbankError::malformed_location(
            raw,
            "unexpected end of input",
        )),
    }
}

fn check_balanced(input: &str) -> Result<(), String> {
    let unbalanced = || "unbalanced parentheses".to_string();
    let mut depth: usize = 0;
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(format!("nesting deeper than {MAX_NESTING} levels"));
                }
            }
            ')' => depth = depth.checked_sub(1).ok_or_else(unbalanced)?,
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(unbalanced())
    }
}

fn location(input: &str) -> LocResult<'_, Location> {
    match input.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '<' || c == '>' => span(input),
        Some(c) if is_name_char(c) => operator_or_cross_reference(input),
        _ => Err(LocationError::failure(input, Reason::Nom(ErrorKind::Char))),
    }
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '|')
}

/// `join(...)`, `complement(...)`, `order(...)` or `ACCESSION:location`
fn operator_or_cross_reference(input: &str) -> LocResult<'_, Location> {
    let (rest, name) = take_while1(is_name_char).parse(input)?;

    if rest.starts_with('(') {
        let (rest, mut args) = arguments(rest)?;
        let loc = match name {
            "join" => Location::Join { parts: args },
            "order" => Location::Order { parts: args },
            "complement" => {
                if args.len() != 1 {
                    return Err(LocationError::failure(
                        input,
                        Reason::ComplementArity(args.len()),
                    ));
                }
                let inner = args.remove(0);
                Location::Complement {
                    inner: Box::new(inner),
                }
            }
            other => {
                return Err(LocationError::failure(
                    input,
                    Reason::UnknownOperator(other.to_string()),
                ))
            }
        };
        return Ok((rest, loc));
    }

    if let Some(after_colon) = rest.strip_prefix(':') {
        let (rest, inner) = location(after_colon)?;
        return Ok((
            rest,
            Location::CrossReference {
                accession: name.to_string(),
                inner: Box::new(inner),
            },
        ));
    }

    Err(LocationError::failure(input, Reason::NonNumericEndpoint))
}

/// Parenthesized, comma-separated argument list
fn arguments(input: &str) -> LocResult<'_, Vec<Location>> {
    delimited(
        char('('),
        separated_list1(char(','), location),
        cut(char(')')),
    )
    .parse(input)
}

/// `point` or `start..end` / `start^end`
fn span(input: &str) -> LocResult<'_, Location> {
    let (rest, (start, fuzzy_start)) = endpoint(input)?;
    let (rest, separator) = opt(alt((tag(".."), tag("^")))).parse(rest)?;

    if separator.is_none() {
        return Ok((
            rest,
            Location::SinglePoint {
                position: start,
                fuzzy: fuzzy_start,
            },
        ));
    }

    let (rest, (end, fuzzy_end)) = endpoint(rest)?;
    if start > end {
        return Err(LocationError::failure(
            input,
            Reason::ReversedRange {
                start: start.value(),
                end: end.value(),
            },
        ));
    }
    Ok((
        rest,
        Location::Range {
            start,
            end,
            fuzzy_start,
            fuzzy_end,
        },
    ))
}

/// Optional `<`/`>` followed by a 1-based position
fn endpoint(input: &str) -> LocResult<'_, (OneBasedPos, Option<Fuzzy>)> {
    let (rest, marker) = opt(one_of("<>")).parse(input)?;
    let (rest, digits) = digit1::<_, LocationError<'_>>(rest)
        .map_err(|_| LocationError::failure(rest, Reason::NonNumericEndpoint))?;
    let value: u64 = digits
        .parse()
        .map_err(|_| LocationError::failure(input, Reason::EndpointOverflow))?;
    let pos = OneBasedPos::try_new(value)
        .ok_or_else(|| LocationError::failure(input, Reason::ZeroPosition))?;
    Ok((rest, (pos, marker.and_then(Fuzzy::from_symbol))))
}
