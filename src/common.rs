// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use monch::*;

use crate::error::fail;
use crate::error::ParseErrorKind;
use crate::Operator;
use crate::Partial;
use crate::Version;
use crate::VersionPreOrBuild;
use crate::XRange;

// range            ::= comparator-chain ( logical-or comparator-chain ) *
// logical-or       ::= blank * '||' blank *
// comparator-chain ::= atom ( ' ' atom ) *
// atom             ::= ( '^' | '~' ) partial
//                    | operator partial
//                    | partial ( ' - ' partial )?
// operator         ::= '<' | '>' | '>=' | '<=' | '='
// partial          ::= 'v'? xr ( '.' xr ( '.' xr qualifier ? )? )?
// xr               ::= 'x' | 'X' | '*' | nr
// nr               ::= ['0'-'9'] +
// qualifier        ::= ( '-' pre )? ( '+' build )?
// pre              ::= parts
// build            ::= parts
// parts            ::= part ( '.' part ) *
// part             ::= [-0-9A-Za-z]+

pub fn is_blank(c: char) -> bool {
  matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub fn skip_blanks(input: &str) -> ParseResult<()> {
  skip_while(is_blank)(input)
}

// logical-or ::= blank * '||' blank *
pub fn logical_or(input: &str) -> ParseResult<&str> {
  delimited(skip_blanks, tag("||"), skip_blanks)(input)
}

// nr ::= ['0'-'9'] +
pub fn nr(input: &str) -> ParseResult<u64> {
  // leading zeros are accepted, so 01.02.03 reads as 1.2.3
  let (rest, digits) =
    if_not_empty(substring(skip_while(|c| c.is_ascii_digit())))(input)?;
  match digits.parse::<u64>() {
    Ok(val) => Ok((rest, val)),
    Err(_) => fail(input, ParseErrorKind::MalformedNumber),
  }
}

/// A number that must be present.
fn number(input: &str) -> ParseResult<u64> {
  match nr(input) {
    Err(ParseError::Backtrace) => fail(input, ParseErrorKind::MalformedNumber),
    result => result,
  }
}

/// A `.` that must be present.
fn separator(input: &str) -> ParseResult<char> {
  match ch('.')(input) {
    Err(ParseError::Backtrace) => {
      fail(input, ParseErrorKind::MissingSeparator)
    }
    result => result,
  }
}

// xr ::= 'x' | 'X' | '*' | nr
pub fn xr(input: &str) -> ParseResult<XRange> {
  or(
    map(or3(ch('x'), ch('X'), ch('*')), |_| XRange::Wildcard),
    map(nr, XRange::Val),
  )(input)
}

/// An `xr` that must be present.
fn component(input: &str) -> ParseResult<XRange> {
  match xr(input) {
    Err(ParseError::Backtrace) => fail(input, ParseErrorKind::MalformedNumber),
    result => result,
  }
}

// partial ::= 'v'? xr ( '.' xr ( '.' xr qualifier ? )? )?
pub fn partial(input: &str) -> ParseResult<Partial> {
  let (input, _) = maybe(ch('v'))(input)?; // skip leading v
  let (input, major) = component(input)?;
  let (input, maybe_minor) = maybe(preceded(ch('.'), component))(input)?;
  let (input, maybe_patch) = if maybe_minor.is_some() {
    maybe(preceded(ch('.'), component))(input)?
  } else {
    (input, None)
  };
  let mut partial = Partial::new(
    major,
    maybe_minor.unwrap_or(XRange::Wildcard),
    maybe_patch.unwrap_or(XRange::Wildcard),
    Vec::new(),
    Vec::new(),
  );
  // qualifiers only follow a concrete patch
  let (input, qual) = if partial.is_concrete() {
    qualifier(input)?
  } else {
    (input, Qualifier::default())
  };
  partial.pre = qual.pre;
  partial.build = qual.build;
  Ok((input, partial))
}

/// A full `major.minor.patch` version with an optional qualifier.
pub fn version(input: &str) -> ParseResult<Version> {
  let (input, _) = maybe(ch('v'))(input)?; // skip leading v
  let (input, major) = number(input)?;
  let (input, _) = separator(input)?;
  let (input, minor) = number(input)?;
  let (input, _) = separator(input)?;
  let (input, patch) = number(input)?;
  let (input, q) = qualifier(input)?;
  Ok((
    input,
    Version {
      major,
      minor,
      patch,
      pre: q.pre,
      build: q.build,
    },
  ))
}

#[derive(Debug, Clone, Default)]
pub struct Qualifier {
  pub pre: Vec<VersionPreOrBuild>,
  pub build: Vec<VersionPreOrBuild>,
}

// qualifier ::= ( '-' pre )? ( '+' build )?
pub fn qualifier(input: &str) -> ParseResult<Qualifier> {
  let (input, pre_parts) = maybe(preceded(ch('-'), parts))(input)?;
  let (input, build_parts) = maybe(preceded(ch('+'), parts))(input)?;
  Ok((
    input,
    Qualifier {
      pre: pre_parts.unwrap_or_default(),
      build: build_parts.unwrap_or_default(),
    },
  ))
}

// parts ::= part ( '.' part ) *
pub fn parts(input: &str) -> ParseResult<Vec<VersionPreOrBuild>> {
  let (mut input, first) = part(input)?;
  let mut parts = vec![VersionPreOrBuild::from_str(first)];
  // a trailing '.' is left in the input for the caller to reject
  while let Ok((rest, text)) = preceded(ch('.'), part)(input) {
    parts.push(VersionPreOrBuild::from_str(text));
    input = rest;
  }
  Ok((input, parts))
}

// part ::= [-0-9A-Za-z]+
pub fn part(input: &str) -> ParseResult<&str> {
  if_true(
    take_while(|c| c.is_ascii_alphanumeric() || c == '-'),
    |result| !result.is_empty(),
  )(input)
}

pub fn operator(input: &str) -> ParseResult<Operator> {
  or5(
    map(tag(">="), |_| Operator::GreaterThanOrEqual),
    map(tag("<="), |_| Operator::LessThanOrEqual),
    map(ch('<'), |_| Operator::LessThan),
    map(ch('>'), |_| Operator::GreaterThan),
    map(ch('='), |_| Operator::Equal),
  )(input)
}
