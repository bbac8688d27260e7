// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use std::cmp::Ordering;

use capacity_builder::CapacityDisplay;
use capacity_builder::StringAppendable;
use capacity_builder::StringBuilder;
use capacity_builder::StringType;
use monch::*;

use crate::common::is_blank;
use crate::common::operator;
use crate::common::partial;
use crate::error::fail;
use crate::error::parse_all;
use crate::error::ParseErrorKind;
use crate::CompareOptions;
use crate::Partial;
use crate::Version;
use crate::VersionBoundKind;
use crate::VersionReqParseError;

/// The relation a comparator requires between a version and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
  /// Implicit equality of a bare version, written without an operator.
  Exact,
  Equal,
  LessThan,
  LessThanOrEqual,
  GreaterThan,
  GreaterThanOrEqual,
}

impl Operator {
  pub fn as_str(self) -> &'static str {
    match self {
      Operator::Exact => "",
      Operator::Equal => "=",
      Operator::LessThan => "<",
      Operator::LessThanOrEqual => "<=",
      Operator::GreaterThan => ">",
      Operator::GreaterThanOrEqual => ">=",
    }
  }

  /// Whether a version that compares as `ordering` against the bound is
  /// accepted.
  pub fn accepts(self, ordering: Ordering) -> bool {
    match ordering {
      Ordering::Less => {
        matches!(self, Operator::LessThan | Operator::LessThanOrEqual)
      }
      Ordering::Greater => {
        matches!(self, Operator::GreaterThan | Operator::GreaterThanOrEqual)
      }
      Ordering::Equal => matches!(
        self,
        Operator::Exact
          | Operator::Equal
          | Operator::LessThanOrEqual
          | Operator::GreaterThanOrEqual
      ),
    }
  }
}

/// A single bound: an operator plus the version it compares against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, CapacityDisplay)]
pub struct Comparator {
  pub operator: Operator,
  pub version: Version,
}

impl<'a> StringAppendable<'a> for &'a Comparator {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    builder.append(self.operator.as_str());
    builder.append(&self.version);
  }
}

impl Comparator {
  pub fn new(operator: Operator, version: Version) -> Self {
    Self { operator, version }
  }

  pub fn matches(&self, version: &Version) -> bool {
    self.matches_with(version, CompareOptions::default())
  }

  pub fn matches_with(
    &self,
    version: &Version,
    options: CompareOptions,
  ) -> bool {
    self
      .operator
      .accepts(version.compare_with(&self.version, options))
  }
}

/// Comparators that must all match (logical AND).
#[derive(Debug, Clone, PartialEq, Eq, Hash, CapacityDisplay)]
pub struct ComparatorChain(pub Vec<Comparator>);

impl<'a> StringAppendable<'a> for &'a ComparatorChain {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    for (i, comparator) in self.0.iter().enumerate() {
      if i > 0 {
        builder.append(' ');
      }
      builder.append(comparator);
    }
  }
}

impl ComparatorChain {
  pub fn comparators(&self) -> &[Comparator] {
    &self.0
  }

  /// Parses space separated comparators into a single chain.
  pub fn parse(text: &str) -> Result<Self, VersionReqParseError> {
    parse_all("comparator", text.trim(), comparator_chain)
      .map_err(VersionReqParseError::from)
  }

  /// Parses more comparators and appends them to this chain.
  ///
  /// The chain is left untouched when the text does not parse.
  pub fn and(&mut self, text: &str) -> Result<(), VersionReqParseError> {
    let other = Self::parse(text)?;
    self.0.extend(other.0);
    Ok(())
  }

  pub fn matches(&self, version: &Version) -> bool {
    self.matches_with(version, CompareOptions::default())
  }

  /// Matches when no comparator in the chain rejects the version.
  pub fn matches_with(
    &self,
    version: &Version,
    options: CompareOptions,
  ) -> bool {
    self.0.iter().all(|c| c.matches_with(version, options))
  }
}

/// The one or two comparators a single range atom expands to.
#[derive(Debug)]
struct Atom {
  first: Comparator,
  second: Option<Comparator>,
}

impl Atom {
  fn single(operator: Operator, version: Version) -> Self {
    Atom {
      first: Comparator::new(operator, version),
      second: None,
    }
  }

  /// `>= lower` followed by `< upper` when there is an upper bound.
  fn half_open(lower: Version, upper: Option<Version>) -> Self {
    Atom {
      first: Comparator::new(Operator::GreaterThanOrEqual, lower),
      second: upper.map(|upper| Comparator::new(Operator::LessThan, upper)),
    }
  }

  fn len(&self) -> usize {
    if self.second.is_some() {
      2
    } else {
      1
    }
  }
}

// comparator-chain ::= atom ( ' ' atom ) *
pub(crate) fn comparator_chain(input: &str) -> ParseResult<ComparatorChain> {
  let mut comparators: Vec<Comparator> = Vec::new();
  let mut input = input;
  loop {
    let (rest, atom) = atom(input)?;
    // only reachable when the allocator refuses the request
    if comparators.try_reserve(atom.len()).is_err() {
      return fail(input, ParseErrorKind::AllocationFailure);
    }
    comparators.push(atom.first);
    comparators.extend(atom.second);
    input = rest;
    match and_separator(input) {
      Ok((rest, ())) => input = rest,
      Err(ParseError::Backtrace) => break,
      Err(err) => return Err(err),
    }
  }
  Ok((input, ComparatorChain(comparators)))
}

/// Exactly one space joins two atoms. Anything else ends the chain.
fn and_separator(input: &str) -> ParseResult<()> {
  let mut chars = input.chars();
  match (chars.next(), chars.next()) {
    (Some(' '), None) => fail(input, ParseErrorKind::UnterminatedChain),
    (Some(' '), Some(next)) if !is_blank(next) && next != '|' => {
      Ok((&input[1..], ()))
    }
    _ => ParseError::backtrace(),
  }
}

// atom ::= ( '^' | '~' ) partial
//        | operator partial
//        | partial ( ' - ' partial )?
fn atom(input: &str) -> ParseResult<Atom> {
  if input.is_empty() {
    return fail(input, ParseErrorKind::UnterminatedChain);
  }
  or4(
    preceded(ch('^'), caret),
    preceded(ch('~'), tilde),
    primitive,
    bare,
  )(input)
}

/// The partial that follows an operator, which may be separated from it
/// by whitespace.
fn operand(input: &str) -> ParseResult<Partial> {
  let (input, _) = skip_whitespace(input)?;
  required_partial(input)
}

fn required_partial(input: &str) -> ParseResult<Partial> {
  if input.is_empty() {
    fail(input, ParseErrorKind::UnterminatedChain)
  } else {
    partial(input)
  }
}

// caret ::= '^' partial
fn caret(input: &str) -> ParseResult<Atom> {
  let start = input;
  let (input, partial) = operand(input)?;
  match partial.caret_upper() {
    Ok(upper) => {
      Ok((input, Atom::half_open(partial.to_lower_version(), Some(upper))))
    }
    Err(_) => fail(start, ParseErrorKind::MalformedNumber),
  }
}

// tilde ::= '~' partial
fn tilde(input: &str) -> ParseResult<Atom> {
  let start = input;
  let (input, partial) = operand(input)?;
  match partial.tilde_upper() {
    Ok(upper) => {
      Ok((input, Atom::half_open(partial.to_lower_version(), upper)))
    }
    Err(_) => fail(start, ParseErrorKind::MalformedNumber),
  }
}

// primitive ::= operator partial
fn primitive(input: &str) -> ParseResult<Atom> {
  let (input, operator) = operator(input)?;
  let (input, partial) = operand(input)?;
  // `>1.2` means `>1.2.0`
  Ok((input, Atom::single(operator, partial.to_lower_version())))
}

// partial ( ' - ' partial )?
fn bare(input: &str) -> ParseResult<Atom> {
  let start = input;
  let (input, lower) = partial(input)?;
  if input == " -" {
    return fail(&input[input.len()..], ParseErrorKind::UnterminatedChain);
  }
  if let Ok((input, _)) = tag(" - ")(input) {
    let (input, upper) = required_partial(input)?;
    let second = match upper.hyphen_upper() {
      Ok(bound) => bound.map(|(kind, version)| {
        let operator = match kind {
          VersionBoundKind::Inclusive => Operator::LessThanOrEqual,
          VersionBoundKind::Exclusive => Operator::LessThan,
        };
        Comparator::new(operator, version)
      }),
      Err(_) => return fail(start, ParseErrorKind::MalformedNumber),
    };
    return Ok((
      input,
      Atom {
        first: Comparator::new(
          Operator::GreaterThanOrEqual,
          lower.to_lower_version(),
        ),
        second,
      },
    ));
  }

  if lower.is_concrete() {
    return Ok((input, Atom::single(Operator::Exact, lower.to_lower_version())));
  }
  // a wildcard major has no upper bound and matches anything
  match lower.wildcard_upper() {
    Ok(upper) => Ok((input, Atom::half_open(lower.to_lower_version(), upper))),
    Err(_) => fail(start, ParseErrorKind::MalformedNumber),
  }
}
