// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use std::fmt;

use deno_error::JsError;
use monch::ParseError;
use monch::ParseErrorFailure;
use monch::ParseResult;
use thiserror::Error;

/// The reason a version or range failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
  /// A digit run was required but not found, or it does not fit in a `u64`.
  MalformedNumber,
  /// A `.` was required between version components.
  MissingSeparator,
  /// The input ended where another comparator was required, such as after
  /// an operator, a `||`, or the ` - ` of a hyphen range.
  UnterminatedChain,
  /// Memory could not be reserved while growing a comparator chain.
  AllocationFailure,
  /// Input remained after a complete version or range.
  UnexpectedCharacter,
  /// The input was empty or only whitespace.
  Empty,
}

impl ParseErrorKind {
  const ALL: [ParseErrorKind; 6] = [
    ParseErrorKind::MalformedNumber,
    ParseErrorKind::MissingSeparator,
    ParseErrorKind::UnterminatedChain,
    ParseErrorKind::AllocationFailure,
    ParseErrorKind::UnexpectedCharacter,
    ParseErrorKind::Empty,
  ];

  pub fn message(self) -> &'static str {
    match self {
      ParseErrorKind::MalformedNumber => "Expected a number.",
      ParseErrorKind::MissingSeparator => "Expected '.'.",
      ParseErrorKind::UnterminatedChain => "Unexpected end of input.",
      ParseErrorKind::AllocationFailure => "Out of memory.",
      ParseErrorKind::UnexpectedCharacter => "Unexpected character.",
      ParseErrorKind::Empty => "Empty input.",
    }
  }

  /// Recovers the kind from a failure raised by [`fail`].
  ///
  /// Every hard failure in this crate is raised through [`fail`], which
  /// stores the kind's message. A failure from anywhere else carries no kind
  /// and is reported as an unexpected character.
  pub(crate) fn from_message(message: &str) -> Self {
    Self::ALL
      .into_iter()
      .find(|kind| kind.message() == message)
      .unwrap_or(ParseErrorKind::UnexpectedCharacter)
  }
}

impl fmt::Display for ParseErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.message())
  }
}

/// Where and why parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
  kind: ParseErrorKind,
  offset: usize,
  remaining: String,
}

impl ParseFailure {
  fn new(text: &str, remaining: &str, kind: ParseErrorKind) -> Self {
    Self {
      kind,
      offset: text.len() - remaining.len(),
      remaining: remaining.to_string(),
    }
  }
}

impl std::error::Error for ParseFailure {}

impl fmt::Display for ParseFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.kind)?;
    if !self.remaining.is_empty() {
      write!(f, "\n  {}\n  ~", self.remaining)?;
    }
    Ok(())
  }
}

#[derive(Error, Debug, Clone, JsError, PartialEq, Eq)]
#[class(type)]
#[error("Invalid version. {source}")]
pub struct VersionParseError {
  #[source]
  source: ParseFailure,
}

impl VersionParseError {
  pub fn kind(&self) -> ParseErrorKind {
    self.source.kind
  }

  /// Byte offset into the trimmed input where parsing stopped.
  pub fn offset(&self) -> usize {
    self.source.offset
  }
}

#[derive(Error, Debug, Clone, JsError, PartialEq, Eq)]
#[class(type)]
#[error("Invalid version requirement. {source}")]
pub struct VersionReqParseError {
  #[source]
  source: ParseFailure,
}

impl VersionReqParseError {
  pub fn kind(&self) -> ParseErrorKind {
    self.source.kind
  }

  /// Byte offset into the trimmed input where parsing stopped.
  pub fn offset(&self) -> usize {
    self.source.offset
  }
}

impl From<ParseFailure> for VersionParseError {
  fn from(source: ParseFailure) -> Self {
    Self { source }
  }
}

impl From<ParseFailure> for VersionReqParseError {
  fn from(source: ParseFailure) -> Self {
    Self { source }
  }
}

/// Raises a hard failure that stops the whole parse.
pub(crate) fn fail<T>(input: &str, kind: ParseErrorKind) -> ParseResult<'_, T> {
  Err(ParseError::Failure(ParseErrorFailure {
    input,
    message: kind.message().to_string(),
  }))
}

fn run<'a, T>(
  text: &'a str,
  combinator: impl Fn(&'a str) -> ParseResult<'a, T>,
) -> Result<(&'a str, T), ParseFailure> {
  if text.is_empty() {
    return Err(ParseFailure::new(text, text, ParseErrorKind::Empty));
  }
  match combinator(text) {
    Ok(result) => Ok(result),
    Err(ParseError::Backtrace) => Err(ParseFailure::new(
      text,
      text,
      ParseErrorKind::UnexpectedCharacter,
    )),
    Err(ParseError::Failure(failure)) => Err(ParseFailure::new(
      text,
      failure.input,
      ParseErrorKind::from_message(&failure.message),
    )),
  }
}

fn trace_rejection<T>(what: &'static str, result: &Result<T, ParseFailure>) {
  if let Err(failure) = result {
    tracing::debug!(
      kind = ?failure.kind,
      offset = failure.offset,
      "rejected {what} text"
    );
  }
}

/// Runs a combinator over the entire input, which must be fully consumed.
pub(crate) fn parse_all<'a, T>(
  what: &'static str,
  text: &'a str,
  combinator: impl Fn(&'a str) -> ParseResult<'a, T>,
) -> Result<T, ParseFailure> {
  let result = run(text, combinator).and_then(|(remaining, value)| {
    if remaining.is_empty() {
      Ok(value)
    } else {
      Err(ParseFailure::new(
        text,
        remaining,
        ParseErrorKind::UnexpectedCharacter,
      ))
    }
  });
  trace_rejection(what, &result);
  result
}

/// Runs a combinator at the start of the input and returns the value along
/// with the number of bytes it consumed.
pub(crate) fn parse_prefix<'a, T>(
  what: &'static str,
  text: &'a str,
  combinator: impl Fn(&'a str) -> ParseResult<'a, T>,
) -> Result<(T, usize), ParseFailure> {
  let result = run(text, combinator)
    .map(|(remaining, value)| (value, text.len() - remaining.len()));
  trace_rejection(what, &result);
  result
}
