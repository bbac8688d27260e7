// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use capacity_builder::CapacityDisplay;
use capacity_builder::StringAppendable;
use capacity_builder::StringBuilder;
use capacity_builder::StringType;
use monch::*;
use serde::Deserialize;
use serde::Serialize;

use crate::common::logical_or;
use crate::comparator::comparator_chain;
use crate::error::fail;
use crate::error::parse_all;
use crate::error::ParseErrorKind;
use crate::CompareOptions;
use crate::ComparatorChain;
use crate::StackString;
use crate::Version;
use crate::VersionReqParseError;

/// Collection of comparator chains joined by `||`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, CapacityDisplay)]
pub struct VersionRangeSet(pub Vec<ComparatorChain>);

impl<'a> StringAppendable<'a> for &'a VersionRangeSet {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    for (i, chain) in self.0.iter().enumerate() {
      if i > 0 {
        builder.append(" || ");
      }
      builder.append(chain);
    }
  }
}

impl Serialize for VersionRangeSet {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(
      self.to_custom_string::<StackString>().as_str(),
    )
  }
}

impl<'de> Deserialize<'de> for VersionRangeSet {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let text = String::deserialize(deserializer)?;
    VersionRangeSet::parse(&text).map_err(serde::de::Error::custom)
  }
}

impl VersionRangeSet {
  /// Parses a range such as `^1.2.3 || >=2.0.0 <3`.
  ///
  /// Surrounding whitespace is ignored.
  pub fn parse(text: &str) -> Result<Self, VersionReqParseError> {
    parse_all("range", text.trim(), range_set)
      .map_err(VersionReqParseError::from)
  }

  pub fn chains(&self) -> &[ComparatorChain] {
    &self.0
  }

  pub fn satisfies(&self, version: &Version) -> bool {
    self.satisfies_with(version, CompareOptions::default())
  }

  /// Gets if any chain matches the version. An empty set matches nothing.
  pub fn satisfies_with(
    &self,
    version: &Version,
    options: CompareOptions,
  ) -> bool {
    self.0.iter().any(|c| c.matches_with(version, options))
  }
}

// range ::= comparator-chain ( logical-or comparator-chain ) *
fn range_set(input: &str) -> ParseResult<VersionRangeSet> {
  let (mut input, first) = comparator_chain(input)?;
  let mut chains = vec![first];
  loop {
    match logical_or(input) {
      Ok((rest, _)) => {
        let (rest, chain) = comparator_chain(rest)?;
        // only reachable when the allocator refuses the request
        if chains.try_reserve(1).is_err() {
          return fail(input, ParseErrorKind::AllocationFailure);
        }
        chains.push(chain);
        input = rest;
      }
      Err(ParseError::Backtrace) => break,
      Err(err) => return Err(err),
    }
  }
  Ok((input, VersionRangeSet(chains)))
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  struct VersionReqTester(VersionRangeSet);

  impl VersionReqTester {
    fn new(text: &str) -> Self {
      Self(VersionRangeSet::parse(text).unwrap())
    }

    fn matches(&self, version: &str) -> bool {
      self.0.satisfies(&Version::parse(version).unwrap())
    }
  }

  #[test]
  fn caret() {
    let tester = VersionReqTester::new("^1.2.3");
    assert!(tester.matches("1.2.3"));
    assert!(tester.matches("1.2.4"));
    assert!(tester.matches("1.9.9"));
    assert!(!tester.matches("1.2.2"));
    assert!(!tester.matches("2.0.0"));

    let tester = VersionReqTester::new("^0.2.3");
    assert!(tester.matches("0.2.4"));
    assert!(!tester.matches("0.3.0"));

    let tester = VersionReqTester::new("^0.0.3");
    assert!(tester.matches("0.0.3"));
    assert!(!tester.matches("0.0.4"));
    assert!(!tester.matches("0.0.2"));

    // wildcards revert to zero before the bound is computed
    let tester = VersionReqTester::new("^0.x");
    assert!(tester.matches("0.0.0"));
    assert!(!tester.matches("0.0.1"));
    assert!(!tester.matches("0.5.0"));

    let tester = VersionReqTester::new("^1.x");
    assert!(tester.matches("1.5.0"));
    assert!(!tester.matches("2.0.0"));
  }

  #[test]
  fn tilde() {
    let tester = VersionReqTester::new("~1.2.3");
    assert!(tester.matches("1.2.9"));
    assert!(!tester.matches("1.3.0"));

    let tester = VersionReqTester::new("~1.2");
    assert!(tester.matches("1.2.0"));
    assert!(tester.matches("1.2.9"));
    assert!(!tester.matches("1.3.0"));

    let tester = VersionReqTester::new("~1");
    assert!(tester.matches("1.9.9"));
    assert!(!tester.matches("2.0.0"));
  }

  #[test]
  fn x_range() {
    let tester = VersionReqTester::new("1.2.x");
    assert!(tester.matches("1.2.0"));
    assert!(tester.matches("1.2.99"));
    assert!(!tester.matches("1.3.0"));
    assert!(!tester.matches("1.1.9"));

    let tester = VersionReqTester::new("1.x");
    assert!(tester.matches("1.0.0"));
    assert!(tester.matches("1.99.99"));
    assert!(!tester.matches("2.0.0"));
    assert!(!tester.matches("0.9.9"));

    for text in ["x", "X", "*"] {
      let tester = VersionReqTester::new(text);
      assert!(tester.matches("0.0.0"));
      assert!(tester.matches("1.2.3"));
      assert!(tester.matches("99.0.0-beta"));
    }
  }

  #[test]
  fn hyphen() {
    let tester = VersionReqTester::new("1.2.3 - 2.3.4");
    assert!(tester.matches("1.2.3"));
    assert!(tester.matches("2.0.0"));
    assert!(tester.matches("2.3.4"));
    assert!(!tester.matches("1.2.2"));
    assert!(!tester.matches("2.3.5"));

    let tester = VersionReqTester::new("1.2 - 2.3");
    assert!(tester.matches("1.2.0"));
    assert!(tester.matches("2.3.99"));
    assert!(!tester.matches("2.4.0"));
  }

  #[test]
  fn or_composition() {
    let tester = VersionReqTester::new("1.0.0 || 2.0.0");
    assert!(tester.matches("1.0.0"));
    assert!(tester.matches("2.0.0"));
    assert!(!tester.matches("1.0.1"));
    assert!(!tester.matches("1.5.0"));
    assert!(!tester.matches("2.0.1"));

    let tester = VersionReqTester::new("<1.0.0 ||\t>=2 <3");
    assert!(tester.matches("0.9.0"));
    assert!(tester.matches("2.5.0"));
    assert!(!tester.matches("1.5.0"));
    assert!(!tester.matches("3.0.0"));
  }

  #[test]
  fn long_alternations() {
    let text = vec!["1.0.0"; 200_000].join(" || ");
    let set = VersionRangeSet::parse(&text).unwrap();
    assert_eq!(set.0.len(), 200_000);
    assert!(set.satisfies(&Version::new(1, 0, 0)));
    assert!(!set.satisfies(&Version::new(1, 0, 1)));
  }

  #[test]
  fn empty_set_matches_nothing() {
    let set = VersionRangeSet(Vec::new());
    assert!(!set.satisfies(&Version::new(1, 0, 0)));
  }

  #[test]
  fn normalized_text() {
    #[track_caller]
    fn run_test(input: &str, expected: &str) {
      let set = VersionRangeSet::parse(input).unwrap();
      assert_eq!(set.to_string(), expected);
      // a second pass is stable
      let reparsed = VersionRangeSet::parse(&set.to_string()).unwrap();
      assert_eq!(reparsed.to_string(), expected);
      assert_eq!(reparsed, set);
    }

    run_test("1.0.0 || 2.0.0", "1.0.0 || 2.0.0");
    run_test("^1.2.3 || ~2", ">=1.2.3 <2.0.0 || >=2.0.0 <3.0.0");
    run_test("1.x  ||  >1", ">=1.0.0 <2.0.0 || >1.0.0");
    run_test("1.2.3 - 2.3.4", ">=1.2.3 <=2.3.4");
    run_test("v1.2.3-beta.1", "1.2.3-beta.1");
    run_test("*", ">=0.0.0");
    run_test("=1.2.3+build", "=1.2.3+build");
    run_test(">= 1.2 <= 3", ">=1.2.0 <=3.0.0");
  }

  #[test]
  fn parse_errors() {
    #[track_caller]
    fn run_test(input: &str, kind: ParseErrorKind, offset: usize) {
      let err = VersionRangeSet::parse(input).unwrap_err();
      assert_eq!(err.kind(), kind, "{input}");
      assert_eq!(err.offset(), offset, "{input}");
    }

    run_test("", ParseErrorKind::Empty, 0);
    run_test(" \t ", ParseErrorKind::Empty, 0);
    run_test("abc", ParseErrorKind::MalformedNumber, 0);
    run_test("1.2.3 ||", ParseErrorKind::UnterminatedChain, 8);
    run_test("1.2.3 || ^", ParseErrorKind::UnterminatedChain, 10);
    run_test(">=", ParseErrorKind::UnterminatedChain, 2);
    run_test("1.2.3  2.0.0", ParseErrorKind::UnexpectedCharacter, 5);
    run_test("1.2.3 | 2", ParseErrorKind::UnexpectedCharacter, 5);
    run_test("1.2.3x", ParseErrorKind::UnexpectedCharacter, 5);
    run_test("1.2x", ParseErrorKind::UnexpectedCharacter, 3);
    run_test("^1.2.3 || >=x.", ParseErrorKind::MalformedNumber, 14);
  }

  #[test]
  fn error_message() {
    let err = VersionRangeSet::parse("1.2.3 | 2").unwrap_err();
    assert_eq!(
      err.to_string(),
      "Invalid version requirement. Unexpected character.\n   | 2\n  ~"
    );
  }

  #[test]
  fn serialize_deserialize() {
    let set: VersionRangeSet = serde_json::from_str("\"~1.2 || 3\"").unwrap();
    assert_eq!(
      serde_json::to_string(&set).unwrap(),
      "\">=1.2.0 <1.3.0 || >=3.0.0 <4.0.0\""
    );
    assert!(serde_json::from_str::<VersionRangeSet>("\"1 ||\"").is_err());
  }
}
