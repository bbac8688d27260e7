// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use capacity_builder::CapacityDisplay;
use capacity_builder::StringAppendable;
use capacity_builder::StringBuilder;
use capacity_builder::StringType;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde::Serialize;

mod common;
mod comparator;
mod error;
mod identifier;
mod options;
mod partial;
mod range;
mod string;

pub use self::comparator::Comparator;
pub use self::comparator::ComparatorChain;
pub use self::comparator::Operator;
pub use self::error::ParseErrorKind;
pub use self::error::ParseFailure;
pub use self::error::VersionParseError;
pub use self::error::VersionReqParseError;
pub use self::identifier::compare_build;
pub use self::identifier::compare_identifiers;
pub use self::identifier::compare_pre;
pub use self::identifier::VersionPreOrBuild;
pub use self::options::BuildMetadataOrdering;
pub use self::options::CompareOptions;
pub use self::partial::BoundOverflowError;
pub use self::partial::Partial;
pub use self::partial::VersionBoundKind;
pub use self::partial::XRange;
pub use self::range::VersionRangeSet;
pub use self::string::SmallStackString;
pub use self::string::StackString;

/// Requirement that matches every version.
pub static WILDCARD_VERSION_REQ: Lazy<VersionReq> = Lazy::new(|| VersionReq {
  raw_text: "*".to_string(),
  range_set: VersionRangeSet(vec![ComparatorChain(vec![Comparator::new(
    Operator::GreaterThanOrEqual,
    Version::default(),
  )])]),
});

/// A `major.minor.patch` version with optional prerelease and build
/// identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Default, Hash, CapacityDisplay)]
pub struct Version {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
  pub pre: Vec<VersionPreOrBuild>,
  pub build: Vec<VersionPreOrBuild>,
}

impl<'a> StringAppendable<'a> for &'a Version {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    builder.append(self.major);
    builder.append('.');
    builder.append(self.minor);
    builder.append('.');
    builder.append(self.patch);
    if !self.pre.is_empty() {
      builder.append('-');
      identifier::append_identifiers(builder, &self.pre);
    }
    if !self.build.is_empty() {
      builder.append('+');
      identifier::append_identifiers(builder, &self.build);
    }
  }
}

impl Serialize for Version {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.to_custom_string::<StackString>().as_str())
  }
}

impl<'de> Deserialize<'de> for Version {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let text = String::deserialize(deserializer)?;
    Version::parse(&text).map_err(serde::de::Error::custom)
  }
}

impl Version {
  pub fn new(major: u64, minor: u64, patch: u64) -> Self {
    Self {
      major,
      minor,
      patch,
      pre: Vec::new(),
      build: Vec::new(),
    }
  }

  /// Parse a version such as `1.2.3`, `v1.2.3-beta.1` or `1.2.3+build`.
  ///
  /// Surrounding whitespace is ignored.
  pub fn parse(text: &str) -> Result<Version, VersionParseError> {
    error::parse_all("version", text.trim(), common::version)
      .map_err(VersionParseError::from)
  }

  /// Parses a version at the start of `text`, returning it along with the
  /// number of bytes it spans. Text after the version is left alone.
  ///
  /// Unlike [`Version::parse`], leading whitespace is not skipped.
  pub fn parse_prefix(
    text: &str,
  ) -> Result<(Version, usize), VersionParseError> {
    error::parse_prefix("version", text, common::version)
      .map_err(VersionParseError::from)
  }

  /// Compares using the given build metadata policy.
  pub fn compare_with(
    &self,
    other: &Version,
    options: CompareOptions,
  ) -> Ordering {
    self
      .major
      .cmp(&other.major)
      .then_with(|| self.minor.cmp(&other.minor))
      .then_with(|| self.patch.cmp(&other.patch))
      .then_with(|| compare_pre(&self.pre, &other.pre))
      .then_with(|| match options.build {
        BuildMetadataOrdering::Compare => {
          compare_build(&self.build, &other.build)
        }
        BuildMetadataOrdering::Ignore => Ordering::Equal,
      })
  }

  /// Writes as much of the canonical text as fits into `buf` and returns
  /// the length of the full text.
  ///
  /// When the returned length is larger than `buf`, the output was
  /// truncated and the caller may retry with a larger buffer.
  pub fn write_to(&self, buf: &mut [u8]) -> usize {
    let text = self.to_custom_string::<StackString>();
    let bytes = text.as_str().as_bytes();
    let len = bytes.len().min(buf.len());
    buf[..len].copy_from_slice(&bytes[..len]);
    bytes.len()
  }
}

impl std::cmp::PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl std::cmp::Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    self.compare_with(other, CompareOptions::default())
  }
}

/// A version constraint along with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct VersionReq {
  raw_text: String,
  range_set: VersionRangeSet,
}

impl PartialEq for VersionReq {
  fn eq(&self, other: &Self) -> bool {
    self.range_set == other.range_set
  }
}

impl Eq for VersionReq {}

impl Hash for VersionReq {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.range_set.hash(state);
  }
}

impl Serialize for VersionReq {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    self.range_set.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for VersionReq {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let text = String::deserialize(deserializer)?;
    VersionReq::parse(&text).map_err(serde::de::Error::custom)
  }
}

impl VersionReq {
  pub fn parse(text: &str) -> Result<Self, VersionReqParseError> {
    let range_set = VersionRangeSet::parse(text)?;
    Ok(Self {
      raw_text: text.to_string(),
      range_set,
    })
  }

  pub fn range(&self) -> &VersionRangeSet {
    &self.range_set
  }

  pub fn matches(&self, version: &Version) -> bool {
    self.range_set.satisfies(version)
  }

  pub fn matches_with(
    &self,
    version: &Version,
    options: CompareOptions,
  ) -> bool {
    self.range_set.satisfies_with(version, options)
  }

  pub fn version_text(&self) -> &str {
    &self.raw_text
  }

  pub fn to_string_normalized(&self) -> String {
    self.range_set.to_string()
  }
}

impl fmt::Display for VersionReq {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", &self.raw_text)
  }
}

pub fn parse_version(text: &str) -> Result<Version, VersionParseError> {
  Version::parse(text)
}

/// Total order over versions, build metadata included.
pub fn compare(a: &Version, b: &Version) -> Ordering {
  a.cmp(b)
}

pub fn serialize_version(version: &Version) -> String {
  version.to_string()
}

pub fn parse_range(
  text: &str,
) -> Result<VersionRangeSet, VersionReqParseError> {
  VersionRangeSet::parse(text)
}

pub fn range_matches(version: &Version, range: &VersionRangeSet) -> bool {
  range.satisfies(version)
}

pub fn serialize_range(range: &VersionRangeSet) -> String {
  range.to_string()
}

/// Parses a single AND chain of comparators, without `||`.
pub fn parse_comparator(
  text: &str,
) -> Result<ComparatorChain, VersionReqParseError> {
  ComparatorChain::parse(text)
}
