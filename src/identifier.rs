// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use std::cmp::Ordering;

use capacity_builder::StringAppendable;
use capacity_builder::StringBuilder;
use capacity_builder::StringType;

use crate::SmallStackString;

/// One dot-separated prerelease or build metadata identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionPreOrBuild(SmallStackString);

impl VersionPreOrBuild {
  #[allow(clippy::should_implement_trait)]
  pub fn from_str(text: &str) -> Self {
    Self(SmallStackString::from_str(text))
  }

  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }

  /// The numeric value of an all-digit identifier.
  ///
  /// Digit runs too large for a `u64` are treated as alphanumeric.
  pub fn as_number(&self) -> Option<u64> {
    let text = self.0.as_str();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
      text.parse::<u64>().ok()
    } else {
      None
    }
  }
}

impl<'a> StringAppendable<'a> for &'a VersionPreOrBuild {
  fn append_to_builder<TString: StringType>(
    self,
    builder: &mut StringBuilder<'a, TString>,
  ) {
    builder.append(&self.0);
  }
}

/// Appends identifiers joined by `.`.
pub(crate) fn append_identifiers<'a, TString: StringType>(
  builder: &mut StringBuilder<'a, TString>,
  parts: &'a [VersionPreOrBuild],
) {
  for (i, part) in parts.iter().enumerate() {
    if i > 0 {
      builder.append('.');
    }
    builder.append(part);
  }
}

// https://github.com/npm/node-semver/blob/4907647d169948a53156502867ed679268063a9f/internal/identifiers.js
fn compare_identifier(
  a: &VersionPreOrBuild,
  b: &VersionPreOrBuild,
) -> Ordering {
  // prefer numbers
  match (a.as_number(), b.as_number()) {
    // leading zeros break the tie so the order agrees with equality
    (Some(a_num), Some(b_num)) => {
      a_num.cmp(&b_num).then_with(|| a.as_str().cmp(b.as_str()))
    }
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => a.as_str().cmp(b.as_str()),
  }
}

/// Compares two identifier lists position by position. When every shared
/// position is equal the shorter list is lower.
pub fn compare_identifiers(
  a: &[VersionPreOrBuild],
  b: &[VersionPreOrBuild],
) -> Ordering {
  for (a, b) in a.iter().zip(b.iter()) {
    let cmp_result = compare_identifier(a, b);
    if cmp_result != Ordering::Equal {
      return cmp_result;
    }
  }
  a.len().cmp(&b.len())
}

/// A version with a prerelease sorts below the same version without one.
pub fn compare_pre(
  a: &[VersionPreOrBuild],
  b: &[VersionPreOrBuild],
) -> Ordering {
  match (a.is_empty(), b.is_empty()) {
    (true, true) => Ordering::Equal,
    (false, true) => Ordering::Less,
    (true, false) => Ordering::Greater,
    (false, false) => compare_identifiers(a, b),
  }
}

/// A version without build metadata sorts below the same version with it.
pub fn compare_build(
  a: &[VersionPreOrBuild],
  b: &[VersionPreOrBuild],
) -> Ordering {
  match (a.is_empty(), b.is_empty()) {
    (true, true) => Ordering::Equal,
    (false, true) => Ordering::Greater,
    (true, false) => Ordering::Less,
    (false, false) => compare_identifiers(a, b),
  }
}
