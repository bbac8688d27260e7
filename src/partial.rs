// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use thiserror::Error;

use crate::Version;
use crate::VersionPreOrBuild;

/// A version component that could be a wildcard or number value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XRange {
  Wildcard,
  Val(u64),
}

impl XRange {
  /// Reverts a wildcard to a concrete zero.
  pub fn or_zero(self) -> u64 {
    match self {
      XRange::Wildcard => 0,
      XRange::Val(val) => val,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionBoundKind {
  Inclusive,
  Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Version component is too large to compute an upper bound.")]
pub struct BoundOverflowError;

fn bump(value: u64) -> Result<u64, BoundOverflowError> {
  value.checked_add(1).ok_or(BoundOverflowError)
}

/// A partial version such as `1`, `1.2`, `1.x` or `1.2.3-beta`.
///
/// Once a position is a wildcard, every position after it is a wildcard
/// as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partial {
  pub major: XRange,
  pub minor: XRange,
  pub patch: XRange,
  pub pre: Vec<VersionPreOrBuild>,
  pub build: Vec<VersionPreOrBuild>,
}

impl Partial {
  /// Builds a partial, turning every position after the first wildcard
  /// into a wildcard.
  pub fn new(
    major: XRange,
    minor: XRange,
    patch: XRange,
    pre: Vec<VersionPreOrBuild>,
    build: Vec<VersionPreOrBuild>,
  ) -> Self {
    let minor = match major {
      XRange::Wildcard => XRange::Wildcard,
      XRange::Val(_) => minor,
    };
    let patch = match minor {
      XRange::Wildcard => XRange::Wildcard,
      XRange::Val(_) => patch,
    };
    Self {
      major,
      minor,
      patch,
      pre,
      build,
    }
  }

  pub fn is_concrete(&self) -> bool {
    self.patch != XRange::Wildcard
  }

  /// The version with every wildcard reverted to zero.
  pub fn to_lower_version(&self) -> Version {
    Version {
      major: self.major.or_zero(),
      minor: self.minor.or_zero(),
      patch: self.patch.or_zero(),
      pre: self.pre.clone(),
      build: self.build.clone(),
    }
  }

  /// Exclusive upper bound of a caret range, which allows changes that do
  /// not modify the left-most non-zero component.
  ///
  /// Wildcards are reverted to zero first, so `^0.x` ends before `0.0.1`.
  pub fn caret_upper(&self) -> Result<Version, BoundOverflowError> {
    let major = self.major.or_zero();
    let minor = self.minor.or_zero();
    let patch = self.patch.or_zero();
    if major != 0 {
      Ok(Version::new(bump(major)?, 0, 0))
    } else if minor != 0 {
      Ok(Version::new(0, bump(minor)?, 0))
    } else {
      Ok(Version::new(0, 0, bump(patch)?))
    }
  }

  /// Exclusive upper bound of a tilde range, which allows patch-level
  /// changes when a minor version is given and minor-level changes
  /// otherwise.
  pub fn tilde_upper(&self) -> Result<Option<Version>, BoundOverflowError> {
    let XRange::Val(major) = self.major else {
      return Ok(None);
    };
    let end = match self.minor {
      XRange::Wildcard => Version::new(bump(major)?, 0, 0),
      XRange::Val(minor) => Version::new(major, bump(minor)?, 0),
    };
    Ok(Some(end))
  }

  /// Exclusive upper bound implied by the wildcard positions: `1.x` ends
  /// before `2.0.0` and `1.2.x` before `1.3.0`.
  ///
  /// Returns `None` for a wildcard major or a fully concrete partial.
  pub fn wildcard_upper(&self) -> Result<Option<Version>, BoundOverflowError> {
    let end = match (self.major, self.minor, self.patch) {
      (XRange::Wildcard, _, _) => return Ok(None),
      (XRange::Val(major), XRange::Wildcard, _) => {
        Version::new(bump(major)?, 0, 0)
      }
      (XRange::Val(major), XRange::Val(minor), XRange::Wildcard) => {
        Version::new(major, bump(minor)?, 0)
      }
      (XRange::Val(_), XRange::Val(_), XRange::Val(_)) => return Ok(None),
    };
    Ok(Some(end))
  }

  /// Closing bound when this partial is the right side of a hyphen range.
  ///
  /// A fully concrete version is included. Otherwise the bound excludes
  /// everything from the next wildcard position up.
  pub fn hyphen_upper(
    &self,
  ) -> Result<Option<(VersionBoundKind, Version)>, BoundOverflowError> {
    if self.is_concrete() {
      return Ok(Some((VersionBoundKind::Inclusive, self.to_lower_version())));
    }
    Ok(
      self
        .wildcard_upper()?
        .map(|end| (VersionBoundKind::Exclusive, end)),
    )
  }
}
