// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use serde::Deserialize;
use serde::Serialize;

/// How build metadata affects ordering and matching.
#[derive(
  Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum BuildMetadataOrdering {
  /// Build metadata is compared after the prerelease. A version without
  /// build metadata sorts below the same version with it.
  #[default]
  Compare,
  /// Versions that differ only in build metadata are equal.
  Ignore,
}

/// Options for comparing versions and matching them against ranges.
#[derive(
  Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase", default)]
pub struct CompareOptions {
  pub build: BuildMetadataOrdering,
}

impl CompareOptions {
  pub fn ignore_build() -> Self {
    Self {
      build: BuildMetadataOrdering::Ignore,
    }
  }
}
