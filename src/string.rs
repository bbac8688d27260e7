// Copyright 2018-2023 the Deno authors. All rights reserved. MIT license.

use capacity_builder::StringAppendable;
use capacity_builder::StringType;

macro_rules! shared {
  ($ident:ident) => {
    impl $ident {
      #[inline(always)]
      pub fn as_str(&self) -> &str {
        self.0.as_str()
      }
    }

    impl<'a> StringAppendable<'a> for &'a $ident {
      #[inline(always)]
      fn append_to_builder<TString: capacity_builder::StringType>(
        self,
        builder: &mut capacity_builder::StringBuilder<'a, TString>,
      ) {
        builder.append(self.0.as_str())
      }
    }
  };
}

/// A 24 byte string that uses the stack when < 24 bytes.
///
/// Normalized version and range text is built into this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackString(hipstr::HipStr<'static>);

shared!(StackString);

impl StringType for StackString {
  type MutType = hipstr::HipStr<'static>;

  #[inline(always)]
  fn with_capacity(
    size: usize,
  ) -> Result<Self::MutType, std::collections::TryReserveError> {
    Ok(hipstr::HipStr::with_capacity(size))
  }

  #[inline(always)]
  fn from_mut(inner: Self::MutType) -> Self {
    Self(inner)
  }
}

/// A 16 byte string that uses the stack when < 16 bytes.
///
/// Prerelease and build identifiers are almost always shorter than
/// this, so they are stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SmallStackString(ecow::EcoString);

shared!(SmallStackString);

impl SmallStackString {
  /// Creates a `SmallStackString` from a `&str`.
  #[allow(clippy::should_implement_trait)]
  #[inline(always)]
  pub fn from_str(s: &str) -> Self {
    Self(ecow::EcoString::from(s))
  }
}
