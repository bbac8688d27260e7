fn main() {
  // Run registered benchmarks.
  divan::main();
}

mod version {
  use semver_match::Version;

  #[divan::bench]
  fn parse() -> u64 {
    Version::parse("1.1.1-pre.2+build.5").unwrap().patch
  }

  #[divan::bench]
  fn to_string() -> usize {
    version().to_string().len()
  }

  #[divan::bench]
  fn to_string_display() -> usize {
    format!("{}", version()).len()
  }

  #[divan::bench]
  fn write_to() -> usize {
    let mut buf = [0u8; 32];
    version().write_to(&mut buf)
  }

  fn version() -> Version {
    Version::parse("1.1.1-pre").unwrap()
  }
}

mod version_req {
  use semver_match::Version;
  use semver_match::VersionReq;

  #[divan::bench]
  fn parse() -> usize {
    VersionReq::parse("^1.2.3 || >=2.0.0 <3 || 4.x || 5.1.0 - 5.2")
      .unwrap()
      .range()
      .0
      .len()
  }

  #[divan::bench]
  fn matches() -> bool {
    version_req().matches(&Version::new(1, 5, 0))
  }

  #[divan::bench]
  fn to_string() -> usize {
    version_req().to_string().len()
  }

  #[divan::bench]
  fn to_string_normalized() -> usize {
    version_req().to_string_normalized().len()
  }

  fn version_req() -> VersionReq {
    VersionReq::parse("^1.1.1-pre || ~2.1").unwrap()
  }
}
