//! OS version helpers used to scope queries to a major release.

use crate::model::Package;

/// The leading major component of an OS version string.
///
/// Returns the text before the first `.`, or the whole string when it has no
/// `.`. No trimming or validation is done: `""` maps to `""` and `".5"` maps
/// to `""`.
pub fn major_version(version: &str) -> &str {
  version.split_once('.').map_or(version, |(major, _)| major)
}

/// Keep the packages whose version carries the `.el<major>` distro tag.
///
/// This is a substring match on the version string, not a version
/// comparison. Input order is preserved.
pub fn filter_by_major(packages: Vec<Package>, major: &str) -> Vec<Package> {
  let tag = format!(".el{major}");
  packages
    .into_iter()
    .filter(|p| p.version.contains(&tag))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn major_of_dotted_version() {
    assert_eq!(major_version("7.2"), "7");
    assert_eq!(major_version("10.0.1"), "10");
  }

  #[test]
  fn major_without_dot_is_whole_string() {
    assert_eq!(major_version("8"), "8");
    assert_eq!(major_version("stretch"), "stretch");
  }

  #[test]
  fn major_of_degenerate_input() {
    assert_eq!(major_version(""), "");
    assert_eq!(major_version(".5"), "");
  }

  #[test]
  fn filter_keeps_matching_major_only() {
    let packs = vec![Package::new("a", "1.0.el7"), Package::new("b", "2.0.el8")];
    let kept = filter_by_major(packs, "7");
    assert_eq!(kept, vec![Package::new("a", "1.0.el7")]);
  }

  #[test]
  fn filter_preserves_order() {
    let packs = vec![
      Package::new("z", "3.el7_9"),
      Package::new("x", "1.el6"),
      Package::new("a", "0:1.1.1k-4.el7"),
    ];
    let kept = filter_by_major(packs, "7");
    let names: Vec<_> = kept.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["z", "a"]);
  }

  #[test]
  fn filter_with_no_match_is_empty() {
    let packs = vec![Package::new("a", "1.0.deb9")];
    assert!(filter_by_major(packs, "7").is_empty());
  }
}
