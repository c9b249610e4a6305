//! Version literals: dotted 2-4 component non-negative integer tuples.
//!
//! `Version` backs both the lexer's `Version` token payload and, via
//! `condeval`, the evaluator's `Value::Version` kind. Components beyond the
//! declared length are absent, not zero — see [`Version::partial_cmp`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed version literal: `major.minor[.build[.revision]]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

/// Error parsing a version literal from text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("version must have between 2 and 4 dot-separated components, found {0}")]
    WrongComponentCount(usize),
    #[error("version component '{0}' is not a valid non-negative 32-bit integer")]
    InvalidComponent(String),
}

impl Version {
    /// Construct a version from 2-4 already-parsed components.
    pub fn new(major: u32, minor: u32, build: Option<u32>, revision: Option<u32>) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Number of present components (2, 3, or 4).
    pub fn component_count(&self) -> usize {
        2 + self.build.is_some() as usize + self.revision.is_some() as usize
    }

    fn components(&self) -> [Option<u32>; 4] {
        [Some(self.major), Some(self.minor), self.build, self.revision]
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(VersionParseError::WrongComponentCount(parts.len()));
        }

        let mut parsed = [None; 4];
        for (i, part) in parts.iter().enumerate() {
            let value = part
                .parse::<u32>()
                .map_err(|_| VersionParseError::InvalidComponent((*part).to_string()))?;
            parsed[i] = Some(value);
        }

        Ok(Version {
            major: parsed[0].unwrap(),
            minor: parsed[1].unwrap(),
            build: parsed[2],
            revision: parsed[3],
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
            if let Some(revision) = self.revision {
                write!(f, ".{revision}")?;
            }
        }
        Ok(())
    }
}

/// Ordering is only defined when both versions have the same number of
/// components. A 3-component and a 4-component version are neither equal
/// nor ordered relative to each other: missing components are never padded
/// with zero (see §4.3/§9 of the design notes).
impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.component_count() != other.component_count() {
            return None;
        }
        Some(self.components().cmp(&other.components()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // PARSING TESTS

    #[test]
    fn parses_two_component_version() {
        let v: Version = "1.2".parse().unwrap();
        assert_eq!(v, Version::new(1, 2, None, None));
    }

    #[test]
    fn parses_four_component_version() {
        let v: Version = "1.2.3.4".parse().unwrap();
        assert_eq!(v, Version::new(1, 2, Some(3), Some(4)));
    }

    #[test]
    fn rejects_single_component() {
        assert!("1".parse::<Version>().is_err());
    }

    #[test]
    fn rejects_five_components() {
        assert!("1.2.3.4.5".parse::<Version>().is_err());
    }

    #[test]
    fn rejects_non_numeric_component() {
        assert!("1.a".parse::<Version>().is_err());
    }

    // DISPLAY TESTS

    #[test]
    fn displays_canonical_dotted_form() {
        assert_eq!(Version::new(1, 2, None, None).to_string(), "1.2");
        assert_eq!(Version::new(1, 2, Some(3), None).to_string(), "1.2.3");
        assert_eq!(Version::new(1, 2, Some(3), Some(4)).to_string(), "1.2.3.4");
    }

    // COMPARISON TESTS

    #[test]
    fn equal_length_versions_compare_componentwise() {
        let a: Version = "1.2.3".parse().unwrap();
        let b: Version = "1.2.4".parse().unwrap();
        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn differing_component_counts_are_unequal() {
        let three: Version = "1.2.3".parse().unwrap();
        let four: Version = "1.2.3.0".parse().unwrap();
        assert_ne!(three, four);
    }

    #[test]
    fn differing_component_counts_are_not_ordered() {
        let three: Version = "1.2.3".parse().unwrap();
        let four: Version = "1.2.3.0".parse().unwrap();
        assert_eq!(three.partial_cmp(&four), None);
        assert!(!(three < four));
        assert!(!(three > four));
    }
}
