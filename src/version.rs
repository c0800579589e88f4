use std::fmt;

use semver::Version;

use crate::error::{ExpoVersionError, Result};

/// Represents the type of semantic version bump to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

impl ReleaseType {
    /// All release types, in the order they are offered to the user.
    pub const ALL: [ReleaseType; 3] = [ReleaseType::Patch, ReleaseType::Minor, ReleaseType::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Patch => "patch",
            ReleaseType::Minor => "minor",
            ReleaseType::Major => "major",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single version update: what the manifests say now and what they will say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTransition {
    current: String,
    target: String,
}

impl VersionTransition {
    pub fn new(current: impl Into<String>, target: impl Into<String>) -> Self {
        VersionTransition {
            current: current.into(),
            target: target.into(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Returns true if `version` is a strict semantic version.
///
/// The `MAJOR.MINOR.PATCH` core is required; prerelease and build metadata
/// are optional. Prefixes such as `v` and leading zeros are rejected.
pub fn validate(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Bumps `version` according to `release`.
///
/// Increments the appropriate version component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// A prerelease version is promoted to its release core when the bump would
/// not move past it (`1.2.0-rc.1` minor -> `1.2.0`, `1.2.3-beta` patch ->
/// `1.2.3`). Build metadata is dropped.
///
/// # Example
/// ```
/// use expo_version::version::{increment, ReleaseType};
///
/// assert_eq!(increment("1.2.3", ReleaseType::Major).unwrap(), "2.0.0");
/// assert_eq!(increment("1.2.3", ReleaseType::Minor).unwrap(), "1.3.0");
/// assert_eq!(increment("1.2.3", ReleaseType::Patch).unwrap(), "1.2.4");
/// ```
pub fn increment(version: &str, release: ReleaseType) -> Result<String> {
    let computation_error = |reason: String| ExpoVersionError::VersionComputation {
        version: version.to_string(),
        release,
        reason,
    };

    let current = Version::parse(version).map_err(|e| computation_error(e.to_string()))?;
    let is_prerelease = !current.pre.is_empty();
    let overflow = || computation_error("component overflow".to_string());

    let next = match release {
        ReleaseType::Major => {
            if is_prerelease && current.minor == 0 && current.patch == 0 {
                Version::new(current.major, 0, 0)
            } else {
                Version::new(current.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
        }
        ReleaseType::Minor => {
            if is_prerelease && current.patch == 0 {
                Version::new(current.major, current.minor, 0)
            } else {
                Version::new(
                    current.major,
                    current.minor.checked_add(1).ok_or_else(overflow)?,
                    0,
                )
            }
        }
        ReleaseType::Patch => {
            if is_prerelease {
                Version::new(current.major, current.minor, current.patch)
            } else {
                Version::new(
                    current.major,
                    current.minor,
                    current.patch.checked_add(1).ok_or_else(overflow)?,
                )
            }
        }
    };

    Ok(next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_semver() {
        assert!(validate("1.0.0"));
        assert!(validate("1.0.0-alpha.1"));
        assert!(validate("1.0.0+build.1"));
        assert!(validate("10.20.30-rc.1+sha.5114f85"));
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(!validate("1.0"));
        assert!(!validate("1"));
        assert!(!validate(""));
        assert!(!validate("a.b.c"));
        assert!(!validate("invalid-version"));
        assert!(!validate("v1.0.0"));
        assert!(!validate("01.0.0"));
        assert!(!validate("1.0.0.0"));
    }

    #[test]
    fn test_increment_basic() {
        assert_eq!(increment("1.0.0", ReleaseType::Patch).unwrap(), "1.0.1");
        assert_eq!(increment("2.3.4", ReleaseType::Minor).unwrap(), "2.4.0");
        assert_eq!(increment("2.3.4", ReleaseType::Major).unwrap(), "3.0.0");
    }

    #[test]
    fn test_increment_prerelease_promotes_core() {
        assert_eq!(increment("1.2.3-beta.1", ReleaseType::Patch).unwrap(), "1.2.3");
        assert_eq!(increment("1.2.0-rc.1", ReleaseType::Minor).unwrap(), "1.2.0");
        assert_eq!(increment("1.2.3-rc.1", ReleaseType::Minor).unwrap(), "1.3.0");
        assert_eq!(increment("2.0.0-alpha", ReleaseType::Major).unwrap(), "2.0.0");
        assert_eq!(increment("2.1.0-alpha", ReleaseType::Major).unwrap(), "3.0.0");
    }

    #[test]
    fn test_increment_drops_build_metadata() {
        assert_eq!(increment("1.0.0+build.7", ReleaseType::Patch).unwrap(), "1.0.1");
    }

    #[test]
    fn test_increment_rejects_unparsable() {
        for bad in ["1.0", "", "not-a-version"] {
            let err = increment(bad, ReleaseType::Patch).unwrap_err();
            assert!(matches!(err, ExpoVersionError::VersionComputation { .. }));
        }
    }

    #[test]
    fn test_increment_overflow() {
        let max = format!("1.2.{}", u64::MAX);
        assert!(increment(&max, ReleaseType::Patch).is_err());
        assert_eq!(increment(&max, ReleaseType::Minor).unwrap(), "1.3.0");
    }

    #[test]
    fn test_incremented_versions_stay_valid() {
        let samples = ["0.0.0", "1.2.3", "1.0.0-alpha.1", "4.5.6+build", "0.9.0-rc.2"];
        for sample in samples {
            for release in ReleaseType::ALL {
                let next = increment(sample, release).unwrap();
                assert!(validate(&next), "{} {} -> {}", sample, release, next);
            }
        }
    }

    #[test]
    fn test_transition_accessors() {
        let transition = VersionTransition::new("1.0.0", "1.1.0");
        assert_eq!(transition.current(), "1.0.0");
        assert_eq!(transition.target(), "1.1.0");
    }
}
