//! Dotted-integer version arithmetic.
//!
//! Versions have the shape `XX`, `XX.YY` or `XX.YY.ZZ`. Bumping a component
//! that does not exist yet creates every missing component up to it, and
//! every component right of the bumped one is cleared:
//!
//! | level | `""`    | `"4"`   | `"4.2"` | `"4.2.7"` |
//! |-------|---------|---------|---------|-----------|
//! | major | `1`     | `5`     | `5.0`   | `5.0.0`   |
//! | minor | `0.1`   | `4.1`   | `4.3`   | `4.3.0`   |
//! | patch | `0.0.1` | `4.0.1` | `4.2.1` | `4.2.8`   |

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Most components a version may have.
pub const MAX_SEGMENTS: usize = 3;

/// Which component of the version to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncrementLevel {
    Major,
    Minor,
    #[default]
    Patch,
}

impl fmt::Display for IncrementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncrementLevel::Major => "major",
            IncrementLevel::Minor => "minor",
            IncrementLevel::Patch => "patch",
        };
        f.write_str(name)
    }
}

impl FromStr for IncrementLevel {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(IncrementLevel::Major),
            "minor" => Ok(IncrementLevel::Minor),
            "patch" => Ok(IncrementLevel::Patch),
            _ => Err(VersionError::UnknownLevel {
                level: s.to_string(),
            }),
        }
    }
}

/// A version value that is not in dotted-integer form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version '{value}': component '{component}' is not a non-negative integer")]
    InvalidComponent { value: String, component: String },

    #[error("invalid version '{value}': too many version segments ({count}, at most 3)")]
    TooManySegments { value: String, count: usize },

    #[error("invalid version '{value}': component '{component}' cannot be incremented without overflow")]
    Overflow { value: String, component: String },

    #[error("invalid bump '{level}', can only be one of [major, minor, patch]")]
    UnknownLevel { level: String },
}

/// One parsed component, keeping the text it was written with.
#[derive(Debug, Clone, Copy)]
struct Segment<'a> {
    text: &'a str,
    value: u64,
}

/// Compute the next version for `level`.
///
/// `old` is the bare value without quotes; the empty string is a valid
/// "no version yet" input. Components left of the bumped one keep their
/// original text.
///
/// # Examples
///
/// ```
/// use gobump::version::{increment, IncrementLevel};
///
/// assert_eq!(increment(IncrementLevel::Major, "2.5.9").unwrap(), "3.0.0");
/// assert_eq!(increment(IncrementLevel::Minor, "4").unwrap(), "4.1");
/// assert_eq!(increment(IncrementLevel::Patch, "").unwrap(), "0.0.1");
/// ```
pub fn increment(level: IncrementLevel, old: &str) -> Result<String, VersionError> {
    let segments = parse_segments(old)?;

    let bump = |segment: &Segment<'_>| {
        segment
            .value
            .checked_add(1)
            .map(|v| v.to_string())
            .ok_or_else(|| VersionError::Overflow {
                value: old.to_string(),
                component: segment.text.to_string(),
            })
    };

    use IncrementLevel::*;
    let next: Vec<String> = match (level, segments.as_slice()) {
        (Major, []) => vec!["1".into()],
        (Major, [major]) => vec![bump(major)?],
        (Major, [major, _]) => vec![bump(major)?, "0".into()],
        (Major, [major, _, _]) => vec![bump(major)?, "0".into(), "0".into()],

        (Minor, []) => vec!["0".into(), "1".into()],
        (Minor, [major]) => vec![major.text.into(), "1".into()],
        (Minor, [major, minor]) => vec![major.text.into(), bump(minor)?],
        (Minor, [major, minor, _]) => vec![major.text.into(), bump(minor)?, "0".into()],

        (Patch, []) => vec!["0".into(), "0".into(), "1".into()],
        (Patch, [major]) => vec![major.text.into(), "0".into(), "1".into()],
        (Patch, [major, minor]) => vec![major.text.into(), minor.text.into(), "1".into()],
        (Patch, [major, minor, patch]) => {
            vec![major.text.into(), minor.text.into(), bump(patch)?]
        }

        (_, segments) => {
            return Err(VersionError::TooManySegments {
                value: old.to_string(),
                count: segments.len(),
            })
        }
    };

    Ok(next.join("."))
}

/// Split a bare version into its components.
///
/// The empty string has zero components, never one empty component.
fn parse_segments(old: &str) -> Result<Vec<Segment<'_>>, VersionError> {
    if old.is_empty() {
        return Ok(Vec::new());
    }

    let parts: Vec<&str> = old.split('.').collect();
    if parts.len() > MAX_SEGMENTS {
        return Err(VersionError::TooManySegments {
            value: old.to_string(),
            count: parts.len(),
        });
    }

    parts
        .into_iter()
        .map(|text| {
            // u64::from_str accepts a leading '+', digits only here
            let value = if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                text.parse::<u64>().ok()
            } else {
                None
            };

            value
                .map(|value| Segment { text, value })
                .ok_or_else(|| VersionError::InvalidComponent {
                    value: old.to_string(),
                    component: text.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use IncrementLevel::*;

    fn bump(level: IncrementLevel, old: &str) -> String {
        increment(level, old).unwrap()
    }

    #[test]
    fn test_reset_rule() {
        assert_eq!(bump(Major, "2.5.9"), "3.0.0");
        assert_eq!(bump(Minor, "2.5.9"), "2.6.0");
        assert_eq!(bump(Patch, "2.5.9"), "2.5.10");
    }

    #[test]
    fn test_absent_value_bootstrap() {
        assert_eq!(bump(Major, ""), "1");
        assert_eq!(bump(Minor, ""), "0.1");
        assert_eq!(bump(Patch, ""), "0.0.1");
    }

    #[test]
    fn test_missing_components_are_created() {
        assert_eq!(bump(Patch, "4"), "4.0.1");
        assert_eq!(bump(Minor, "4"), "4.1");
        assert_eq!(bump(Major, "4"), "5");
        assert_eq!(bump(Patch, "4.2"), "4.2.1");
        assert_eq!(bump(Minor, "4.2"), "4.3");
        assert_eq!(bump(Major, "4.2"), "5.0");
    }

    #[test]
    fn test_unbounded_width_components() {
        assert_eq!(bump(Patch, "1.2.99999999999"), "1.2.100000000000");
        assert_eq!(bump(Major, "9"), "10");
    }

    #[test]
    fn test_kept_components_keep_their_text() {
        assert_eq!(bump(Minor, "007.1"), "007.2");
        assert_eq!(bump(Patch, "01.02.03"), "01.02.4");
    }

    #[test]
    fn test_too_many_segments() {
        for level in [Major, Minor, Patch] {
            let err = increment(level, "1.2.3.4").unwrap_err();
            assert!(matches!(err, VersionError::TooManySegments { count: 4, .. }));
        }
        assert!(increment(Patch, "1.2.3.4.5").is_err());
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = increment(Patch, "1.x.0").unwrap_err();
        assert_eq!(
            err,
            VersionError::InvalidComponent {
                value: "1.x.0".into(),
                component: "x".into(),
            }
        );
    }

    #[test]
    fn test_malformed_components_rejected() {
        for old in ["1..2", ".", "1.", "+1", "-1", " 1", "1.2-beta", "v1.2"] {
            assert!(
                matches!(
                    increment(Patch, old),
                    Err(VersionError::InvalidComponent { .. })
                ),
                "expected {old:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_overflow_rejected() {
        let max = u64::MAX.to_string();
        assert!(matches!(
            increment(Major, &max),
            Err(VersionError::Overflow { .. })
        ));
        // Too large to parse at all
        assert!(matches!(
            increment(Major, "99999999999999999999999"),
            Err(VersionError::InvalidComponent { .. })
        ));
        // Reset components never overflow
        assert_eq!(bump(Major, &format!("1.{max}")), "2.0");
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("major".parse::<IncrementLevel>().unwrap(), Major);
        assert_eq!("Minor".parse::<IncrementLevel>().unwrap(), Minor);
        assert_eq!("PATCH".parse::<IncrementLevel>().unwrap(), Patch);
        assert!(matches!(
            "huge".parse::<IncrementLevel>(),
            Err(VersionError::UnknownLevel { .. })
        ));
        assert_eq!(IncrementLevel::default(), Patch);
        assert_eq!(Minor.to_string(), "minor");
    }
}
