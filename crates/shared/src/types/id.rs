//! Typed member identifiers.
//!
//! Using typed identifiers prevents accidentally passing a badge number where an SSN
//! is expected; all three are plain integers in the plan's records.

use serde::{Deserialize, Serialize};

/// Macro to generate typed integer identifier wrappers.
macro_rules! typed_number {
    ($name:ident, $inner:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Wraps a raw value.
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_number!(Ssn, i32, "Social security number of a plan member (9 digits).");
typed_number!(BadgeNumber, i32, "Employee badge number.");
typed_number!(
    Psn,
    i64,
    "Personal serial number: badge number followed by a signed 4-digit suffix."
);

/// Multiplier that shifts a badge number left of the 4-digit PSN suffix.
const PSN_SUFFIX_FACTOR: i64 = 10_000;

impl Psn {
    /// Composes a PSN from a badge number and its suffix.
    #[must_use]
    pub fn compose(badge: BadgeNumber, suffix: i16) -> Self {
        Self(i64::from(badge.0) * PSN_SUFFIX_FACTOR + i64::from(suffix))
    }

    /// Parses a stored PSN, resolving anything malformed to `Psn(0)`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl From<BadgeNumber> for Psn {
    /// An employee's own PSN is the bare badge number.
    fn from(badge: BadgeNumber) -> Self {
        Self(i64::from(badge.0))
    }
}

impl std::fmt::Display for Ssn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

impl std::fmt::Display for BadgeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Psn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_psn_compose() {
        assert_eq!(Psn::compose(BadgeNumber(700_123), 1000), Psn(7_001_231_000));
        assert_eq!(Psn::compose(BadgeNumber(700_123), -1000), Psn(7_001_229_000));
    }

    #[test]
    fn test_employee_psn_is_badge() {
        assert_eq!(Psn::from(BadgeNumber(700_123)), Psn(700_123));
    }

    #[rstest]
    #[case("7001231000", Psn(7_001_231_000))]
    #[case(" 7001231000 ", Psn(7_001_231_000))]
    #[case("", Psn(0))]
    #[case("70012X1000", Psn(0))]
    #[case("99999999999999999999999", Psn(0))]
    fn test_psn_parse_lenient(#[case] raw: &str, #[case] expected: Psn) {
        assert_eq!(Psn::parse_lenient(raw), expected);
    }

    #[test]
    fn test_ssn_display_is_zero_padded() {
        assert_eq!(Ssn(12_345_678).to_string(), "012345678");
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let json = serde_json::to_string(&Ssn(123_456_789)).unwrap();
        assert_eq!(json, "123456789");
        let badge: BadgeNumber = serde_json::from_str("700123").unwrap();
        assert_eq!(badge, BadgeNumber(700_123));
    }
}
