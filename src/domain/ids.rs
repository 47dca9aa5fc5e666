//! Domain identifier types
//!
//! Reports, doctors and donors are all keyed by database-assigned `BIGINT`
//! values. Newtypes keep the three from being mixed up; on the wire each is a
//! bare JSON number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| format!("Invalid {}: '{}'", $label, s))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a donor medical report
    ReportId,
    "report id"
);

numeric_id!(
    /// Identifier of a doctor
    DoctorId,
    "doctor id"
);

numeric_id!(
    /// Identifier of a donor, owned by the donor subsystem
    DonorId,
    "donor id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        let id = ReportId::from_str("15").unwrap();
        assert_eq!(id, ReportId::new(15));
        assert_eq!(id.to_string(), "15");
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        let err = DoctorId::from_str("abc").unwrap_err();
        assert!(err.contains("doctor id"));
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&DonorId::new(9)).unwrap();
        assert_eq!(json, "9");

        let id: DonorId = serde_json::from_str("9").unwrap();
        assert_eq!(id.value(), 9);
    }
}
