//! Binary outcome side.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One side of a binary settlement event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Both sides, YES first.
    pub const BOTH: [Side; 2] = [Side::Yes, Side::No];

    /// The opposing side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Uppercase label used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips() {
        assert_eq!(Side::Yes.opposite(), Side::No);
        assert_eq!(Side::No.opposite(), Side::Yes);
    }

    #[test]
    fn display_is_uppercase() {
        assert_eq!(Side::Yes.to_string(), "YES");
        assert_eq!(format!("{}", Side::No), "NO");
    }

    #[test]
    fn serde_uses_uppercase_labels() {
        let json = serde_json::to_string(&Side::Yes).unwrap();
        assert_eq!(json, "\"YES\"");
        let side: Side = serde_json::from_str("\"NO\"").unwrap();
        assert_eq!(side, Side::No);
    }
}
