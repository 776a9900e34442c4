use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Error correction level
//------------------------------------------------------------------------------

/// QR error correction level. Each level restores a share of the symbol's codewords, which
/// is also the share an overlay may cover before the symbol becomes unreadable.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const fn max_overlay_ratio(self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl Default for ECLevel {
    // Level the QR writer uses when none is requested
    fn default() -> Self {
        Self::L
    }
}

impl FromStr for ECLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod ec_level_tests {
    use test_case::test_case;

    use super::ECLevel;

    #[test_case(ECLevel::L, 0.07)]
    #[test_case(ECLevel::M, 0.15)]
    #[test_case(ECLevel::Q, 0.25)]
    #[test_case(ECLevel::H, 0.30)]
    fn test_overlay_budget(ecl: ECLevel, budget: f64) {
        assert_eq!(ecl.max_overlay_ratio(), budget);
    }

    #[test]
    fn test_parse() {
        assert_eq!("h".parse(), Ok(ECLevel::H));
        assert_eq!(" Q ".parse(), Ok(ECLevel::Q));
        assert!("25".parse::<ECLevel>().is_err());
        assert_eq!(ECLevel::default(), ECLevel::L);
        assert!(ECLevel::L < ECLevel::H);
    }
}
