//! Channel mask and its command-line parsing.
use std::fmt;
use std::str::FromStr;

use crate::error::MaskParseError;

/// Selects the channels that take part in change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask(u16);

impl Mask {
    /// Every channel is considered.
    pub const ALL: Mask = Mask(0xFFFF);
    /// No channel is considered; only the first and last record survive.
    pub const NONE: Mask = Mask(0x0000);

    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn apply(self, channels: u16) -> u16 {
        channels & self.0
    }
}

impl From<u16> for Mask {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Parses integers the way C `strtol(s, _, 0)` does: `0x` selects hex, a
/// leading `0` selects octal, anything else is decimal. Surrounding
/// whitespace and a sign are accepted. Unlike `strtol`, trailing characters
/// are rejected.
impl FromStr for Mask {
    type Err = MaskParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_ascii();
        if trimmed.is_empty() {
            return Err(MaskParseError::Empty);
        }
        let invalid = || MaskParseError::Invalid {
            input: s.to_string(),
        };
        let out_of_range = || MaskParseError::OutOfRange {
            input: s.to_string(),
        };

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (radix, digits) = if let Some(hex) = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            (16, hex)
        } else if unsigned.len() > 1 && unsigned.starts_with('0') {
            (8, &unsigned[1..])
        } else {
            (10, unsigned)
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid());
        }
        // Only overflow can fail here, the digits were validated above
        let value = u64::from_str_radix(digits, radix).map_err(|_| out_of_range())?;
        if negative && value != 0 {
            return Err(out_of_range());
        }
        u16::try_from(value)
            .map(Mask)
            .map_err(|_| out_of_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<u16, MaskParseError> {
        s.parse::<Mask>().map(Mask::bits)
    }

    #[test]
    fn decimal_hex_and_octal() {
        assert_eq!(parse("2"), Ok(2));
        assert_eq!(parse("65535"), Ok(0xFFFF));
        assert_eq!(parse("0x1F"), Ok(0x1F));
        assert_eq!(parse("0XffFF"), Ok(0xFFFF));
        assert_eq!(parse("017"), Ok(0o17));
        assert_eq!(parse("0"), Ok(0));
        assert_eq!(parse("00"), Ok(0));
    }

    #[test]
    fn sign_and_whitespace() {
        assert_eq!(parse("  0x3\n"), Ok(3));
        assert_eq!(parse("+12"), Ok(12));
        assert_eq!(parse("-0"), Ok(0));
        assert_eq!(parse("-0x0"), Ok(0));
    }

    #[test]
    fn out_of_range() {
        for input in ["0x10000", "65536", "-1", "-0x1", "99999999999999999999999"] {
            assert_eq!(
                parse(input),
                Err(MaskParseError::OutOfRange {
                    input: input.to_string()
                }),
                "{input}"
            );
        }
    }

    #[test]
    fn unparsable() {
        assert_eq!(parse(""), Err(MaskParseError::Empty));
        assert_eq!(parse("   "), Err(MaskParseError::Empty));
        for input in ["abc", "0x", "08", "12z", "0x1G", "1 2", "--1", "+-1", "-"] {
            assert_eq!(
                parse(input),
                Err(MaskParseError::Invalid {
                    input: input.to_string()
                }),
                "{input}"
            );
        }
    }

    #[test]
    fn apply_keeps_only_selected_channels() {
        let mask = Mask::new(0x00F0);
        assert_eq!(mask.apply(0xABCD), 0x00C0);
        assert_eq!(Mask::ALL.apply(0xABCD), 0xABCD);
        assert_eq!(Mask::NONE.apply(0xABCD), 0);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Mask::new(0x1).to_string(), "0x0001");
    }
}
