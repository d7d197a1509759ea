//! Platform, encoding and language identifiers shared by the `cmap` and
//! `name` tables.

use std::fmt::{Display, Formatter};

/// Represents the platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Unicode,
    Macintosh,
    /// Deprecated by OpenType, still found in old fonts.
    Iso,
    Windows,
    Custom,
    Unknown(u16),
}

impl PlatformId {
    pub fn to_u16(self) -> u16 {
        match self {
            Self::Unicode => 0,
            Self::Macintosh => 1,
            Self::Iso => 2,
            Self::Windows => 3,
            Self::Custom => 4,
            Self::Unknown(value) => value,
        }
    }
}

impl From<u16> for PlatformId {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Unicode,
            1 => Self::Macintosh,
            2 => Self::Iso,
            3 => Self::Windows,
            4 => Self::Custom,
            _ => Self::Unknown(value),
        }
    }
}

impl Display for PlatformId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unicode => f.write_str("Unicode"),
            Self::Macintosh => f.write_str("Macintosh"),
            Self::Iso => f.write_str("ISO"),
            Self::Windows => f.write_str("Windows"),
            Self::Custom => f.write_str("Custom"),
            Self::Unknown(value) => write!(f, "Unknown({value})"),
        }
    }
}

/// Platform specific encoding identifiers.
pub mod encoding {
    pub mod unicode {
        pub const VERSION_1_0: u16 = 0;
        pub const VERSION_1_1: u16 = 1;
        pub const ISO_10646: u16 = 2;
        pub const UNICODE_2_0_BMP: u16 = 3;
        pub const UNICODE_2_0_FULL: u16 = 4;
        pub const VARIATION_SEQUENCES: u16 = 5;
        pub const FULL_REPERTOIRE: u16 = 6;
    }

    pub mod macintosh {
        pub const ROMAN: u16 = 0;
        pub const JAPANESE: u16 = 1;
        pub const CHINESE_TRADITIONAL: u16 = 2;
        pub const KOREAN: u16 = 3;
    }

    pub mod windows {
        pub const SYMBOL: u16 = 0;
        pub const UNICODE_BMP: u16 = 1;
        pub const SHIFT_JIS: u16 = 2;
        pub const PRC: u16 = 3;
        pub const BIG5: u16 = 4;
        pub const WANSUNG: u16 = 5;
        pub const JOHAB: u16 = 6;
        pub const UNICODE_FULL: u16 = 10;
    }
}

/// Language identifiers preferred when picking a name string.
pub mod language {
    pub const WINDOWS_ENGLISH_US: u16 = 0x0409;
    pub const MACINTOSH_ENGLISH: u16 = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_raw_values() {
        for raw in 0..8u16 {
            assert_eq!(PlatformId::from(raw).to_u16(), raw);
        }
        assert_eq!(PlatformId::from(3), PlatformId::Windows);
        assert_eq!(PlatformId::from(9), PlatformId::Unknown(9));
    }
}
