//! Frame format detection from the 4-byte magic prefix.

use std::fmt;

/// Number of bytes inspected at the start of every frame.
pub const MAGIC_PREFIX_LEN: usize = 4;

/// Magic number of current Zstandard frames.
pub const MAGIC_NUMBER: u32 = 0xFD2F_B528;

pub mod legacy_magic {
    /// v0.1 frames were written big-endian, so the little-endian read differs.
    pub const V01: u32 = 0x1EB5_2FFD;
    pub const V02: u32 = 0xFD2F_B522;
    pub const V03: u32 = 0xFD2F_B523;
    pub const V04: u32 = 0xFD2F_B524;
    pub const V05: u32 = 0xFD2F_B525;
    pub const V06: u32 = 0xFD2F_B526;
    pub const V07: u32 = 0xFD2F_B527;
}

/// A legacy format version, `0.1` through `0.7`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegacyVersion(u8);

impl LegacyVersion {
    pub const fn from_magic(magic: u32) -> Option<LegacyVersion> {
        use legacy_magic::*;

        let minor = match magic {
            V01 => 1,
            V02 => 2,
            V03 => 3,
            V04 => 4,
            V05 => 5,
            V06 => 6,
            V07 => 7,
            _ => return None,
        };

        Some(LegacyVersion(minor))
    }

    /// The minor version number, `1..=7`.
    pub const fn minor(self) -> u8 {
        self.0
    }

    /// The signature this version starts its frames with, as read little-endian.
    pub const fn magic(self) -> u32 {
        use legacy_magic::*;

        match self.0 {
            1 => V01,
            2 => V02,
            3 => V03,
            4 => V04,
            5 => V05,
            6 => V06,
            _ => V07,
        }
    }
}

impl fmt::Display for LegacyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v0.{}", self.0)
    }
}

impl fmt::Debug for LegacyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Which decoder a frame is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Anything that is not a known legacy signature. The engine decides
    /// whether it is a valid frame.
    Current,
    Legacy(LegacyVersion),
}

impl Format {
    pub const fn detect(magic: u32) -> Format {
        match LegacyVersion::from_magic(magic) {
            Some(version) => Format::Legacy(version),
            None => Format::Current,
        }
    }
}
