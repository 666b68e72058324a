//! Decode mode flags for TLDAT binary structures.
//!
//! The same header layout shipped in several field widths and byte orders
//! depending on platform generation. Both flags are carried explicitly as a
//! [`HeaderMode`] value and passed into decode functions, never held as
//! ambient state.

/// Byte order of multi-byte integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Little-endian (PC, PS4).
    #[default]
    Little,
    /// Big-endian (PS3).
    Big,
}

/// Width of offset, length and count fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Width {
    /// 32-bit fields (older titles).
    Bits32,
    /// 64-bit fields.
    #[default]
    Bits64,
}

impl Width {
    /// Size in bytes of a mode-width integer field.
    #[inline]
    pub const fn field_size(self) -> usize {
        match self {
            Width::Bits32 => 4,
            Width::Bits64 => 8,
        }
    }
}

/// Combined width and byte-order configuration for decoding an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderMode {
    pub width: Width,
    pub endian: Endian,
}

impl HeaderMode {
    /// Build a mode from the CLI-style flags of the original tool.
    pub fn from_flags(bit32: bool, big_endian: bool) -> Self {
        Self {
            width: if bit32 { Width::Bits32 } else { Width::Bits64 },
            endian: if big_endian { Endian::Big } else { Endian::Little },
        }
    }
}
