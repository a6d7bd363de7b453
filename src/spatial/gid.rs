use std::ops::BitOr;

/// Horizontal flip, bit 31.
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip, bit 30.
pub const FLIP_V: u32 = 0x4000_0000;
/// Anti-diagonal flip, bit 29.
pub const FLIP_D: u32 = 0x2000_0000;
/// Hexagonal 120 degree rotation, bit 28.
pub const ROTATE_HEX_120: u32 = 0x1000_0000;
/// All four flag bits.
pub const FLAG_MASK: u32 = 0xF000_0000;
/// The `localId + 1` part of a GID; 0 is the empty cell.
pub const GID_MASK: u32 = 0x0FFF_FFFF;

/// The four orientation bits stored in the top of a GID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileFlags(u32);

impl TileFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Flipped horizontally.
    pub const FLIP_H: Self = Self(FLIP_H);
    /// Flipped vertically.
    pub const FLIP_V: Self = Self(FLIP_V);
    /// Flipped anti-diagonally.
    pub const FLIP_D: Self = Self(FLIP_D);
    /// Hexagonal 120 degree rotation.
    pub const ROTATE_HEX_120: Self = Self(ROTATE_HEX_120);

    /// Keeps only the flag bits of `bits`.
    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & FLAG_MASK)
    }

    /// Raw flag bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True if every flag of `other` is set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Horizontal flip set.
    #[inline]
    pub fn flip_h(self) -> bool {
        self.0 & FLIP_H != 0
    }

    /// Vertical flip set.
    #[inline]
    pub fn flip_v(self) -> bool {
        self.0 & FLIP_V != 0
    }

    /// Anti-diagonal flip set.
    #[inline]
    pub fn flip_d(self) -> bool {
        self.0 & FLIP_D != 0
    }

    /// Hexagonal rotation set.
    #[inline]
    pub fn rotate_hex_120(self) -> bool {
        self.0 & ROTATE_HEX_120 != 0
    }
}

impl BitOr for TileFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Global tile id as stored in a tile layer: flag bits on top, `localId + 1` below.
///
/// Layers keep GIDs verbatim; this type is the single place they get decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gid(pub u32);

impl Gid {
    /// The empty cell.
    pub const EMPTY: Self = Self(0);

    /// Builds a GID from a local id and flags. `local_id` must be below `GID_MASK`.
    #[inline]
    pub fn encode(local_id: u32, flags: TileFlags) -> Self {
        debug_assert!(local_id < GID_MASK, "local id {local_id} does not fit in a GID");
        Self(flags.bits() | ((local_id + 1) & GID_MASK))
    }

    /// Splits into `(local_id, flags)`; `None` for an empty cell.
    #[inline]
    pub fn decode(self) -> Option<(u32, TileFlags)> {
        self.local_id().map(|id| (id, self.flags()))
    }

    /// The value as stored, flags included.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The value with the flag bits cleared.
    #[inline]
    pub fn clean(self) -> u32 {
        self.0 & GID_MASK
    }

    /// True for a cell with no tile, whatever its flags.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.clean() == 0
    }

    /// The flag bits.
    #[inline]
    pub fn flags(self) -> TileFlags {
        TileFlags::from_bits(self.0)
    }

    /// Zero-based id into the tileset, `None` for an empty cell.
    #[inline]
    pub fn local_id(self) -> Option<u32> {
        match self.clean() {
            0 => None,
            n => Some(n - 1),
        }
    }
}
