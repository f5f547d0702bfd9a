//! Tiled global tile ids (GIDs) and their flip bits.

/// Horizontal flip.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal flip (transpose).
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// The 29 bits that hold the GID itself.
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits

/// Raw cell value as stored in a tile layer: a GID plus three flip bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

impl TileId {
    /// GID with the flip bits stripped.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// Horizontal flip bit.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Vertical flip bit.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Diagonal flip bit.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    /// `true` for GID 0 regardless of flip bits.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.clean() == 0
    }

    /// All three flip bits.
    #[inline]
    pub fn flips(self) -> FlipFlags {
        FlipFlags {
            horizontal: self.flip_h(),
            vertical: self.flip_v(),
            diagonal: self.flip_d(),
        }
    }
}

/// Flip bits carried alongside a tile blit. Applying them is up to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlipFlags {
    /// Mirror left to right.
    pub horizontal: bool,
    /// Mirror top to bottom.
    pub vertical: bool,
    /// Swap x and y, applied before the other two.
    pub diagonal: bool,
}

impl FlipFlags {
    /// No flips.
    pub const NONE: FlipFlags = FlipFlags {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    /// `true` if any flip is set.
    #[inline]
    pub fn any(self) -> bool {
        self.horizontal || self.vertical || self.diagonal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_all_three_flip_bits() {
        let id = TileId(FLIP_H | FLIP_V | FLIP_D | 42);
        assert_eq!(id.clean(), 42);
        assert!(id.flip_h() && id.flip_v() && id.flip_d());
    }

    #[test]
    fn flipped_zero_is_still_empty() {
        assert!(TileId(FLIP_H | FLIP_D).is_empty());
        assert!(!TileId(1).is_empty());
    }

    #[test]
    fn flips_reports_each_bit_independently() {
        let f = TileId(FLIP_V | 7).flips();
        assert_eq!(
            f,
            FlipFlags {
                horizontal: false,
                vertical: true,
                diagonal: false
            }
        );
        assert!(f.any());
        assert!(!TileId(7).flips().any());
    }
}
