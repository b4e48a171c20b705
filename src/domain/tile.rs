/// A single grid cell.
/// `has_point` is fixed at seed time; `is_claimed` only ever goes false → true.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tile {
    pub has_point: bool,
    pub is_claimed: bool,
}

impl Tile {
    pub fn with_point() -> Self {
        Tile { has_point: true, is_claimed: false }
    }

    /// Is there an uncollected point here?
    pub fn is_claimable(self) -> bool {
        self.has_point && !self.is_claimed
    }

    /// Mark the point collected. Returns false if there was nothing to claim.
    pub fn claim(&mut self) -> bool {
        if !self.is_claimable() {
            return false;
        }
        self.is_claimed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_one_way() {
        let mut t = Tile::with_point();
        assert!(t.is_claimable());
        assert!(t.claim());
        assert!(t.is_claimed);
        assert!(!t.claim()); // second claim is a no-op
        assert!(t.is_claimed);
    }

    #[test]
    fn empty_tile_cannot_be_claimed() {
        let mut t = Tile::default();
        assert!(!t.claim());
        assert!(!t.is_claimed);
    }
}
