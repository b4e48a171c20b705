/// GameMap: a fixed-size grid of tiles, one per level.
///
/// Stored row-major. Coordinates are signed so that a step off the
/// north/west edge is still a representable (and rejectable) position.

use rand::Rng;

use super::tile::Tile;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl GameMap {
    /// An empty map with no points.
    pub fn new(width: usize, height: usize) -> Self {
        GameMap {
            width,
            height,
            tiles: vec![Tile::default(); width * height],
        }
    }

    /// Seed every tile independently: one chance in `odds` of holding a point.
    /// `odds` must be at least 1 (validated by the config layer).
    pub fn seeded<R: Rng + ?Sized>(width: usize, height: usize, odds: u32, rng: &mut R) -> Self {
        let mut map = GameMap::new(width, height);
        for tile in &mut map.tiles {
            if rng.random_ratio(1, odds) {
                *tile = Tile::with_point();
            }
        }
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|i| &mut self.tiles[i])
    }

    /// Place a point by hand.
    #[cfg(test)]
    pub fn place_point(&mut self, x: i32, y: i32) {
        if let Some(t) = self.tile_mut(x, y) {
            t.has_point = true;
        }
    }

    pub fn point_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.has_point).count()
    }

    pub fn claimed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_claimed).count()
    }

    /// Number of steps that can be taken from (x, y) towards (dx, dy)
    /// before leaving the grid.
    pub fn run_length(&self, x: i32, y: i32, (dx, dy): (i32, i32)) -> usize {
        let mut n = 0;
        let (mut cx, mut cy) = (x + dx, y + dy);
        while self.in_bounds(cx, cy) {
            n += 1;
            cx += dx;
            cy += dy;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn bounds() {
        let m = GameMap::new(10, 10);
        assert!(m.in_bounds(0, 0));
        assert!(m.in_bounds(9, 9));
        assert!(!m.in_bounds(-1, 0));
        assert!(!m.in_bounds(0, 10));
        assert!(m.tile(10, 0).is_none());
    }

    #[test]
    fn non_square_map_indexing() {
        let mut m = GameMap::new(4, 2);
        m.place_point(3, 1);
        assert!(m.tile(3, 1).is_some_and(|t| t.has_point));
        assert!(m.tile(1, 3).is_none());
        assert_eq!(m.point_count(), 1);
    }

    #[test]
    fn seeding_is_deterministic_per_seed() {
        let a = GameMap::seeded(10, 10, 8, &mut Pcg32::seed_from_u64(7));
        let b = GameMap::seeded(10, 10, 8, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.claimed_count(), 0);
    }

    #[test]
    fn odds_of_one_fills_every_tile() {
        let m = GameMap::seeded(5, 3, 1, &mut Pcg32::seed_from_u64(1));
        assert_eq!(m.point_count(), 15);
    }

    #[test]
    fn run_length_to_edges() {
        let m = GameMap::new(10, 10);
        assert_eq!(m.run_length(5, 5, (0, -1)), 5);
        assert_eq!(m.run_length(5, 5, (1, 0)), 4);
        assert_eq!(m.run_length(0, 0, (-1, 0)), 0);
    }
}
