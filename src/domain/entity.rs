/// Player state, facing direction and the per-frame input record.

use serde::Deserialize;

/// Cardinal facing. Discriminants are the 0..=3 turn encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    fn from_index(i: u8) -> Self {
        Self::ALL[(i % 4) as usize]
    }

    /// Rotate 90° counter-clockwise (−1 mod 4).
    pub fn turn_left(self) -> Self {
        Self::from_index(self as u8 + 3)
    }

    /// Rotate 90° clockwise (+1 mod 4).
    pub fn turn_right(self) -> Self {
        Self::from_index(self as u8 + 1)
    }

    /// Grid offset of one step forward. North is y−1.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerState {
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
}

impl PlayerState {
    pub fn new(x: i32, y: i32, facing: Direction) -> Self {
        PlayerState { x, y, facing }
    }

    /// The cell one step ahead, without any bounds check.
    pub fn ahead(&self) -> (i32, i32) {
        let (dx, dy) = self.facing.delta();
        (self.x + dx, self.y + dy)
    }
}

/// Frame input: every flag is edge-triggered ("pressed this frame").
///
/// One physical key may set several flags (W is both `forward` and
/// `menu_up`); each scene only reads the ones it cares about.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub confirm: bool,
    pub cancel: bool,
    /// Direct level pick (1-based), e.g. from digit keys.
    pub pick_level: Option<usize>,
}

impl FrameInput {
    pub fn is_empty(&self) -> bool {
        !(self.turn_left
            || self.turn_right
            || self.forward
            || self.menu_up
            || self.menu_down
            || self.confirm
            || self.cancel
            || self.pick_level.is_some())
    }
}
