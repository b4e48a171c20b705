/// Persistent level state: one map + saved player per level.
///
/// Lives for the whole process. Scenes never hold references into it;
/// they take owned copies via `load()` and write back through
/// `save_player()` / `map_mut()` at well-defined points.

use std::fmt;

use rand::Rng;

use crate::domain::entity::PlayerState;
use crate::domain::map::GameMap;
use crate::error::{GameError, Result};

/// Validated 1-based level identifier.
///
/// Only `LevelStore::level_id` / `LevelId::new` create these, so an id
/// always refers to a level that existed when it was made.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LevelId(usize);

impl LevelId {
    pub fn new(id: usize, count: usize) -> Result<Self> {
        if id == 0 || id > count {
            return Err(GameError::InvalidLevel { id, count });
        }
        Ok(LevelId(id))
    }

    /// 1-based number, as shown to the player.
    pub fn get(self) -> usize {
        self.0
    }

    fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct LevelSlot {
    pub map: GameMap,
    /// Last position saved on leaving the level for the pause menu.
    pub player: PlayerState,
}

#[derive(Clone, Debug)]
pub struct LevelStore {
    slots: Vec<LevelSlot>,
}

impl LevelStore {
    /// Seed `count` levels. Each tile has a 1-in-`odds` chance of a point.
    /// Done once per process; claims are never re-seeded afterwards.
    pub fn seeded<R: Rng + ?Sized>(
        count: usize,
        width: usize,
        height: usize,
        odds: u32,
        spawn: PlayerState,
        rng: &mut R,
    ) -> Result<Self> {
        let maps = (0..count)
            .map(|_| GameMap::seeded(width, height, odds, rng))
            .collect();
        Self::from_maps(maps, spawn)
    }

    /// Build a store from hand-made maps (level 1 first).
    pub fn from_maps(maps: Vec<GameMap>, spawn: PlayerState) -> Result<Self> {
        if maps.is_empty() {
            return Err(GameError::NoLevels);
        }
        let slots = maps
            .into_iter()
            .map(|map| LevelSlot { map, player: spawn })
            .collect();
        Ok(LevelStore { slots })
    }

    pub fn level_count(&self) -> usize {
        self.slots.len()
    }

    pub fn level_id(&self, id: usize) -> Result<LevelId> {
        LevelId::new(id, self.slots.len())
    }

    /// All level ids in order.
    pub fn levels(&self) -> impl Iterator<Item = LevelId> + '_ {
        (1..=self.slots.len()).map(LevelId)
    }

    pub fn first(&self) -> LevelId {
        LevelId(1)
    }

    /// Panics if `level` was issued for a store with more levels.
    pub fn slot(&self, level: LevelId) -> &LevelSlot {
        &self.slots[level.index()]
    }

    pub fn map_mut(&mut self, level: LevelId) -> &mut GameMap {
        &mut self.slots[level.index()].map
    }

    pub fn save_player(&mut self, level: LevelId, state: PlayerState) {
        self.slots[level.index()].player = state;
    }

    /// Owned working copies for an active session.
    pub fn load(&self, level: LevelId) -> (GameMap, PlayerState) {
        let slot = self.slot(level);
        (slot.map.clone(), slot.player)
    }

    /// Claimed tiles across every level.
    pub fn claimed_total(&self) -> usize {
        self.slots.iter().map(|s| s.map.claimed_count()).sum()
    }
}
