/// GameSession: everything that survives from one frame to the next.
///
/// ## Two copies of level state
///
///   - `store`: per-level map + saved player. Source of truth.
///   - `scene`: when in `Scene::Level`, an owned working copy.
///
/// They are reconciled only here, at transitions:
///
/// ┌────────────────────────┬───────────────────────────────────────┐
/// │ Transition              │ Sync                                  │
/// ├────────────────────────┼───────────────────────────────────────┤
/// │ enter_level (fresh)     │ map ← store; player ← spawn           │
/// │ pause                   │ store.player ← player                 │
/// │ resume                  │ map ← store; player ← store.player    │
/// │ return_to_menu          │ (none; already saved on pause)        │
/// └────────────────────────┴───────────────────────────────────────┘
///
/// Point claims are the one exception: the collection rule writes the
/// claim into both copies the moment it happens.

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::entity::PlayerState;
use crate::error::Result;
use super::scene::{ActiveLevel, Scene, SceneId};
use super::store::{LevelId, LevelStore};

pub struct GameSession {
    pub store: LevelStore,
    pub scene: Scene,
    pub score: u32,
    /// Level that Resume returns to.
    pub last_active_level: LevelId,
    /// Where every fresh entry starts.
    pub spawn: PlayerState,
    close_requested: bool,
}

// ── Construction ──

impl GameSession {
    pub fn new(store: LevelStore, spawn: PlayerState) -> Self {
        let first = store.first();
        GameSession {
            store,
            scene: Scene::main_menu(),
            score: 0,
            last_active_level: first,
            spawn,
            close_requested: false,
        }
    }

    /// Seed a fresh store from config.
    pub fn from_config<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        let spawn = config.spawn;
        let store = LevelStore::seeded(
            config.levels.len(),
            config.map.width,
            config.map.height,
            config.map.point_odds,
            spawn,
            rng,
        )?;
        for level in store.levels() {
            log::debug!("level {level}: {} points", store.slot(level).map.point_count());
        }
        log::info!(
            "seeded {} levels ({}x{}, 1 in {} tiles hold a point)",
            store.level_count(), config.map.width, config.map.height, config.map.point_odds,
        );
        Ok(GameSession::new(store, spawn))
    }
}

// ── Transitions ──

impl GameSession {
    /// Fresh entry: reset position to spawn, keep the level's claims.
    /// Used from the main menu and when picking another level while paused.
    pub fn enter_level(&mut self, level: LevelId) {
        let (map, _) = self.store.load(level);
        self.last_active_level = level;
        self.scene = Scene::Level(ActiveLevel { level, player: self.spawn, map });
        log::debug!("enter level {level} at spawn ({}, {})", self.spawn.x, self.spawn.y);
    }

    /// Save the player into the store and show the pause menu.
    /// No-op outside a level.
    pub fn pause(&mut self) {
        let Scene::Level(active) = &self.scene else {
            log::warn!("pause requested from {:?}; ignored", self.scene.id());
            return;
        };
        let level = active.level;
        self.store.save_player(level, active.player);
        log::debug!(
            "pause level {level}, saved ({}, {}) facing {}",
            active.player.x, active.player.y, active.player.facing.name(),
        );
        self.scene = Scene::Pause { level, cursor: 0 };
    }

    /// Return to the last active level exactly where it was left.
    pub fn resume(&mut self) {
        let level = self.last_active_level;
        let (map, player) = self.store.load(level);
        self.scene = Scene::Level(ActiveLevel { level, player, map });
        log::debug!("resume level {level} at ({}, {})", player.x, player.y);
    }

    pub fn return_to_menu(&mut self) {
        self.scene = Scene::main_menu();
        log::debug!("return to main menu");
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
        log::info!("close requested, final score {}", self.score);
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene.id()
    }

    /// Level whose view is on screen (playing or paused over).
    pub fn displayed_level(&self) -> Option<LevelId> {
        match &self.scene {
            Scene::MainMenu { .. } => None,
            Scene::Level(active) => Some(active.level),
            Scene::Pause { level, .. } => Some(*level),
        }
    }
}
