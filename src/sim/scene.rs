/// Scenes: the variants of the state machine and their menu layouts.
///
/// ```text
///   MainMenu ──select k──▶ Level(k) ──esc──▶ Pause(k)
///      ▲                     ▲  ▲              │
///      │                     │  └──resume──────┤
///      │                     └──select j≠k─────┤
///      └──────────main menu────────────────────┘
/// ```
///
/// Only `Level` carries working copies of player and map. `Pause`
/// remembers which level it is covering so that level stays on screen.

use crate::domain::entity::PlayerState;
use crate::domain::map::GameMap;
use super::store::{LevelId, LevelStore};

/// Scene identity, without payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SceneId {
    MainMenu,
    Level(LevelId),
    Pause,
}

/// Live session data for the level being played.
#[derive(Clone, Debug)]
pub struct ActiveLevel {
    pub level: LevelId,
    pub player: PlayerState,
    pub map: GameMap,
}

#[derive(Clone, Debug)]
pub enum Scene {
    MainMenu { cursor: usize },
    Level(ActiveLevel),
    Pause { level: LevelId, cursor: usize },
}

impl Scene {
    pub fn main_menu() -> Self {
        Scene::MainMenu { cursor: 0 }
    }

    pub fn id(&self) -> SceneId {
        match self {
            Scene::MainMenu { .. } => SceneId::MainMenu,
            Scene::Level(active) => SceneId::Level(active.level),
            Scene::Pause { .. } => SceneId::Pause,
        }
    }
}

// ── Menus ──

/// One clickable row of a menu.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    Resume,
    Level(LevelId),
    MainMenu,
    Exit,
}

/// Main menu: every level, then Exit.
pub fn main_menu_items(store: &LevelStore) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = store.levels().map(MenuItem::Level).collect();
    items.push(MenuItem::Exit);
    items
}

/// Pause menu: Resume, every *other* level, Main Menu, Exit.
pub fn pause_menu_items(store: &LevelStore, paused: LevelId) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::Resume];
    items.extend(store.levels().filter(|&l| l != paused).map(MenuItem::Level));
    items.push(MenuItem::MainMenu);
    items.push(MenuItem::Exit);
    items
}

/// Move a menu cursor one row, wrapping at both ends.
pub fn step_cursor(cursor: &mut usize, len: usize, up: bool, down: bool) -> bool {
    if len == 0 || up == down {
        return false;
    }
    *cursor = if up {
        (*cursor + len - 1) % len
    } else {
        (*cursor + 1) % len
    };
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Direction;

    fn store(levels: usize) -> LevelStore {
        let spawn = PlayerState::new(5, 5, Direction::North);
        LevelStore::from_maps(vec![GameMap::new(10, 10); levels], spawn).unwrap()
    }

    #[test]
    fn main_menu_lists_levels_then_exit() {
        let s = store(4);
        let items = main_menu_items(&s);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0], MenuItem::Level(s.first()));
        assert_eq!(items[4], MenuItem::Exit);
    }

    #[test]
    fn pause_menu_skips_paused_level() {
        let s = store(4);
        let l2 = s.level_id(2).unwrap();
        let items = pause_menu_items(&s, l2);
        assert_eq!(items.first(), Some(&MenuItem::Resume));
        assert!(!items.contains(&MenuItem::Level(l2)));
        assert_eq!(items.iter().filter(|i| matches!(i, MenuItem::Level(_))).count(), 3);
        assert_eq!(items[items.len() - 2], MenuItem::MainMenu);
        assert_eq!(items[items.len() - 1], MenuItem::Exit);
    }

    #[test]
    fn cursor_wraps() {
        let mut c = 0;
        assert!(step_cursor(&mut c, 3, true, false));
        assert_eq!(c, 2);
        assert!(step_cursor(&mut c, 3, false, true));
        assert_eq!(c, 0);
        // both or neither: no movement
        assert!(!step_cursor(&mut c, 3, true, true));
        assert!(!step_cursor(&mut c, 3, false, false));
        assert_eq!(c, 0);
    }

    #[test]
    fn scene_identity() {
        let s = store(1);
        assert_eq!(Scene::main_menu().id(), SceneId::MainMenu);
        let pause = Scene::Pause { level: s.first(), cursor: 0 };
        assert_eq!(pause.id(), SceneId::Pause);
    }
}
