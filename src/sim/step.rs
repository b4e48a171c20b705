/// The update function: advances the session by one frame.
///
/// Dispatch is a single `match` on the active scene:
///
///   - MainMenu → cursor / pick / exit
///   - Level    → pause check, then movement
///   - Pause    → resume / pick another level / menu / exit
///
/// Point collection runs on every frame that ends inside a level, input or
/// not, so the tile under the player is claimed on entry and while idle.
///
/// Anything that changes scene goes through a `GameSession` transition
/// method so store ↔ working-copy sync happens in one place.

use crate::domain::entity::FrameInput;
use crate::domain::rules;
use super::event::GameEvent;
use super::scene::{self, MenuItem, Scene};
use super::session::GameSession;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn update(session: &mut GameSession, input: &FrameInput) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    if session.should_close() {
        return events;
    }
    if input.is_empty() && !matches!(session.scene, Scene::Level(_)) {
        return events;
    }

    let before = session.scene_id();
    match session.scene {
        Scene::MainMenu { .. } => update_main_menu(session, input, &mut events),
        Scene::Level(_) => update_level(session, input, &mut events),
        Scene::Pause { .. } => update_pause(session, input, &mut events),
    }

    let after = session.scene_id();
    if after != before {
        events.push(GameEvent::SceneChanged { to: after });
    }
    collect_point(session, &mut events);
    events
}

// ══════════════════════════════════════════════════════════════
// Per-scene updates
// ══════════════════════════════════════════════════════════════

fn update_main_menu(session: &mut GameSession, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let items = scene::main_menu_items(&session.store);
    let Scene::MainMenu { cursor } = &mut session.scene else { return };

    if scene::step_cursor(cursor, items.len(), input.menu_up, input.menu_down) {
        events.push(GameEvent::MenuMoved);
    }

    let chosen = if let Some(n) = input.pick_level {
        pick(session, n)
    } else if input.confirm {
        items.get(*cursor).copied()
    } else if input.cancel {
        Some(MenuItem::Exit)
    } else {
        None
    };

    if let Some(item) = chosen {
        activate(session, item, events);
    }
}

fn update_level(session: &mut GameSession, input: &FrameInput, events: &mut Vec<GameEvent>) {
    if input.cancel {
        session.pause();
        return;
    }

    let Scene::Level(active) = &mut session.scene else { return };

    let moved = rules::handle_player_movement(&mut active.player, input, &active.map);
    if moved.turned {
        events.push(GameEvent::Turned { facing: active.player.facing });
    }
    if moved.moved {
        events.push(GameEvent::Moved { x: active.player.x, y: active.player.y });
    }
    if moved.bumped {
        events.push(GameEvent::Bumped);
    }
    if moved.changed() {
        log::trace!(
            "player ({}, {}) facing {}",
            active.player.x, active.player.y, active.player.facing.name(),
        );
    }
}

fn update_pause(session: &mut GameSession, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let Scene::Pause { level, .. } = session.scene else { return };
    let items = scene::pause_menu_items(&session.store, level);
    let Scene::Pause { cursor, .. } = &mut session.scene else { return };

    if scene::step_cursor(cursor, items.len(), input.menu_up, input.menu_down) {
        events.push(GameEvent::MenuMoved);
    }

    let chosen = if input.cancel {
        Some(MenuItem::Resume)
    } else if let Some(n) = input.pick_level {
        // The paused level's own number resumes it rather than restarting.
        pick(session, n).map(|item| match item {
            MenuItem::Level(l) if l == level => MenuItem::Resume,
            other => other,
        })
    } else if input.confirm {
        items.get(*cursor).copied()
    } else {
        None
    };

    if let Some(item) = chosen {
        activate(session, item, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

/// Resolve a typed level number. Unknown numbers are player input, not bugs.
fn pick(session: &GameSession, n: usize) -> Option<MenuItem> {
    match session.store.level_id(n) {
        Ok(level) => Some(MenuItem::Level(level)),
        Err(e) => {
            log::debug!("ignored level pick: {e}");
            None
        }
    }
}

/// Claim the point under the player when a level is on screen.
fn collect_point(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let Scene::Level(active) = &mut session.scene else { return };

    let level = active.level;
    let stored = session.store.map_mut(level);
    if rules::check_point_collection(&mut active.map, &active.player, stored, &mut session.score) {
        log::info!(
            "point collected on level {level} at ({}, {}), score {}",
            active.player.x, active.player.y, session.score,
        );
        events.push(GameEvent::PointClaimed {
            level,
            x: active.player.x,
            y: active.player.y,
            score: session.score,
        });
    }
}

fn activate(session: &mut GameSession, item: MenuItem, events: &mut Vec<GameEvent>) {
    match item {
        MenuItem::Resume => session.resume(),
        MenuItem::Level(level) => session.enter_level(level),
        MenuItem::MainMenu => session.return_to_menu(),
        MenuItem::Exit => {
            session.request_close();
            events.push(GameEvent::CloseRequested);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Direction, PlayerState};
    use crate::domain::map::GameMap;
    use crate::sim::scene::{ActiveLevel, SceneId};
    use crate::sim::store::LevelStore;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn() -> PlayerState {
        PlayerState::new(5, 5, Direction::North)
    }

    fn session_with(maps: Vec<GameMap>) -> GameSession {
        GameSession::new(LevelStore::from_maps(maps, spawn()).unwrap(), spawn())
    }

    fn session(levels: usize) -> GameSession {
        session_with(vec![GameMap::new(10, 10); levels])
    }

    fn active(s: &GameSession) -> &ActiveLevel {
        match &s.scene {
            Scene::Level(a) => a,
            other => panic!("expected a level, got {:?}", other.id()),
        }
    }

    fn press(s: &mut GameSession, input: FrameInput) -> Vec<GameEvent> {
        update(s, &input)
    }

    fn pick_level(n: usize) -> FrameInput {
        FrameInput { pick_level: Some(n), ..Default::default() }
    }
    fn esc() -> FrameInput {
        FrameInput { cancel: true, ..Default::default() }
    }
    fn fwd() -> FrameInput {
        FrameInput { forward: true, ..Default::default() }
    }
    fn left() -> FrameInput {
        FrameInput { turn_left: true, ..Default::default() }
    }
    fn right() -> FrameInput {
        FrameInput { turn_right: true, ..Default::default() }
    }
    fn down() -> FrameInput {
        FrameInput { menu_down: true, ..Default::default() }
    }
    fn confirm() -> FrameInput {
        FrameInput { confirm: true, ..Default::default() }
    }

    fn face(s: &mut GameSession, want: Direction) {
        while active(s).player.facing != want {
            press(s, right());
        }
    }

    /// Walk to (x, y) using only turn/forward input: horizontal leg first.
    fn walk_to(s: &mut GameSession, x: i32, y: i32) {
        let here = active(s).player;
        if x < here.x { face(s, Direction::West) } else { face(s, Direction::East) }
        for _ in 0..(x - here.x).abs() { press(s, fwd()); }
        if y < here.y { face(s, Direction::North) } else { face(s, Direction::South) }
        for _ in 0..(y - here.y).abs() { press(s, fwd()); }
        assert_eq!((active(s).player.x, active(s).player.y), (x, y));
    }

    // ── Menu ──

    #[test]
    fn menu_pick_enters_level_at_spawn() {
        let mut s = session(4);
        let events = press(&mut s, pick_level(3));
        let l3 = s.store.level_id(3).unwrap();
        assert_eq!(s.scene_id(), SceneId::Level(l3));
        assert_eq!(active(&s).player, spawn());
        assert!(events.contains(&GameEvent::SceneChanged { to: SceneId::Level(l3) }));
    }

    #[test]
    fn menu_cursor_then_confirm() {
        let mut s = session(4);
        press(&mut s, down());
        press(&mut s, confirm());
        assert_eq!(s.scene_id(), SceneId::Level(s.store.level_id(2).unwrap()));
    }

    #[test]
    fn menu_exit_row_requests_close() {
        let mut s = session(2);
        // rows: L1, L2, Exit
        press(&mut s, down());
        press(&mut s, down());
        let events = press(&mut s, confirm());
        assert!(s.should_close());
        assert!(events.contains(&GameEvent::CloseRequested));
    }

    #[test]
    fn menu_unknown_level_ignored() {
        let mut s = session(4);
        let events = press(&mut s, pick_level(9));
        assert_eq!(s.scene_id(), SceneId::MainMenu);
        assert!(events.is_empty());
    }

    #[test]
    fn closed_session_ignores_input() {
        let mut s = session(1);
        s.request_close();
        assert!(press(&mut s, pick_level(1)).is_empty());
        assert_eq!(s.scene_id(), SceneId::MainMenu);
    }

    // ── Level ──

    #[test]
    fn level_movement_events() {
        let mut s = session(1);
        press(&mut s, pick_level(1));

        let events = press(&mut s, fwd());
        assert_eq!(events, vec![GameEvent::Moved { x: 5, y: 4 }]);

        let events = press(&mut s, left());
        assert_eq!(events, vec![GameEvent::Turned { facing: Direction::West }]);
    }

    #[test]
    fn bump_at_edge() {
        let mut s = session(1);
        press(&mut s, pick_level(1));
        walk_to(&mut s, 0, 0);
        // walk_to finished facing north
        let events = press(&mut s, fwd());
        assert_eq!(events, vec![GameEvent::Bumped]);
        assert_eq!((active(&s).player.x, active(&s).player.y), (0, 0));
    }

    // ── Scenarios ──

    #[test]
    fn claim_survives_pause_and_resume() {
        let mut map = GameMap::new(10, 10);
        map.place_point(2, 3);
        let mut s = session_with(vec![map, GameMap::new(10, 10)]);
        let l1 = s.store.first();

        press(&mut s, pick_level(1));
        walk_to(&mut s, 2, 3);
        assert!(s.store.slot(l1).map.tile(2, 3).is_some_and(|t| t.is_claimed));
        assert_eq!(s.score, 1);

        press(&mut s, esc());
        assert_eq!(s.scene_id(), SceneId::Pause);
        press(&mut s, esc());
        assert_eq!(s.scene_id(), SceneId::Level(l1));

        let a = active(&s);
        assert_eq!((a.player.x, a.player.y), (2, 3));
        assert!(a.map.tile(2, 3).is_some_and(|t| t.is_claimed));
        assert!(s.store.slot(l1).map.tile(2, 3).is_some_and(|t| t.is_claimed));
        assert_eq!(s.score, 1);

        // standing on the claimed tile again does nothing
        press(&mut s, left());
        assert_eq!(s.score, 1);
    }

    #[test]
    fn selecting_other_level_from_pause_resets_position() {
        let mut s = session(4);
        let l2 = s.store.level_id(2).unwrap();
        let l3 = s.store.level_id(3).unwrap();

        press(&mut s, pick_level(2));
        walk_to(&mut s, 7, 8);
        press(&mut s, esc());
        let saved = s.store.slot(l2).player;
        assert_eq!((saved.x, saved.y), (7, 8));

        press(&mut s, pick_level(3));
        assert_eq!(s.scene_id(), SceneId::Level(l3));
        assert_eq!(active(&s).player, spawn());
        assert_eq!(s.store.slot(l2).player, saved);
        assert_eq!(s.last_active_level, l3);
    }

    #[test]
    fn pause_menu_row_selects_other_level() {
        let mut s = session(3);
        press(&mut s, pick_level(1));
        press(&mut s, fwd());
        press(&mut s, esc());
        // rows: Resume, L2, L3, Main Menu, Exit
        press(&mut s, down());
        press(&mut s, confirm());
        assert_eq!(s.scene_id(), SceneId::Level(s.store.level_id(2).unwrap()));
        assert_eq!(active(&s).player, spawn());
    }

    #[test]
    fn pause_pick_of_same_level_resumes() {
        let mut s = session(2);
        press(&mut s, pick_level(2));
        press(&mut s, fwd());
        press(&mut s, esc());
        press(&mut s, pick_level(2));
        assert_eq!((active(&s).player.x, active(&s).player.y), (5, 4));
    }

    #[test]
    fn menu_entry_always_resets_even_with_saved_position() {
        let mut s = session(2);
        let l1 = s.store.first();
        press(&mut s, pick_level(1));
        walk_to(&mut s, 1, 1);
        press(&mut s, esc());

        // Pause → Main Menu row (Resume, L2, Main Menu, Exit)
        press(&mut s, down());
        press(&mut s, down());
        press(&mut s, confirm());
        assert_eq!(s.scene_id(), SceneId::MainMenu);

        press(&mut s, pick_level(1));
        assert_eq!(active(&s).player, spawn());
        assert_eq!((s.store.slot(l1).player.x, s.store.slot(l1).player.y), (1, 1));
    }

    #[test]
    fn pause_exit_requests_close() {
        let mut s = session(1);
        press(&mut s, pick_level(1));
        press(&mut s, esc());
        // rows: Resume, Main Menu, Exit
        press(&mut s, down());
        press(&mut s, down());
        press(&mut s, confirm());
        assert!(s.should_close());
    }

    #[test]
    fn score_matches_claimed_tiles_across_levels() {
        let mut a = GameMap::new(10, 10);
        a.place_point(5, 4);
        a.place_point(5, 3);
        let mut b = GameMap::new(10, 10);
        b.place_point(5, 4);
        let mut s = session_with(vec![a, b]);

        press(&mut s, pick_level(1));
        press(&mut s, fwd());
        press(&mut s, fwd());
        press(&mut s, esc());
        press(&mut s, pick_level(2));
        press(&mut s, fwd());
        // back to level 1 fresh: claims remain, nothing re-scored
        press(&mut s, esc());
        press(&mut s, pick_level(1));
        press(&mut s, fwd());
        press(&mut s, fwd());

        assert_eq!(s.score, 3);
        assert_eq!(s.store.claimed_total(), 3);
    }

    #[test]
    fn point_on_spawn_is_claimed_on_entry() {
        let mut map = GameMap::new(10, 10);
        map.place_point(5, 5);
        let mut s = session_with(vec![map]);
        let l1 = s.store.first();

        let events = press(&mut s, pick_level(1));
        assert!(events.contains(&GameEvent::PointClaimed { level: l1, x: 5, y: 5, score: 1 }));
        assert!(s.store.slot(l1).map.tile(5, 5).is_some_and(|t| t.is_claimed));

        // idle frames and walking off never re-score it
        for _ in 0..3 {
            assert!(press(&mut s, FrameInput::default()).is_empty());
        }
        press(&mut s, fwd());
        assert_eq!(s.score, 1);
        assert_eq!(s.store.claimed_total(), 1);
    }

    #[test]
    fn idle_frame_claims_tile_under_player() {
        let mut s = session(1);
        press(&mut s, pick_level(1));
        // a point appears under the player in the working copy and the store
        let l1 = s.store.first();
        if let Scene::Level(a) = &mut s.scene {
            if let Some(t) = a.map.tile_mut(5, 5) {
                t.has_point = true;
            }
        }
        s.store.map_mut(l1).place_point(5, 5);

        let events = press(&mut s, FrameInput::default());
        assert_eq!(events, vec![GameEvent::PointClaimed { level: l1, x: 5, y: 5, score: 1 }]);
    }

    #[test]
    fn idle_frame_in_menus_does_nothing() {
        let mut s = session(2);
        assert!(press(&mut s, FrameInput::default()).is_empty());
        press(&mut s, pick_level(1));
        press(&mut s, esc());
        assert!(press(&mut s, FrameInput::default()).is_empty());
        assert_eq!(s.scene_id(), SceneId::Pause);
    }

    #[test]
    fn claim_event_carries_score() {
        let mut map = GameMap::new(10, 10);
        map.place_point(5, 4);
        let mut s = session_with(vec![map]);
        let l1 = s.store.first();
        press(&mut s, pick_level(1));
        let events = press(&mut s, fwd());
        assert!(events.contains(&GameEvent::PointClaimed { level: l1, x: 5, y: 4, score: 1 }));
    }

    // ── Properties ──

    fn frame_input() -> impl Strategy<Value = FrameInput> {
        (
            prop::array::uniform5(prop::bool::weighted(0.3)),
            prop::bool::weighted(0.05),
            prop::bool::weighted(0.1),
            prop::option::weighted(0.1, 1usize..=4),
        )
            .prop_map(|(b, confirm, cancel, pick_level)| FrameInput {
                turn_left: b[0],
                turn_right: b[1],
                forward: b[2],
                menu_up: b[3],
                menu_down: b[4],
                confirm,
                cancel,
                pick_level,
            })
    }

    /// `is_claimed` of every stored tile, level by level.
    fn claim_marks(s: &GameSession) -> Vec<bool> {
        let mut marks = Vec::new();
        for level in s.store.levels() {
            let map = &s.store.slot(level).map;
            for y in 0..map.height() as i32 {
                for x in 0..map.width() as i32 {
                    marks.push(map.tile(x, y).is_some_and(|t| t.is_claimed));
                }
            }
        }
        marks
    }

    proptest! {
        #[test]
        fn score_tracks_claims_under_any_input(
            seed in any::<u64>(),
            inputs in prop::collection::vec(frame_input(), 1..200),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let store = LevelStore::seeded(3, 10, 10, 3, spawn(), &mut rng).unwrap();
            let mut s = GameSession::new(store, spawn());
            let mut before = claim_marks(&s);

            for input in &inputs {
                update(&mut s, input);
                prop_assert_eq!(s.score as usize, s.store.claimed_total());

                let after = claim_marks(&s);
                for (was, now) in before.iter().zip(&after) {
                    prop_assert!(!*was || *now, "a claimed tile reverted");
                }
                before = after;

                if let Scene::Level(a) = &s.scene {
                    prop_assert_eq!(&a.map, &s.store.slot(a.level).map);
                }
            }
        }
    }
}
