/// Movement and point-collection rules.
///
/// Pure functions over a player and a map. Input comes in as a
/// `FrameInput`; nothing here polls devices or touches the scene.
///
/// ## Movement Truth Table
///
/// Inputs are applied in this order within a single frame, so
/// "turn right + forward" steps in the *new* direction.
///
/// ┌──────────────────────┬──────────────────────────┬─────────────┐
/// │ Input                 │ Effect                    │ Outcome     │
/// ├──────────────────────┼──────────────────────────┼─────────────┤
/// │ turn_left             │ facing −1 mod 4           │ turned      │
/// │ turn_right            │ facing +1 mod 4           │ turned      │
/// │ forward, dest in map  │ (x, y) += facing delta    │ moved       │
/// │ forward, dest outside │ stay in place             │ bumped      │
/// │ nothing               │ -                         │ (none)      │
/// └──────────────────────┴──────────────────────────┴─────────────┘
///
/// Validity is bounds-only: every in-map tile is walkable.
///
/// ## Collection
///
/// ┌───────────────────────────┬──────────────────────────────────┐
/// │ Tile under player          │ Effect                            │
/// ├───────────────────────────┼──────────────────────────────────┤
/// │ has_point && !is_claimed   │ claim in active AND stored map,  │
/// │                            │ score += 1                        │
/// │ anything else              │ no-op                             │
/// └───────────────────────────┴──────────────────────────────────┘

use super::entity::{FrameInput, PlayerState};
use super::map::GameMap;

/// What a frame of movement input did to the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MoveOutcome {
    pub turned: bool,
    pub moved: bool,
    /// Forward was requested but the destination is off the map.
    pub bumped: bool,
}

impl MoveOutcome {
    /// Did any input change the player's state?
    pub fn changed(&self) -> bool {
        self.turned || self.moved
    }
}

/// Is (x, y) a legal position on `map`?
#[inline]
pub fn is_valid_move(map: &GameMap, x: i32, y: i32) -> bool {
    map.in_bounds(x, y)
}

/// Apply one frame of turn/forward input. See truth table above.
pub fn handle_player_movement(player: &mut PlayerState, input: &FrameInput, map: &GameMap) -> MoveOutcome {
    let mut out = MoveOutcome::default();

    if input.turn_left {
        player.facing = player.facing.turn_left();
        out.turned = true;
    }
    if input.turn_right {
        player.facing = player.facing.turn_right();
        out.turned = true;
    }

    if input.forward {
        let (tx, ty) = player.ahead();
        if is_valid_move(map, tx, ty) {
            player.x = tx;
            player.y = ty;
            out.moved = true;
        } else {
            out.bumped = true;
        }
    }

    out
}

/// Claim the point under the player, if any.
///
/// `active` is the session's working copy, `stored` the level's entry in
/// the persistent store. Both are marked so they never diverge.
/// Returns true when a point was claimed (score already incremented).
pub fn check_point_collection(
    active: &mut GameMap,
    player: &PlayerState,
    stored: &mut GameMap,
    score: &mut u32,
) -> bool {
    let claimed = match active.tile_mut(player.x, player.y) {
        Some(tile) => tile.claim(),
        None => false,
    };
    if !claimed {
        return false;
    }
    if let Some(tile) = stored.tile_mut(player.x, player.y) {
        tile.claim();
    }
    *score += 1;
    true
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
