/// Events emitted during an update.
/// The presentation layer consumes these for sound and messages.

use crate::domain::entity::Direction;
use super::scene::SceneId;
use super::store::LevelId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Turned { facing: Direction },
    Moved { x: i32, y: i32 },
    Bumped,
    PointClaimed { level: LevelId, x: i32, y: i32, score: u32 },
    MenuMoved,
    SceneChanged { to: SceneId },
    CloseRequested,
}
