//! Per-frame simulation module
//!
//! All gameplay logic lives here:
//! - Frame-time driven, one step per rendered frame
//! - Injectable RNG only
//! - Stable iteration order (obstacles kept in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod road;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, clamp_to_road, detect_collision, hits_road_edge};
pub use road::{LANE_COUNT, Road, RoadMarking};
pub use spawn::{Difficulty, RandomSource, ScriptedRandom, obstacle_speed, spawn_obstacle};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Player, ScoreTracker,
};
pub use tick::{FrameOutcome, frame_delta, tick};
