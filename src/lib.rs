//! Lane Dodge - A three-lane obstacle-dodging driving game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, spawning, collisions, game state)
//! - `game`: Scene wrapper that owns the state machine and talks to the host
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard fed by the game-over callback
//! - `autopilot`: Attract-mode driver used by the headless binary

pub mod autopilot;
pub mod game;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use game::{GameOverListener, InputEvent, InputQueue, Scene};
pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Default scene size (portrait phone, points)
    pub const SCENE_WIDTH: f32 = 390.0;
    pub const SCENE_HEIGHT: f32 = 844.0;

    /// Player car visual size
    pub const PLAYER_WIDTH: f32 = 70.0;
    pub const PLAYER_HEIGHT: f32 = 120.0;
    /// Player start height as a fraction of scene height
    pub const PLAYER_START_Y_FRACTION: f32 = 0.2;
    /// Collision box is this fraction of the visual size (forgiving hits)
    pub const HITBOX_SCALE: f32 = 0.8;

    /// Seconds for the player to ease most of the way to its target
    pub const PLAYER_EASE_TIME: f32 = 0.1;
    /// Hard cap on horizontal player speed (units/s)
    pub const MAX_PLAYER_SPEED: f32 = 2400.0;

    /// Lane centers as fractions of scene width
    pub const LANE_FRACTIONS: [f32; 3] = [0.16, 0.5, 0.84];

    /// Road edge colliders
    pub const EDGE_INSET: f32 = 20.0;
    pub const EDGE_WIDTH: f32 = 5.0;

    /// Dashed lane dividers
    pub const MARKING_FRACTIONS: [f32; 2] = [0.33, 0.67];
    pub const DASH_WIDTH: f32 = 15.0;
    pub const DASH_HEIGHT: f32 = 50.0;
    /// Dash scroll per playing frame
    pub const MARKING_STEP: f32 = 10.0;

    /// Spawn interval staircase (seconds)
    pub const SPAWN_INTERVAL_START: f32 = 1.5;
    pub const SPAWN_INTERVAL_STEP: f32 = 0.02;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 0.5;

    /// Extra headroom above the scene where obstacles appear
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Seconds an obstacle takes from spawn to fully off-screen
    pub const OBSTACLE_TRAVEL_TIME: f32 = 3.5;

    /// Largest frame delta the simulation will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = (target - current).clamp(-max_delta, max_delta);
    current + delta
}
