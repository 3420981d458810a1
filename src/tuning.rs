//! Data-driven game balance
//!
//! All gameplay constants live in [`Tuning`]. Hosts can override any subset
//! from a JSON document; missing fields fall back to [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ObstacleKind;

/// Errors from loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scene ===
    pub scene_width: f32,
    pub scene_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_start_y_fraction: f32,
    /// Fraction of the visual size used for the collision box
    pub hitbox_scale: f32,
    pub player_ease_time: f32,
    pub max_player_speed: f32,

    // === Road ===
    pub lane_fractions: [f32; 3],
    pub edge_inset: f32,
    pub edge_width: f32,
    pub marking_fractions: Vec<f32>,
    pub dash_width: f32,
    pub dash_height: f32,
    pub marking_step: f32,

    // === Spawning / difficulty ===
    pub spawn_interval_start: f32,
    pub spawn_interval_step: f32,
    pub spawn_interval_floor: f32,
    pub spawn_margin: f32,
    pub obstacle_travel_time: f32,
    /// Random speed variation as a fraction of base speed (0 = fixed)
    pub speed_jitter: f32,
    /// Obstacle archetypes picked uniformly at spawn
    pub archetypes: Vec<ObstacleKind>,

    // === Frame driver ===
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_start_y_fraction: PLAYER_START_Y_FRACTION,
            hitbox_scale: HITBOX_SCALE,
            player_ease_time: PLAYER_EASE_TIME,
            max_player_speed: MAX_PLAYER_SPEED,

            lane_fractions: LANE_FRACTIONS,
            edge_inset: EDGE_INSET,
            edge_width: EDGE_WIDTH,
            marking_fractions: MARKING_FRACTIONS.to_vec(),
            dash_width: DASH_WIDTH,
            dash_height: DASH_HEIGHT,
            marking_step: MARKING_STEP,

            spawn_interval_start: SPAWN_INTERVAL_START,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_floor: SPAWN_INTERVAL_FLOOR,
            spawn_margin: SPAWN_MARGIN,
            obstacle_travel_time: OBSTACLE_TRAVEL_TIME,
            speed_jitter: 0.0,
            archetypes: ObstacleKind::ALL.to_vec(),

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tuning for a scene of the given size, everything else default
    pub fn for_scene(width: f32, height: f32) -> Self {
        Self {
            scene_width: width,
            scene_height: height,
            ..Self::default()
        }
    }

    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.scene_width, self.scene_height)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height)
    }

    /// Where the player sits at start and after every restart
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.scene_width / 2.0,
            self.scene_height * self.player_start_y_fraction,
        )
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if self.scene_width <= 0.0 || self.scene_height <= 0.0 {
            return invalid("scene dimensions must be positive");
        }
        if self.player_width <= 0.0 || self.player_height <= 0.0 {
            return invalid("player size must be positive");
        }
        if !(self.hitbox_scale > 0.0 && self.hitbox_scale <= 1.0) {
            return invalid("hitbox_scale must be in (0, 1]");
        }
        if self.edge_inset < 0.0 || self.edge_width < 0.0 {
            return invalid("road edge inset and width must not be negative");
        }
        let drivable = self.scene_width - 2.0 * (self.edge_inset + self.edge_width / 2.0);
        if drivable < self.player_width * self.hitbox_scale {
            return invalid("road between the edges is narrower than the player");
        }
        if self.player_ease_time <= 0.0 || self.max_player_speed <= 0.0 {
            return invalid("player easing parameters must be positive");
        }
        if self
            .lane_fractions
            .iter()
            .chain(self.marking_fractions.iter())
            .any(|f| !(0.0..=1.0).contains(f))
        {
            return invalid("lane and marking fractions must be in [0, 1]");
        }
        if self.dash_width <= 0.0 || self.dash_height <= 0.0 {
            return invalid("lane dash size must be positive");
        }
        if self.marking_step < 0.0 {
            return invalid("marking_step must not be negative");
        }
        if self.spawn_interval_floor <= 0.0 || self.spawn_interval_step <= 0.0 {
            return invalid("spawn interval floor and step must be positive");
        }
        if self.spawn_interval_floor > self.spawn_interval_start {
            return invalid("spawn interval floor exceeds the initial interval");
        }
        if self.obstacle_travel_time <= 0.0 {
            return invalid("obstacle_travel_time must be positive");
        }
        if self.spawn_margin < 0.0 {
            return invalid("spawn_margin must not be negative");
        }
        if !(0.0..1.0).contains(&self.speed_jitter) {
            return invalid("speed_jitter must be in [0, 1)");
        }
        if self.archetypes.is_empty() {
            return invalid("archetype palette is empty");
        }
        if self.max_frame_dt <= 0.0 {
            return invalid("max_frame_dt must be positive");
        }
        Ok(())
    }
}
