//! Game state and core simulation types
//!
//! Everything the frame driver mutates lives in [`GameState`]. The scene owns
//! exactly one instance and only touches it from the frame or input callbacks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::road::Road;
use super::spawn::Difficulty;
use crate::approach;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for tap-to-restart
    GameOver,
}

/// Things that happened during a frame or input call, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    /// New obstacle above the screen (hosts flash a lane warning)
    ObstacleSpawned { id: u32, lane: usize, kind: ObstacleKind },
    ObstaclePassed { id: u32, score: u32 },
    Collision { id: u32 },
    GameOver { score: u32 },
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    /// Visual size
    pub size: Vec2,
    /// Pending horizontal movement target from pointer input
    pub target_x: Option<f32>,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            target_x: None,
        }
    }

    /// Visual rectangle
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Shrunk collision rectangle around the same center
    pub fn hitbox(&self, scale: f32) -> Rect {
        self.rect().scaled(scale)
    }

    /// Ease toward the pending target (no-op without one)
    ///
    /// Covers `dt / ease_time` of the remaining distance, capped by
    /// `max_speed * dt`, so the sprite never teleports.
    pub fn ease_toward_target(&mut self, dt: f32, ease_time: f32, max_speed: f32) {
        let Some(target) = self.target_x else {
            return;
        };
        let fraction = (dt / ease_time).min(1.0);
        let step = ((target - self.pos.x) * fraction).abs();
        self.pos.x = approach(self.pos.x, target, step.min(max_speed * dt));
    }
}

/// Obstacle archetypes, each with a fixed visual size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Cone,
    Barrier,
    Crate,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Cone,
        ObstacleKind::Barrier,
        ObstacleKind::Crate,
    ];

    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Cone => Vec2::new(80.0, 80.0),
            ObstacleKind::Barrier => Vec2::new(100.0, 70.0),
            ObstacleKind::Crate => Vec2::new(90.0, 90.0),
        }
    }
}

/// An obstacle scrolling down one lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: usize,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (units/s)
    pub speed: f32,
    /// Set once the obstacle's top edge clears the player's hitbox without a hit
    pub passed: bool,
    /// Overlapping the player's hitbox as of the last collision check
    #[serde(default)]
    pub in_contact: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Move down by `speed * dt`
    pub fn advance(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
    }

    /// Fully below the bottom of the scene
    pub fn is_off_screen(&self) -> bool {
        self.rect().max.y < 0.0
    }
}

/// Counts obstacles dodged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: u32,
}

impl ScoreTracker {
    pub fn on_obstacle_passed(&mut self) {
        self.score += 1;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn reset(&mut self) {
        self.score = 0;
    }
}

/// Complete scene state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub road: Road,
    pub difficulty: Difficulty,
    pub score: ScoreTracker,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh state in `NotStarted`
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            player: Player::new(tuning.player_start(), tuning.player_size()),
            obstacles: Vec::new(),
            road: Road::new(tuning),
            difficulty: Difficulty::from_tuning(tuning),
            score: ScoreTracker::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear the run: obstacles, score, difficulty and player position
    ///
    /// Road markings keep scrolling from where they were.
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.obstacles.clear();
        self.score.reset();
        self.difficulty.reset();
        self.player = Player::new(tuning.player_start(), tuning.player_size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hitbox_is_shrunk_around_center() {
        let player = Player::new(Vec2::new(200.0, 200.0), Vec2::new(70.0, 120.0));
        let hitbox = player.hitbox(0.8);
        assert_eq!(hitbox.min, Vec2::new(172.0, 152.0));
        assert_eq!(hitbox.max, Vec2::new(228.0, 248.0));
    }

    #[test]
    fn test_ease_without_target_is_noop() {
        let mut player = Player::new(Vec2::new(100.0, 50.0), Vec2::new(70.0, 120.0));
        player.ease_toward_target(0.016, 0.1, 2400.0);
        assert_eq!(player.pos, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_ease_is_gradual() {
        let mut player = Player::new(Vec2::new(100.0, 50.0), Vec2::new(70.0, 120.0));
        player.target_x = Some(300.0);

        player.ease_toward_target(0.05, 0.1, 2400.0);
        assert!((player.pos.x - 200.0).abs() < 0.001);

        // A long frame reaches the target but never overshoots
        player.ease_toward_target(1.0, 0.1, 2400.0);
        assert_eq!(player.pos.x, 300.0);
    }

    #[test]
    fn test_ease_respects_speed_cap() {
        let mut player = Player::new(Vec2::new(0.0, 50.0), Vec2::new(70.0, 120.0));
        player.target_x = Some(1000.0);
        player.ease_toward_target(0.05, 0.1, 100.0);
        assert!((player.pos.x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_obstacle_advance_and_off_screen() {
        let mut obstacle = Obstacle {
            id: 1,
            kind: ObstacleKind::Cone,
            lane: 0,
            pos: Vec2::new(50.0, 100.0),
            size: ObstacleKind::Cone.size(),
            speed: 200.0,
            passed: false,
            in_contact: false,
        };
        obstacle.advance(0.5);
        assert_eq!(obstacle.pos.y, 0.0);
        assert!(!obstacle.is_off_screen());

        obstacle.advance(0.25);
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_reset_run() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        state.score.on_obstacle_passed();
        state.player.pos.x = 60.0;
        state.player.target_x = Some(60.0);
        state.difficulty.record_spawn();

        state.reset_run(&tuning);
        assert_eq!(state.score.score(), 0);
        assert_eq!(state.player.pos, tuning.player_start());
        assert_eq!(state.player.target_x, None);
        assert_eq!(state.difficulty.interval(), tuning.spawn_interval_start);
    }
}
