//! Obstacle spawning and the difficulty staircase
//!
//! Lane and archetype are drawn uniformly from an injectable random source.
//! Nothing stops two obstacles from landing in the same lane back to back.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::road::LANE_COUNT;
use super::state::{GameEvent, GameState, Obstacle};
use crate::tuning::Tuning;

/// Source of uniform choices for the spawner
pub trait RandomSource {
    /// Uniform index in `0..len` (`len > 0`)
    fn pick(&mut self, len: usize) -> usize;
    /// Uniform value in `[-1, 1]`
    fn jitter(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn jitter(&mut self) -> f32 {
        self.random_range(-1.0..=1.0)
    }
}

/// Replays a fixed sequence of choices, cycling when exhausted
///
/// Picks are reduced modulo `len`. Jitter is always 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        match self.picks.pop_front() {
            Some(value) => {
                self.picks.push_back(value);
                value % len
            }
            None => 0,
        }
    }

    fn jitter(&mut self) -> f32 {
        0.0
    }
}

/// Spawn timer and interval
///
/// The interval only ever steps down, once per spawn, and never below the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    interval: f32,
    timer: f32,
    start: f32,
    step: f32,
    floor: f32,
}

impl Difficulty {
    pub fn new(start: f32, step: f32, floor: f32) -> Self {
        assert!(
            floor > 0.0 && floor <= start,
            "spawn interval floor {floor} must be in (0, {start}]"
        );
        assert!(step > 0.0, "spawn interval step must be positive");
        Self {
            interval: start,
            timer: 0.0,
            start,
            step,
            floor,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.spawn_interval_start,
            tuning.spawn_interval_step,
            tuning.spawn_interval_floor,
        )
    }

    /// Current seconds between spawns
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Seconds since the last spawn
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Accumulate frame time; true when a spawn is due
    pub fn accumulate(&mut self, dt: f32) -> bool {
        self.timer += dt;
        self.timer >= self.interval
    }

    /// Reset the timer and step the interval down toward the floor
    pub fn record_spawn(&mut self) {
        self.timer = 0.0;
        self.interval = (self.interval - self.step).max(self.floor);
    }

    pub fn reset(&mut self) {
        self.interval = self.start;
        self.timer = 0.0;
    }
}

/// Base speed that carries an obstacle of `height` from its spawn point to
/// fully off-screen in the configured travel time
pub fn obstacle_speed(tuning: &Tuning, height: f32) -> f32 {
    (tuning.scene_height + 2.0 * height + tuning.spawn_margin) / tuning.obstacle_travel_time
}

/// Create one obstacle above the visible area and add it to the scene
///
/// Returns a copy of the new obstacle.
pub fn spawn_obstacle<R: RandomSource + ?Sized>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
) -> Obstacle {
    let kind = tuning.archetypes[rng.pick(tuning.archetypes.len())];
    let lane = rng.pick(LANE_COUNT);
    let size = kind.size();

    let mut speed = obstacle_speed(tuning, size.y);
    if tuning.speed_jitter > 0.0 {
        speed *= 1.0 + tuning.speed_jitter * rng.jitter();
    }

    let obstacle = Obstacle {
        id: state.next_entity_id(),
        kind,
        lane,
        pos: Vec2::new(
            state.road.lane_x(lane),
            tuning.scene_height + size.y + tuning.spawn_margin,
        ),
        size,
        speed,
        passed: false,
        in_contact: false,
    };

    log::debug!(
        "Spawned obstacle {} ({:?}) in lane {} at interval {:.2}s",
        obstacle.id,
        kind,
        lane,
        state.difficulty.interval()
    );
    state.events.push(GameEvent::ObstacleSpawned {
        id: obstacle.id,
        lane,
        kind,
    });
    state.obstacles.push(obstacle.clone());
    obstacle
}
