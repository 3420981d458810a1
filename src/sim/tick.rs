//! Per-frame simulation step
//!
//! Advances spawning, obstacle motion, collisions, player easing and scoring
//! by one rendered frame.

use super::collision::{clamp_to_road, detect_collision, hits_road_edge};
use super::spawn::{RandomSource, spawn_obstacle};
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// What a single frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// ID of an obstacle spawned this frame
    pub spawned: Option<u32>,
    /// ID of the obstacle the player ran into
    pub collision: Option<u32>,
    /// Obstacles that cleared the player's hitbox this frame
    pub passed: u32,
    /// The player ran up against a road edge and was held back
    pub edge_contact: bool,
}

/// Elapsed seconds between two host timestamps
///
/// The first frame (no previous timestamp) has zero delta. Long stalls are
/// clamped to `max_dt` so a paused host cannot trigger a burst of spawns.
pub fn frame_delta(previous: Option<f64>, now: f64, max_dt: f32) -> f32 {
    let Some(previous) = previous else {
        return 0.0;
    };
    let dt = (now - previous).max(0.0) as f32;
    if dt > max_dt {
        log::warn!("Frame delta {:.3}s clamped to {:.3}s", dt, max_dt);
        return max_dt;
    }
    dt
}

/// Advance the scene by `dt` seconds
///
/// Does nothing unless the game is `Playing`. A collision stops the frame
/// right away; the caller owns the transition to `GameOver`.
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    dt: f32,
) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();
    if state.phase != GamePhase::Playing {
        return outcome;
    }

    state.road.scroll_markings();

    if state.difficulty.accumulate(dt) {
        let obstacle = spawn_obstacle(state, tuning, rng);
        state.difficulty.record_spawn();
        outcome.spawned = Some(obstacle.id);
    }

    for obstacle in &mut state.obstacles {
        obstacle.advance(dt);
    }

    let hitbox = state.player.hitbox(tuning.hitbox_scale);
    if let Some(id) = detect_collision(&hitbox, &mut state.obstacles) {
        state.events.push(GameEvent::Collision { id });
        outcome.collision = Some(id);
        return outcome;
    }

    // Player easing; a move that reaches an edge stops against it
    state
        .player
        .ease_toward_target(dt, tuning.player_ease_time, tuning.max_player_speed);
    let swept = hitbox.union(&state.player.hitbox(tuning.hitbox_scale));
    if hits_road_edge(&swept, &state.road) {
        let half_width = hitbox.size().x / 2.0;
        state.player.pos.x = clamp_to_road(state.player.pos.x, half_width, &state.road);
        outcome.edge_contact = true;
    }

    // Score obstacles fully below the hitbox, then drop the ones off-screen
    let hitbox_bottom = hitbox.min.y;
    for obstacle in &mut state.obstacles {
        if !obstacle.passed && obstacle.rect().max.y < hitbox_bottom {
            obstacle.passed = true;
            state.score.on_obstacle_passed();
            outcome.passed += 1;
            log::debug!("Obstacle {} passed, score {}", obstacle.id, state.score.score());
            state.events.push(GameEvent::ObstaclePassed {
                id: obstacle.id,
                score: state.score.score(),
            });
        }
    }
    state.obstacles.retain(|o| !o.is_off_screen());

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::ScriptedRandom;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use glam::Vec2;

    fn playing_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning);
        state.phase = GamePhase::Playing;
        state
    }

    fn obstacle(state: &mut GameState, lane: usize, y: f32, speed: f32) -> u32 {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Cone,
            lane,
            pos: Vec2::new(state.road.lane_x(lane), y),
            size: ObstacleKind::Cone.size(),
            speed,
            passed: false,
            in_contact: false,
        });
        id
    }

    #[test]
    fn test_frame_delta() {
        assert_eq!(frame_delta(None, 12.0, 0.1), 0.0);
        assert!((frame_delta(Some(1.0), 1.016, 0.1) - 0.016).abs() < 1e-6);
        assert_eq!(frame_delta(Some(1.0), 9.0, 0.1), 0.1);
        assert_eq!(frame_delta(Some(2.0), 1.0, 0.1), 0.0);
    }

    #[test]
    fn test_tick_noop_unless_playing() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        let mut rng = ScriptedRandom::default();
        let marking_y = state.road.markings[1].pos.y;

        let outcome = tick(&mut state, &tuning, &mut rng, 5.0);
        assert_eq!(outcome, FrameOutcome::default());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.difficulty.timer(), 0.0);
        assert_eq!(state.road.markings[1].pos.y, marking_y);
    }

    #[test]
    fn test_spawn_fires_and_steps_interval() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::new([0, 1]);

        for _ in 0..5 {
            assert_eq!(tick(&mut state, &tuning, &mut rng, 0.25).spawned, None);
        }
        let outcome = tick(&mut state, &tuning, &mut rng, 0.25);
        assert!(outcome.spawned.is_some());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.difficulty.timer(), 0.0);
        assert!((state.difficulty.interval() - 1.48).abs() < 1e-5);
    }

    #[test]
    fn test_obstacles_move_down() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        obstacle(&mut state, 0, 800.0, 100.0);

        tick(&mut state, &tuning, &mut rng, 0.5);
        assert_eq!(state.obstacles[0].pos.y, 750.0);
    }

    #[test]
    fn test_passing_scores_once() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        let hitbox_bottom = state.player.hitbox(tuning.hitbox_scale).min.y;
        // Outer lane, clear of the centered player; top edge 10 above the hitbox
        let half_height = ObstacleKind::Cone.size().y / 2.0;
        obstacle(&mut state, 0, hitbox_bottom - half_height + 10.0, 100.0);

        let outcome = tick(&mut state, &tuning, &mut rng, 0.05);
        assert_eq!(outcome.passed, 0);

        let outcome = tick(&mut state, &tuning, &mut rng, 0.1);
        assert_eq!(outcome.passed, 1);
        assert!(state.obstacles[0].passed);
        assert_eq!(state.score.score(), 1);

        for _ in 0..5 {
            tick(&mut state, &tuning, &mut rng, 0.05);
        }
        assert_eq!(state.score.score(), 1);
    }

    #[test]
    fn test_obstacle_level_with_player_does_not_score() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        let player_y = state.player.pos.y;
        let id = obstacle(&mut state, 2, player_y - 5.0, 100.0);

        // Center already below the car, body still beside it
        let outcome = tick(&mut state, &tuning, &mut rng, 0.1);
        assert_eq!(outcome.passed, 0);
        assert!(!state.obstacles[0].passed);
        assert_eq!(state.score.score(), 0);
        assert_eq!(state.obstacles[0].id, id);
    }

    #[test]
    fn test_steering_into_crossing_obstacle_is_unscored() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        let player_y = state.player.pos.y;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::Crate,
            lane: 2,
            pos: Vec2::new(state.road.lane_x(2), player_y + 1.0),
            size: ObstacleKind::Crate.size(),
            speed: 40.0,
            passed: false,
            in_contact: false,
        });
        state.player.target_x = Some(state.road.lane_x(2));

        let mut collision = None;
        for _ in 0..60 {
            let outcome = tick(&mut state, &tuning, &mut rng, 1.0 / 60.0);
            if outcome.collision.is_some() {
                collision = outcome.collision;
                break;
            }
        }
        assert_eq!(collision, Some(id));
        assert_eq!(state.score.score(), 0);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
        );
    }

    #[test]
    fn test_off_screen_obstacles_removed() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        obstacle(&mut state, 2, 30.0, 500.0);

        // Below the hitbox but still partly visible
        tick(&mut state, &tuning, &mut rng, 0.1);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.score.score(), 1);
        tick(&mut state, &tuning, &mut rng, 0.1);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score.score(), 1);
    }

    #[test]
    fn test_collision_halts_frame() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        let player_y = state.player.pos.y;
        let id = obstacle(&mut state, 1, player_y + 60.0, 100.0);
        state.player.target_x = Some(0.0);
        let player_x = state.player.pos.x;

        let outcome = tick(&mut state, &tuning, &mut rng, 0.05);
        assert_eq!(outcome.collision, Some(id));
        assert_eq!(state.player.pos.x, player_x);
        assert_eq!(state.score.score(), 0);
        assert_eq!(state.events.last(), Some(&GameEvent::Collision { id }));
    }

    #[test]
    fn test_player_eases_and_stays_on_road() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();
        state.player.target_x = Some(-1000.0);

        for _ in 0..60 {
            tick(&mut state, &tuning, &mut rng, 1.0 / 60.0);
        }
        let min_x = state.road.left_edge.max.x + tuning.player_width * tuning.hitbox_scale / 2.0;
        assert!((state.player.pos.x - min_x).abs() < 0.01);
    }

    #[test]
    fn test_edge_contact_reported() {
        let tuning = Tuning::default();
        let mut state = playing_state(&tuning);
        let mut rng = ScriptedRandom::default();

        // Steering within the road never touches an edge
        state.player.target_x = Some(state.road.lane_x(0));
        for _ in 0..30 {
            assert!(!tick(&mut state, &tuning, &mut rng, 1.0 / 60.0).edge_contact);
        }

        // A single long frame toward a far target would jump past the edge
        state.player.target_x = Some(-1000.0);
        let outcome = tick(&mut state, &tuning, &mut rng, 0.1);
        assert!(outcome.edge_contact);
        let min_x = state.road.left_edge.max.x + tuning.player_width * tuning.hitbox_scale / 2.0;
        assert!((state.player.pos.x - min_x).abs() < 0.01);
    }
}
