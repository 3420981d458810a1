//! Attract-mode driver
//!
//! Picks the lane with the most room ahead and steers toward it. Good enough
//! to keep a demo run going for a while; it does not look for obstacles in
//! the lanes it crosses on the way.

use crate::sim::{GamePhase, GameState, LANE_COUNT};

/// Movement target for the next frame, or `None` when not playing
pub fn steer(state: &GameState) -> Option<f32> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let player = &state.player;
    let player_bottom = player.rect().min.y;
    let current_lane = state.road.nearest_lane(player.pos.x);

    // Distance to the closest obstacle still ahead in each lane
    let mut clearance = [f32::INFINITY; LANE_COUNT];
    for obstacle in &state.obstacles {
        if obstacle.rect().max.y < player_bottom {
            continue;
        }
        let gap = obstacle.pos.y - player.pos.y;
        clearance[obstacle.lane] = clearance[obstacle.lane].min(gap);
    }

    // Most room wins; ties go to the lane closest to the car
    let best = (0..LANE_COUNT)
        .max_by(|&a, &b| {
            clearance[a]
                .partial_cmp(&clearance[b])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| lane_distance(b, current_lane).cmp(&lane_distance(a, current_lane)))
        })
        .unwrap_or(current_lane);

    Some(state.road.lane_x(best))
}

fn lane_distance(a: usize, b: usize) -> usize {
    a.abs_diff(b)
}
