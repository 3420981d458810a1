//! Road geometry: lanes, edge colliders and scrolling lane markings
//!
//! Markings are cosmetic. Nothing in the simulation reads their positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Number of lanes obstacles can spawn in
pub const LANE_COUNT: usize = 3;

/// A single dash of a lane divider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadMarking {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Fixed road layout for one scene size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Road {
    pub width: f32,
    pub height: f32,
    /// Lane center x-coordinates, left to right
    pub lanes: [f32; LANE_COUNT],
    pub left_edge: Rect,
    pub right_edge: Rect,
    pub markings: Vec<RoadMarking>,
    marking_step: f32,
}

impl Road {
    pub fn new(tuning: &Tuning) -> Self {
        let width = tuning.scene_width;
        let height = tuning.scene_height;
        let edge_size = Vec2::new(tuning.edge_width, height);

        Self {
            width,
            height,
            lanes: tuning.lane_fractions.map(|f| width * f),
            left_edge: Rect::from_center(Vec2::new(tuning.edge_inset, height / 2.0), edge_size),
            right_edge: Rect::from_center(
                Vec2::new(width - tuning.edge_inset, height / 2.0),
                edge_size,
            ),
            markings: layout_markings(tuning),
            marking_step: tuning.marking_step,
        }
    }

    /// Center x of a lane
    pub fn lane_x(&self, lane: usize) -> f32 {
        self.lanes[lane]
    }

    /// Lane whose center is closest to `x`
    pub fn nearest_lane(&self, x: f32) -> usize {
        (0..LANE_COUNT)
            .min_by(|&a, &b| {
                (self.lanes[a] - x)
                    .abs()
                    .partial_cmp(&(self.lanes[b] - x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(LANE_COUNT / 2)
    }

    /// Scroll dashes down one step, wrapping modulo the road height
    pub fn scroll_markings(&mut self) {
        for marking in &mut self.markings {
            marking.pos.y -= self.marking_step;
            if marking.pos.y < 0.0 {
                marking.pos.y = marking.pos.y.rem_euclid(self.height);
            }
        }
    }
}

/// Dashed dividers: one column per marking fraction, one dash every two dash heights
fn layout_markings(tuning: &Tuning) -> Vec<RoadMarking> {
    let spacing = tuning.dash_height * 2.0;
    let count = (tuning.scene_height / spacing) as usize + 1;
    let size = Vec2::new(tuning.dash_width, tuning.dash_height);

    tuning
        .marking_fractions
        .iter()
        .flat_map(|fraction| {
            let x = tuning.scene_width * fraction;
            (0..count).map(move |i| RoadMarking {
                pos: Vec2::new(x, i as f32 * spacing),
                size,
            })
        })
        .collect()
}
