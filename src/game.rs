//! Scene: the game state machine and the host-facing surface
//!
//! The host calls [`Scene::frame`] once per rendered frame and forwards pointer
//! input. The scene reports each game over to a single [`GameOverListener`].
//!
//! Phases:
//! - `NotStarted` + tap → `Playing`
//! - `Playing` + collision → `GameOver` (listener notified)
//! - `GameOver` + tap → `Playing` (run reset)
//!
//! A tap while `Playing` is a steering target, not a transition.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::{
    FrameOutcome, GameEvent, GamePhase, GameState, RandomSource, clamp_to_road, frame_delta, tick,
};
use crate::tuning::Tuning;

/// Receives the final score once per game over
pub trait GameOverListener {
    fn on_game_over(&mut self, final_score: u32);
}

impl<F: FnMut(u32)> GameOverListener for F {
    fn on_game_over(&mut self, final_score: u32) {
        self(final_score)
    }
}

/// Pointer input from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Tap/click at a scene position
    Primary(Vec2),
    /// Drag to a scene position
    PointerMoved(Vec2),
    /// Finger lifted / button released
    PointerReleased,
}

/// Queue for input produced off the frame thread
///
/// Senders may live anywhere; the scene drains the queue once per frame so
/// every state mutation still happens on the frame callback.
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Handle for the producing thread
    pub fn sender(&self) -> Sender<InputEvent> {
        self.tx.clone()
    }

    pub fn push(&self, event: InputEvent) {
        // The receiver lives as long as the queue, so this cannot fail
        let _ = self.tx.send(event);
    }
}

/// A running game scene
pub struct Scene<R: RandomSource = Pcg32> {
    tuning: Tuning,
    state: GameState,
    rng: R,
    listener: Option<Box<dyn GameOverListener>>,
    /// Host timestamp of the previous playing frame
    last_frame_time: Option<f64>,
}

impl Scene<Pcg32> {
    /// Scene with a seeded PCG random source
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Scene<R> {
    /// Scene with a caller-supplied random source
    ///
    /// # Panics
    /// If `tuning` fails validation.
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        if let Err(err) = tuning.validate() {
            panic!("{err}");
        }
        let state = GameState::new(&tuning);
        Self {
            tuning,
            state,
            rng,
            listener: None,
            last_frame_time: None,
        }
    }

    pub fn set_listener(&mut self, listener: impl GameOverListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score.score()
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Tap/click: starts, restarts, or steers depending on the phase
    pub fn primary_input(&mut self, pos: Vec2) {
        match self.state.phase {
            GamePhase::NotStarted => self.start(),
            GamePhase::GameOver => self.restart(),
            GamePhase::Playing => self.set_target(pos.x),
        }
    }

    /// Drag: only steers, never changes phase
    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.state.phase == GamePhase::Playing {
            self.set_target(pos.x);
        }
    }

    /// Release: drop the pending steering target
    pub fn pointer_released(&mut self) {
        self.state.player.target_x = None;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Primary(pos) => self.primary_input(pos),
            InputEvent::PointerMoved(pos) => self.pointer_moved(pos),
            InputEvent::PointerReleased => self.pointer_released(),
        }
    }

    /// Apply everything queued since the last frame, in order
    ///
    /// Hosts call this once per frame, before [`Scene::frame`], so queued
    /// steering takes effect on that frame.
    pub fn apply_queued(&mut self, queue: &InputQueue) {
        while let Ok(event) = queue.rx.try_recv() {
            self.handle_input(event);
        }
    }

    /// Frame callback with the host's current time in seconds
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        if self.state.phase != GamePhase::Playing {
            return FrameOutcome::default();
        }
        let dt = frame_delta(self.last_frame_time, now, self.tuning.max_frame_dt);
        self.last_frame_time = Some(now);
        self.advance(dt)
    }

    /// Advance by an explicit delta (seconds)
    pub fn advance(&mut self, dt: f32) -> FrameOutcome {
        let outcome = tick(&mut self.state, &self.tuning, &mut self.rng, dt);
        if outcome.collision.is_some() {
            self.game_over();
        }
        outcome
    }

    fn set_target(&mut self, x: f32) {
        let half_width = self.tuning.player_width * self.tuning.hitbox_scale / 2.0;
        self.state.player.target_x = Some(clamp_to_road(x, half_width, &self.state.road));
    }

    fn start(&mut self) {
        self.begin_run();
        self.state.events.push(GameEvent::Started);
        log::info!("Game started");
    }

    fn restart(&mut self) {
        self.begin_run();
        self.state.events.push(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    fn begin_run(&mut self) {
        self.state.reset_run(&self.tuning);
        self.state.phase = GamePhase::Playing;
        self.last_frame_time = None;
    }

    fn game_over(&mut self) {
        let score = self.state.score.score();
        self.state.phase = GamePhase::GameOver;
        self.state.player.target_x = None;
        self.state.events.push(GameEvent::GameOver { score });
        log::info!("Game over, final score {}", score);

        if let Some(listener) = self.listener.as_mut() {
            listener.on_game_over(score);
        }
    }
}
