//! Lane Dodge headless entry point
//!
//! Runs an autopilot session at 60 Hz and prints the resulting leaderboard.
//! Rendering lives in the host app; this binary only exercises the core.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use lane_dodge::sim::{GameEvent, GamePhase};
use lane_dodge::{GameOverListener, HighScores, Scene, Tuning, autopilot};

const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "lane-dodge", about = "Run a headless Lane Dodge autopilot session")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to play
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// JSON file overriding game balance
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("loading tuning from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = load_tuning(args.tuning.as_ref())?;
    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    log::info!("Lane Dodge (native) starting with seed {}", seed);

    let high_scores = Rc::new(RefCell::new(HighScores::new()));
    let mut scene = Scene::new(tuning, seed);
    {
        let high_scores = high_scores.clone();
        scene.set_listener(move |score: u32| high_scores.borrow_mut().on_game_over(score));
    }

    let center = scene.tuning().scene_size() / 2.0;
    let mut now = 0.0;
    let mut runs = 0u32;
    let mut spawned = 0u32;

    while now < args.seconds {
        match scene.phase() {
            GamePhase::NotStarted | GamePhase::GameOver => {
                scene.primary_input(center);
                runs += 1;
            }
            GamePhase::Playing => {
                if let Some(x) = autopilot::steer(scene.state()) {
                    scene.pointer_moved(Vec2::new(x, scene.state().player.pos.y));
                }
            }
        }

        scene.frame(now);
        now += FRAME_DT;

        for event in scene.drain_events() {
            match event {
                GameEvent::ObstacleSpawned { .. } => spawned += 1,
                GameEvent::GameOver { score } => {
                    println!("Run {} ended at {:.1}s with score {}", runs, now, score);
                }
                _ => {}
            }
        }
    }

    if scene.phase() == GamePhase::Playing {
        println!("Run {} still going, score {}", runs, scene.score());
    }
    println!("{} obstacles spawned over {} runs", spawned, runs);

    let high_scores = high_scores.borrow();
    if high_scores.is_empty() {
        println!("No high scores recorded");
    } else {
        println!("High scores:");
        for (rank, entry) in high_scores.entries.iter().enumerate() {
            println!("{:>3}. {}", rank + 1, entry.score);
        }
    }
    Ok(())
}
