//! Balloon Spots entry point
//!
//! Headless runner: plays a scripted session (a pan, a tap, the black hole)
//! against the scene and logs what happens.
//!
//! Usage: `balloon-spots [seed] [settings.json]`

use balloon_spots::consts::*;
use balloon_spots::sim::{PanEvent, PanPhase, Scene, ScenePhase, TickInput, tick};
use balloon_spots::{Result, Settings};
use glam::Vec2;

/// Host frame rate of the scripted session
const FRAME_DT: f32 = 1.0 / 60.0;
/// Session length (seconds)
const SESSION_SECS: f32 = 30.0;

/// Session driver holding the scene and host-side timing
struct Session {
    scene: Scene,
    accumulator: f32,
    frame: u32,
    time: f32,
    input: TickInput,
}

/// Frame index at which `secs` of session time begins
fn frame_at(secs: f32) -> u32 {
    (secs / FRAME_DT).round() as u32
}

impl Session {
    fn new(settings: Settings, seed: u64) -> Result<Self> {
        Ok(Self {
            scene: Scene::new(settings, seed)?,
            accumulator: 0.0,
            frame: 0,
            time: 0.0,
            input: TickInput::default(),
        })
    }

    /// Queue the scripted host input for the current frame
    fn script(&mut self) {
        let frame = self.frame;
        let t = self.time;

        // Drag up for a second: spread the ring
        if frame == frame_at(2.0) {
            self.input.pans.push(PanEvent {
                phase: PanPhase::Began,
                delta: Vec2::ZERO,
            });
        } else if (frame_at(2.0)..frame_at(3.0)).contains(&frame) {
            self.input.pans.push(PanEvent::changed(0.5, -1.5));
        } else if frame == frame_at(3.0) {
            self.input.pans.push(PanEvent {
                phase: PanPhase::Ended,
                delta: Vec2::ZERO,
            });
        }

        // Tap whatever sits on the top spot
        if frame == frame_at(8.0) {
            let target = self
                .scene
                .spots
                .spots()
                .iter()
                .min_by(|a, b| a.center().y.total_cmp(&b.center().y))
                .map(|spot| spot.center());
            if let Some(item) = target.and_then(|p| self.scene.animator.item_at(p)) {
                log::info!("Tapping {} at {:.1}s", item, t);
                self.input.taps.push(item);
            }
        }

        if frame == frame_at(16.0) {
            log::info!("Pressing the black hole button at {:.1}s", t);
            self.input.black_hole = true;
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) -> Result<()> {
        self.script();
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.scene, &self.input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Input is consumed by the first substep
            self.input = TickInput::default();
        }

        for event in self.scene.drain_events() {
            log::info!("[{:>5.2}s] {:?}", self.time, event);
        }
        self.frame += 1;
        self.time += dt;
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Balloon Spots (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xBA11_0075);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let mut session = Session::new(settings, seed)?;
    while session.time < SESSION_SECS {
        session.update(FRAME_DT)?;
        if session.scene.phase == ScenePhase::TheEnd {
            break;
        }
    }

    log::info!(
        "Session over at {:.1}s in phase {:?} ({} balloons left)",
        session.time,
        session.scene.phase,
        session.scene.balloons().len()
    );
    for spot in session.scene.spots.spots() {
        log::info!("{} ended at {}", spot.id(), spot.center());
    }
    Ok(())
}
