//! Scene state
//!
//! Everything the balloon screen owns: the animator, the ring of spots,
//! the escape fields, the pan recognizer and the scheduled tasks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animator::{Animator, ItemId};
use super::escape::{EscapeConfig, EscapeFields};
use super::gesture::PanGesture;
use super::manager::SpotManager;
use super::schedule::{Scheduler, TaskHandle};
use super::spot::{SpotId, SpotParams};
use crate::error::Result;
use crate::ring_angles;
use crate::settings::Settings;

/// Current phase of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenePhase {
    /// Grace period: the user gets to look at the balloons
    Observing,
    /// Balloons swap spots periodically
    Shuffling,
    /// The black hole is swallowing everything
    BlackHole,
    /// Balloons cleared
    TheEnd,
}

/// Deferred work run by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTask {
    /// End of the grace period: shuffle now and start the periodic timer
    StartShuffling,
    /// Periodic shuffle
    Shuffle,
    /// Clear the balloons after the black hole ran for a while
    FinishEscape,
}

/// Things the host may want to react to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEvent {
    Shuffled { moved: usize },
    BalloonReleased { item: ItemId, spot: SpotId },
    BlackHoleOpened { swallowed: usize },
    TheEnd { removed: usize },
}

/// The balloon screen
#[derive(Debug, Clone)]
pub struct Scene {
    /// Seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: ScenePhase,
    pub animator: Animator,
    pub spots: SpotManager,
    pub escape: EscapeFields,
    pub pan: PanGesture,
    pub scheduler: Scheduler<SceneTask>,
    pub(crate) rng: Pcg32,
    pub(crate) shuffle_start: Option<TaskHandle>,
    pub(crate) shuffle_timer: Option<TaskHandle>,
    pub(crate) events: Vec<SceneEvent>,
}

impl Scene {
    /// Build the ring and schedule the first shuffle
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        let viewport = Vec2::from(settings.viewport);
        let start = starting_point(&settings);

        let mut animator = Animator::new(viewport);
        let spots = SpotManager::setup_with_params(
            &mut animator,
            &ring_angles(settings.balloon_count),
            start,
            settings.fan_out_radius(),
            &SpotParams::from_settings(&settings),
        )?;
        let escape = EscapeFields::new(EscapeConfig::from_settings(&settings, start));

        let mut scheduler = Scheduler::new();
        let shuffle_start =
            scheduler.schedule_once(settings.shuffle_interval, SceneTask::StartShuffling);

        log::info!("Scene ready with seed {}", seed);

        Ok(Self {
            seed,
            settings,
            phase: ScenePhase::Observing,
            animator,
            spots,
            escape,
            pan: PanGesture::default(),
            scheduler,
            rng: Pcg32::seed_from_u64(seed),
            shuffle_start: Some(shuffle_start),
            shuffle_timer: None,
            events: Vec::new(),
        })
    }

    /// Where balloons spawn and where the black hole opens
    pub fn starting_point(&self) -> Vec2 {
        starting_point(&self.settings)
    }

    /// Balloons still in the scene, by id
    pub fn balloons(&self) -> Vec<ItemId> {
        self.animator.items().map(|it| it.id).collect()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

fn starting_point(settings: &Settings) -> Vec2 {
    Vec2::from(settings.viewport) / 2.0 + Vec2::new(0.0, settings.spawn_offset_y)
}
