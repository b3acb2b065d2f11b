//! Fixed timestep scene tick
//!
//! Applies host input, runs due scheduled tasks and steps the animator.

use super::animator::ItemId;
use super::gesture::PanEvent;
use super::state::{Scene, SceneEvent, ScenePhase, SceneTask};
use crate::error::Result;

/// Host input gathered since the previous tick, in delivery order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pan updates
    pub pans: Vec<PanEvent>,
    /// Items the user tapped
    pub taps: Vec<ItemId>,
    /// Black hole button pressed
    pub black_hole: bool,
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) -> Result<()> {
    for event in &input.pans {
        scene.pan.apply(event);
        scene.spots.handle_pan(&mut scene.animator, &mut scene.pan);
    }

    for &item in &input.taps {
        tap(scene, item)?;
    }

    if input.black_hole {
        open_black_hole(scene);
    }

    scene.scheduler.advance(dt);
    while let Some(task) = scene.scheduler.pop_due() {
        run_task(scene, task)?;
    }

    scene.animator.step(dt);
    Ok(())
}

/// Route a tap to the spot holding the item; taps on anything else are ignored
pub fn tap(scene: &mut Scene, item: ItemId) -> Result<()> {
    let Some(interaction) = scene.spots.resolve_tap(&scene.animator, item) else {
        return Ok(());
    };
    if scene
        .spots
        .handle_interaction(&mut scene.animator, &mut scene.escape, interaction)?
    {
        scene.events.push(SceneEvent::BalloonReleased {
            item: interaction.item,
            spot: interaction.spot,
        });
    }
    Ok(())
}

/// Stop shuffling, feed every parked balloon to the black hole and schedule
/// the end. Only the first press counts.
pub fn open_black_hole(scene: &mut Scene) {
    if matches!(scene.phase, ScenePhase::BlackHole | ScenePhase::TheEnd) {
        return;
    }

    for handle in [scene.shuffle_start.take(), scene.shuffle_timer.take()]
        .into_iter()
        .flatten()
    {
        scene.scheduler.cancel(handle);
    }

    let swallowed = scene
        .spots
        .trigger_escape(&mut scene.animator, &mut scene.escape);
    scene.phase = ScenePhase::BlackHole;
    scene
        .scheduler
        .schedule_once(scene.settings.escape_finale_delay, SceneTask::FinishEscape);
    scene.events.push(SceneEvent::BlackHoleOpened {
        swallowed: swallowed.len(),
    });
    log::info!("Black hole opened");
}

fn run_task(scene: &mut Scene, task: SceneTask) -> Result<()> {
    match task {
        SceneTask::StartShuffling => {
            scene.shuffle_start = None;
            scene.phase = ScenePhase::Shuffling;
            let interval = scene.settings.shuffle_interval;
            scene.shuffle_timer = Some(
                scene
                    .scheduler
                    .schedule_repeating(interval, SceneTask::Shuffle),
            );
            shuffle(scene)
        }
        SceneTask::Shuffle => shuffle(scene),
        SceneTask::FinishEscape => {
            let removed = scene
                .balloons()
                .into_iter()
                .filter_map(|id| scene.animator.remove_item_from_scene(id))
                .count();
            scene.phase = ScenePhase::TheEnd;
            scene.events.push(SceneEvent::TheEnd { removed });
            log::info!("The end ({} balloons cleared)", removed);
            Ok(())
        }
    }
}

fn shuffle(scene: &mut Scene) -> Result<()> {
    let moves = scene.spots.shuffle(&mut scene.animator, &mut scene.rng)?;
    scene.events.push(SceneEvent::Shuffled { moved: moves.len() });
    Ok(())
}
