//! Pan gesture state as delivered by the host

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Recognizer phase of a pan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PanPhase {
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// One pan update: the phase plus the finger movement since the previous update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanEvent {
    pub phase: PanPhase,
    pub delta: Vec2,
}

impl PanEvent {
    pub fn changed(dx: f32, dy: f32) -> Self {
        Self {
            phase: PanPhase::Changed,
            delta: Vec2::new(dx, dy),
        }
    }
}

/// Pan recognizer: the current phase and the translation accumulated since
/// it was last reset
#[derive(Debug, Clone, Default)]
pub struct PanGesture {
    phase: PanPhase,
    translation: Vec2,
}

impl PanGesture {
    pub fn phase(&self) -> PanPhase {
        self.phase
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    /// Feed one host event into the recognizer
    pub fn apply(&mut self, event: &PanEvent) {
        self.phase = event.phase;
        self.translation += event.delta;
        if matches!(
            event.phase,
            PanPhase::Ended | PanPhase::Cancelled | PanPhase::Failed
        ) {
            // A new gesture starts from scratch
            self.translation = Vec2::ZERO;
        }
    }
}
