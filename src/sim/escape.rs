//! Escape fields
//!
//! Where balloons go once they leave the ring: a tapped balloon floats up
//! under gravity and bumps against the screen edges, and the black hole
//! swallows everything with a vortex plus a radial pull. Items handed over
//! here are never given back to a spot.

use glam::Vec2;

use super::animator::{Animator, BehaviorId, ItemId};
use super::field::{BehaviorKind, Gravity, RadialGravityField, VortexField};
use crate::settings::Settings;

/// Receives items that left the spot system for good
pub trait EscapeContext {
    /// A single tapped item flies away
    fn release(&mut self, animator: &mut Animator, item: ItemId);

    /// Items pulled into the black hole
    fn swallow(&mut self, animator: &mut Animator, items: &[ItemId]);
}

/// Parameters of the escape behaviors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeConfig {
    pub gravity_direction: Vec2,
    /// Black hole position
    pub center: Vec2,
    pub vortex_strength: f32,
    pub vortex_min_radius: f32,
    pub black_hole_strength: f32,
    pub black_hole_min_radius: f32,
}

impl EscapeConfig {
    pub fn from_settings(settings: &Settings, center: Vec2) -> Self {
        Self {
            gravity_direction: Vec2::from(settings.fly_away_gravity),
            center,
            vortex_strength: settings.vortex_strength,
            vortex_min_radius: settings.vortex_min_radius,
            black_hole_strength: settings.black_hole_strength,
            black_hole_min_radius: settings.black_hole_min_radius,
        }
    }
}

/// Lazily created escape behaviors living in the animator
#[derive(Debug, Clone)]
pub struct EscapeFields {
    config: EscapeConfig,
    gravity: Option<BehaviorId>,
    collision: Option<BehaviorId>,
    vortex: Option<BehaviorId>,
    black_hole: Option<BehaviorId>,
    /// Everything handed over so far, in hand-over order
    escaped: Vec<ItemId>,
}

impl EscapeFields {
    pub fn new(config: EscapeConfig) -> Self {
        Self {
            config,
            gravity: None,
            collision: None,
            vortex: None,
            black_hole: None,
            escaped: Vec::new(),
        }
    }

    pub fn escaped(&self) -> &[ItemId] {
        &self.escaped
    }

    pub fn gravity(&self) -> Option<BehaviorId> {
        self.gravity
    }

    pub fn collision(&self) -> Option<BehaviorId> {
        self.collision
    }

    pub fn vortex(&self) -> Option<BehaviorId> {
        self.vortex
    }

    pub fn black_hole(&self) -> Option<BehaviorId> {
        self.black_hole
    }

    fn gravity_id(&mut self, animator: &mut Animator) -> BehaviorId {
        let direction = self.config.gravity_direction;
        *self.gravity.get_or_insert_with(|| {
            animator.add_behavior(BehaviorKind::Gravity(Gravity { direction }))
        })
    }

    fn collision_id(&mut self, animator: &mut Animator) -> BehaviorId {
        let bounds = animator.bounds();
        *self
            .collision
            .get_or_insert_with(|| animator.add_behavior(BehaviorKind::Collision(bounds)))
    }

    fn vortex_id(&mut self, animator: &mut Animator) -> BehaviorId {
        let field = VortexField {
            position: self.config.center,
            strength: self.config.vortex_strength,
            min_radius: self.config.vortex_min_radius,
        };
        *self
            .vortex
            .get_or_insert_with(|| animator.add_behavior(BehaviorKind::Vortex(field)))
    }

    fn black_hole_id(&mut self, animator: &mut Animator) -> BehaviorId {
        let field = RadialGravityField {
            position: self.config.center,
            strength: self.config.black_hole_strength,
            min_radius: self.config.black_hole_min_radius,
        };
        *self
            .black_hole
            .get_or_insert_with(|| animator.add_behavior(BehaviorKind::RadialGravity(field)))
    }

    fn record(&mut self, item: ItemId) {
        if !self.escaped.contains(&item) {
            self.escaped.push(item);
        }
    }
}

impl EscapeContext for EscapeFields {
    fn release(&mut self, animator: &mut Animator, item: ItemId) {
        let gravity = self.gravity_id(animator);
        let collision = self.collision_id(animator);
        animator.add_item(gravity, item);
        animator.add_item(collision, item);
        self.record(item);
        log::debug!("{} flies away", item);
    }

    fn swallow(&mut self, animator: &mut Animator, items: &[ItemId]) {
        let vortex = self.vortex_id(animator);
        let black_hole = self.black_hole_id(animator);
        for &item in items {
            animator.add_item(vortex, item);
            animator.add_item(black_hole, item);
            self.record(item);
        }
        log::debug!("Black hole swallowed {} items", items.len());
    }
}
