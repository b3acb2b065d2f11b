//! A spot: one anchor on the ring
//!
//! A spot owns a spring field and an item damping behavior inside the shared
//! [`Animator`] and parks at most one item in them. Being assigned and being
//! bound to both behaviors always change together.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animator::{Animator, BehaviorId, ItemId};
use super::field::{BehaviorKind, ItemDamping, SpringField};
use crate::consts::*;
use crate::error::{Result, SpotError};
use crate::polar_to_cartesian;
use crate::settings::Settings;

/// Position of a spot in its manager (radial order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpotId(pub usize);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spot#{}", self.0)
    }
}

/// A tap on the item parked in a spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub item: ItemId,
    pub spot: SpotId,
}

/// Field and damping constants every spot is built with.
/// Fixed once the spot exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotParams {
    pub field_strength: f32,
    pub field_region_radius: f32,
    pub field_smoothness: f32,
    pub resistance: f32,
    pub density: f32,
}

impl Default for SpotParams {
    fn default() -> Self {
        Self {
            field_strength: SPOT_FIELD_STRENGTH,
            field_region_radius: SPOT_FIELD_REGION_RADIUS,
            field_smoothness: SPOT_FIELD_SMOOTHNESS,
            resistance: SPOT_RESISTANCE,
            density: SPOT_DENSITY,
        }
    }
}

impl SpotParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            field_strength: settings.spot_field_strength,
            field_region_radius: settings.spot_field_region_radius,
            field_smoothness: settings.spot_field_smoothness,
            resistance: settings.spot_resistance,
            density: settings.spot_density,
        }
    }

    fn field(&self, position: Vec2) -> SpringField {
        SpringField {
            position,
            strength: self.field_strength,
            region_radius: self.field_region_radius,
            smoothness: self.field_smoothness,
        }
    }

    fn damping(&self) -> ItemDamping {
        ItemDamping {
            resistance: self.resistance,
            density: self.density,
            ..ItemDamping::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spot {
    id: SpotId,
    /// Axis along which vertical pans move the spot (radians)
    direction_angle: f32,
    center: Vec2,
    field: BehaviorId,
    damping: BehaviorId,
    /// Non-owning; the animator may drop the item at any time
    item: Option<ItemId>,
}

impl Spot {
    /// Create a spot at `center` with the default constants
    pub fn new(id: SpotId, animator: &mut Animator, direction_angle: f32, center: Vec2) -> Self {
        Self::with_params(id, animator, direction_angle, center, &SpotParams::default())
    }

    /// Create a spot at `center` and register its behaviors with the animator
    pub fn with_params(
        id: SpotId,
        animator: &mut Animator,
        direction_angle: f32,
        center: Vec2,
        params: &SpotParams,
    ) -> Self {
        let field = animator.add_behavior(BehaviorKind::Spring(params.field(center)));
        let damping = animator.add_behavior(BehaviorKind::Damping(params.damping()));
        Self {
            id,
            direction_angle,
            center,
            field,
            damping,
            item: None,
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn direction_angle(&self) -> f32 {
        self.direction_angle
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn field(&self) -> BehaviorId {
        self.field
    }

    pub fn damping(&self) -> BehaviorId {
        self.damping
    }

    /// The parked item, if its handle is still alive
    pub fn item(&self, animator: &Animator) -> Option<ItemId> {
        self.item.filter(|id| animator.contains_item(*id))
    }

    /// Park `item` in this spot.
    ///
    /// The spot must be empty: assigning over a live item fails with
    /// [`SpotError::Occupied`] and changes nothing. A stale handle left by an
    /// item that vanished from the animator counts as empty.
    pub fn assign(&mut self, animator: &mut Animator, item: ItemId) -> Result<()> {
        if let Some(current) = self.item {
            if animator.contains_item(current) {
                return Err(SpotError::Occupied {
                    spot: self.id,
                    current,
                    incoming: item,
                });
            }
            log::warn!("{} dropping stale handle {}", self.id, current);
            self.unbind(animator, current);
            self.item = None;
        }

        if !animator.set_tap_listener(item, Some(self.id)) {
            return Err(SpotError::UnknownItem(item));
        }
        self.item = Some(item);
        animator.add_item(self.field, item);
        animator.add_item(self.damping, item);
        Ok(())
    }

    /// Slide the spot along its axis by the vertical part of `delta`.
    ///
    /// Panning up (negative y) moves the spot outward, panning down pulls it
    /// in. The horizontal part is ignored and nothing is clamped.
    pub fn move_by(&mut self, animator: &mut Animator, delta: Vec2) {
        self.center += polar_to_cartesian(-delta.y, self.direction_angle);
        if let Some(field) = animator
            .behavior_mut(self.field)
            .and_then(BehaviorKind::as_spring_mut)
        {
            field.position = self.center;
        }
    }

    /// Unpark the item. Returns `None` when empty or when the handle went stale.
    pub fn remove_item(&mut self, animator: &mut Animator) -> Option<ItemId> {
        let item = self.item.take()?;
        self.unbind(animator, item);
        if !animator.contains_item(item) {
            log::warn!("{} held stale handle {}", self.id, item);
            return None;
        }
        Some(item)
    }

    /// A tap landed on `item`; reports it if it is the one parked here
    pub fn handle_tap(&self, animator: &Animator, item: ItemId) -> Option<Interaction> {
        (self.item(animator) == Some(item)).then_some(Interaction {
            item,
            spot: self.id,
        })
    }

    fn unbind(&self, animator: &mut Animator, item: ItemId) {
        if animator.tap_listener(item) == Some(self.id) {
            animator.set_tap_listener(item, None);
        }
        animator.remove_item(self.field, item);
        animator.remove_item(self.damping, item);
    }
}
