//! Shared simulation context
//!
//! The animator owns every item and every behavior. Spots and the escape
//! fields only hold ids into it, so an item can disappear from the scene
//! without anyone else having to know.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::{BehaviorKind, Collision};
use super::spot::SpotId;
use crate::consts::{BALLOON_HEIGHT, BALLOON_WIDTH};

/// Handle to an item in the animator. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Handle to a behavior in the animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BehaviorId(pub u32);

/// A simulated item (a balloon)
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Spot that receives taps on this item
    pub tap_listener: Option<SpotId>,
}

impl Item {
    fn new(id: ItemId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(BALLOON_WIDTH, BALLOON_HEIGHT),
            tap_listener: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Behavior {
    kind: BehaviorKind,
    members: Vec<ItemId>,
}

/// Owns items and behaviors, and integrates them
#[derive(Debug, Clone)]
pub struct Animator {
    /// Reference bounds (the screen)
    bounds: Collision,
    /// Live items (sorted by id for deterministic iteration)
    items: BTreeMap<ItemId, Item>,
    behaviors: Vec<Behavior>,
    next_item_id: u32,
}

impl Animator {
    /// Create an animator whose reference bounds span `(0, 0)..size`
    pub fn new(size: Vec2) -> Self {
        Self {
            bounds: Collision {
                min: Vec2::ZERO,
                max: size,
            },
            items: BTreeMap::new(),
            behaviors: Vec::new(),
            next_item_id: 1,
        }
    }

    pub fn bounds(&self) -> Collision {
        self.bounds
    }

    /// Add a new item at rest at `pos`
    pub fn spawn_item(&mut self, pos: Vec2) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        self.items.insert(id, Item::new(id, pos));
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Topmost item whose frame contains `point` (later items draw on top)
    pub fn item_at(&self, point: Vec2) -> Option<ItemId> {
        self.items
            .values()
            .rev()
            .find(|it| {
                let offset = (point - it.pos).abs();
                offset.x <= it.size.x / 2.0 && offset.y <= it.size.y / 2.0
            })
            .map(|it| it.id)
    }

    /// Delete an item from the scene and from every behavior.
    /// Its handle is dead afterwards.
    pub fn remove_item_from_scene(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(&id)?;
        for behavior in &mut self.behaviors {
            behavior.members.retain(|m| *m != id);
        }
        Some(item)
    }

    /// Register a behavior; it starts with no members
    pub fn add_behavior(&mut self, kind: BehaviorKind) -> BehaviorId {
        let id = BehaviorId(self.behaviors.len() as u32);
        self.behaviors.push(Behavior {
            kind,
            members: Vec::new(),
        });
        id
    }

    pub fn behavior(&self, id: BehaviorId) -> Option<&BehaviorKind> {
        self.behaviors.get(id.0 as usize).map(|b| &b.kind)
    }

    pub fn behavior_mut(&mut self, id: BehaviorId) -> Option<&mut BehaviorKind> {
        self.behaviors.get_mut(id.0 as usize).map(|b| &mut b.kind)
    }

    /// Bind an item to a behavior. Unknown items and repeats are ignored.
    pub fn add_item(&mut self, behavior: BehaviorId, item: ItemId) -> bool {
        if !self.items.contains_key(&item) {
            return false;
        }
        match self.behaviors.get_mut(behavior.0 as usize) {
            Some(b) if !b.members.contains(&item) => {
                b.members.push(item);
                true
            }
            _ => false,
        }
    }

    /// Unbind an item from a behavior. Returns false if it was not bound.
    pub fn remove_item(&mut self, behavior: BehaviorId, item: ItemId) -> bool {
        let Some(b) = self.behaviors.get_mut(behavior.0 as usize) else {
            return false;
        };
        let before = b.members.len();
        b.members.retain(|m| *m != item);
        b.members.len() != before
    }

    pub fn members(&self, behavior: BehaviorId) -> &[ItemId] {
        self.behaviors
            .get(behavior.0 as usize)
            .map(|b| b.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_member(&self, behavior: BehaviorId, item: ItemId) -> bool {
        self.members(behavior).contains(&item)
    }

    /// Every behavior the item is bound to, in registration order
    pub fn behaviors_of(&self, item: ItemId) -> Vec<BehaviorId> {
        self.behaviors
            .iter()
            .enumerate()
            .filter(|(_, b)| b.members.contains(&item))
            .map(|(i, _)| BehaviorId(i as u32))
            .collect()
    }

    /// Route taps on `item` to `listener`. Returns false for unknown items.
    pub fn set_tap_listener(&mut self, item: ItemId, listener: Option<SpotId>) -> bool {
        match self.items.get_mut(&item) {
            Some(it) => {
                it.tap_listener = listener;
                true
            }
            None => false,
        }
    }

    pub fn tap_listener(&self, item: ItemId) -> Option<SpotId> {
        self.items.get(&item).and_then(|it| it.tap_listener)
    }

    /// Advance every item by one timestep
    pub fn step(&mut self, dt: f32) {
        let behaviors = &self.behaviors;
        for item in self.items.values_mut() {
            let bound: Vec<&BehaviorKind> = behaviors
                .iter()
                .filter(|b| b.members.contains(&item.id))
                .map(|b| &b.kind)
                .collect();
            if bound.is_empty() {
                continue;
            }

            let mass = bound
                .iter()
                .find_map(|kind| match kind {
                    BehaviorKind::Damping(d) => Some(d.mass(item.size)),
                    _ => None,
                })
                .unwrap_or(item.size.x * item.size.y);

            let accel: Vec2 = bound
                .iter()
                .map(|kind| kind.acceleration(item.pos, mass))
                .sum();
            item.vel += accel * dt;

            for kind in &bound {
                if let BehaviorKind::Damping(d) = kind {
                    item.vel = d.damp(item.vel, dt);
                }
            }

            item.pos += item.vel * dt;

            for kind in &bound {
                if let BehaviorKind::Collision(c) = kind {
                    c.resolve(&mut item.pos, &mut item.vel, item.size);
                }
            }
        }
    }
}
