//! Force behaviors
//!
//! Qualitative force models applied by the [`Animator`](super::Animator).
//! Each behavior is a plain value; membership lives in the animator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Spring stiffness scale (points/s² per point of displacement at strength 1, unit mass)
pub const SPRING_RATE: f32 = 2000.0;

/// Attraction toward a point, proportional to distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringField {
    pub position: Vec2,
    pub strength: f32,
    /// Items farther than this are unaffected
    pub region_radius: f32,
    /// Fraction (0-1) of the region, measured inward from its edge, over which the force fades out
    pub smoothness: f32,
}

impl SpringField {
    /// Spring field with the spot defaults
    pub fn spot(position: Vec2) -> Self {
        Self {
            position,
            strength: SPOT_FIELD_STRENGTH,
            region_radius: SPOT_FIELD_REGION_RADIUS,
            smoothness: SPOT_FIELD_SMOOTHNESS,
        }
    }

    /// Acceleration applied to an item of `mass` at `pos`
    pub fn acceleration(&self, pos: Vec2, mass: f32) -> Vec2 {
        let to_center = self.position - pos;
        let dist = to_center.length();
        if dist > self.region_radius {
            return Vec2::ZERO;
        }

        let fade_start = self.region_radius * (1.0 - self.smoothness.clamp(0.0, 1.0));
        let falloff = if dist <= fade_start || self.region_radius <= fade_start {
            1.0
        } else {
            (self.region_radius - dist) / (self.region_radius - fade_start)
        };

        to_center * self.strength * SPRING_RATE * falloff / mass.max(f32::EPSILON)
    }
}

/// Per-item resistance and mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemDamping {
    pub resistance: f32,
    pub density: f32,
    pub allows_rotation: bool,
}

impl Default for ItemDamping {
    fn default() -> Self {
        Self {
            resistance: SPOT_RESISTANCE,
            density: SPOT_DENSITY,
            allows_rotation: false,
        }
    }
}

impl ItemDamping {
    /// Velocity after resisting for `dt`
    pub fn damp(&self, vel: Vec2, dt: f32) -> Vec2 {
        vel / (1.0 + self.resistance * dt)
    }

    /// Mass of an item with the given frame size
    pub fn mass(&self, size: Vec2) -> f32 {
        self.density * size.x * size.y
    }
}

/// Constant acceleration in a fixed direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    /// Magnitude 1.0 means [`GRAVITY_ACCELERATION`]
    pub direction: Vec2,
}

impl Gravity {
    pub fn acceleration(&self) -> Vec2 {
        self.direction * GRAVITY_ACCELERATION
    }
}

/// Keeps items inside a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub min: Vec2,
    pub max: Vec2,
}

impl Collision {
    /// Push an item of `size` back inside the bounds, killing the offending velocity
    pub fn resolve(&self, pos: &mut Vec2, vel: &mut Vec2, size: Vec2) {
        let half = size / 2.0;
        let lo = self.min + half;
        let hi = (self.max - half).max(lo);

        if pos.x < lo.x || pos.x > hi.x {
            pos.x = pos.x.clamp(lo.x, hi.x);
            vel.x = 0.0;
        }
        if pos.y < lo.y || pos.y > hi.y {
            pos.y = pos.y.clamp(lo.y, hi.y);
            vel.y = 0.0;
        }
    }
}

/// Swirl around a point (counter-clockwise in screen space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VortexField {
    pub position: Vec2,
    pub strength: f32,
    /// Distances below this are treated as this
    pub min_radius: f32,
}

impl VortexField {
    pub fn acceleration(&self, pos: Vec2) -> Vec2 {
        let offset = pos - self.position;
        let dist = offset.length();
        if dist <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let tangent = offset.perp() / dist;
        let scale = self.min_radius / dist.max(self.min_radius);
        tangent * self.strength * GRAVITY_ACCELERATION * scale
    }
}

/// Pull toward a point, falling off with the square of distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialGravityField {
    pub position: Vec2,
    pub strength: f32,
    /// Distances below this are treated as this
    pub min_radius: f32,
}

impl RadialGravityField {
    pub fn acceleration(&self, pos: Vec2) -> Vec2 {
        let to_center = self.position - pos;
        let dist = to_center.length();
        if dist <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let clamped = dist.max(self.min_radius);
        let scale = (self.min_radius / clamped).powi(2);
        to_center / dist * self.strength * GRAVITY_ACCELERATION * scale
    }
}

/// Any behavior the animator can hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorKind {
    Spring(SpringField),
    Damping(ItemDamping),
    Gravity(Gravity),
    Collision(Collision),
    Vortex(VortexField),
    RadialGravity(RadialGravityField),
}

impl BehaviorKind {
    /// Acceleration contributed to an item; zero for non-force behaviors
    pub fn acceleration(&self, pos: Vec2, mass: f32) -> Vec2 {
        match self {
            BehaviorKind::Spring(field) => field.acceleration(pos, mass),
            BehaviorKind::Gravity(gravity) => gravity.acceleration(),
            BehaviorKind::Vortex(field) => field.acceleration(pos),
            BehaviorKind::RadialGravity(field) => field.acceleration(pos),
            BehaviorKind::Damping(_) | BehaviorKind::Collision(_) => Vec2::ZERO,
        }
    }

    pub fn as_spring(&self) -> Option<&SpringField> {
        match self {
            BehaviorKind::Spring(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_spring_mut(&mut self) -> Option<&mut SpringField> {
        match self {
            BehaviorKind::Spring(field) => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_pulls_toward_position() {
        let field = SpringField::spot(Vec2::new(100.0, 100.0));
        let accel = field.acceleration(Vec2::new(50.0, 100.0), 1.0);
        assert!(accel.x > 0.0);
        assert!(accel.y.abs() < 1e-4);
    }

    #[test]
    fn test_spring_inactive_outside_region() {
        let field = SpringField::spot(Vec2::ZERO);
        let accel = field.acceleration(Vec2::new(SPOT_FIELD_REGION_RADIUS + 1.0, 0.0), 1.0);
        assert_eq!(accel, Vec2::ZERO);
    }

    #[test]
    fn test_spring_hard_edge_without_smoothness() {
        let field = SpringField {
            smoothness: 0.0,
            ..SpringField::spot(Vec2::ZERO)
        };
        let near_edge = field.acceleration(Vec2::new(599.0, 0.0), 1.0);
        assert!((near_edge.x + 599.0 * SPOT_FIELD_STRENGTH * SPRING_RATE).abs() < 1.0);
    }

    #[test]
    fn test_damping_slows_items() {
        let damping = ItemDamping::default();
        let vel = damping.damp(Vec2::new(100.0, 0.0), SIM_DT);
        assert!(vel.x < 100.0 && vel.x > 0.0);
        assert!((damping.mass(Vec2::new(60.0, 90.0)) - 32.4).abs() < 1e-3);
    }

    #[test]
    fn test_collision_clamps_and_stops() {
        let bounds = Collision {
            min: Vec2::ZERO,
            max: Vec2::new(400.0, 800.0),
        };
        let mut pos = Vec2::new(200.0, -30.0);
        let mut vel = Vec2::new(5.0, -100.0);
        bounds.resolve(&mut pos, &mut vel, Vec2::new(60.0, 90.0));
        assert_eq!(pos, Vec2::new(200.0, 45.0));
        assert_eq!(vel, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_vortex_is_tangential() {
        let vortex = VortexField {
            position: Vec2::ZERO,
            strength: VORTEX_STRENGTH,
            min_radius: VORTEX_MIN_RADIUS,
        };
        let pos = Vec2::new(300.0, 0.0);
        let accel = vortex.acceleration(pos);
        assert!(accel.dot(pos).abs() < 1e-3);
        assert!(accel.length() > 0.0);
    }

    #[test]
    fn test_radial_gravity_clamps_min_radius() {
        let hole = RadialGravityField {
            position: Vec2::ZERO,
            strength: 1.0,
            min_radius: 50.0,
        };
        let inside = hole.acceleration(Vec2::new(10.0, 0.0));
        let at_edge = hole.acceleration(Vec2::new(50.0, 0.0));
        assert!((inside.length() - at_edge.length()).abs() < 1e-3);
        assert!(inside.x < 0.0);
        let far = hole.acceleration(Vec2::new(100.0, 0.0));
        assert!((far.length() - at_edge.length() / 4.0).abs() < 1e-3);
    }
}
