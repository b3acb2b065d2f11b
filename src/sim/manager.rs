//! Spot manager
//!
//! Owns the ring of spots in radial order and moves items between them:
//! fan-out at setup, pans, shuffles, taps and the black hole.

use glam::Vec2;
use rand::Rng;

use super::animator::{Animator, ItemId};
use super::escape::EscapeContext;
use super::gesture::{PanGesture, PanPhase};
use super::spot::{Interaction, Spot, SpotId, SpotParams};
use crate::error::{Result, SpotError};

/// Outcome of drawing shuffle targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePlan {
    /// Index whose item is guaranteed to leave its spot (when n > 1)
    pub first_index: usize,
    /// `targets[i]` is the spot receiving the i-th detached item
    pub targets: Vec<usize>,
}

/// Draw distinct target indices for `n` spots.
///
/// The first target is `n - 1` when `first_index` is 0 and `first_index`
/// otherwise, so the item at `first_index` can never land back on its own
/// spot. The remaining targets are only required to be distinct. With a
/// single spot the plan sends the item back where it came from.
pub fn shuffle_targets<R: Rng>(n: usize, rng: &mut R) -> ShufflePlan {
    if n == 0 {
        return ShufflePlan {
            first_index: 0,
            targets: Vec::new(),
        };
    }

    let first_index = rng.random_range(0..n);
    let mut targets = Vec::with_capacity(n);
    targets.push(if first_index == 0 { n - 1 } else { first_index });

    while targets.len() != n {
        let mut candidate = first_index;
        while targets.contains(&candidate) {
            candidate = rng.random_range(0..n);
        }
        targets.push(candidate);
    }

    ShufflePlan {
        first_index,
        targets,
    }
}

/// The ring of spots
#[derive(Debug, Clone, Default)]
pub struct SpotManager {
    spots: Vec<Spot>,
}

impl SpotManager {
    /// Build one spot per angle at `center` with the default constants
    pub fn setup(
        animator: &mut Animator,
        angles: &[f32],
        center: Vec2,
        radius: f32,
    ) -> Result<Self> {
        Self::setup_with_params(animator, angles, center, radius, &SpotParams::default())
    }

    /// Build one spot per angle at `center`, park a fresh item in each and
    /// fan them out with a `(-radius, -radius)` move
    pub fn setup_with_params(
        animator: &mut Animator,
        angles: &[f32],
        center: Vec2,
        radius: f32,
        params: &SpotParams,
    ) -> Result<Self> {
        let mut spots = Vec::with_capacity(angles.len());
        for (i, &angle) in angles.iter().enumerate() {
            let mut spot = Spot::with_params(SpotId(i), animator, angle, center, params);
            let item = animator.spawn_item(center);
            spot.assign(animator, item)?;
            spot.move_by(animator, Vec2::new(-radius, -radius));
            log::debug!("{} at {} holds {}", spot.id(), spot.center(), item);
            spots.push(spot);
        }
        log::info!("Set up {} spots around {} (radius {})", spots.len(), center, radius);
        Ok(Self { spots })
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn spot(&self, id: SpotId) -> Option<&Spot> {
        self.spots.get(id.0)
    }

    pub fn spot_mut(&mut self, id: SpotId) -> Option<&mut Spot> {
        self.spots.get_mut(id.0)
    }

    /// Items currently parked, in spot order (`None` for empty spots)
    pub fn assignments(&self, animator: &Animator) -> Vec<Option<ItemId>> {
        self.spots.iter().map(|s| s.item(animator)).collect()
    }

    /// Spot currently holding `item`
    pub fn spot_of(&self, animator: &Animator, item: ItemId) -> Option<SpotId> {
        self.spots
            .iter()
            .find(|s| s.item(animator) == Some(item))
            .map(Spot::id)
    }

    /// Move every item to another spot.
    ///
    /// Items are detached in spot order and paired with the drawn targets;
    /// empty spots contribute nothing, so the pairing simply runs short.
    /// Returns where each item went.
    pub fn shuffle<R: Rng>(
        &mut self,
        animator: &mut Animator,
        rng: &mut R,
    ) -> Result<Vec<(ItemId, SpotId)>> {
        let plan = shuffle_targets(self.spots.len(), rng);

        let detached: Vec<ItemId> = self
            .spots
            .iter_mut()
            .filter_map(|s| s.remove_item(animator))
            .collect();

        let mut moves = Vec::with_capacity(detached.len());
        for (item, target) in detached.into_iter().zip(plan.targets) {
            let spot = self
                .spots
                .get_mut(target)
                .ok_or(SpotError::UnknownSpot(SpotId(target)))?;
            spot.assign(animator, item)?;
            log::debug!("{} -> {}", item, spot.id());
            moves.push((item, spot.id()));
        }

        log::info!(
            "Shuffled {} items (first index {})",
            moves.len(),
            plan.first_index
        );
        Ok(moves)
    }

    /// Which spot, if any, wants a tap on `item`
    pub fn resolve_tap(&self, animator: &Animator, item: ItemId) -> Option<Interaction> {
        let listener = animator.tap_listener(item)?;
        self.spot(listener)?.handle_tap(animator, item)
    }

    /// Detach the tapped item and let it fly away.
    ///
    /// Returns false when the item already left that spot.
    pub fn handle_interaction<E: EscapeContext + ?Sized>(
        &mut self,
        animator: &mut Animator,
        escape: &mut E,
        interaction: Interaction,
    ) -> Result<bool> {
        let spot = self
            .spots
            .get_mut(interaction.spot.0)
            .ok_or(SpotError::UnknownSpot(interaction.spot))?;
        if spot.item(animator) != Some(interaction.item) {
            return Ok(false);
        }

        match spot.remove_item(animator) {
            Some(item) => {
                escape.release(animator, item);
                log::info!("{} released from {}", item, interaction.spot);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply a pan update. Only `Changed` moves the spots; the recognizer's
    /// translation is then reset so the next update is relative.
    pub fn handle_pan(&mut self, animator: &mut Animator, pan: &mut PanGesture) -> bool {
        if pan.phase() != PanPhase::Changed {
            return false;
        }

        let delta = pan.translation();
        pan.set_translation(Vec2::ZERO);
        for spot in &mut self.spots {
            spot.move_by(animator, delta);
        }
        true
    }

    /// Detach every item and hand them all to the black hole
    pub fn trigger_escape<E: EscapeContext + ?Sized>(
        &mut self,
        animator: &mut Animator,
        escape: &mut E,
    ) -> Vec<ItemId> {
        let items: Vec<ItemId> = self
            .spots
            .iter_mut()
            .filter_map(|s| s.remove_item(animator))
            .collect();
        escape.swallow(animator, &items);
        log::info!("{} items pulled into the black hole", items.len());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_angles;
    use crate::sim::field::BehaviorKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::BTreeSet;
    use std::f32::consts::PI;

    const CENTER: Vec2 = Vec2::new(195.0, 407.0);
    const RADIUS: f32 = 156.0;

    #[derive(Default)]
    struct RecordingEscape {
        released: Vec<ItemId>,
        swallowed: Vec<ItemId>,
    }

    impl EscapeContext for RecordingEscape {
        fn release(&mut self, _animator: &mut Animator, item: ItemId) {
            self.released.push(item);
        }

        fn swallow(&mut self, _animator: &mut Animator, items: &[ItemId]) {
            self.swallowed.extend_from_slice(items);
        }
    }

    fn ring(n: usize) -> (Animator, SpotManager) {
        let mut anim = Animator::new(Vec2::new(390.0, 844.0));
        let manager = SpotManager::setup(&mut anim, &ring_angles(n), CENTER, RADIUS).unwrap();
        (anim, manager)
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_setup_fans_out_eight_spots() {
        let (anim, manager) = ring(8);
        assert_eq!(manager.len(), 8);

        for (i, spot) in manager.spots().iter().enumerate() {
            let theta = i as f32 * PI / 4.0;
            assert!((spot.direction_angle() - theta).abs() < 1e-5);
            // move((-R, -R)) only uses the y part: outward by R
            let expected = CENTER + Vec2::new(RADIUS * theta.cos(), RADIUS * theta.sin());
            assert!(approx(spot.center(), expected), "{} at {}", spot.id(), spot.center());
            assert!(spot.item(&anim).is_some());
        }

        let items: BTreeSet<_> = manager.assignments(&anim).into_iter().flatten().collect();
        assert_eq!(items.len(), 8);
    }

    #[test]
    fn test_setup_items_bound_to_own_spot_only() {
        let (anim, manager) = ring(4);
        for spot in manager.spots() {
            let item = spot.item(&anim).unwrap();
            assert_eq!(anim.behaviors_of(item), vec![spot.field(), spot.damping()]);
            assert_eq!(anim.tap_listener(item), Some(spot.id()));
        }
    }

    #[test]
    fn test_shuffle_targets_first_index_zero() {
        // Find a seed that draws 0 first
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let plan = shuffle_targets(5, &mut rng);
            if plan.first_index == 0 {
                assert_eq!(plan.targets[0], 4);
                assert_eq!(plan.targets[1], 0);
                return;
            }
        }
        panic!("no seed drew first index 0");
    }

    #[test]
    fn test_shuffle_targets_single_spot() {
        let mut rng = Pcg32::seed_from_u64(7);
        let plan = shuffle_targets(1, &mut rng);
        assert_eq!(plan.first_index, 0);
        assert_eq!(plan.targets, vec![0]);
    }

    #[test]
    fn test_shuffle_targets_empty() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(shuffle_targets(0, &mut rng).targets.is_empty());
    }

    #[test]
    fn test_shuffle_is_bijection() {
        let (mut anim, mut manager) = ring(8);
        let before: BTreeSet<_> = manager.assignments(&anim).into_iter().flatten().collect();
        let mut rng = Pcg32::seed_from_u64(12345);

        for _ in 0..20 {
            let moves = manager.shuffle(&mut anim, &mut rng).unwrap();
            assert_eq!(moves.len(), 8);
            let after: Vec<_> = manager.assignments(&anim);
            assert!(after.iter().all(Option::is_some));
            let after: BTreeSet<_> = after.into_iter().flatten().collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_shuffle_keeps_bindings_in_lockstep() {
        let (mut anim, mut manager) = ring(6);
        let mut rng = Pcg32::seed_from_u64(3);
        manager.shuffle(&mut anim, &mut rng).unwrap();

        for spot in manager.spots() {
            let item = spot.item(&anim).unwrap();
            assert_eq!(anim.members(spot.field()), &[item]);
            assert_eq!(anim.members(spot.damping()), &[item]);
            assert_eq!(anim.tap_listener(item), Some(spot.id()));
        }
    }

    #[test]
    fn test_shuffle_moves_first_index_item() {
        for seed in 0..50 {
            let (mut anim, mut manager) = ring(8);
            let before = manager.assignments(&anim);

            let mut plan_rng = Pcg32::seed_from_u64(seed);
            let plan = shuffle_targets(8, &mut plan_rng);

            let mut rng = Pcg32::seed_from_u64(seed);
            manager.shuffle(&mut anim, &mut rng).unwrap();
            let after = manager.assignments(&anim);

            let k = plan.first_index;
            assert_ne!(before[k], after[k], "seed {seed}: item at {k} stayed");
        }
    }

    #[test]
    fn test_shuffle_single_spot_returns_item() {
        let (mut anim, mut manager) = ring(1);
        let item = manager.spots()[0].item(&anim);
        let mut rng = Pcg32::seed_from_u64(1);
        let moves = manager.shuffle(&mut anim, &mut rng).unwrap();
        assert_eq!(moves, vec![(item.unwrap(), SpotId(0))]);
        assert_eq!(manager.spots()[0].item(&anim), item);
    }

    #[test]
    fn test_shuffle_with_empty_spot() {
        let (mut anim, mut manager) = ring(4);
        manager.spot_mut(SpotId(2)).unwrap().remove_item(&mut anim);
        let mut rng = Pcg32::seed_from_u64(9);
        let moves = manager.shuffle(&mut anim, &mut rng).unwrap();
        assert_eq!(moves.len(), 3);
        assert_eq!(manager.assignments(&anim).iter().flatten().count(), 3);
    }

    #[test]
    fn test_pan_changed_moves_every_spot() {
        let (mut anim, mut manager) = ring(8);
        let before: Vec<Vec2> = manager.spots().iter().map(Spot::center).collect();

        let mut pan = PanGesture::default();
        pan.apply(&crate::sim::PanEvent::changed(0.0, -50.0));
        assert!(manager.handle_pan(&mut anim, &mut pan));
        assert_eq!(pan.translation(), Vec2::ZERO);

        for (spot, prior) in manager.spots().iter().zip(before) {
            let theta = spot.direction_angle();
            let expected = prior + Vec2::new(50.0 * theta.cos(), 50.0 * theta.sin());
            assert!(approx(spot.center(), expected));
            let field = anim.behavior(spot.field()).and_then(BehaviorKind::as_spring);
            assert_eq!(field.map(|f| f.position), Some(spot.center()));
        }
    }

    #[test]
    fn test_pan_other_phases_ignored() {
        let (mut anim, mut manager) = ring(3);
        let before: Vec<Vec2> = manager.spots().iter().map(Spot::center).collect();

        for phase in [
            PanPhase::Possible,
            PanPhase::Began,
            PanPhase::Ended,
            PanPhase::Cancelled,
            PanPhase::Failed,
        ] {
            let mut pan = PanGesture::default();
            pan.apply(&crate::sim::PanEvent {
                phase,
                delta: Vec2::new(0.0, -40.0),
            });
            assert!(!manager.handle_pan(&mut anim, &mut pan));
        }

        let after: Vec<Vec2> = manager.spots().iter().map(Spot::center).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_interaction_releases_item() {
        let (mut anim, mut manager) = ring(4);
        let mut escape = RecordingEscape::default();
        let item = manager.spots()[1].item(&anim).unwrap();

        let interaction = manager.resolve_tap(&anim, item).unwrap();
        assert_eq!(interaction.spot, SpotId(1));
        assert!(manager.handle_interaction(&mut anim, &mut escape, interaction).unwrap());
        assert_eq!(escape.released, vec![item]);
        assert_eq!(manager.spots()[1].item(&anim), None);
        assert!(anim.behaviors_of(item).is_empty());

        // Second delivery of the same tap is a no-op
        assert!(!manager.handle_interaction(&mut anim, &mut escape, interaction).unwrap());
        assert_eq!(escape.released.len(), 1);
        assert!(manager.resolve_tap(&anim, item).is_none());
    }

    #[test]
    fn test_interaction_unknown_spot() {
        let (mut anim, mut manager) = ring(2);
        let mut escape = RecordingEscape::default();
        let err = manager
            .handle_interaction(
                &mut anim,
                &mut escape,
                Interaction {
                    item: ItemId(1),
                    spot: SpotId(9),
                },
            )
            .unwrap_err();
        assert_eq!(err, SpotError::UnknownSpot(SpotId(9)));
    }

    #[test]
    fn test_trigger_escape_detaches_everything() {
        let (mut anim, mut manager) = ring(8);
        let mut escape = RecordingEscape::default();
        let tapped = manager.spots()[0].item(&anim).unwrap();
        let interaction = manager.resolve_tap(&anim, tapped).unwrap();
        manager.handle_interaction(&mut anim, &mut escape, interaction).unwrap();

        let swallowed = manager.trigger_escape(&mut anim, &mut escape);
        assert_eq!(swallowed.len(), 7);
        assert_eq!(escape.swallowed, swallowed);
        assert!(manager.assignments(&anim).iter().all(Option::is_none));
        for spot in manager.spots() {
            assert!(anim.members(spot.field()).is_empty());
            assert!(anim.members(spot.damping()).is_empty());
        }
    }
}
