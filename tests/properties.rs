//! Property tests for spot movement and shuffling

use std::collections::BTreeSet;

use balloon_spots::ring_angles;
use balloon_spots::sim::{Animator, Spot, SpotId, SpotManager, shuffle_targets};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn animator() -> Animator {
    Animator::new(Vec2::new(390.0, 844.0))
}

fn coord() -> impl Strategy<Value = f32> {
    -500.0f32..500.0
}

proptest! {
    #[test]
    fn move_ignores_horizontal(
        angle in 0.0f32..std::f32::consts::TAU,
        dx in coord(),
        dy in coord(),
    ) {
        let mut anim = animator();
        let start = Vec2::new(195.0, 407.0);
        let mut a = Spot::new(SpotId(0), &mut anim, angle, start);
        let mut b = Spot::new(SpotId(1), &mut anim, angle, start);

        a.move_by(&mut anim, Vec2::new(dx, dy));
        b.move_by(&mut anim, Vec2::new(0.0, dy));
        prop_assert!(a.center().distance(b.center()) < 1e-3);
    }

    #[test]
    fn move_is_linear(
        angle in 0.0f32..std::f32::consts::TAU,
        d1 in (coord(), coord()),
        d2 in (coord(), coord()),
    ) {
        let mut anim = animator();
        let start = Vec2::new(195.0, 407.0);
        let d1 = Vec2::new(d1.0, d1.1);
        let d2 = Vec2::new(d2.0, d2.1);

        let mut stepwise = Spot::new(SpotId(0), &mut anim, angle, start);
        stepwise.move_by(&mut anim, d1);
        stepwise.move_by(&mut anim, d2);

        let mut at_once = Spot::new(SpotId(1), &mut anim, angle, start);
        at_once.move_by(&mut anim, d1 + d2);

        prop_assert!(stepwise.center().distance(at_once.center()) < 1e-2);
    }

    #[test]
    fn assign_remove_leaves_no_binding(angle in 0.0f32..std::f32::consts::TAU) {
        let mut anim = animator();
        let mut spot = Spot::new(SpotId(0), &mut anim, angle, Vec2::ZERO);
        let item = anim.spawn_item(Vec2::ZERO);

        spot.assign(&mut anim, item).unwrap();
        prop_assert_eq!(spot.remove_item(&mut anim), Some(item));
        prop_assert_eq!(spot.item(&anim), None);
        prop_assert!(anim.behaviors_of(item).is_empty());
        prop_assert_eq!(anim.tap_listener(item), None);
    }

    #[test]
    fn shuffle_targets_are_a_permutation(n in 1usize..16, seed in any::<u64>()) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let plan = shuffle_targets(n, &mut rng);

        let distinct: BTreeSet<_> = plan.targets.iter().copied().collect();
        prop_assert_eq!(plan.targets.len(), n);
        prop_assert_eq!(distinct.len(), n);
        prop_assert!(plan.targets.iter().all(|&t| t < n));
        prop_assert!(plan.first_index < n);
    }

    #[test]
    fn shuffle_never_returns_first_index_item(n in 2usize..12, seed in any::<u64>()) {
        let mut anim = animator();
        let center = Vec2::new(195.0, 407.0);
        let mut manager = SpotManager::setup(&mut anim, &ring_angles(n), center, 150.0).unwrap();
        let before = manager.assignments(&anim);

        let plan = shuffle_targets(n, &mut Pcg32::seed_from_u64(seed));
        manager.shuffle(&mut anim, &mut Pcg32::seed_from_u64(seed)).unwrap();
        let after = manager.assignments(&anim);

        prop_assert_ne!(before[plan.first_index], after[plan.first_index]);

        let before: BTreeSet<_> = before.into_iter().flatten().collect();
        let after_set: BTreeSet<_> = after.iter().flatten().copied().collect();
        prop_assert_eq!(after.iter().flatten().count(), n);
        prop_assert_eq!(before, after_set);
    }
}
