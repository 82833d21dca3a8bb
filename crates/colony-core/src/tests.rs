//! Unit tests for colony-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ItemId, ObstacleId, TargetId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(ItemId::INVALID.0, u32::MAX);
        assert!(!TargetId::default().is_valid());
        assert!(ObstacleId(3).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ItemId(12).to_string(), "ItemId(12)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Vec2;

    #[test]
    fn distance_and_length() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.length_sq(), 25.0);
    }

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(10.0, 0.0).normalized();
        assert_eq!(n, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn angle_to_is_atan2() {
        let a = Vec2::new(1.0, 1.0);
        let up = Vec2::new(1.0, 5.0);
        assert!((a.angle_to(up) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let left = Vec2::new(-2.0, 1.0);
        assert!((a.angle_to(left) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn tiles() {
        assert_eq!(Vec2::new(2.7, 3.1).tile(), (2, 3));
        assert_eq!(Vec2::new(-0.5, 0.0).tile(), (-1, 0));
        assert_eq!(Vec2::tile_center(4, 1), Vec2::new(4.5, 1.5));
    }

    #[test]
    fn step_toward_clamps_at_target() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        assert_eq!(a.step_toward(b, 0.25), Vec2::new(0.25, 0.0));
        assert_eq!(a.step_toward(b, 5.0), b);
    }
}

#[cfg(test)]
mod time {
    use crate::{GameSpeed, SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn paused_clock_yields_no_dt() {
        let clock = SimClock::new(0.1);
        let paused = GameSpeed { paused: true, multiplier: 1.0 };
        assert_eq!(clock.scaled_dt(paused), None);
    }

    #[test]
    fn multiplier_scales_dt() {
        let clock = SimClock::new(0.1);
        let fast = GameSpeed { paused: false, multiplier: 3.0 };
        let dt = clock.scaled_dt(fast).unwrap();
        assert!((dt - 0.3).abs() < 1e-6);
    }

    #[test]
    fn clock_accumulates_scaled_seconds() {
        let mut clock = SimConfig::default().make_clock();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs - 0.75).abs() < 1e-9);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, RandomSource, ScriptedRandom, SimRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(99, AgentId(3));
        let mut b = AgentRng::new(99, AgentId(3));
        for _ in 0..32 {
            assert_eq!(a.next_uniform(), b.next_uniform());
        }
    }

    #[test]
    fn agents_get_distinct_streams() {
        let mut a = AgentRng::new(99, AgentId(0));
        let mut b = AgentRng::new(99, AgentId(1));
        let xs: Vec<f32> = (0..8).map(|_| a.next_uniform()).collect();
        let ys: Vec<f32> = (0..8).map(|_| b.next_uniform()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn uniform_is_half_open() {
        let mut rng = SimRng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn scripted_cycles_and_clamps() {
        let mut s = ScriptedRandom::new(vec![0.3, 2.0]);
        assert_eq!(s.next_uniform(), 0.3);
        assert!(s.next_uniform() < 1.0);
        assert_eq!(s.next_uniform(), 0.3);
        assert_eq!(s.consumed(), 3);
    }

    #[test]
    fn empty_script_is_zero() {
        let mut s = ScriptedRandom::default();
        assert_eq!(s.next_uniform(), 0.0);
        assert!(s.chance(0.01));
    }
}
