//! Unit tests for abm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, IdGenerator};

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }

    #[test]
    fn generator_counts_from_one() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(), Some(AgentId(1)));
        assert_eq!(ids.next_id(), Some(AgentId(2)));
        assert_eq!(ids.peek(), AgentId(3));
    }

    #[test]
    fn generator_after_existing() {
        let ids = IdGenerator::after([AgentId(4), AgentId(9), AgentId(2)]);
        assert_eq!(ids.peek(), AgentId(10));

        let empty = IdGenerator::after(std::iter::empty());
        assert_eq!(empty.peek(), AgentId(1));
    }

    #[test]
    fn generator_is_an_iterator() {
        let taken: Vec<AgentId> = IdGenerator::starting_at(5).take(3).collect();
        assert_eq!(taken, vec![AgentId(5), AgentId(6), AgentId(7)]);
    }

    #[test]
    fn independent_generators_do_not_share_state() {
        let mut a = IdGenerator::new();
        let mut b = IdGenerator::new();
        a.next_id();
        a.next_id();
        assert_eq!(b.next_id(), Some(AgentId(1)));
    }

    #[test]
    fn generator_exhaustion_is_none_not_a_panic() {
        let mut ids = IdGenerator::after([AgentId(u32::MAX - 2)]);
        assert_eq!(ids.next_id(), Some(AgentId(u32::MAX - 1)));
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.peek(), AgentId::INVALID);

        let rest: Vec<AgentId> = IdGenerator::starting_at(u32::MAX - 1).collect();
        assert_eq!(rest, vec![AgentId(u32::MAX - 1)]);
    }
}

#[cfg(test)]
mod time {
    use crate::{Clock, ConfiguredClock, DiscreteTime, FixedClock, SimConfig, UnboundedClock};

    #[test]
    fn fixed_clock_yields_exactly_n_values() {
        for n in 0..20u64 {
            let clock = FixedClock::new(n, 10i64, 3);
            let values: Vec<i64> = clock.collect();
            assert_eq!(values.len() as u64, n);
            if n > 0 {
                assert_eq!(values[0], 10 + 3);
                assert_eq!(*values.last().unwrap(), 10 + 3 * n as i64);
            }
        }
    }

    #[test]
    fn fixed_clock_basic_sequence() {
        let clock = FixedClock::ticks(5);
        assert_eq!(clock.start_time(), 0);
        assert_eq!(clock.collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn fixed_clock_with_offset_start() {
        let clock = FixedClock::new(3, 10u64, 1);
        assert_eq!(clock.start_time(), 10);
        assert_eq!(clock.collect::<Vec<_>>(), vec![11, 12, 13]);
    }

    #[test]
    fn fixed_clock_stays_exhausted() {
        let mut clock = FixedClock::ticks(2);
        assert_eq!(clock.next(), Some(1));
        assert_eq!(clock.next(), Some(2));
        assert_eq!(clock.next(), None);
        assert_eq!(clock.next(), None);
        assert!(clock.is_exhausted());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn fixed_clock_real_valued() {
        let clock = FixedClock::new(4, 0.0f64, 0.5);
        assert_eq!(clock.collect::<Vec<_>>(), vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn fixed_clock_size_hint() {
        let mut clock = FixedClock::ticks(4);
        assert_eq!(clock.size_hint(), (4, Some(4)));
        clock.next();
        assert_eq!(clock.size_hint(), (3, Some(3)));
    }

    #[test]
    fn unbounded_clock_keeps_going() {
        let clock = UnboundedClock::new(10u64, 1);
        assert_eq!(clock.start_time(), 10);
        let values: Vec<u64> = clock.take(1000).collect();
        assert_eq!(values.len(), 1000);
        assert_eq!(values[0], 11);
        assert_eq!(values[999], 1010);
    }

    #[test]
    fn discrete_advance_saturates() {
        assert_eq!(5u64.advance(3), 8);
        assert_eq!((u32::MAX - 1).advance(10), u32::MAX);
        assert_eq!((-4i64).advance(4), 0);
    }

    #[test]
    fn config_builds_fixed_clock() {
        let cfg = SimConfig::ticks(3, 42);
        let clock = cfg.make_clock();
        assert!(matches!(clock, ConfiguredClock::Fixed(_)));
        assert_eq!(clock.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn config_builds_unbounded_clock() {
        let cfg = SimConfig { start: 1.0f64, step_size: 0.25, num_steps: None, seed: 0, two_stage: true };
        let clock = cfg.make_clock();
        assert_eq!(clock.start_time(), 1.0);
        assert_eq!(clock.take(2).collect::<Vec<_>>(), vec![1.25, 1.5]);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn children_are_deterministic_and_distinct() {
        let mut root_a = SimRng::new(7);
        let mut root_b = SimRng::new(7);
        let mut c1 = root_a.child(1);
        let mut c1_again = root_b.child(1);
        assert_eq!(c1.random::<u64>(), c1_again.random::<u64>());

        let mut c2 = root_a.child(2);
        assert_ne!(c1.random::<u64>(), c2.random::<u64>());
    }

    #[test]
    fn permutation_contains_every_index_once() {
        let mut rng = SimRng::new(3);
        let mut perm = rng.permutation(50);
        perm.sort_unstable();
        assert_eq!(perm, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn sample_indices_are_distinct() {
        let mut rng = SimRng::new(3);
        let mut sample = rng.sample_indices(100, 30);
        sample.sort_unstable();
        sample.dedup();
        assert_eq!(sample.len(), 30);
        assert!(sample.iter().all(|&i| i < 100));
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v: u32 = rng.gen_range(10..20);
            assert!((10..20).contains(&v));
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty[..]).is_none());
        assert_eq!(rng.choose(&[5][..]), Some(&5));
    }
}
