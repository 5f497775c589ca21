//! Unit tests for abm-schedule.

use abm_core::SimRng;

use crate::{ScheduleResult, Scheduler};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Pin the scheduler's type parameters: `u8` agents, unit environment,
/// integer ticks.
fn pick<S: Scheduler<u8, (), u64>>(s: &mut S, now: u64, agents: &[u8]) -> ScheduleResult<Vec<usize>> {
    s.schedule(now, agents, &())
}

fn population(n: usize) -> Vec<u8> {
    vec![0; n]
}

/// Runs `f` with a subscriber that formats every event into a buffer, and
/// returns `f`'s result together with the captured text.
fn captured_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer(Arc::new(Mutex::new(Vec::new())));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    (result, String::from_utf8_lossy(&bytes).into_owned())
}

/// Mean gap between consecutive activations, measuring each agent's first
/// gap from time 0.
fn mean_wait(activations_by_tick: &[(u64, Vec<usize>)], num_agents: usize) -> f64 {
    let mut last = vec![0u64; num_agents];
    let mut total = 0u64;
    let mut count = 0u64;
    for (t, selected) in activations_by_tick {
        for &i in selected {
            total += t - last[i];
            count += 1;
            last[i] = *t;
        }
    }
    total as f64 / count as f64
}

// ── InOrderScheduler ──────────────────────────────────────────────────────────

#[cfg(test)]
mod in_order {
    use super::*;
    use crate::InOrderScheduler;

    #[test]
    fn every_agent_in_population_order() {
        let mut s = InOrderScheduler;
        assert_eq!(pick(&mut s, 1, &population(4)).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_population() {
        let mut s = InOrderScheduler;
        assert!(pick(&mut s, 1, &[]).unwrap().is_empty());
    }

    #[test]
    fn boxed_scheduler_delegates() {
        let mut s: Box<dyn Scheduler<u8, (), u64>> = Box::new(InOrderScheduler);
        assert_eq!(s.schedule(3, &population(2), &()).unwrap(), vec![0, 1]);
        assert_eq!(s.expected_population(), None);
    }
}

// ── RandomOrderScheduler ──────────────────────────────────────────────────────

#[cfg(test)]
mod random_order {
    use super::*;
    use crate::RandomOrderScheduler;

    #[test]
    fn output_is_a_permutation() {
        let mut s = RandomOrderScheduler::new(SimRng::new(3));
        let agents = population(50);
        for t in 1..=20 {
            let mut order = pick(&mut s, t, &agents).unwrap();
            order.sort_unstable();
            assert_eq!(order, (0..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn order_changes_between_ticks() {
        let mut s = RandomOrderScheduler::new(SimRng::new(3));
        let agents = population(50);
        let first = pick(&mut s, 1, &agents).unwrap();
        let second = pick(&mut s, 2, &agents).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn same_seed_same_orders() {
        let mut a = RandomOrderScheduler::new(SimRng::new(11));
        let mut b = RandomOrderScheduler::new(SimRng::new(11));
        let agents = population(30);
        for t in 1..=5 {
            assert_eq!(pick(&mut a, t, &agents).unwrap(), pick(&mut b, t, &agents).unwrap());
        }
    }
}

// ── RandomSampleScheduler ─────────────────────────────────────────────────────

#[cfg(test)]
mod random_sample {
    use super::*;
    use crate::{RandomSampleScheduler, ScheduleError};

    #[test]
    fn exactly_k_distinct_indices() {
        let mut s = RandomSampleScheduler::new(7, SimRng::new(5));
        let agents = population(20);
        for t in 1..=50 {
            let mut picked = pick(&mut s, t, &agents).unwrap();
            assert_eq!(picked.len(), 7);
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 7);
            assert!(picked.iter().all(|&i| i < 20));
        }
    }

    #[test]
    fn whole_population_is_allowed() {
        let mut s = RandomSampleScheduler::new(5, SimRng::new(5));
        let mut picked = pick(&mut s, 1, &population(5)).unwrap();
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn sample_larger_than_population_fails() {
        let mut s = RandomSampleScheduler::new(6, SimRng::new(5));
        assert_eq!(
            pick(&mut s, 1, &population(5)),
            Err(ScheduleError::SampleExceedsPopulation { size: 6, population: 5 }),
        );
    }
}

// ── BernoulliScheduler ────────────────────────────────────────────────────────

#[cfg(test)]
mod bernoulli {
    use super::*;
    use crate::{BernoulliScheduler, ScheduleError};

    #[test]
    fn invalid_probability_rejected() {
        assert_eq!(
            BernoulliScheduler::new(1.2, SimRng::new(0)).unwrap_err(),
            ScheduleError::InvalidProbability(1.2),
        );
        assert!(BernoulliScheduler::new(-0.1, SimRng::new(0)).is_err());
        assert!(BernoulliScheduler::new(f64::NAN, SimRng::new(0)).is_err());
    }

    #[test]
    fn zero_selects_nobody() {
        let mut s = BernoulliScheduler::new(0.0, SimRng::new(1)).unwrap();
        let agents = population(100);
        for t in 1..=10 {
            assert!(pick(&mut s, t, &agents).unwrap().is_empty());
        }
    }

    #[test]
    fn one_selects_everybody_in_order() {
        let mut s = BernoulliScheduler::new(1.0, SimRng::new(1)).unwrap();
        assert_eq!(pick(&mut s, 1, &population(6)).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn mean_wait_is_inverse_probability() {
        let mut s = BernoulliScheduler::new(0.4, SimRng::new(2024)).unwrap();
        let agents = population(100);
        let history: Vec<(u64, Vec<usize>)> =
            (1..=500).map(|t| (t, pick(&mut s, t, &agents).unwrap())).collect();

        let activations: usize = history.iter().map(|(_, v)| v.len()).sum();
        assert!(activations >= 10_000, "only {activations} activations");

        let mean = mean_wait(&history, agents.len());
        assert!((mean - 2.5).abs() < 0.1, "mean wait {mean}");
    }
}

// ── PrecomputedBernoulliScheduler ─────────────────────────────────────────────

#[cfg(test)]
mod precomputed {
    use super::*;
    use crate::{PrecomputedBernoulliScheduler, ScheduleError};

    #[test]
    fn invalid_inputs_rejected() {
        let mut rng = SimRng::new(0);
        assert_eq!(
            PrecomputedBernoulliScheduler::new(1.5, &mut rng, 10, 0u64, 100).unwrap_err(),
            ScheduleError::InvalidProbability(1.5),
        );
        assert!(matches!(
            PrecomputedBernoulliScheduler::new(0.5, &mut rng, 10, 10u64, 5),
            Err(ScheduleError::InvalidHorizon { .. }),
        ));
    }

    #[test]
    fn zero_probability_never_activates() {
        let s = PrecomputedBernoulliScheduler::new(0.0, &mut SimRng::new(0), 10, 0u64, 100).unwrap();
        assert!(s.is_empty());
        assert!(s.times().is_empty());
    }

    #[test]
    fn activations_fall_inside_horizon() {
        let s = PrecomputedBernoulliScheduler::new(0.3, &mut SimRng::new(7), 25, 10u64, 60).unwrap();
        let times = s.times();
        assert!(!times.is_empty());
        assert!(times.iter().all(|&t| t > 10 && t < 60));
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        let counted: usize = times.iter().map(|&t| s.activations(t).len()).sum();
        assert_eq!(counted, s.len());
    }

    #[test]
    fn certain_activation_hits_every_tick() {
        let s = PrecomputedBernoulliScheduler::new(1.0, &mut SimRng::new(7), 3, 0u64, 5).unwrap();
        assert_eq!(s.times(), vec![1, 2, 3, 4]);
        assert_eq!(s.activations(2), &[0, 1, 2]);
    }

    #[test]
    fn schedule_returns_table_entries() {
        let mut s = PrecomputedBernoulliScheduler::new(0.5, &mut SimRng::new(1), 8, 0u64, 40).unwrap();
        let agents = population(8);
        for t in 1..40 {
            let expected = s.activations(t).to_vec();
            assert_eq!(pick(&mut s, t, &agents).unwrap(), expected);
        }
    }

    #[test]
    fn past_the_horizon_is_empty_not_an_error() {
        let mut s = PrecomputedBernoulliScheduler::new(1.0, &mut SimRng::new(1), 4, 0u64, 10).unwrap();
        let (picked, logs) = captured_logs(|| {
            (pick(&mut s, 11, &population(4)), pick(&mut s, 1_000, &population(4)))
        });
        assert_eq!(picked.0.unwrap(), Vec::<usize>::new());
        assert_eq!(picked.1.unwrap(), Vec::<usize>::new());

        let warnings: Vec<&str> = logs.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 2, "{logs}");
        assert!(warnings[0].contains("past the end of the precomputed schedule"), "{logs}");
        assert!(warnings[0].contains("time=11"), "{logs}");
        assert!(warnings[1].contains("time=1000"), "{logs}");
    }

    #[test]
    fn quiet_ticks_inside_the_horizon_do_not_warn() {
        let mut s = PrecomputedBernoulliScheduler::new(0.0, &mut SimRng::new(1), 4, 0u64, 10).unwrap();
        let (picked, logs) = captured_logs(|| {
            (1..=10).map(|t| pick(&mut s, t, &population(4)).unwrap()).collect::<Vec<_>>()
        });
        assert!(picked.iter().all(Vec::is_empty));
        assert!(!logs.contains("WARN"), "{logs}");
    }

    #[test]
    fn population_size_is_fixed() {
        let mut s = PrecomputedBernoulliScheduler::new(0.5, &mut SimRng::new(1), 4, 0u64, 10).unwrap();
        assert_eq!(Scheduler::<u8, (), u64>::expected_population(&s), Some(4));
        assert_eq!(
            pick(&mut s, 1, &population(5)),
            Err(ScheduleError::PopulationMismatch { expected: 4, got: 5 }),
        );
    }

    #[test]
    fn mean_wait_is_inverse_probability() {
        let num_agents = 200;
        let s = PrecomputedBernoulliScheduler::new(0.2, &mut SimRng::new(99), num_agents, 0u64, 2_000)
            .unwrap();
        let history: Vec<(u64, Vec<usize>)> =
            s.times().into_iter().map(|t| (t, s.activations(t).to_vec())).collect();

        let mean = mean_wait(&history, num_agents);
        assert!((mean - 5.0).abs() < 0.1, "mean wait {mean}");
    }
}
