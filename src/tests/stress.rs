//! Stress tests for concurrent start, join and liveness observation.

#[cfg(test)]
mod stress_tests {
    use crate::tests::helpers::{gate, CountingSpawner};
    use crate::tests::TEST_CONFIG;
    use crate::{Thread, ThreadBuilder};
    use portable_atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_massive_thread_creation() {
        let thread_count = TEST_CONFIG.stress_thread_count;
        let counter = Arc::new(AtomicU64::new(0));
        let mut threads = Vec::with_capacity(thread_count);

        for i in 0..thread_count {
            let counter_clone = counter.clone();
            let thread = ThreadBuilder::new()
                .name(format!("stress_{}", i))
                .spawn(move || {
                    counter_clone.fetch_add(1, Ordering::SeqCst);
                });
            threads.push(thread);
        }

        for thread in &threads {
            thread.join();
            assert!(!thread.is_alive());
        }

        assert_eq!(counter.load(Ordering::SeqCst), thread_count as u64);
    }

    #[test]
    fn test_concurrent_start_spawns_once() {
        let starters = 8;
        let spawner = Arc::new(CountingSpawner::default());
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();

        let thread = ThreadBuilder::new()
            .spawner(spawner.clone())
            .build(move || {
                runs_clone.fetch_add(1, Ordering::SeqCst);
            });

        let barrier = Barrier::new(starters);
        std::thread::scope(|scope| {
            for _ in 0..starters {
                scope.spawn(|| {
                    barrier.wait();
                    thread.start();
                });
            }
        });

        thread.join();
        assert_eq!(spawner.spawned(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_many_joiners_on_running_thread() {
        let release = gate();
        let release_clone = release.clone();

        let thread = Thread::named("joined-by-many", move || {
            let _ = release_clone.get();
        });
        thread.start();

        let joined = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for i in 0..TEST_CONFIG.concurrent_joiners {
                let thread = &thread;
                let joined = &joined;
                scope.spawn(move || {
                    if i % 2 == 0 {
                        thread.join();
                    } else {
                        assert!(thread.join_timeout(TEST_CONFIG.slack * 5));
                    }
                    joined.fetch_add(1, Ordering::SeqCst);
                });
            }

            Thread::sleep(20);
            assert_eq!(joined.load(Ordering::SeqCst), 0);
            release.complete(());
        });

        assert_eq!(joined.load(Ordering::SeqCst), TEST_CONFIG.concurrent_joiners);
        assert!(!thread.is_alive());
    }

    #[test]
    fn test_not_alive_implies_work_returned() {
        for _ in 0..TEST_CONFIG.stress_thread_count {
            let done = Arc::new(AtomicBool::new(false));
            let done_clone = done.clone();

            let thread = Thread::new(move || {
                done_clone.store(true, Ordering::Relaxed);
            });
            thread.start();

            while thread.is_alive() {
                std::hint::spin_loop();
            }
            assert!(done.load(Ordering::Relaxed));
            thread.join();
        }
    }

    #[test]
    fn test_interrupt_storm() {
        let threads: Vec<Thread> = (0..TEST_CONFIG.stress_thread_count / 4)
            .map(|i| {
                ThreadBuilder::new().name(format!("storm_{}", i)).spawn(|| {
                    while !crate::current().is_interrupted() {
                        Thread::sleep(1);
                    }
                })
            })
            .collect();

        std::thread::scope(|scope| {
            for thread in &threads {
                scope.spawn(move || thread.interrupt());
            }
        });

        for thread in &threads {
            assert!(thread.join_timeout(TEST_CONFIG.slack));
            assert!(thread.is_interrupted());
        }
    }
}
