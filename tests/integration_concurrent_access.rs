//! Concurrent access integration tests
//!
//! These tests verify that a shared container constructs each service exactly
//! once under contention and never mistakes a concurrent resolution for a
//! circular reference.

use ferrous_container::{Argument, Container, ContainerBuilder, ServiceDefinition};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
pub struct CounterService {
    count: AtomicU32,
    thread_id: String,
}

impl CounterService {
    pub fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            thread_id: format!("created-by-{:?}", thread::current().id()),
        }
    }

    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get_count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

pub struct Consumer {
    counter: Arc<CounterService>,
}

fn shared_container(constructions: Arc<AtomicU32>, delay: Duration) -> Container {
    let mut builder = ContainerBuilder::new();
    builder
        .service("counter", ServiceDefinition::new("CounterService"))
        .service(
            "consumer",
            ServiceDefinition::new("Consumer").with_argument(Argument::service("counter")),
        );

    let classes = builder.classes_mut();
    classes.register("CounterService", move |_| {
        constructions.fetch_add(1, Ordering::SeqCst);
        thread::sleep(delay);
        Ok(CounterService::new())
    });
    classes.register("Consumer", |args| {
        Ok(Consumer {
            counter: args.instance(0)?,
        })
    });
    builder.build()
}

#[test]
fn test_concurrent_singleton_constructed_once() {
    const THREAD_COUNT: usize = 16;
    let constructions = Arc::new(AtomicU32::new(0));
    let container = shared_container(constructions.clone(), Duration::from_millis(20));
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let counter = container.get_as::<CounterService>("counter").unwrap();
                counter.increment();
                counter
            })
        })
        .collect();

    let instances: Vec<Arc<CounterService>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    for instance in &instances {
        assert!(Arc::ptr_eq(instance, &instances[0]));
    }
    assert_eq!(instances[0].get_count(), THREAD_COUNT as u32);
    assert!(instances[0].thread_id.starts_with("created-by-"));
}

#[test]
fn test_concurrent_dependents_share_dependency() {
    const THREAD_COUNT: usize = 8;
    let constructions = Arc::new(AtomicU32::new(0));
    let container = shared_container(constructions.clone(), Duration::from_millis(5));

    // Half the threads ask for the dependency directly, half through a consumer.
    crossbeam_utils::thread::scope(|s| {
        for i in 0..THREAD_COUNT {
            let container = &container;
            s.spawn(move |_| {
                if i % 2 == 0 {
                    container.get_as::<CounterService>("counter").unwrap();
                } else {
                    container.get_as::<Consumer>("consumer").unwrap();
                }
            });
        }
    })
    .unwrap();

    let consumer = container.get_as::<Consumer>("consumer").unwrap();
    let counter = container.get_as::<CounterService>("counter").unwrap();
    assert!(Arc::ptr_eq(&consumer.counter, &counter));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_resolution_is_not_circular() {
    // While one thread is inside the slow constructor, others request the same
    // name. They must wait, not report a cycle.
    let constructions = Arc::new(AtomicU32::new(0));
    let container = shared_container(constructions.clone(), Duration::from_millis(50));

    let first = {
        let container = container.clone();
        thread::spawn(move || container.get("counter"))
    };
    thread::sleep(Duration::from_millis(10));
    let second = {
        let container = container.clone();
        thread::spawn(move || container.get("counter"))
    };

    let a = first.join().unwrap().unwrap();
    let b = second.join().unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cached_reads_from_many_threads() {
    let container = shared_container(Arc::new(AtomicU32::new(0)), Duration::ZERO);
    let reference = container.get("consumer").unwrap();

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|_| {
                for _ in 0..1000 {
                    let instance = container.get("consumer").unwrap();
                    assert!(Arc::ptr_eq(&instance, &reference));
                }
            });
        }
    })
    .unwrap();
}
