use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use automapper::{Converter, Mappable, MappingEngine};

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct Reading {
    sensor: String,
    celsius: f64,
    samples: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct ReadingView {
    sensor: String,
    celsius: i64,
    samples: Vec<i64>,
    label: String,
}

fn reading(n: i32) -> Reading {
    Reading {
        sensor: format!("s{n}"),
        celsius: f64::from(n) + 0.25,
        samples: (0..n).collect(),
    }
}

#[test]
fn test_concurrent_lazy_build_same_pair() {
    let engine = MappingEngine::new();

    thread::scope(|scope| {
        for n in 0..8 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..50 {
                    let source = reading(n + i % 5);
                    let view: ReadingView = engine.map(&source).unwrap();
                    assert_eq!(view.sensor, source.sensor);
                    assert_eq!(view.celsius, i64::from(n + i % 5));
                    assert_eq!(view.samples.len(), source.samples.len());
                }
            });
        }
    });

    assert_eq!(engine.pairs().len(), 1);
}

#[test]
fn test_readers_see_old_or_new_mapper_during_reconfiguration() {
    let engine = MappingEngine::new();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            let engine = &engine;
            let done = &done;
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let view: ReadingView = engine.map(&reading(3)).unwrap();
                    // either the default binding or the configured one, never a mix
                    match view.label.as_str() {
                        "" => assert_eq!(view.sensor, "s3"),
                        "s3" => assert_eq!(view.sensor, ""),
                        other => panic!("unexpected label {other:?}"),
                    }
                }
            });
        }

        let engine = &engine;
        let done = &done;
        scope.spawn(move || {
            for round in 0..100 {
                if round % 2 == 0 {
                    engine.configure_mapping::<Reading, ReadingView>([("sensor", "label")]);
                } else {
                    engine.configure_mapping::<Reading, ReadingView>([("sensor", "sensor")]);
                }
            }
            done.store(true, Ordering::Release);
        });
    });

    // last round restored the same-name binding
    let view: ReadingView = engine.map(&reading(1)).unwrap();
    assert_eq!(view.sensor, "s1");
    assert_eq!(view.label, "");
}

#[test]
fn test_independent_pairs_build_in_parallel() {
    #[derive(Debug, Clone, Default, PartialEq, Mappable)]
    struct Other {
        sensor: String,
    }

    let engine = MappingEngine::new();
    engine.add_type_converter::<Reading, Other>(
        "sensor",
        Converter::new(|s: String| s.repeat(2)),
    );

    thread::scope(|scope| {
        scope.spawn(|| {
            for n in 0..100 {
                let other: Other = engine.map(&reading(n % 4)).unwrap();
                assert_eq!(other.sensor, format!("s{0}s{0}", n % 4));
            }
        });
        scope.spawn(|| {
            for n in 0..100 {
                let view: ReadingView = engine.map(&reading(n % 4)).unwrap();
                assert_eq!(view.sensor, format!("s{}", n % 4));
            }
        });
    });
}

#[test]
fn test_global_engine_across_threads() {
    #[derive(Debug, Clone, Default, PartialEq, Mappable)]
    struct Ping {
        seq: u32,
    }

    #[derive(Debug, Clone, Default, PartialEq, Mappable)]
    struct Pong {
        seq: u64,
    }

    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            thread::spawn(move || {
                (0..25u32)
                    .map(|i| automapper::map::<Ping, Pong>(&Ping { seq: t * 100 + i }))
                    .collect::<Result<Vec<_>, _>>()
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let pongs = handle.join().unwrap().unwrap();
        assert_eq!(pongs.len(), 25);
        assert_eq!(pongs[0].seq, t as u64 * 100);
    }
}
