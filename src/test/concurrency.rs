use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::{FlagValue, Registry};

const WRITERS: usize = 4;
const READERS: usize = 8;
const ITERATIONS: usize = 1_000;

fn is_written_text(s: &str) -> bool {
    if s == "initial" {
        return true;
    }

    let Some((writer, iteration)) = s
        .strip_prefix("writer")
        .and_then(|rest| rest.split_once('_'))
    else {
        return false;
    };

    matches!(writer.parse::<usize>(), Ok(w) if w < WRITERS)
        && matches!(iteration.parse::<usize>(), Ok(i) if i < ITERATIONS)
}

#[test]
fn readers_and_writers_on_one_flag() {
    super::init_tracing();

    let registry = Registry::new();
    registry.define("thread_test_bool", false, "");
    registry.define("thread_test_int", 0, "");
    registry.define("thread_test_string", "initial", "");

    std::thread::scope(|s| {
        for i in 0..WRITERS {
            let registry = &registry;
            s.spawn(move || {
                for j in 0..ITERATIONS {
                    assert!(registry.update("thread_test_bool", j % 2 == 0));
                    assert!(registry.update("thread_test_int", (i * ITERATIONS + j) as i64));
                    assert!(registry.update("thread_test_string", format!("writer{i}_{j}")));
                }
            });
        }

        for _ in 0..READERS {
            let registry = &registry;
            s.spawn(move || {
                for _ in 0..ITERATIONS {
                    registry.is_enabled("thread_test_bool");

                    let int = registry.get_value::<i64>("thread_test_int");
                    assert!(matches!(int, Some(n) if (0..(WRITERS * ITERATIONS) as i64).contains(&n)));

                    let text = registry.get_value::<String>("thread_test_string");
                    assert!(
                        text.as_deref().is_some_and(is_written_text),
                        "torn or unexpected value: {text:?}"
                    );
                }
            });
        }
    });

    assert!(is_written_text(
        &registry
            .get_value::<String>("thread_test_string")
            .unwrap()
    ));
}

#[test]
fn kind_drift_under_contention_is_never_torn() {
    super::init_tracing();

    let registry = Registry::new();
    let flag = registry.define("drifting", 0, "");
    let stop = AtomicBool::new(false);

    std::thread::scope(|s| {
        for i in 0..WRITERS {
            let registry = &registry;
            s.spawn(move || {
                for j in 0..ITERATIONS {
                    let value = match j % 4 {
                        0 => FlagValue::Bool(i % 2 == 0),
                        1 => FlagValue::Int(j as i64),
                        2 => FlagValue::Double(j as f64),
                        _ => FlagValue::Text(format!("writer{i}_{j}")),
                    };
                    registry.update("drifting", value);
                }
            });
        }

        for _ in 0..READERS {
            let flag = Arc::clone(&flag);
            let stop = &stop;
            s.spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    match flag.value() {
                        FlagValue::Bool(_) => {}
                        FlagValue::Int(n) => assert!((0..ITERATIONS as i64).contains(&n)),
                        FlagValue::Double(d) => assert!((0.0..ITERATIONS as f64).contains(&d)),
                        FlagValue::Text(t) => assert!(is_written_text(&t), "torn value: {t:?}"),
                    }
                }
            });
        }

        std::thread::sleep(Duration::from_millis(50));
        stop.store(true, Ordering::Relaxed);
    });
}

#[test]
fn racing_defines_share_one_flag() {
    super::init_tracing();

    let registry = Registry::new();

    let flags: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..READERS)
            .map(|i| {
                let registry = &registry;
                s.spawn(move || registry.define("contested", i as i64, format!("thread {i}")))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(registry.len(), 1);

    let first = &flags[0];
    assert!(flags.iter().all(|flag| Arc::ptr_eq(flag, first)));

    let winner = first.get::<i64>().unwrap();
    assert_eq!(first.description(), format!("thread {winner}"));
}

#[test]
fn typed_updates_under_contention_keep_kind() {
    super::init_tracing();

    let registry = Registry::new();
    registry.define("locked", 0, "");

    std::thread::scope(|s| {
        for i in 0..WRITERS {
            let registry = &registry;
            s.spawn(move || {
                for j in 0..ITERATIONS {
                    if i % 2 == 0 {
                        assert!(registry.update_typed("locked", j as i64).is_ok());
                    } else {
                        assert!(registry.update_typed("locked", "nope").is_err());
                    }
                }
            });
        }
    });

    assert!(registry.get_value::<i64>("locked").is_some());
}
