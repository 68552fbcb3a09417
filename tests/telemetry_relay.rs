use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use ibird_regulator::prelude::*;
use ibird_regulator::telemetry::{self, POOL_CAPACITY};

fn stamped(time: u32) -> TelemetrySnapshot {
    TelemetrySnapshot { time, ..TelemetrySnapshot::EMPTY }
}

#[test]
fn six_publishes_into_five_slots_lose_only_the_oldest() {
    let mut pool = telemetry::pool();
    let (mut tx, mut rx) = pool.split();
    for t in 1..=6 {
        assert!(tx.publish(stamped(t)));
    }
    assert_eq!(tx.reclaimed(), 1);
    assert_eq!(rx.pending(), POOL_CAPACITY);

    let seen: Vec<u32> = std::iter::from_fn(|| {
                             let taken = rx.take()?;
                             let time = taken.value.time;
                             assert!(rx.return_slot(taken.handle));
                             Some(time)
                         }).collect();
    assert_eq!(seen, vec![2, 3, 4, 5, 6]);
    assert_eq!(rx.occupancy().idle, POOL_CAPACITY);
}

#[test]
fn returned_slot_is_reused() {
    let mut pool = telemetry::pool();
    let (mut tx, mut rx) = pool.split();
    for t in 1..=5 {
        tx.publish(stamped(t));
    }
    let mut held: Vec<Taken<TelemetrySnapshot>> =
        std::iter::from_fn(|| rx.take()).collect();
    assert_eq!(held.len(), POOL_CAPACITY);
    assert!(!tx.publish(stamped(6)));

    let first = held.remove(0);
    assert_eq!(first.value.time, 1);
    assert!(rx.return_slot(first.handle));
    assert!(tx.publish(stamped(7)));
    assert_eq!(rx.next_value().time, 7);
    assert_eq!(tx.reclaimed(), 0);
}

#[test]
fn reader_sees_increasing_times_under_contention() {
    const SAMPLES: u32 = 20_000;
    let mut pool = telemetry::pool();
    let (mut tx, mut rx) = pool.split();

    let (failed, last) = thread::scope(|s| {
        let producer = s.spawn(|| {
                            (1..=SAMPLES).filter(|t| !tx.publish(stamped(*t))).count()
                        });

        let mut last = 0;
        loop {
            match rx.take() {
                Some(taken) => {
                    assert!(taken.value.time > last, "{} after {}", taken.value.time, last);
                    last = taken.value.time;
                    assert!(rx.return_slot(taken.handle));
                }
                None if producer.is_finished() && rx.pending() == 0 => break,
                None => thread::yield_now(),
            }
        }
        (producer.join().unwrap(), last)
    });

    assert_eq!(failed, 0);
    assert_eq!(last, SAMPLES);
}

#[test]
fn publish_never_fails_while_reader_holds_at_most_one_slot() {
    const SAMPLES: u32 = 200_000;
    let mut pool = telemetry::pool();
    let (mut tx, mut rx) = pool.split();
    let done = AtomicBool::new(false);

    let failed = thread::scope(|s| {
        s.spawn(|| {
             while !done.load(Ordering::Acquire) {
                 if let Some(taken) = rx.take() {
                     rx.return_slot(taken.handle);
                 }
             }
         });

        let failed = (1..=SAMPLES).filter(|t| !tx.publish(stamped(*t))).count();
        done.store(true, Ordering::Release);
        failed
    });

    assert_eq!(failed, 0);
}
