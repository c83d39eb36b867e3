//! End-to-end multi-threaded tests for the broadcast queue.
//!
//! # Overview
//!
//! A writer thread pushes a numbered stream into a [`BroadcastQueue`] while
//! several reader threads drain their own [`View`]s **concurrently**:
//!
//! ```text
//!                    Time -->
//!
//! [Writer]   ----[push 0..N, paced in batches]----------------[drop queue]
//!                    |    |    |
//!                    v    v    v
//!               (shared slot buffer, one lock)
//!                    ^    ^    ^
//! [Reader A] ---[pop / wait_for ...]---------------------------[done]
//! [Reader B] ------[pop / wait_for ... slower]-----------------[done]
//! ```
//!
//! Every reader registered before the first push must observe the complete
//! stream, in order, exactly once, no matter how far behind it runs.
//!
//! # Running the Test
//!
//! ```bash
//! cargo test -p sluice-channel --test e2e_threads -- --nocapture
//! ```

use sluice_channel::{BroadcastQueue, View, ViewError};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Writes to stderr with immediate flush to bypass test output capture.
macro_rules! log {
    ($($arg:tt)*) => {{
        let _ = writeln!(std::io::stderr(), $($arg)*);
        let _ = std::io::stderr().flush();
    }};
}

/// Number of elements the writer publishes.
const EVENT_COUNT: u64 = 50_000;

/// The writer yields after each batch so readers interleave with it.
const WRITER_BATCH_SIZE: u64 = 1_000;
const WRITER_BATCH_DELAY_US: u64 = 100;

/// Drains `view` until `EVENT_COUNT` elements arrived, checking order.
fn run_reader(name: &str, mut view: View<u64>, slow: bool) -> u64 {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut expected = 0u64;

    while expected < EVENT_COUNT {
        assert!(Instant::now() < deadline, "[{name}] timed out at {expected}");

        if !view
            .wait_for(Duration::from_millis(50))
            .expect("queue closed before the stream ended")
        {
            continue;
        }

        let value = view.pop().expect("pop after wait_for");
        assert_eq!(value, expected, "[{name}] out of order or duplicated element");
        expected += 1;

        if slow && expected % 5_000 == 0 {
            thread::sleep(Duration::from_millis(1));
        }
    }

    log!("[{name}] received {expected} elements");
    expected
}

#[test]
fn e2e_concurrent_writer_and_readers() {
    let queue = BroadcastQueue::<u64>::new();
    let fast = queue.view();
    let slow = queue.view();

    let start = Instant::now();
    let (fast_count, slow_count) = thread::scope(|s| {
        let fast = s.spawn(move || run_reader("FAST", fast, false));
        let slow = s.spawn(move || run_reader("SLOW", slow, true));

        for i in 0..EVENT_COUNT {
            queue.push(i);
            if (i + 1) % WRITER_BATCH_SIZE == 0 {
                thread::sleep(Duration::from_micros(WRITER_BATCH_DELAY_US));
            }
        }
        log!("[WRITER] published {EVENT_COUNT} elements in {:?}", start.elapsed());

        (
            fast.join().expect("fast reader panicked"),
            slow.join().expect("slow reader panicked"),
        )
    });

    assert_eq!(fast_count, EVENT_COUNT);
    assert_eq!(slow_count, EVENT_COUNT);
    // Both readers dropped their views after draining everything.
    assert!(queue.is_empty());
    assert_eq!(queue.reader_count(), 0);
}

#[test]
fn e2e_many_writers_share_one_queue() {
    const WRITERS: u64 = 4;
    const PER_WRITER: u64 = 5_000;

    let queue = BroadcastQueue::<(u64, u64)>::new();
    let mut view = queue.view();

    thread::scope(|s| {
        for w in 0..WRITERS {
            let queue = &queue;
            s.spawn(move || {
                for i in 0..PER_WRITER {
                    queue.push((w, i));
                }
            });
        }
    });

    // Per-writer order is preserved even though writers interleave.
    let mut next = vec![0u64; WRITERS as usize];
    for _ in 0..WRITERS * PER_WRITER {
        let (w, i) = view.try_pop().unwrap().expect("all pushes completed");
        assert_eq!(next[w as usize], i);
        next[w as usize] += 1;
    }
    assert_eq!(view.try_pop(), Ok(None));
}

#[test]
fn e2e_blocked_reader_wakes_when_queue_is_dropped() {
    let queue = BroadcastQueue::<u64>::new();
    let mut view = queue.view();
    let started = Arc::new(AtomicBool::new(false));

    let reader = {
        let started = Arc::clone(&started);
        thread::spawn(move || {
            started.store(true, Ordering::Release);
            view.pop()
        })
    };

    while !started.load(Ordering::Acquire) {
        thread::yield_now();
    }
    thread::sleep(Duration::from_millis(20));
    drop(queue);

    let result = reader.join().expect("reader panicked");
    assert_eq!(result, Err(ViewError::Dangling));
}

#[test]
fn e2e_late_reader_only_sees_the_future() {
    let queue = BroadcastQueue::<u64>::new();
    let mut early = queue.view();

    for i in 0..10 {
        queue.push(i);
    }

    let mut late = queue.view();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        while seen.len() < 5 {
            seen.push(late.pop().expect("queue alive"));
        }
        seen
    });

    for i in 10..15 {
        queue.push(i);
    }

    assert_eq!(handle.join().expect("late reader panicked"), vec![10, 11, 12, 13, 14]);
    assert_eq!(early.size(), Ok(15));
    for i in 0..15 {
        assert_eq!(early.pop(), Ok(i));
    }
}
