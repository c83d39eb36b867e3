use std::hint::black_box;
use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};

use sluice_channel::{BroadcastQueue, ViewError};
use sluice_perf::*;

fn main() {
    let mut results: Vec<BenchResult> = Vec::new();
    let mut cross_thread: Option<Stats> = None;

    print_banner();

    // ═══════════════════════════════════════════════════════════════════════
    // 1. Channel operations
    // ═══════════════════════════════════════════════════════════════════════
    section_channel(&mut results);

    // ═══════════════════════════════════════════════════════════════════════
    // 2. Circuit ticks
    // ═══════════════════════════════════════════════════════════════════════
    section_circuit(&mut results);

    // ═══════════════════════════════════════════════════════════════════════
    // 3. Cross-thread push -> pop latency
    // ═══════════════════════════════════════════════════════════════════════
    section_cross_thread(&mut cross_thread);

    save_results(&results, &cross_thread);
}

fn print_banner() {
    let bar = "\u{2550}".repeat(90);
    println!("\n{bar}");
    println!("  SLUICE PERFORMANCE REPORT");
    println!("  batched micro + cross-thread latency");
    println!("{bar}\n");

    let ncpu = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(0);
    println!("  CPUs: {ncpu}");
}

fn section_channel(results: &mut Vec<BenchResult>) {
    section_header("Channel operations");
    print_table_header();

    let queue = BroadcastQueue::<u64>::new();
    let r = measure_batched("push (no readers)", 200, 1_000, 10, || {
        queue.push(black_box(1));
    });
    print_result_row(&r);
    results.push(r);

    let mut view = queue.view();
    let r = measure_batched("push + try_pop", 200, 1_000, 10, || {
        queue.push(black_box(1));
        black_box(view.try_pop().ok());
    });
    print_result_row(&r);
    results.push(r);

    let r = measure_batched("try_pop (empty)", 200, 1_000, 10, || {
        black_box(view.try_pop().ok());
    });
    print_result_row(&r);
    results.push(r);

    let mut views: Vec<_> = (0..16).map(|_| queue.view()).collect();
    let r = measure_batched("push + 16x try_pop", 200, 1_000, 10, || {
        queue.push(black_box(1));
        black_box(view.try_pop().ok());
        for view in &mut views {
            black_box(view.try_pop().ok());
        }
    });
    print_result_row(&r);
    results.push(r);
}

fn section_circuit(results: &mut Vec<BenchResult>) {
    section_header("Circuit ticks");
    print_table_header();

    for depth in [1usize, 8, 32] {
        let mut circuit = chain_circuit(depth);
        let r = measure_batched(&format!("chain depth {depth}"), 200, 500, 10, || {
            black_box(circuit.tick().ok());
        });
        print_result_row(&r);
        results.push(r);
    }

    for width in [2usize, 8, 32] {
        let mut circuit = fan_in_circuit(width);
        let r = measure_batched(&format!("fan-in width {width}"), 200, 500, 10, || {
            black_box(circuit.tick().ok());
        });
        print_result_row(&r);
        results.push(r);
    }
}

fn section_cross_thread(out: &mut Option<Stats>) {
    section_header("Cross-thread push -> pop (blocking reader)");

    let num_events = 200_000usize;
    let queue = BroadcastQueue::<Instant>::new();
    let mut view = queue.view();
    let barrier = Arc::new(Barrier::new(2));
    let b2 = Arc::clone(&barrier);

    let consumer = std::thread::spawn(move || {
        let mut samples = Vec::with_capacity(num_events);
        b2.wait();
        loop {
            match view.pop() {
                Ok(pushed_at) => samples.push(pushed_at.elapsed().as_nanos() as u64),
                Err(ViewError::Dangling) => break,
            }
        }
        samples
    });

    barrier.wait();
    let start = Instant::now();
    for i in 0..num_events {
        queue.push(Instant::now());
        // Pace the writer so the reader is measured waking, not catching up.
        if i % 64 == 0 {
            std::thread::sleep(Duration::from_micros(1));
        }
    }
    let elapsed = start.elapsed();
    // Closing the queue releases the reader; whatever it has not popped is lost.
    drop(queue);

    let mut samples = match consumer.join() {
        Ok(samples) => samples,
        Err(_) => {
            eprintln!("  [consumer thread panicked]");
            return;
        }
    };
    if samples.is_empty() {
        println!("  no samples collected");
        return;
    }

    let stats = compute_stats(&mut samples);
    println!(
        "  events: {}  received: {}  rate: {}/s",
        format_count(num_events as u64),
        format_count(stats.count as u64),
        format_count((num_events as f64 / elapsed.as_secs_f64()) as u64),
    );
    println!(
        "  latency ns  p50 {}  p90 {}  p99 {}  p99.9 {}  max {}",
        stats.p50, stats.p90, stats.p99, stats.p999, stats.max,
    );
    *out = Some(stats);
}

fn save_results(results: &[BenchResult], cross_thread: &Option<Stats>) {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let results_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/results");
    let _ = std::fs::create_dir_all(results_dir);
    let json_path = format!("{results_dir}/{timestamp}_report.json");

    let output = serde_json::json!({
        "report_type": "sluice",
        "timestamp": timestamp,
        "batched": results,
        "cross_thread": cross_thread,
    });

    let bar = "\u{2550}".repeat(90);
    let written = serde_json::to_string_pretty(&output)
        .map_err(std::io::Error::other)
        .and_then(|json| std::fs::write(&json_path, json));
    match written {
        Ok(()) => {
            println!("\n{bar}");
            println!("  Results saved to: {json_path}");
            println!("{bar}\n");
        }
        Err(e) => eprintln!("\n  [failed to save results: {e}]\n"),
    }
}
