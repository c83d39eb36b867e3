use sluice_dataflow::{Circuit, Input, InputBus, Output};
use std::time::Instant;

// ─── Statistics ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub stddev: f64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
    pub count: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchResult {
    pub name: String,
    pub unit: String,
    pub stats: Stats,
}

pub fn compute_stats(samples: &mut [u64]) -> Stats {
    assert!(!samples.is_empty(), "cannot compute stats on empty samples");
    samples.sort_unstable();

    let count = samples.len();
    let sum: u64 = samples.iter().sum();
    let mean = sum as f64 / count as f64;

    let variance = samples
        .iter()
        .map(|&x| {
            let diff = x as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    Stats {
        min: samples[0],
        max: samples[count - 1],
        mean,
        stddev: variance.sqrt(),
        p50: percentile_sorted(samples, 50.0),
        p90: percentile_sorted(samples, 90.0),
        p99: percentile_sorted(samples, 99.0),
        p999: percentile_sorted(samples, 99.9),
        count,
    }
}

fn percentile_sorted(sorted: &[u64], pct: f64) -> u64 {
    let len = sorted.len();
    if len == 1 {
        return sorted[0];
    }
    let rank = (pct / 100.0 * len as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(len - 1);
    sorted[idx]
}

// ─── Measurement Harness ────────────────────────────────────────────────────

pub fn measure_batched<F: FnMut()>(
    name: &str,
    batches: usize,
    batch_size: usize,
    warmup: usize,
    mut f: F,
) -> BenchResult {
    for _ in 0..warmup * batch_size {
        f();
    }

    let mut samples = Vec::with_capacity(batches);
    for _ in 0..batches {
        let start = Instant::now();
        for _ in 0..batch_size {
            f();
        }
        let total = start.elapsed().as_nanos();
        let per_op = ((total + (batch_size as u128 / 2)) / batch_size as u128) as u64;
        samples.push(per_op.max(1));
    }

    BenchResult {
        name: name.to_string(),
        unit: "ns/op".to_string(),
        stats: compute_stats(&mut samples),
    }
}

// ─── Fixtures (shared by bench + report) ───────────────────────────────────

/// `width` sources feeding one bus sink.
///
/// Each tick pushes `width` elements and consumes them all again, so no queue
/// grows between rounds.
pub fn fan_in_circuit(width: usize) -> Circuit {
    let mut circuit = Circuit::new();
    let mut pipes = Vec::with_capacity(width);
    for seed in 0..width as u64 {
        let mut next = seed;
        let source = circuit.source::<Output<u64>, _>(move || {
            next = next.wrapping_add(1);
            next
        });
        pipes.push(source.producer().output_pipe());
    }

    let sink = circuit.sink::<InputBus<u64>, _>(|values: Vec<u64>| {
        std::hint::black_box(values);
    });
    for pipe in pipes {
        sink.consumer().add_input_pipe(pipe);
    }
    circuit
}

/// A source followed by `depth` pass-through stages and a sink.
pub fn chain_circuit(depth: usize) -> Circuit {
    let mut circuit = Circuit::new();
    let mut next = 0u64;
    let mut upstream = circuit
        .source::<Output<u64>, _>(move || {
            next += 1;
            next
        })
        .producer()
        .output_pipe();

    for _ in 0..depth {
        let stage = circuit.transform::<Input<u64>, Output<u64>, _>(|value: u64| value ^ 1);
        stage.consumer().set_input_pipe(upstream);
        upstream = stage.producer().output_pipe();
    }

    circuit
        .sink::<Input<u64>, _>(|value: u64| {
            std::hint::black_box(value);
        })
        .consumer()
        .set_input_pipe(upstream);
    circuit
}

// ─── Display ────────────────────────────────────────────────────────────────

pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

pub fn print_result_row(r: &BenchResult) {
    println!(
        "  {:<30} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
        r.name, r.stats.min, r.stats.p50, r.stats.p90, r.stats.p99, r.stats.p999, r.stats.max, r.unit,
    );
}

pub fn print_table_header() {
    println!(
        "  {:<30} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}  unit",
        "Benchmark", "min", "p50", "p90", "p99", "p99.9", "max",
    );
    println!("  {}", "─".repeat(90));
}

pub fn section_header(title: &str) {
    println!("\n{}", "─".repeat(90));
    println!("  {title}");
    println!("{}\n", "─".repeat(90));
}
