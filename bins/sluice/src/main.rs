use anyhow::Context;
use sluice_config::DriverConfig;
use sluice_dataflow::{Circuit, Input, Inputs, Output, Outputs, View, ViewError};
use sluice_engine::Engine;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// counter -> split(even, odd) -> pair sum -> terminal view
fn build_pipeline(circuit: &mut Circuit) -> View<u64> {
    let mut next = 0u64;
    let counter = circuit
        .source::<Output<u64>, _>(move || {
            let value = next;
            next += 1;
            value
        })
        .producer()
        .output_pipe();

    let split = circuit.transform::<Input<u64>, Outputs<(u64, u64)>, _>(|value: u64| {
        if value % 2 == 0 {
            (Some(value), None)
        } else {
            (None, Some(value))
        }
    });
    split.consumer().set_input_pipe(counter);
    let halves = split.producer().output_pipes();

    let sum = circuit.transform::<Inputs<(u64, u64)>, Output<u64>, _>(|even: u64, odd: u64| even + odd);
    sum.consumer().set_input_pipes(halves);
    sum.producer().output_pipe()
}

/// Pops from `view` until its queue goes away.
fn drain(mut view: View<u64>, timeout: Duration) -> u64 {
    let mut received = 0u64;
    loop {
        match view.wait_for(timeout) {
            Ok(true) => match view.pop() {
                Ok(_) => received += 1,
                Err(ViewError::Dangling) => break,
            },
            Ok(false) => continue,
            Err(ViewError::Dangling) => break,
        }
    }
    received
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => DriverConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => DriverConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if config.max_ticks.is_none() {
        warn!("no max_ticks configured, running until killed");
    }

    let mut circuit = Circuit::new();
    let terminal = build_pipeline(&mut circuit);
    info!(components = circuit.len(), "pipeline built");

    let timeout = config.drain_timeout();
    let drainer = thread::spawn(move || drain(terminal, timeout));

    let mut engine = Engine::new(circuit, config);
    engine.run().context("pipeline failed")?;
    let ticks = engine.ticks();

    // Dropping the circuit closes the terminal queue and releases the drainer.
    drop(engine);
    let received = drainer
        .join()
        .map_err(|_| anyhow::anyhow!("drain thread panicked"))?;

    info!(ticks, received, "done");
    Ok(())
}
