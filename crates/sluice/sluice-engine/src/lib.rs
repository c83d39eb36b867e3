use sluice_config::DriverConfig;
use sluice_dataflow::{Component, TickError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, info};

/// Shared flag asking a running [`Engine`] to stop after its current tick.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Ticks a top-level component, normally a circuit, on the calling thread.
pub struct Engine<C: Component> {
    pub root: C,
    config: DriverConfig,
    ticks: u64,
    stop: StopHandle,
}

impl<C: Component> Engine<C> {
    pub fn new(root: C, config: DriverConfig) -> Self {
        Engine {
            root,
            config,
            ticks: 0,
            stop: StopHandle::default(),
        }
    }

    /// Handle for stopping [`run`](Self::run) from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn tick_once(&mut self) -> Result<(), TickError> {
        self.root.tick()?;
        self.ticks += 1;
        Ok(())
    }

    pub fn run_for(&mut self, rounds: u64) -> Result<(), TickError> {
        for _ in 0..rounds {
            self.tick_once()?;
        }
        Ok(())
    }

    /// Ticks until `max_ticks` is reached or the stop handle is raised.
    pub fn run(&mut self) -> Result<(), TickError> {
        let interval = self.config.tick_interval();
        info!(
            max_ticks = ?self.config.max_ticks,
            tick_interval_us = self.config.tick_interval_us,
            "engine starting"
        );

        while !self.stop.is_stopped() && !self.limit_reached() {
            if let Err(err) = self.tick_once() {
                debug!(ticks = self.ticks, %err, "engine stopped by a failing tick");
                return Err(err);
            }
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }

        info!(ticks = self.ticks, "engine stopped");
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.config.max_ticks.is_some_and(|max| self.ticks >= max)
    }
}
